//! Session-wide submission export: every submission the session can see,
//! plus the full detail of the newest one.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::extractors::JsonBody;
use crate::leetcode::{bounded, AuthenticatedSubmission, SubmissionDetail};
use crate::response::AppError;
use crate::state::AppState;

use super::session_failure;
use super::users::{collect_session_submissions, session_required, SessionRequest};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(export))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub submissions: Vec<AuthenticatedSubmission>,
    pub submission_detail: Option<SubmissionDetail>,
}

#[derive(Serialize)]
pub struct ExportReply {
    pub success: bool,
    pub data: ExportData,
    pub timestamp: DateTime<Utc>,
}

pub async fn export(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SessionRequest>,
) -> Result<Json<ExportReply>, AppError> {
    let credential = req.credential().ok_or_else(session_required)?;

    let user = bounded(state.call_timeout(), state.provider().session_user(&credential))
        .await
        .map_err(|e| session_failure("export session", "", "LeetCode session not found", e))?;
    if !user.signed_in {
        return Err(AppError::unauthorized(
            "Session cookie authentication failed",
        ));
    }
    let owner = user.username.unwrap_or_default();

    let submissions = collect_session_submissions(&state, &credential, &owner).await?;

    // The detail is a bonus; the list alone is a useful answer.
    let submission_detail = match submissions.first() {
        Some(newest) => {
            match bounded(
                state.call_timeout(),
                state.provider().submission_detail(&credential, newest.id),
            )
            .await
            {
                Ok(detail) => Some(detail),
                Err(e) => {
                    tracing::warn!(
                        %owner,
                        submission_id = newest.id,
                        error = %e,
                        "Newest submission detail unavailable"
                    );
                    None
                }
            }
        }
        None => None,
    };

    tracing::info!(%owner, total = submissions.len(), "Exported session submissions");

    Ok(Json(ExportReply {
        success: true,
        data: ExportData {
            submissions,
            submission_detail,
        },
        timestamp: Utc::now(),
    }))
}
