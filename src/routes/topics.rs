use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::analytics::{FetchMode, TopicsReport};
use crate::response::AppError;
use crate::state::AppState;

use super::{checked_username, provider_failure};

pub fn router() -> Router<AppState> {
    Router::new().route("/:username/topics", get(user_topics))
}

#[derive(Debug, Default, Deserialize)]
pub struct TopicsQuery {
    enhanced: Option<String>,
}

impl TopicsQuery {
    /// Only a literal `true` switches to enhanced mode.
    fn mode(&self) -> FetchMode {
        FetchMode::from_flag(self.enhanced.as_deref().map(str::trim) == Some("true"))
    }
}

pub async fn user_topics(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<TopicsQuery>,
) -> Result<Json<TopicsReport>, AppError> {
    let username = checked_username(&username)?;
    let mode = query.mode();

    tracing::info!(%username, ?mode, "Analyzing topics");
    let report = state
        .analyzer()
        .analyze(&username, mode)
        .await
        .map_err(|e| provider_failure("topics", &username, e))?;

    Ok(Json(report))
}
