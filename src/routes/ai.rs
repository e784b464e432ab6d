use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::extractors::JsonBody;
use crate::response::AppError;
use crate::services::mentor;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(chat))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    message: String,
    code: Option<String>,
    language: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub success: bool,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

pub async fn chat(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(AppError::bad_request("MESSAGE_REQUIRED", "Message is required"));
    }
    let code = req.code.as_deref().filter(|c| !c.trim().is_empty());
    let language = req.language.as_deref().filter(|l| !l.trim().is_empty());

    let system = mentor::system_prompt(language, code.is_some());
    let user = mentor::user_prompt(message, code, language);

    tracing::info!(has_code = code.is_some(), language = ?language, "Sending mentor chat");
    let response = state.llm().complete(&system, &user).await.map_err(|e| {
        tracing::error!(error = %e, "Mentor chat failed");
        AppError::from(e)
    })?;

    Ok(Json(ChatReply {
        success: true,
        response,
        timestamp: Utc::now(),
    }))
}
