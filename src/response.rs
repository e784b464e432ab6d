use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::leetcode::ProviderError;
use crate::services::llm_provider::LlmError;

const GENERIC_MESSAGE: &str = "Internal server error";

/// Error payload. `traceId` is filled in by the request id middleware.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub is_operational: bool,
}

impl AppError {
    fn new(status: StatusCode, code: &str, message: &str, is_operational: bool) -> Self {
        Self {
            status,
            code: code.to_string(),
            message: message.to_string(),
            is_operational,
        }
    }

    pub fn bad_request(code: &str, message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message, true)
    }

    pub fn unauthorized(message: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "AUTH_UNAUTHORIZED", message, true)
    }

    pub fn forbidden(message: &str) -> Self {
        Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", message, true)
    }

    pub fn not_found(message: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message, true)
    }

    pub fn too_many_requests(message: &str) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED", message, true)
    }

    pub fn service_unavailable(code: &str, message: &str) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, code, message, true)
    }

    /// Upstream call exceeded its time limit. Reported as a server error
    /// but with a distinct code so clients can tell it apart.
    pub fn provider_timeout(message: &str) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "PROVIDER_TIMEOUT",
            message,
            true,
        )
    }

    pub fn internal(message: &str) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            message,
            false,
        )
    }

    pub fn upstream(message: &str) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "PROVIDER_ERROR",
            message,
            false,
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let exposed_message = if self.is_operational {
            self.message.clone()
        } else {
            GENERIC_MESSAGE.to_string()
        };

        if self.is_operational {
            tracing::warn!(status = %self.status, code = %self.code, error = %self.message, "API error");
        } else {
            tracing::error!(status = %self.status, code = %self.code, error = %self.message, "Internal API error");
        }

        (
            self.status,
            Json(ErrorBody {
                error: exposed_message,
                code: self.code,
                trace_id: None,
            }),
        )
            .into_response()
    }
}

// Timeouts and missing resources carry a user-facing message; everything else
// from the provider, including an upstream 401/403, is logged in full and
// hidden behind the generic text. Handlers that know what was looked up
// refine the not-found and session cases in `routes`.
impl From<ProviderError> for AppError {
    fn from(value: ProviderError) -> Self {
        match &value {
            ProviderError::NotFound(_) => {
                AppError::not_found("The requested LeetCode resource was not found.")
            }
            ProviderError::Timeout(limit) => AppError::provider_timeout(&format!(
                "LeetCode did not answer within {}s. Please try again later.",
                limit.as_secs()
            )),
            _ => AppError::upstream(&value.to_string()),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(value: LlmError) -> Self {
        match &value {
            LlmError::Disabled => AppError::service_unavailable(
                "LLM_DISABLED",
                "AI assistant is not configured on this server",
            ),
            _ => AppError::internal(&value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::to_bytes;
    use axum::response::IntoResponse;

    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn internal_error_is_redacted() {
        let (status, json) = body_json(AppError::internal("socket closed")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], GENERIC_MESSAGE);
        assert!(!json.to_string().contains("socket closed"));
    }

    #[tokio::test]
    async fn bad_request_keeps_message() {
        let (status, json) =
            body_json(AppError::bad_request("USERNAME_REQUIRED", "Username is required")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Username is required");
        assert_eq!(json["code"], "USERNAME_REQUIRED");
        assert!(json.get("traceId").is_none());
    }

    #[tokio::test]
    async fn provider_not_found_is_404() {
        let err = AppError::from(ProviderError::NotFound("ghost".into()));
        let (status, json) = body_json(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn provider_timeout_has_own_code() {
        let err = AppError::from(ProviderError::Timeout(Duration::from_secs(15)));
        let (status, json) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "PROVIDER_TIMEOUT");
        assert!(json["error"].as_str().unwrap().contains("15s"));
    }

    #[tokio::test]
    async fn other_provider_failures_are_generic_500() {
        let err = AppError::from(ProviderError::Http {
            status: 502,
            message: "bad gateway".into(),
        });
        let (status, json) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "PROVIDER_ERROR");
        assert_eq!(json["error"], GENERIC_MESSAGE);

        let (status, _) = body_json(AppError::from(ProviderError::RateLimited)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn upstream_unauthorized_is_not_a_client_401() {
        let (status, json) = body_json(AppError::from(ProviderError::Unauthorized)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "PROVIDER_ERROR");
        assert_eq!(json["error"], GENERIC_MESSAGE);
    }

    #[tokio::test]
    async fn disabled_llm_is_503() {
        let (status, json) = body_json(AppError::from(LlmError::Disabled)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["code"], "LLM_DISABLED");
    }
}
