pub mod ai;
pub mod codesage;
pub mod health;
pub mod topics;
pub mod users;

use axum::extract::DefaultBodyLimit;
use axum::Router;

use crate::leetcode::ProviderError;
use crate::middleware::{rate_limit, request_id};
use crate::response::AppError;
use crate::state::AppState;
use crate::validation::validate_username;

/// Chat payloads carry pasted code; 256 KiB is plenty.
const MAX_BODY_SIZE: usize = 256 * 1024;

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .nest("/users", users::router().merge(topics::router()))
        .nest("/ai-chat", ai::router())
        .nest("/codesage", codesage::router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_middleware,
        ))
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE));

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health::router())
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .with_state(state)
}

pub(crate) fn checked_username(raw: &str) -> Result<String, AppError> {
    validate_username(raw)
        .map(str::to_string)
        .map_err(|msg| AppError::bad_request("INVALID_USERNAME", msg))
}

const USER_NOT_FOUND: &str = "User not found. Please check the username and try again.";
const SESSION_REJECTED: &str = "LeetCode session is invalid or expired. Please sign in again.";

/// Logs a failed public provider call and converts it for the response.
///
/// Only the profile owner can be missing here, so `NotFound` names the user.
/// Unknown users are expected traffic and are not logged as errors.
pub(crate) fn provider_failure(
    action: &'static str,
    username: &str,
    err: ProviderError,
) -> AppError {
    match err {
        ProviderError::NotFound(_) => {
            tracing::info!(username, action, "LeetCode user not found");
            AppError::not_found(USER_NOT_FOUND)
        }
        err => {
            tracing::error!(username, action, error = %err, "LeetCode request failed");
            AppError::from(err)
        }
    }
}

/// Same as [`provider_failure`] for calls made with the caller's session: a
/// rejected session is the client's 401, and `missing` names what was looked up.
pub(crate) fn session_failure(
    action: &'static str,
    username: &str,
    missing: &str,
    err: ProviderError,
) -> AppError {
    match err {
        ProviderError::Unauthorized => {
            tracing::info!(username, action, "LeetCode session rejected");
            AppError::unauthorized(SESSION_REJECTED)
        }
        ProviderError::NotFound(_) => {
            tracing::info!(username, action, missing, "LeetCode resource not found");
            AppError::not_found(missing)
        }
        err => {
            tracing::error!(username, action, error = %err, "LeetCode request failed");
            AppError::from(err)
        }
    }
}
