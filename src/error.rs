use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Failures surfaced to HTTP callers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No repository root configured for this process instance.
    #[error("repository path not configured")]
    NotConfigured,
    /// Missing or malformed request field.
    #[error("{0}")]
    Validation(String),
    /// An underlying git command failed.
    #[error("git command failed: {0}")]
    Git(String),
    /// Strict-mode commit/push without a matching validation record.
    #[error("Pre-commit quiz must be completed.")]
    GateViolation,
    /// The quiz store exists but could not be read or parsed.
    #[error("quiz store error: {0}")]
    Persistence(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Git(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::GateViolation => StatusCode::FORBIDDEN,
            AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
