use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Application-wide error types with appropriate HTTP status codes.
///
/// # Upstream Errors
///
/// Upstream failures are split so that fetch sites can tell a transport
/// failure apart from a reachable upstream answering with an error status:
///
/// - `Upstream` - Request could not be sent or the body could not be decoded
/// - `UpstreamStatus` - Upstream answered with a non-2xx status
///
/// Most fetch sites never surface these to clients; they degrade to a
/// fallback value instead (see `upstream`).
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Upstream returned status {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Error response body for API endpoints.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Full details stay in the logs; clients get a sanitized message
        tracing::error!(error = %self, "Request failed");

        let (status, error_type, message) = match &self {
            AppError::Upstream(_) | AppError::UpstreamStatus { .. } => (
                StatusCode::BAD_GATEWAY,
                "upstream_error",
                "Upstream data source is unavailable. Please try again later.",
            ),
            AppError::Template(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "template_error",
                "Page rendering failed.",
            ),
            AppError::ConfigError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "config_error",
                "Service configuration error.",
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.as_str()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.as_str()),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: message.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
