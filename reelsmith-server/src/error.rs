//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reelsmith::ReelError;
use serde::Serialize;
use thiserror::Error;

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown resource.
    #[error("not found: {0}")]
    NotFound(String),

    /// Pipeline failure, mapped by kind.
    #[error(transparent)]
    Reel(#[from] ReelError),
}

impl ApiError {
    /// Build an [`ApiError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Reel(e) => match e {
                ReelError::Validation(_) => StatusCode::BAD_REQUEST,
                ReelError::ExternalService { .. } => StatusCode::BAD_GATEWAY,
                ReelError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                ReelError::Cancelled(_) => StatusCode::SERVICE_UNAVAILABLE,
                ReelError::Configuration(_)
                | ReelError::Render(_)
                | ReelError::Composition { .. }
                | ReelError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "not_found",
            ApiError::Reel(e) => e.kind(),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    kind: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            detail: self.to_string(),
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[path = "../tests/unit/error.rs"]
mod tests;
