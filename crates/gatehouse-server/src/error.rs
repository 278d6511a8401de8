//! Error types for gatehouse-server and their HTTP rendering.

use axum::extract::multipart::MultipartError;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gatehouse_core::Error as CoreError;
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

/// Result type alias for request handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Errors a handler can return.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ApiError {
    /// Error from the auth layer or the platform.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Malformed multipart upload.
    #[error("Invalid upload: {0}")]
    Upload(String),
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Upload(err.body_text())
    }
}

impl ApiError {
    /// Status code and error category for the response.
    pub fn classify(&self) -> (StatusCode, &'static str) {
        let core = match self {
            ApiError::Upload(_) => return (StatusCode::BAD_REQUEST, "validation"),
            ApiError::Core(e) => e,
        };
        match core {
            CoreError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation"),
            CoreError::Unauthenticated(_) => (StatusCode::UNAUTHORIZED, "authentication"),
            CoreError::Forbidden(_) => (StatusCode::FORBIDDEN, "authorization"),
            CoreError::Timeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
            CoreError::Api { code: 401, .. } => (StatusCode::UNAUTHORIZED, "authentication"),
            CoreError::Api { code: 403, .. } => (StatusCode::FORBIDDEN, "authorization"),
            CoreError::Api { code, .. } if (400..500).contains(code) => {
                (StatusCode::BAD_REQUEST, "platform")
            }
            CoreError::Api { .. } | CoreError::Transport(_) => (StatusCode::BAD_GATEWAY, "platform"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, category) = self.classify();
        if status.is_server_error() {
            tracing::error!(error = %self, %status, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }

        let mut error = json!({
            "category": category,
            "message": self.to_string(),
        });
        if let ApiError::Core(CoreError::Validation {
            field: Some(field), ..
        }) = &self
        {
            error["field"] = json!(field);
        }
        (status, Json(json!({ "error": error }))).into_response()
    }
}
