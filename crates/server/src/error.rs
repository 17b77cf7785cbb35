//! API error types.

use crate::jsonapi::JSON_API_CONTENT_TYPE;
use axum::Json;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use filestore_registry::RegistryError;
use serde::Serialize;

/// One entry of a JSON:API error document.
#[derive(Debug, Serialize)]
pub struct ErrorObject {
    /// Error code for programmatic handling.
    pub code: String,
    pub title: String,
    /// Human-readable error message.
    pub detail: String,
    /// HTTP status, as a string.
    pub status: String,
}

/// JSON:API error document.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorObject>,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    InvalidBody(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "unauthorized",
            Self::InvalidBody(_) => "validation_error",
            Self::Registry(e) => e.code(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "Unauthorized",
            Self::InvalidBody(_) => "Validation Error",
            Self::Registry(e) => e.title(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Registry(e) => match e {
                RegistryError::Conflict(_) => StatusCode::CONFLICT,
                RegistryError::NameConflict(_) => StatusCode::BAD_REQUEST,
                RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
                RegistryError::BucketNotFound(_) => StatusCode::BAD_REQUEST,
                RegistryError::InvalidFileClass(_) => StatusCode::BAD_REQUEST,
                RegistryError::PatchError(_) => StatusCode::BAD_REQUEST,
                RegistryError::Forbidden => StatusCode::FORBIDDEN,
                RegistryError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                RegistryError::Transport(_) => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        crate::metrics::record_api_error(self.code());
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "Request failed");
        } else {
            tracing::debug!(code = self.code(), error = %self, "Request rejected");
        }

        let body = ErrorResponse {
            errors: vec![ErrorObject {
                code: self.code().to_string(),
                title: self.title().to_string(),
                detail: self.to_string(),
                status: status.as_u16().to_string(),
            }],
        };
        (status, [(CONTENT_TYPE, JSON_API_CONTENT_TYPE)], Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
