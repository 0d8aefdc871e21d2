//! API error types with HTTP status mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use helix_metadata::MetadataError;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by API handlers.
///
/// The display string of each variant is the `message` field of the JSON
/// error body, verbatim. Clients match on these strings, so changing one
/// is a breaking change.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401: missing, malformed, or expired credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// 403: authenticated but not allowed.
    #[error("{0}")]
    Forbidden(String),

    /// 404: resource does not exist (or is outside the caller's scope and
    /// deliberately indistinguishable from missing).
    #[error("{0}")]
    NotFound(String),

    /// 400: the resource exists but its state forbids the operation.
    #[error("{0}")]
    InvalidState(String),

    /// 400: the request itself is malformed.
    #[error("{0}")]
    Validation(String),

    /// 500: unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),

    /// Metadata store failure.
    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// Token or domain-type failure from the core crate.
    #[error("{0}")]
    Core(#[from] helix_core::Error),
}

impl ApiError {
    /// Machine-readable error code for the response body.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::InvalidState(_) => "invalid_state",
            ApiError::Validation(_) => "validation_error",
            ApiError::Internal(_) => "internal_error",
            ApiError::Metadata(MetadataError::NotFound(_)) => "not_found",
            ApiError::Metadata(MetadataError::AlreadyExists(_)) => "conflict",
            ApiError::Metadata(_) => "metadata_error",
            ApiError::Core(helix_core::Error::TokenExpired) => "token_expired",
            ApiError::Core(helix_core::Error::InvalidToken(_)) => "unauthorized",
            ApiError::Core(_) => "internal_error",
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidState(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Metadata(MetadataError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Metadata(MetadataError::AlreadyExists(_)) => StatusCode::CONFLICT,
            ApiError::Metadata(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Core(helix_core::Error::TokenExpired)
            | ApiError::Core(helix_core::Error::InvalidToken(_)) => StatusCode::UNAUTHORIZED,
            ApiError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = json!({
            "code": self.code(),
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

/// Convenience result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
