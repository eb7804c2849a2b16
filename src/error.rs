//! Chat relay error types with HTTP status code mapping.
//!
//! [`ChatError`] is the central error type. Each variant maps to a numeric
//! code and an HTTP status so it can be returned straight from a handler or
//! rendered into a WebSocket error frame. [`DeliveryError`] describes a
//! single failed write to one subscriber; the broadcaster evicts on it
//! rather than surfacing it.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "name already in use: alice"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Why a write to one subscriber's connection failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// The connection's writer has shut down.
    #[error("connection closed")]
    Closed,

    /// The connection's outbound queue is full; the client is not keeping up.
    #[error("outbound queue full")]
    Full,
}

/// Relay error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status               |
/// |-----------|------------|---------------------------|
/// | 1000–1999 | Validation | 400 Bad Request           |
/// | 2000–2999 | Conflict   | 409 Conflict              |
/// | 3000–3999 | Server     | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// An event could not be encoded; only that broadcast is aborted.
    #[error("failed to serialize event: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Another active subscriber already uses this name.
    #[error("name already in use: {0}")]
    DuplicateName(String),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ChatError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::DuplicateName(_) => 2001,
            Self::Serialization(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::DuplicateName(_) => StatusCode::CONFLICT,
            Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the JSON error body for this error.
    #[must_use]
    pub fn to_response_body(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
            },
        }
    }
}

/// Failure inside the file tail producer.
#[derive(Debug, thiserror::Error)]
pub enum TailError {
    /// Reading the tailed file failed.
    #[error("tail i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The filesystem watcher could not be set up.
    #[error("file watch error: {0}")]
    Watch(#[from] notify::Error),
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = axum::Json(self.to_response_body()).into_response();
        *response.status_mut() = status;
        response
    }
}
