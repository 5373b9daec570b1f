//! API error handling for the DataBridge HTTP API.

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::config::ErrorRewrite;
use crate::BridgeError;

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bad request (400).
    BadRequest,
    /// Request body too large (413).
    PayloadTooLarge,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create a payload too large error.
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PayloadTooLarge, message)
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Convert a service error, applying the backend rewrite table.
    pub fn from_bridge(err: BridgeError, rewrites: &[ErrorRewrite]) -> Self {
        match err {
            BridgeError::Config(msg) => {
                tracing::warn!("Rejected request: {}", msg);
                ApiError::internal(msg)
            }
            BridgeError::Validation(msg) => ApiError::bad_request(msg),
            BridgeError::Backend { status, message } => {
                tracing::error!(?status, "Backend error: {}", message);
                ApiError::internal(rewrite_message(rewrites, status, message))
            }
            other => {
                tracing::error!("Internal error: {}", other);
                ApiError::internal(other.to_string())
            }
        }
    }

    /// Convert a multipart stream error.
    pub fn from_multipart(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large("Upload exceeds the maximum request size")
        } else {
            tracing::warn!("Failed to read multipart field: {}", err);
            ApiError::bad_request("Invalid multipart data")
        }
    }
}

/// Message for a failure as shown to the client.
///
/// Backend failures go through the rewrite table; the first matching rule
/// replaces the message. Other failures keep their own message.
pub fn client_message(err: &BridgeError, rewrites: &[ErrorRewrite]) -> String {
    match err {
        BridgeError::Backend { status, message } => {
            rewrite_message(rewrites, *status, message.clone())
        }
        other => other.message(),
    }
}

fn rewrite_message(rewrites: &[ErrorRewrite], status: Option<u16>, message: String) -> String {
    rewrites
        .iter()
        .find(|rule| rule.matches(status, &message))
        .map(|rule| rule.message.clone())
        .unwrap_or(message)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = ErrorBody {
            error: self.message,
        };
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<BridgeError> for ApiError {
    fn from(err: BridgeError) -> Self {
        ApiError::from_bridge(err, &[])
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::payload_too_large(rejection.body_text());
        }
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}
