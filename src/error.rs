//! Error types for DataBridge.

use thiserror::Error;

/// Common error type for DataBridge.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Missing or placeholder configuration.
    ///
    /// Raised by the backend guard before any backend call is made.
    #[error("configuration error: {0}")]
    Config(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// The storage or database backend reported a failure.
    #[error("backend error: {message}")]
    Backend {
        /// HTTP status reported by the backend, if any.
        status: Option<u16>,
        /// Message reported by the backend.
        message: String,
    },

    /// The DataBridge HTTP API answered with an error body.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status of the response.
        status: u16,
        /// Message from the `error` field of the response body.
        message: String,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Copying clip content failed.
    #[error("clipboard error: {0}")]
    Clipboard(String),

    /// Command-line usage error.
    #[error("{0}")]
    Cli(String),
}

impl BridgeError {
    /// Create a backend error.
    pub fn backend(status: Option<u16>, message: impl Into<String>) -> Self {
        BridgeError::Backend {
            status,
            message: message.into(),
        }
    }

    /// Message without the category prefix.
    ///
    /// This is what ends up in `{error}` bodies and per-file upload results.
    pub fn message(&self) -> String {
        match self {
            BridgeError::Config(msg)
            | BridgeError::Validation(msg)
            | BridgeError::Clipboard(msg)
            | BridgeError::Cli(msg) => msg.clone(),
            BridgeError::Backend { message, .. } | BridgeError::Api { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias for DataBridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;
