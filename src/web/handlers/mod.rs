//! API handlers for the DataBridge HTTP API.

pub mod files;
pub mod text;
pub mod upload;

pub use files::*;
pub use text::*;
pub use upload::*;

use std::sync::Arc;

use crate::backend::Backend;
use crate::clip::ClipService;
use crate::config::{ErrorRewrite, ErrorsConfig};
use crate::file::FileService;
use crate::BridgeError;

use super::error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared backend handle.
    pub backend: Arc<Backend>,
    /// File upload/listing service.
    pub files: FileService,
    /// Text clip service.
    pub clips: ClipService,
    /// Backend error rewrite table, first match wins.
    pub rewrites: Vec<ErrorRewrite>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(backend: Arc<Backend>, errors: &ErrorsConfig) -> Self {
        Self {
            files: FileService::new(backend.clone()),
            clips: ClipService::new(backend.clone()),
            backend,
            rewrites: errors.rewrites.clone(),
        }
    }

    /// Replace the file service clock.
    pub fn with_clock(mut self, now_millis: fn() -> i64) -> Self {
        self.files = self.files.with_clock(now_millis);
        self
    }

    /// Reject the request if the backend is not configured.
    pub fn guard(&self) -> Result<(), ApiError> {
        self.backend.guard().map_err(|e| self.api_error(e))
    }

    /// Convert a service error into an API error.
    pub fn api_error(&self, err: BridgeError) -> ApiError {
        ApiError::from_bridge(err, &self.rewrites)
    }
}
