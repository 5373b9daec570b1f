//! Response DTOs for the HTTP API.
//!
//! These types are shared by the server handlers and the HTTP client in
//! [`crate::sync`], so they derive both `Serialize` and `Deserialize`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clip::TextClip;
use crate::config::ErrorRewrite;
use crate::file::{StoredFile, UploadOutcome};
use crate::web::error::client_message;

/// A stored file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileItem {
    /// Backend-assigned identifier.
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Stored name, used for deletion.
    pub stored_name: String,
    /// Size in bytes, 0 when the backend reported none.
    #[serde(default)]
    pub size: u64,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Public retrieval URL.
    pub url: String,
}

impl From<StoredFile> for FileItem {
    fn from(file: StoredFile) -> Self {
        Self {
            id: file.id,
            name: file.display_name,
            stored_name: file.stored_name,
            size: file.size_bytes.unwrap_or(0),
            created_at: file.created_at,
            url: file.public_url,
        }
    }
}

/// File listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesResponse {
    /// Files, newest first.
    pub files: Vec<FileItem>,
}

/// Per-file upload result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Original filename.
    pub name: String,
    /// Whether the file was stored.
    pub success: bool,
    /// Object path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Public retrieval URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResult {
    /// Build a result entry, rewriting backend failures for display.
    pub fn from_outcome(outcome: UploadOutcome, rewrites: &[ErrorRewrite]) -> Self {
        match outcome.result {
            Ok(stored) => Self {
                name: outcome.name,
                success: true,
                path: Some(stored.path),
                url: Some(stored.url),
                size: Some(stored.size),
                error: None,
            },
            Err(err) => Self {
                name: outcome.name,
                success: false,
                path: None,
                url: None,
                size: None,
                error: Some(client_message(&err, rewrites)),
            },
        }
    }
}

/// Batch upload response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// One entry per submitted file, in submission order.
    pub results: Vec<UploadResult>,
}

/// Clip listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipsResponse {
    /// Clips, newest first.
    pub clips: Vec<TextClip>,
}

/// Clip creation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipResponse {
    /// The stored clip.
    pub clip: TextClip,
}

/// Generic success response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    /// Always true.
    pub success: bool,
}

impl SuccessResponse {
    /// A successful response.
    pub fn ok() -> Self {
        Self { success: true }
    }
}
