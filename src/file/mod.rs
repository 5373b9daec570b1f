//! File module for DataBridge.
//!
//! Uploaded files live in the backend object namespace under `uploads/`,
//! keyed by a timestamp-prefixed, sanitized stored name.

mod naming;
mod service;

pub use naming::{display_name, object_path, sanitize_filename, stored_name};
pub use service::{FileService, IncomingFile, StoredFile, StoredUpload, UploadOutcome};

/// Object namespace prefix for uploads.
pub const UPLOAD_PREFIX: &str = "uploads";

/// Maximum number of files returned by a listing.
pub const MAX_LISTED_FILES: usize = 100;
