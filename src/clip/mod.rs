//! Text clip module for DataBridge.
//!
//! Clips are small text snippets stored as rows of the backend table:
//! content, optional label, and a backend timestamp.

mod service;
mod types;

pub use service::ClipService;
pub use types::{ClipId, NewClip, TextClip, DEFAULT_LABEL};

/// Maximum number of clips returned by a listing.
pub const MAX_LISTED_CLIPS: usize = 50;
