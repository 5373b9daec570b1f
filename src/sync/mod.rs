//! Client synchronization layer.
//!
//! Drives the HTTP API the way the web front end does: batch uploads with a
//! progress queue, awaited deletes, text saves, concurrent refreshes, and a
//! queue of self-expiring toasts. Copied clips go to a [`ClipboardSink`].

mod api;
mod clipboard;
mod format;
mod queue;
mod state;
mod toast;

pub use api::{BridgeApi, HttpApi};
pub use clipboard::{ClipboardSink, SystemClipboard, WriterSink};
pub use format::format_bytes;
pub use queue::{QueueItem, QueueStatus, UploadQueue};
pub use state::{SyncClient, SyncSettings};
pub use toast::{Severity, Toast, ToastQueue};
