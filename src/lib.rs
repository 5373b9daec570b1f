//! DataBridge - personal file and text transfer.
//!
//! An HTTP API that stores uploaded files and text clips in a managed
//! storage/database backend, plus a client synchronization layer and CLI.

pub mod backend;
pub mod cli;
pub mod clip;
pub mod config;
pub mod datetime;
pub mod error;
pub mod file;
pub mod logging;
pub mod sync;
pub mod web;

pub use backend::{Backend, BackendCredentials, MemoryBackend};
pub use clip::{ClipId, ClipService, TextClip};
pub use config::Config;
pub use error::{BridgeError, Result};
pub use file::{FileService, IncomingFile};
pub use sync::{HttpApi, SyncClient};
pub use web::WebServer;
