//! HTTP API module for DataBridge.
//!
//! The API exposes file upload/listing/deletion and text clip CRUD under
//! `/api`, plus a health check and an optional static front end.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
