//! Router configuration for the HTTP API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_clip, delete_clip, delete_file, list_clips, list_files, upload_files, AppState,
};
use super::middleware::{create_cors_layer, security_headers};

/// Create the main API router.
///
/// All routes live under `/api`. `max_body_bytes` bounds every request body,
/// uploads included.
pub fn create_router(
    app_state: Arc<AppState>,
    cors_origins: &[String],
    max_body_bytes: usize,
) -> Router {
    let api_routes = Router::new()
        .route("/files", get(list_files).delete(delete_file))
        .route("/upload", post(upload_files))
        .route("/text", get(list_clips).post(create_clip).delete(delete_clip));

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(security_headers))
                .layer(DefaultBodyLimit::max(max_body_bytes)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Create a router serving the static front end.
///
/// Unknown paths fall back to `index.html`. Returns `None` when the
/// directory does not exist.
pub fn create_static_router(static_path: &str) -> Option<Router> {
    let dir = Path::new(static_path);
    if !dir.is_dir() {
        tracing::warn!("Static path {} is not a directory, not serving it", static_path);
        return None;
    }

    let index = ServeFile::new(dir.join("index.html"));
    Some(Router::new().fallback_service(ServeDir::new(dir).fallback(index)))
}
