//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use databridge::backend::{Backend, BackendCredentials, MemoryBackend};
use databridge::config::{ErrorRewrite, ErrorsConfig};
use databridge::web::create_router;
use databridge::web::handlers::AppState;

/// Body limit used by test routers.
pub const TEST_BODY_LIMIT: usize = 1024 * 1024;

/// Credentials that pass validation.
pub fn valid_credentials() -> BackendCredentials {
    BackendCredentials::new("https://abc.supabase.co", "anon-key")
}

/// A configured backend over a fresh in-memory store.
pub fn memory_backend() -> (Arc<Backend>, Arc<MemoryBackend>) {
    let memory = Arc::new(MemoryBackend::new());
    let backend = Arc::new(Backend::in_memory(&valid_credentials(), memory.clone()));
    (backend, memory)
}

/// A backend whose credentials are missing.
pub fn unconfigured_backend() -> (Arc<Backend>, Arc<MemoryBackend>) {
    let memory = Arc::new(MemoryBackend::new());
    let backend = Arc::new(Backend::in_memory(
        &BackendCredentials::new("", ""),
        memory.clone(),
    ));
    (backend, memory)
}

/// Build a test server over `backend`.
pub fn test_server_with(
    backend: Arc<Backend>,
    rewrites: Vec<ErrorRewrite>,
    body_limit: usize,
) -> TestServer {
    let state = AppState::new(backend, &ErrorsConfig { rewrites });
    let router = create_router(Arc::new(state), &[], body_limit);
    TestServer::new(router).expect("Failed to create test server")
}

/// Test server with a configured in-memory backend and default rewrites.
pub fn test_server() -> (TestServer, Arc<MemoryBackend>) {
    let (backend, memory) = memory_backend();
    let server = test_server_with(backend, ErrorsConfig::default().rewrites, TEST_BODY_LIMIT);
    (server, memory)
}

/// Whether `stored` is `<digits>_<rest>` with `rest == expected`.
pub fn is_stored_as(stored: &str, expected: &str) -> bool {
    match stored.split_once('_') {
        Some((millis, rest)) => {
            !millis.is_empty() && millis.bytes().all(|b| b.is_ascii_digit()) && rest == expected
        }
        None => false,
    }
}
