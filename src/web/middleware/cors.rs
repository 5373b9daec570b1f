//! CORS middleware configuration.

use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

const METHODS: [Method; 4] = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

fn permissive() -> CorsLayer {
    CorsLayer::new()
        .allow_methods(METHODS)
        .allow_headers(Any)
        .allow_origin(Any)
}

/// Create a CORS layer from the configured origins.
///
/// With no usable origin the layer allows any origin without credentials.
/// Otherwise only the listed origins are allowed, with credentials.
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    if parsed.len() < origins.len() {
        tracing::warn!(
            "Ignoring {} unparsable CORS origin(s)",
            origins.len() - parsed.len()
        );
    }

    if parsed.is_empty() {
        return permissive();
    }

    CorsLayer::new()
        .allow_methods(METHODS)
        .allow_headers([CONTENT_TYPE, ACCEPT])
        .allow_credentials(true)
        .allow_origin(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::util::ServiceExt;

    async fn ok() -> &'static str {
        "OK"
    }

    async fn preflight(layer: CorsLayer, origin: &str) -> Option<String> {
        let app = Router::new().route("/", get(ok)).layer(layer);
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/")
                    .header("Origin", origin)
                    .header("Access-Control-Request-Method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        response
            .headers()
            .get("access-control-allow-origin")
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_empty_origins_allow_any() {
        let allowed = preflight(create_cors_layer(&[]), "http://elsewhere.test").await;
        assert_eq!(allowed.as_deref(), Some("*"));
    }

    #[tokio::test]
    async fn test_listed_origins_only() {
        let origins = vec!["http://localhost:5173".to_string()];

        let allowed = preflight(create_cors_layer(&origins), "http://localhost:5173").await;
        assert_eq!(allowed.as_deref(), Some("http://localhost:5173"));

        let denied = preflight(create_cors_layer(&origins), "http://elsewhere.test").await;
        assert!(denied.is_none());
    }

    #[tokio::test]
    async fn test_unparsable_origins_fall_back() {
        let origins = vec!["bad\norigin".to_string()];
        let allowed = preflight(create_cors_layer(&origins), "http://elsewhere.test").await;
        assert_eq!(allowed.as_deref(), Some("*"));
    }
}
