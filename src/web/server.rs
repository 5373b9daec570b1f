//! Web server for DataBridge.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::backend::Backend;
use crate::config::{Config, WebConfig};
use crate::{BridgeError, Result};

use super::handlers::AppState;
use super::router::{create_health_router, create_router, create_static_router};

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Web configuration.
    web_config: WebConfig,
    /// Request body limit in bytes.
    max_body_bytes: usize,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &Config, backend: Arc<Backend>) -> Result<Self> {
        let addr = format!("{}:{}", config.web.host, config.web.port)
            .parse()
            .map_err(|e| {
                BridgeError::Config(format!(
                    "invalid web address {}:{}: {e}",
                    config.web.host, config.web.port
                ))
            })?;

        Ok(Self {
            addr,
            app_state: Arc::new(AppState::new(backend, &config.errors)),
            web_config: config.web.clone(),
            max_body_bytes: config.files.max_upload_bytes(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn into_router(self) -> (SocketAddr, Router) {
        let mut router = create_router(
            self.app_state,
            &self.web_config.cors_origins,
            self.max_body_bytes,
        )
        .merge(create_health_router());

        if self.web_config.serve_static {
            if let Some(static_router) = create_static_router(&self.web_config.static_path) {
                router = router.merge(static_router);
            }
        }

        (self.addr, router.layer(CompressionLayer::new()))
    }

    async fn bind(self) -> Result<(TcpListener, Router)> {
        let (addr, router) = self.into_router();
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Web server listening on http://{}", listener.local_addr()?);
        Ok((listener, router))
    }

    /// Run the web server.
    pub async fn run(self) -> Result<()> {
        let (listener, router) = self.bind().await?;
        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let (listener, router) = self.bind().await?;
        let local_addr = listener.local_addr()?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
