//! Backend client adapter for DataBridge.
//!
//! Persistence is delegated to a managed backend made of two parts:
//! - `ObjectStore`: the object namespace holding uploaded files
//! - `ClipTable`: the relational table holding text clips
//!
//! [`Backend`] bundles both behind a configuration guard. Credentials are
//! validated once at construction and the result is re-checked before every
//! operation, so a misconfigured server never contacts the backend.

mod memory;
mod supabase;

pub use memory::MemoryBackend;
pub use supabase::SupabaseBackend;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use url::Url;

use crate::clip::{ClipId, NewClip, TextClip};
use crate::config::BackendConfig;
use crate::{BridgeError, Result};

/// Content type used when an upload does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Endpoint used when the configured one is unusable.
const PLACEHOLDER_URL: &str = "https://placeholder.supabase.co";

/// Known placeholder values for the endpoint URL.
const URL_PLACEHOLDERS: &[&str] = &["your_supabase_project_url", PLACEHOLDER_URL];

/// Known placeholder values for the access key.
const KEY_PLACEHOLDERS: &[&str] = &["your_supabase_anon_key", "placeholder"];

/// Sort direction for object listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest first.
    Ascending,
    /// Newest first.
    Descending,
}

impl SortOrder {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// Options for listing objects under a prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// Maximum number of entries.
    pub limit: usize,
    /// Number of entries to skip.
    pub offset: usize,
    /// Order by creation time.
    pub order: SortOrder,
}

impl ListOptions {
    /// Newest-first listing limited to `limit` entries.
    pub fn newest_first(limit: usize) -> Self {
        Self {
            limit,
            offset: 0,
            order: SortOrder::Descending,
        }
    }
}

/// An object as reported by a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectEntry {
    /// Backend-assigned identifier (absent for folder placeholders).
    pub id: Option<String>,
    /// Object name relative to the listed prefix.
    pub name: String,
    /// Size in bytes, when the backend reports it.
    pub size: Option<u64>,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
}

/// Object namespace operations.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `content` at `path`, failing if an object already exists there.
    ///
    /// Returns the path written.
    async fn upload(&self, path: &str, content: Vec<u8>, content_type: &str) -> Result<String>;

    /// List objects directly under `prefix`.
    async fn list(&self, prefix: &str, options: ListOptions) -> Result<Vec<ObjectEntry>>;

    /// Remove objects by full path.
    async fn remove(&self, paths: &[String]) -> Result<()>;

    /// Public retrieval URL for `path`. Never contacts the backend.
    fn public_url(&self, path: &str) -> String;
}

/// Clip table operations.
#[async_trait]
pub trait ClipTable: Send + Sync {
    /// Most recently created clips, newest first.
    async fn select_recent(&self, limit: usize) -> Result<Vec<TextClip>>;

    /// Insert a clip and return the stored row.
    async fn insert(&self, clip: &NewClip) -> Result<TextClip>;

    /// Delete the clip with `id`. Missing rows are not an error.
    async fn delete(&self, id: &ClipId) -> Result<()>;
}

/// Endpoint URL and access key for the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendCredentials {
    /// Endpoint URL.
    pub url: String,
    /// Access key.
    pub key: String,
}

impl BackendCredentials {
    /// Create credentials.
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: key.into(),
        }
    }

    /// Credentials taken from the backend configuration.
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.url.trim(), config.key.trim())
    }

    /// Check that both settings are present and not placeholders.
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() || URL_PLACEHOLDERS.contains(&self.url.as_str()) {
            return Err(BridgeError::Config(
                "Backend URL is not set. Set backend.url in config.toml \
                 or the DATABRIDGE_BACKEND_URL environment variable."
                    .to_string(),
            ));
        }
        match Url::parse(&self.url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                return Err(BridgeError::Config(format!(
                    "Backend URL '{}' is not a valid http(s) URL.",
                    self.url
                )));
            }
        }
        if self.key.is_empty() || KEY_PLACEHOLDERS.contains(&self.key.as_str()) {
            return Err(BridgeError::Config(
                "Backend access key is not set. Set backend.key in config.toml \
                 or the DATABRIDGE_BACKEND_KEY environment variable."
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Shared handle to the managed backend.
///
/// Read-only after construction; share it behind an `Arc`.
pub struct Backend {
    config_error: Option<String>,
    store: Arc<dyn ObjectStore>,
    table: Arc<dyn ClipTable>,
}

impl Backend {
    /// Build a backend from explicit parts.
    ///
    /// The credentials are validated here; a failure is remembered and
    /// reported by [`Backend::guard`] instead of failing construction.
    pub fn new(
        credentials: &BackendCredentials,
        store: Arc<dyn ObjectStore>,
        table: Arc<dyn ClipTable>,
    ) -> Self {
        let config_error = match credentials.validate() {
            Ok(()) => None,
            Err(e) => {
                let msg = e.message();
                tracing::warn!("Backend is not configured: {}", msg);
                Some(msg)
            }
        };

        Self {
            config_error,
            store,
            table,
        }
    }

    /// Connect to the REST backend described by `config`.
    pub fn connect(config: &BackendConfig) -> Result<Self> {
        let credentials = BackendCredentials::from_config(config);
        let base_url = if credentials.validate().is_ok() {
            credentials.url.clone()
        } else {
            PLACEHOLDER_URL.to_string()
        };

        let client = Arc::new(SupabaseBackend::new(
            &base_url,
            &credentials.key,
            &config.bucket,
            &config.table,
            std::time::Duration::from_secs(config.timeout_secs),
        )?);

        Ok(Self::new(&credentials, client.clone(), client))
    }

    /// Build a backend over an in-memory store and table.
    pub fn in_memory(credentials: &BackendCredentials, memory: Arc<MemoryBackend>) -> Self {
        Self::new(credentials, memory.clone(), memory)
    }

    /// Fail with the configuration error, if any.
    pub fn guard(&self) -> Result<()> {
        match &self.config_error {
            Some(msg) => Err(BridgeError::Config(msg.clone())),
            None => Ok(()),
        }
    }

    /// Whether the credentials passed validation.
    pub fn is_configured(&self) -> bool {
        self.config_error.is_none()
    }

    /// The object store, after the configuration guard.
    pub fn store(&self) -> Result<&dyn ObjectStore> {
        self.guard()?;
        Ok(self.store.as_ref())
    }

    /// The clip table, after the configuration guard.
    pub fn table(&self) -> Result<&dyn ClipTable> {
        self.guard()?;
        Ok(self.table.as_ref())
    }
}
