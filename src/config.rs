//! Configuration module for DataBridge.

use serde::Deserialize;
use std::path::Path;

use crate::{BridgeError, Result};

/// Web server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Host address to bind.
    #[serde(default = "default_web_host")]
    pub host: String,
    /// Port number for the HTTP API.
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Whether to serve static files.
    #[serde(default)]
    pub serve_static: bool,
    /// Path to static files directory.
    #[serde(default = "default_static_path")]
    pub static_path: String,
}

fn default_web_host() -> String {
    "0.0.0.0".to_string()
}

fn default_web_port() -> u16 {
    8080
}

fn default_static_path() -> String {
    "web/dist".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
            cors_origins: vec![],
            serve_static: false,
            static_path: default_static_path(),
        }
    }
}

/// Managed backend (object storage + clip table) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Backend endpoint URL.
    #[serde(default)]
    pub url: String,
    /// Backend access key.
    #[serde(default)]
    pub key: String,
    /// Storage bucket holding uploaded files.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Table holding text clips.
    #[serde(default = "default_table")]
    pub table: String,
    /// Request timeout in seconds.
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

fn default_bucket() -> String {
    "data-bridge".to_string()
}

fn default_table() -> String {
    "text_clips".to_string()
}

fn default_backend_timeout() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            key: String::new(),
            bucket: default_bucket(),
            table: default_table(),
            timeout_secs: default_backend_timeout(),
        }
    }
}

/// File upload configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Maximum upload request size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_max_upload_size() -> u64 {
    50
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

impl FilesConfig {
    /// Maximum upload request size in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        (self.max_upload_size_mb as usize).saturating_mul(1024 * 1024)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/databridge.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Client (CLI) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the DataBridge API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Timezone for displaying dates (e.g., "Europe/Berlin", "UTC").
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// How long a toast stays visible.
    #[serde(default = "default_toast_timeout")]
    pub toast_timeout_ms: u64,
    /// How long finished upload queue entries stay visible.
    #[serde(default = "default_queue_clear_delay")]
    pub queue_clear_delay_ms: u64,
    /// Minimum refresh spinner duration after a refresh completes.
    #[serde(default = "default_refresh_spin")]
    pub refresh_spin_ms: u64,
    /// Clips longer than this many characters are truncated unless expanded.
    #[serde(default = "default_clip_preview_chars")]
    pub clip_preview_chars: usize,
    /// Request timeout in seconds. Large uploads need a generous value.
    #[serde(default = "default_client_timeout")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://127.0.0.1:8080/api".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_toast_timeout() -> u64 {
    3500
}

fn default_queue_clear_delay() -> u64 {
    3000
}

fn default_refresh_spin() -> u64 {
    600
}

fn default_clip_preview_chars() -> usize {
    200
}

fn default_client_timeout() -> u64 {
    120
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timezone: default_timezone(),
            toast_timeout_ms: default_toast_timeout(),
            queue_clear_delay_ms: default_queue_clear_delay(),
            refresh_spin_ms: default_refresh_spin(),
            clip_preview_chars: default_clip_preview_chars(),
            timeout_secs: default_client_timeout(),
        }
    }
}

/// A human-readable rewrite for a known backend failure.
///
/// A rule matches when `status` equals the status reported by the backend,
/// or when `contains` occurs in the backend message.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ErrorRewrite {
    /// Backend status code trigger.
    #[serde(default)]
    pub status: Option<u16>,
    /// Message substring trigger.
    #[serde(default)]
    pub contains: Option<String>,
    /// Replacement message.
    pub message: String,
}

impl ErrorRewrite {
    /// Check whether this rule applies to a backend failure.
    pub fn matches(&self, status: Option<u16>, message: &str) -> bool {
        let by_status = matches!((self.status, status), (Some(want), Some(got)) if want == got);
        let by_text = self
            .contains
            .as_deref()
            .is_some_and(|needle| !needle.is_empty() && message.contains(needle));
        by_status || by_text
    }
}

/// Error presentation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorsConfig {
    /// Rewrite rules, first match wins.
    #[serde(default = "default_rewrites")]
    pub rewrites: Vec<ErrorRewrite>,
}

fn default_rewrites() -> Vec<ErrorRewrite> {
    vec![ErrorRewrite {
        status: Some(405),
        contains: Some("405".to_string()),
        message: "Storage rejected the request (405). Check that the storage bucket exists, \
                  is public, and has an insert policy for uploads."
            .to_string(),
    }]
}

impl Default for ErrorsConfig {
    fn default() -> Self {
        Self {
            rewrites: default_rewrites(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Web server configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Backend configuration.
    #[serde(default)]
    pub backend: BackendConfig,
    /// File upload configuration.
    #[serde(default)]
    pub files: FilesConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Client configuration.
    #[serde(default)]
    pub client: ClientConfig,
    /// Error presentation configuration.
    #[serde(default)]
    pub errors: ErrorsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(BridgeError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| BridgeError::Validation(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `DATABRIDGE_BACKEND_URL`: backend endpoint URL
    /// - `DATABRIDGE_BACKEND_KEY`: backend access key
    /// - `DATABRIDGE_API_URL`: API base URL used by client commands
    pub fn apply_env_overrides(&mut self) {
        let overrides: [(&str, &mut String); 3] = [
            ("DATABRIDGE_BACKEND_URL", &mut self.backend.url),
            ("DATABRIDGE_BACKEND_KEY", &mut self.backend.key),
            ("DATABRIDGE_API_URL", &mut self.client.api_url),
        ];

        for (name, slot) in overrides {
            if let Ok(value) = std::env::var(name) {
                if !value.is_empty() {
                    *slot = value;
                }
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Backend credentials are not checked here; a server without them still
    /// starts and reports the problem on every request.
    pub fn validate(&self) -> Result<()> {
        if self.files.max_upload_size_mb == 0 {
            return Err(BridgeError::Validation(
                "files.max_upload_size_mb must be greater than 0".to_string(),
            ));
        }
        if self.client.timeout_secs == 0 {
            return Err(BridgeError::Validation(
                "client.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.client.clip_preview_chars == 0 {
            return Err(BridgeError::Validation(
                "client.clip_preview_chars must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.web.host, "0.0.0.0");
        assert_eq!(config.web.port, 8080);
        assert!(config.web.cors_origins.is_empty());
        assert!(!config.web.serve_static);
        assert_eq!(config.web.static_path, "web/dist");

        assert!(config.backend.url.is_empty());
        assert!(config.backend.key.is_empty());
        assert_eq!(config.backend.bucket, "data-bridge");
        assert_eq!(config.backend.table, "text_clips");
        assert_eq!(config.backend.timeout_secs, 30);

        assert_eq!(config.files.max_upload_size_mb, 50);
        assert_eq!(config.files.max_upload_bytes(), 50 * 1024 * 1024);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/databridge.log");

        assert_eq!(config.client.api_url, "http://127.0.0.1:8080/api");
        assert_eq!(config.client.timezone, "UTC");
        assert_eq!(config.client.toast_timeout_ms, 3500);
        assert_eq!(config.client.queue_clear_delay_ms, 3000);
        assert_eq!(config.client.refresh_spin_ms, 600);
        assert_eq!(config.client.clip_preview_chars, 200);
        assert_eq!(config.client.timeout_secs, 120);

        assert_eq!(config.errors.rewrites.len(), 1);
        assert_eq!(config.errors.rewrites[0].status, Some(405));
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[web]
host = "127.0.0.1"
port = 3000
cors_origins = ["http://localhost:3000"]
serve_static = true
static_path = "public"

[backend]
url = "https://abc.supabase.co"
key = "anon-key"
bucket = "drops"
table = "snippets"
timeout_secs = 5

[files]
max_upload_size_mb = 10

[logging]
level = "debug"
file = "custom/logs/app.log"

[client]
api_url = "http://bridge.local/api"
timezone = "Asia/Tokyo"
toast_timeout_ms = 1000
queue_clear_delay_ms = 2000
refresh_spin_ms = 100
clip_preview_chars = 80
timeout_secs = 600

[[errors.rewrites]]
contains = "row-level security"
message = "Insert blocked by table policy"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.web.host, "127.0.0.1");
        assert_eq!(config.web.port, 3000);
        assert_eq!(config.web.cors_origins, vec!["http://localhost:3000"]);
        assert!(config.web.serve_static);
        assert_eq!(config.web.static_path, "public");

        assert_eq!(config.backend.url, "https://abc.supabase.co");
        assert_eq!(config.backend.key, "anon-key");
        assert_eq!(config.backend.bucket, "drops");
        assert_eq!(config.backend.table, "snippets");
        assert_eq!(config.backend.timeout_secs, 5);

        assert_eq!(config.files.max_upload_size_mb, 10);

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom/logs/app.log");

        assert_eq!(config.client.api_url, "http://bridge.local/api");
        assert_eq!(config.client.timezone, "Asia/Tokyo");
        assert_eq!(config.client.toast_timeout_ms, 1000);
        assert_eq!(config.client.queue_clear_delay_ms, 2000);
        assert_eq!(config.client.refresh_spin_ms, 100);
        assert_eq!(config.client.clip_preview_chars, 80);
        assert_eq!(config.client.timeout_secs, 600);

        assert_eq!(
            config.errors.rewrites,
            vec![ErrorRewrite {
                status: None,
                contains: Some("row-level security".to_string()),
                message: "Insert blocked by table policy".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[web]
port = 9000

[backend]
url = "https://abc.supabase.co"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.web.port, 9000);
        assert_eq!(config.backend.url, "https://abc.supabase.co");

        // Default values
        assert_eq!(config.web.host, "0.0.0.0");
        assert!(config.backend.key.is_empty());
        assert_eq!(config.backend.bucket, "data-bridge");
        assert_eq!(config.client.toast_timeout_ms, 3500);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.web.port, 8080);
        assert_eq!(config.backend.table, "text_clips");
        assert_eq!(config.errors.rewrites.len(), 1);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        assert!(result.is_err());
        if let Err(BridgeError::Validation(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Validation error");
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");

        assert!(matches!(result, Err(BridgeError::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[web]\nport = 4000\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.web.port, 4000);
    }

    #[test]
    fn test_apply_env_overrides() {
        let original_url = std::env::var("DATABRIDGE_BACKEND_URL").ok();
        let original_key = std::env::var("DATABRIDGE_BACKEND_KEY").ok();

        std::env::set_var("DATABRIDGE_BACKEND_URL", "https://env.supabase.co");
        std::env::set_var("DATABRIDGE_BACKEND_KEY", "");

        let mut config = Config::default();
        config.backend.key = "from-file".to_string();
        config.apply_env_overrides();

        assert_eq!(config.backend.url, "https://env.supabase.co");
        // Empty values do not override
        assert_eq!(config.backend.key, "from-file");

        match original_url {
            Some(val) => std::env::set_var("DATABRIDGE_BACKEND_URL", val),
            None => std::env::remove_var("DATABRIDGE_BACKEND_URL"),
        }
        match original_key {
            Some(val) => std::env::set_var("DATABRIDGE_BACKEND_KEY", val),
            None => std::env::remove_var("DATABRIDGE_BACKEND_KEY"),
        }
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());

        let mut config = Config::default();
        config.files.max_upload_size_mb = 0;
        assert!(matches!(config.validate(), Err(BridgeError::Validation(_))));

        let mut config = Config::default();
        config.client.clip_preview_chars = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.client.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ignores_missing_backend() {
        let config = Config::default();
        assert!(config.backend.url.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_error_rewrite_matches() {
        let rule = ErrorRewrite {
            status: Some(405),
            contains: Some("405".to_string()),
            message: "policy".to_string(),
        };

        assert!(rule.matches(Some(405), "Method Not Allowed"));
        assert!(rule.matches(None, "Request failed with status 405"));
        assert!(!rule.matches(Some(400), "Bad request"));
        assert!(!rule.matches(None, "The resource already exists"));

        let empty = ErrorRewrite {
            status: None,
            contains: None,
            message: "never".to_string(),
        };
        assert!(!empty.matches(Some(405), "405"));
    }
}
