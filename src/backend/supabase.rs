//! REST client for a Supabase-style backend.
//!
//! Files go through the Storage API (`/storage/v1`), clips through
//! PostgREST (`/rest/v1`). Both authenticate with the same access key.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{ClipTable, ListOptions, ObjectEntry, ObjectStore};
use crate::clip::{ClipId, NewClip, TextClip};
use crate::{BridgeError, Result};

/// Storage list request body.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListRequest<'a> {
    prefix: &'a str,
    limit: usize,
    offset: usize,
    sort_by: SortBy<'a>,
}

#[derive(Serialize)]
struct SortBy<'a> {
    column: &'a str,
    order: &'a str,
}

/// Storage remove request body.
#[derive(Serialize)]
struct RemoveRequest<'a> {
    prefixes: &'a [String],
}

/// One entry of a storage listing.
#[derive(Deserialize)]
struct ListedObject {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default, deserialize_with = "crate::datetime::deserialize_optional_timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    metadata: Option<ListedMetadata>,
}

#[derive(Deserialize)]
struct ListedMetadata {
    #[serde(default)]
    size: Option<u64>,
}

/// Error body shape shared by the Storage API and PostgREST.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the managed backend's REST APIs.
pub struct SupabaseBackend {
    http: Client,
    base_url: String,
    key: String,
    bucket: String,
    table: String,
}

impl SupabaseBackend {
    /// Create a new client.
    pub fn new(
        base_url: &str,
        key: &str,
        bucket: &str,
        table: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            key: key.to_string(),
            bucket: bucket.to_string(),
            table: table.to_string(),
        })
    }

    fn storage_url(&self, rest: &str) -> String {
        format!("{}/storage/v1/{}", self.base_url, rest)
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.key)
            .header(AUTHORIZATION, format!("Bearer {}", self.key))
    }

    /// Send a request and turn non-2xx answers into backend errors.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| BridgeError::backend(None, format!("backend request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(BridgeError::backend(
            Some(status.as_u16()),
            error_message(&body, status.as_u16()),
        ))
    }

    async fn read_json<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T> {
        let body = response.text().await.map_err(|e| {
            BridgeError::backend(None, format!("failed to read backend response: {e}"))
        })?;
        serde_json::from_str(&body)
            .map_err(|e| BridgeError::backend(None, format!("unexpected backend response: {e}")))
    }
}

/// Extract a message from an error body, falling back to the raw text.
fn error_message(body: &str, status: u16) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(msg) = parsed.message.or(parsed.error) {
            if !msg.is_empty() {
                return msg;
            }
        }
    }
    if body.trim().is_empty() {
        format!("backend returned status {status}")
    } else {
        body.trim().to_string()
    }
}

/// Percent-encode each segment of an object path.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl ObjectStore for SupabaseBackend {
    #[instrument(skip(self, content), level = "debug", fields(len = content.len()))]
    async fn upload(&self, path: &str, content: Vec<u8>, content_type: &str) -> Result<String> {
        let url = self.storage_url(&format!("object/{}/{}", self.bucket, encode_path(path)));
        let request = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, content_type)
            .header(CACHE_CONTROL, "max-age=3600")
            .header("x-upsert", "false")
            .body(content);

        self.send(request).await?;
        debug!("Stored object {}", path);
        Ok(path.to_string())
    }

    #[instrument(skip(self), level = "debug")]
    async fn list(&self, prefix: &str, options: ListOptions) -> Result<Vec<ObjectEntry>> {
        let url = self.storage_url(&format!("object/list/{}", self.bucket));
        let body = ListRequest {
            prefix,
            limit: options.limit,
            offset: options.offset,
            sort_by: SortBy {
                column: "created_at",
                order: options.order.as_str(),
            },
        };

        let response = self.send(self.http.post(&url).json(&body)).await?;
        let listed: Vec<ListedObject> = Self::read_json(response).await?;

        Ok(listed
            .into_iter()
            .map(|o| ObjectEntry {
                id: o.id,
                name: o.name,
                size: o.metadata.and_then(|m| m.size),
                created_at: o.created_at,
            })
            .collect())
    }

    #[instrument(skip(self), level = "debug")]
    async fn remove(&self, paths: &[String]) -> Result<()> {
        let url = self.storage_url(&format!("object/{}", self.bucket));
        self.send(self.http.delete(&url).json(&RemoveRequest { prefixes: paths }))
            .await?;
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        self.storage_url(&format!(
            "object/public/{}/{}",
            self.bucket,
            encode_path(path)
        ))
    }
}

#[async_trait]
impl ClipTable for SupabaseBackend {
    #[instrument(skip(self), level = "debug")]
    async fn select_recent(&self, limit: usize) -> Result<Vec<TextClip>> {
        let limit = limit.to_string();
        let request = self.http.get(self.table_url()).query(&[
            ("select", "*"),
            ("order", "created_at.desc"),
            ("limit", limit.as_str()),
        ]);

        let response = self.send(request).await?;
        Self::read_json(response).await
    }

    #[instrument(skip(self, clip), level = "debug")]
    async fn insert(&self, clip: &NewClip) -> Result<TextClip> {
        let request = self
            .http
            .post(self.table_url())
            .query(&[("select", "*")])
            .header("Prefer", "return=representation")
            .header(ACCEPT, "application/vnd.pgrst.object+json")
            .json(&[clip]);

        let response = self.send(request).await?;
        Self::read_json(response).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete(&self, id: &ClipId) -> Result<()> {
        let filter = format!("eq.{id}");
        let request = self
            .http
            .delete(self.table_url())
            .query(&[("id", filter.as_str())]);

        self.send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SupabaseBackend {
        SupabaseBackend::new(
            "https://abc.supabase.co/",
            "key",
            "data-bridge",
            "text_clips",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            client().public_url("uploads/1700000000000_report.pdf"),
            "https://abc.supabase.co/storage/v1/object/public/data-bridge/uploads/1700000000000_report.pdf"
        );
    }

    #[test]
    fn test_encode_path_segments() {
        assert_eq!(encode_path("uploads/a b.txt"), "uploads/a%20b.txt");
        assert_eq!(encode_path("uploads/1_x.txt"), "uploads/1_x.txt");
    }

    #[test]
    fn test_error_message_json() {
        let body = r#"{"statusCode":"409","error":"Duplicate","message":"The resource already exists"}"#;
        assert_eq!(error_message(body, 409), "The resource already exists");

        let body = r#"{"error":"Bucket not found"}"#;
        assert_eq!(error_message(body, 404), "Bucket not found");
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message("Method Not Allowed", 405), "Method Not Allowed");
        assert_eq!(error_message("", 502), "backend returned status 502");
    }
}
