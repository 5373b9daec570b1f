//! Client for the DataBridge HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::backend::DEFAULT_CONTENT_TYPE;
use crate::clip::{ClipId, TextClip};
use crate::file::IncomingFile;
use crate::web::dto::{
    ClipResponse, ClipsResponse, FileItem, FilesResponse, UploadResponse, UploadResult,
};
use crate::web::handlers::FILES_FIELD;
use crate::{BridgeError, Result};

/// The six operations of the HTTP API.
#[async_trait]
pub trait BridgeApi: Send + Sync {
    /// `GET /files`
    async fn list_files(&self) -> Result<Vec<FileItem>>;

    /// `DELETE /files`
    async fn delete_file(&self, stored_name: &str) -> Result<()>;

    /// `POST /upload` with every file in one request.
    async fn upload(&self, files: Vec<IncomingFile>) -> Result<Vec<UploadResult>>;

    /// `GET /text`
    async fn list_clips(&self) -> Result<Vec<TextClip>>;

    /// `POST /text`
    async fn create_clip(&self, content: &str, label: Option<&str>) -> Result<TextClip>;

    /// `DELETE /text`
    async fn delete_clip(&self, id: &ClipId) -> Result<()>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteFileBody<'a> {
    stored_name: &'a str,
}

#[derive(Serialize)]
struct CreateClipBody<'a> {
    content: &'a str,
    label: Option<&'a str>,
}

#[derive(Serialize)]
struct DeleteClipBody<'a> {
    id: &'a ClipId,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`BridgeApi`] over HTTP.
pub struct HttpApi {
    http: Client,
    base_url: String,
}

impl HttpApi {
    /// Create a client for the API rooted at `base_url` (e.g. `http://host:8080/api`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => body.error,
            Err(_) if text.trim().is_empty() => format!("request failed with status {status}"),
            Err(_) => text.trim().to_string(),
        };
        Err(BridgeError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn read<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl BridgeApi for HttpApi {
    #[instrument(skip(self), level = "debug")]
    async fn list_files(&self) -> Result<Vec<FileItem>> {
        let body: FilesResponse = self.read(self.http.get(self.url("files"))).await?;
        Ok(body.files)
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete_file(&self, stored_name: &str) -> Result<()> {
        let request = self
            .http
            .delete(self.url("files"))
            .json(&DeleteFileBody { stored_name });
        self.send(request).await?;
        Ok(())
    }

    #[instrument(skip(self, files), level = "debug", fields(count = files.len()))]
    async fn upload(&self, files: Vec<IncomingFile>) -> Result<Vec<UploadResult>> {
        let mut form = Form::new();
        for file in files {
            let content_type = file
                .content_type
                .filter(|ct| !ct.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
            let part = Part::bytes(file.content)
                .file_name(file.name)
                .mime_str(&content_type)?;
            form = form.part(FILES_FIELD, part);
        }

        let body: UploadResponse = self
            .read(self.http.post(self.url("upload")).multipart(form))
            .await?;
        Ok(body.results)
    }

    #[instrument(skip(self), level = "debug")]
    async fn list_clips(&self) -> Result<Vec<TextClip>> {
        let body: ClipsResponse = self.read(self.http.get(self.url("text"))).await?;
        Ok(body.clips)
    }

    #[instrument(skip(self, content), level = "debug")]
    async fn create_clip(&self, content: &str, label: Option<&str>) -> Result<TextClip> {
        let request = self
            .http
            .post(self.url("text"))
            .json(&CreateClipBody { content, label });
        let body: ClipResponse = self.read(request).await?;
        Ok(body.clip)
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete_clip(&self, id: &ClipId) -> Result<()> {
        let request = self
            .http
            .delete(self.url("text"))
            .json(&DeleteClipBody { id });
        self.send(request).await?;
        Ok(())
    }
}
