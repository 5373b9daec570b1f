//! File service for DataBridge.
//!
//! This module provides the high-level file operations:
//! - Batch ingest with per-file results
//! - Listing with public URLs and display names
//! - Deletion by stored name

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::backend::{Backend, ListOptions, DEFAULT_CONTENT_TYPE};
use crate::{BridgeError, Result};

use super::naming::{display_name, object_path, stored_name};
use super::{MAX_LISTED_FILES, UPLOAD_PREFIX};

/// A file received for upload.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    /// Original filename as sent by the client.
    pub name: String,
    /// File content.
    pub content: Vec<u8>,
    /// Declared content type.
    pub content_type: Option<String>,
}

impl IncomingFile {
    /// Create a new incoming file without a declared content type.
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content,
            content_type: None,
        }
    }

    /// Set the declared content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    fn content_type(&self) -> &str {
        match self.content_type.as_deref() {
            Some(ct) if !ct.trim().is_empty() => ct,
            _ => DEFAULT_CONTENT_TYPE,
        }
    }
}

/// A successfully stored upload.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredUpload {
    /// Object path (`uploads/{storedName}`).
    pub path: String,
    /// Public retrieval URL.
    pub url: String,
    /// Size in bytes.
    pub size: u64,
}

/// Result for one file of a batch.
#[derive(Debug)]
pub struct UploadOutcome {
    /// Original filename.
    pub name: String,
    /// Stored upload, or the failure for this file.
    pub result: Result<StoredUpload>,
}

impl UploadOutcome {
    /// Whether this file was stored.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// A stored file as presented by a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    /// Backend-assigned identifier.
    pub id: Option<String>,
    /// Name under which the file is stored.
    pub stored_name: String,
    /// Stored name without the timestamp prefix.
    pub display_name: String,
    /// Size in bytes, when the backend reports it.
    pub size_bytes: Option<u64>,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Public retrieval URL.
    pub public_url: String,
}

fn system_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Upload, listing, and deletion of files in the object namespace.
#[derive(Clone)]
pub struct FileService {
    backend: Arc<Backend>,
    now_millis: fn() -> i64,
}

impl FileService {
    /// Create a new FileService using the system clock.
    pub fn new(backend: Arc<Backend>) -> Self {
        Self {
            backend,
            now_millis: system_millis,
        }
    }

    /// Use a custom clock for stored-name timestamps.
    pub fn with_clock(mut self, now_millis: fn() -> i64) -> Self {
        self.now_millis = now_millis;
        self
    }

    /// Store a batch of files.
    ///
    /// An empty batch is rejected. Otherwise every file gets its own outcome,
    /// in input order; a failing file does not stop the rest.
    pub async fn ingest_batch(&self, files: Vec<IncomingFile>) -> Result<Vec<UploadOutcome>> {
        self.backend.guard()?;

        if files.is_empty() {
            return Err(BridgeError::Validation("No files provided".to_string()));
        }

        let mut outcomes = Vec::with_capacity(files.len());
        for file in files {
            let name = file.name.clone();
            let result = self.ingest(file).await;
            match &result {
                Ok(stored) => {
                    tracing::info!(path = %stored.path, size = stored.size, "Uploaded file")
                }
                Err(e) => tracing::warn!(name = %name, "Upload failed: {}", e),
            }
            outcomes.push(UploadOutcome { name, result });
        }
        Ok(outcomes)
    }

    /// Store a single file under a fresh timestamped name.
    pub async fn ingest(&self, file: IncomingFile) -> Result<StoredUpload> {
        let store = self.backend.store()?;

        let stored = stored_name((self.now_millis)(), &file.name);
        let size = file.content.len() as u64;
        let content_type = file.content_type().to_string();

        let path = store
            .upload(&object_path(&stored), file.content, &content_type)
            .await?;
        let url = store.public_url(&path);

        Ok(StoredUpload { path, url, size })
    }

    /// The most recent uploads, newest first.
    pub async fn list(&self) -> Result<Vec<StoredFile>> {
        let store = self.backend.store()?;

        let entries = store
            .list(UPLOAD_PREFIX, ListOptions::newest_first(MAX_LISTED_FILES))
            .await?;

        Ok(entries
            .into_iter()
            .take(MAX_LISTED_FILES)
            .map(|entry| StoredFile {
                public_url: store.public_url(&object_path(&entry.name)),
                display_name: display_name(&entry.name).to_string(),
                id: entry.id,
                size_bytes: entry.size,
                created_at: entry.created_at,
                stored_name: entry.name,
            })
            .collect())
    }

    /// Delete the upload stored as `stored_name`.
    pub async fn remove(&self, stored_name: &str) -> Result<()> {
        let store = self.backend.store()?;
        store.remove(&[object_path(stored_name)]).await?;
        tracing::info!(stored_name = %stored_name, "Deleted file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCredentials, MemoryBackend, ObjectStore};

    fn fixed_clock() -> i64 {
        1_700_000_000_000
    }

    fn setup() -> (FileService, Arc<MemoryBackend>) {
        let memory = Arc::new(MemoryBackend::new());
        let credentials = BackendCredentials::new("https://abc.supabase.co", "anon-key");
        let backend = Arc::new(Backend::in_memory(&credentials, memory.clone()));
        (FileService::new(backend), memory)
    }

    #[tokio::test]
    async fn test_ingest_stores_under_uploads() {
        let (service, memory) = setup();
        let service = service.with_clock(fixed_clock);

        let stored = service
            .ingest(
                IncomingFile::new("my notes?.txt", b"hello".to_vec())
                    .with_content_type("text/plain"),
            )
            .await
            .unwrap();

        assert_eq!(stored.path, "uploads/1700000000000_my_notes_.txt");
        assert_eq!(stored.size, 5);
        assert!(stored.url.ends_with("/data-bridge/uploads/1700000000000_my_notes_.txt"));

        let object = memory.object(&stored.path).await.unwrap();
        assert_eq!(object.content, b"hello");
        assert_eq!(object.content_type, "text/plain");
    }

    #[tokio::test]
    async fn test_ingest_default_content_type() {
        let (service, memory) = setup();

        for (name, content_type) in [("a.bin", None), ("b.bin", Some(""))] {
            let mut file = IncomingFile::new(name, vec![1, 2, 3]);
            file.content_type = content_type.map(String::from);
            let stored = service.ingest(file).await.unwrap();
            let object = memory.object(&stored.path).await.unwrap();
            assert_eq!(object.content_type, DEFAULT_CONTENT_TYPE);
        }
    }

    #[tokio::test]
    async fn test_ingest_never_overwrites() {
        let (service, memory) = setup();
        let service = service.with_clock(fixed_clock);

        service
            .ingest(IncomingFile::new("a.txt", b"first".to_vec()))
            .await
            .unwrap();
        let err = service
            .ingest(IncomingFile::new("a.txt", b"second".to_vec()))
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::Backend { status: Some(409), .. }));
        let object = memory.object("uploads/1700000000000_a.txt").await.unwrap();
        assert_eq!(object.content, b"first");
    }

    #[tokio::test]
    async fn test_ingest_batch_empty() {
        let (service, memory) = setup();

        let err = service.ingest_batch(vec![]).await.unwrap_err();
        assert!(matches!(err, BridgeError::Validation(ref m) if m == "No files provided"));
        assert_eq!(memory.call_count(), 0);
    }

    #[tokio::test]
    async fn test_ingest_batch_partial_failure() {
        let (service, memory) = setup();
        memory.reject_paths_containing("blocked", 405, "Method Not Allowed").await;

        let outcomes = service
            .ingest_batch(vec![
                IncomingFile::new("report.pdf", vec![0; 10]),
                IncomingFile::new("blocked.bin", vec![0; 4]),
                IncomingFile::new("notes.txt", vec![0; 2]),
            ])
            .await
            .unwrap();

        let names: Vec<_> = outcomes.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["report.pdf", "blocked.bin", "notes.txt"]);
        assert!(outcomes[0].is_success());
        assert!(!outcomes[1].is_success());
        assert!(outcomes[2].is_success());
        assert_eq!(memory.object_count().await, 2);
    }

    #[tokio::test]
    async fn test_list_maps_names_and_urls() {
        let (service, _memory) = setup();
        let service = service.with_clock(fixed_clock);

        service
            .ingest(IncomingFile::new("report.pdf", vec![0; 7]))
            .await
            .unwrap();

        let files = service.list().await.unwrap();
        assert_eq!(files.len(), 1);
        let file = &files[0];
        assert_eq!(file.stored_name, "1700000000000_report.pdf");
        assert_eq!(file.display_name, "report.pdf");
        assert_eq!(file.size_bytes, Some(7));
        assert!(file.id.is_some());
        assert!(file.created_at.is_some());
        assert_eq!(
            file.public_url,
            "http://localhost:54321/storage/v1/object/public/data-bridge/uploads/1700000000000_report.pdf"
        );
    }

    #[tokio::test]
    async fn test_list_empty() {
        let (service, _memory) = setup();
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_caps_at_hundred() {
        let (service, memory) = setup();
        for i in 0..105 {
            memory
                .upload(&format!("uploads/{i}_f.txt"), vec![], "text/plain")
                .await
                .unwrap();
        }

        let files = service.list().await.unwrap();
        assert_eq!(files.len(), MAX_LISTED_FILES);
        assert_eq!(files[0].stored_name, "104_f.txt");
    }

    #[tokio::test]
    async fn test_remove() {
        let (service, memory) = setup();
        let service = service.with_clock(fixed_clock);
        service
            .ingest(IncomingFile::new("a.txt", vec![1]))
            .await
            .unwrap();

        service.remove("1700000000000_a.txt").await.unwrap();
        assert_eq!(memory.object_count().await, 0);

        // Missing keys follow backend behavior, which is to ignore them
        assert!(service.remove("missing").await.is_ok());
    }

    #[tokio::test]
    async fn test_unconfigured_backend_is_never_called() {
        let memory = Arc::new(MemoryBackend::new());
        let backend = Arc::new(Backend::in_memory(
            &BackendCredentials::new("", ""),
            memory.clone(),
        ));
        let service = FileService::new(backend);

        assert!(matches!(
            service.ingest_batch(vec![]).await,
            Err(BridgeError::Config(_))
        ));
        assert!(matches!(service.list().await, Err(BridgeError::Config(_))));
        assert!(matches!(service.remove("x").await, Err(BridgeError::Config(_))));
        assert_eq!(memory.call_count(), 0);
    }
}
