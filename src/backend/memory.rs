//! In-memory backend for tests and local development.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{ClipTable, ListOptions, ObjectEntry, ObjectStore, SortOrder};
use crate::clip::{ClipId, NewClip, TextClip};
use crate::{BridgeError, Result};

/// A stored object.
#[derive(Debug, Clone)]
pub struct MemoryObject {
    /// Object identifier.
    pub id: String,
    /// Object content.
    pub content: Vec<u8>,
    /// Declared content type.
    pub content_type: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Insertion sequence, breaks creation-time ties.
    seq: u64,
}

/// Injected failure for uploads whose path contains `pattern`.
#[derive(Debug, Clone)]
struct RejectRule {
    pattern: String,
    status: u16,
    message: String,
}

#[derive(Default)]
struct Inner {
    objects: BTreeMap<String, MemoryObject>,
    clips: Vec<(u64, TextClip)>,
    rejects: Vec<RejectRule>,
    seq: u64,
}

impl Inner {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }
}

/// Object store and clip table kept in process memory.
///
/// Every trait call is counted, which lets tests assert that a guarded
/// operation never reached the backend.
pub struct MemoryBackend {
    base_url: String,
    bucket: String,
    inner: Mutex<Inner>,
    calls: AtomicUsize,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::with_base_url("http://localhost:54321", "data-bridge")
    }

    /// Create an empty backend generating public URLs under `base_url`.
    pub fn with_base_url(base_url: &str, bucket: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            inner: Mutex::new(Inner::default()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of backend calls made so far.
    ///
    /// `public_url` is not counted; it never contacts a real backend either.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Fail uploads whose path contains `pattern`.
    pub async fn reject_paths_containing(
        &self,
        pattern: impl Into<String>,
        status: u16,
        message: impl Into<String>,
    ) {
        self.inner.lock().await.rejects.push(RejectRule {
            pattern: pattern.into(),
            status,
            message: message.into(),
        });
    }

    /// Look up a stored object by full path.
    pub async fn object(&self, path: &str) -> Option<MemoryObject> {
        self.inner.lock().await.objects.get(path).cloned()
    }

    /// Number of stored objects.
    pub async fn object_count(&self) -> usize {
        self.inner.lock().await.objects.len()
    }

    /// Number of stored clips.
    pub async fn clip_count(&self) -> usize {
        self.inner.lock().await.clips.len()
    }

    /// Insert a clip with an explicit creation time.
    pub async fn seed_clip(&self, clip: &NewClip, created_at: DateTime<Utc>) -> TextClip {
        let mut inner = self.inner.lock().await;
        let row = TextClip {
            id: ClipId::Text(Uuid::new_v4().to_string()),
            content: clip.content.clone(),
            label: clip.label.clone(),
            created_at,
        };
        let seq = inner.next_seq();
        inner.clips.push((seq, row.clone()));
        row
    }

    fn count_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStore for MemoryBackend {
    async fn upload(&self, path: &str, content: Vec<u8>, content_type: &str) -> Result<String> {
        self.count_call();
        let mut inner = self.inner.lock().await;

        if let Some(rule) = inner.rejects.iter().find(|r| path.contains(&r.pattern)) {
            return Err(BridgeError::backend(Some(rule.status), rule.message.clone()));
        }
        if inner.objects.contains_key(path) {
            return Err(BridgeError::backend(Some(409), "The resource already exists"));
        }

        let seq = inner.next_seq();
        inner.objects.insert(
            path.to_string(),
            MemoryObject {
                id: Uuid::new_v4().to_string(),
                content,
                content_type: content_type.to_string(),
                created_at: Utc::now(),
                seq,
            },
        );
        Ok(path.to_string())
    }

    async fn list(&self, prefix: &str, options: ListOptions) -> Result<Vec<ObjectEntry>> {
        self.count_call();
        let inner = self.inner.lock().await;
        let dir = format!("{}/", prefix.trim_end_matches('/'));

        let mut entries: Vec<(&String, &MemoryObject)> = inner
            .objects
            .iter()
            .filter(|(path, _)| {
                path.strip_prefix(&dir)
                    .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
            })
            .collect();

        entries.sort_by_key(|(_, o)| (o.created_at, o.seq));
        if options.order == SortOrder::Descending {
            entries.reverse();
        }

        Ok(entries
            .into_iter()
            .skip(options.offset)
            .take(options.limit)
            .map(|(path, o)| ObjectEntry {
                id: Some(o.id.clone()),
                name: path[dir.len()..].to_string(),
                size: Some(o.content.len() as u64),
                created_at: Some(o.created_at),
            })
            .collect())
    }

    async fn remove(&self, paths: &[String]) -> Result<()> {
        self.count_call();
        let mut inner = self.inner.lock().await;
        for path in paths {
            inner.objects.remove(path);
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }
}

#[async_trait]
impl ClipTable for MemoryBackend {
    async fn select_recent(&self, limit: usize) -> Result<Vec<TextClip>> {
        self.count_call();
        let inner = self.inner.lock().await;

        let mut rows: Vec<&(u64, TextClip)> = inner.clips.iter().collect();
        rows.sort_by_key(|(seq, clip)| std::cmp::Reverse((clip.created_at, *seq)));

        Ok(rows
            .into_iter()
            .take(limit)
            .map(|(_, clip)| clip.clone())
            .collect())
    }

    async fn insert(&self, clip: &NewClip) -> Result<TextClip> {
        self.count_call();
        let mut inner = self.inner.lock().await;

        let row = TextClip {
            id: ClipId::Text(Uuid::new_v4().to_string()),
            content: clip.content.clone(),
            label: clip.label.clone(),
            created_at: Utc::now(),
        };
        let seq = inner.next_seq();
        inner.clips.push((seq, row.clone()));
        Ok(row)
    }

    async fn delete(&self, id: &ClipId) -> Result<()> {
        self.count_call();
        self.inner.lock().await.clips.retain(|(_, clip)| &clip.id != id);
        Ok(())
    }
}
