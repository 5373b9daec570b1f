//! Text clip service.

use std::sync::Arc;

use crate::backend::Backend;
use crate::{BridgeError, Result};

use super::types::{ClipId, NewClip, TextClip};
use super::MAX_LISTED_CLIPS;

/// CRUD over the clip table.
#[derive(Clone)]
pub struct ClipService {
    backend: Arc<Backend>,
}

impl ClipService {
    /// Create a new ClipService.
    pub fn new(backend: Arc<Backend>) -> Self {
        Self { backend }
    }

    /// The most recently created clips, newest first.
    pub async fn list(&self) -> Result<Vec<TextClip>> {
        let mut clips = self.backend.table()?.select_recent(MAX_LISTED_CLIPS).await?;
        clips.truncate(MAX_LISTED_CLIPS);
        Ok(clips)
    }

    /// Save a new clip.
    ///
    /// Missing, empty, or whitespace-only content is rejected before the
    /// backend is contacted. Content is stored exactly as given.
    pub async fn create(&self, content: Option<String>, label: Option<String>) -> Result<TextClip> {
        let table = self.backend.table()?;

        let content = match content {
            Some(c) if !c.trim().is_empty() => c,
            _ => return Err(BridgeError::Validation("No content provided".to_string())),
        };

        let clip = table.insert(&NewClip::new(content).with_label(label)).await?;
        tracing::info!(id = %clip.id, "Saved text clip");
        Ok(clip)
    }

    /// Delete a clip. Deleting an unknown id succeeds.
    pub async fn delete(&self, id: &ClipId) -> Result<()> {
        self.backend.table()?.delete(id).await?;
        tracing::info!(id = %id, "Deleted text clip");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCredentials, MemoryBackend};
    use chrono::{Duration, Utc};

    fn setup() -> (ClipService, Arc<MemoryBackend>) {
        let memory = Arc::new(MemoryBackend::new());
        let credentials = BackendCredentials::new("https://abc.supabase.co", "anon-key");
        let backend = Arc::new(Backend::in_memory(&credentials, memory.clone()));
        (ClipService::new(backend), memory)
    }

    #[tokio::test]
    async fn test_create_preserves_content() {
        let (service, _memory) = setup();

        let clip = service
            .create(Some("  export KEY=abc\n".to_string()), None)
            .await
            .unwrap();

        assert_eq!(clip.content, "  export KEY=abc\n");
        assert_eq!(clip.label, None);
        assert_eq!(clip.display_label(), "clip");
    }

    #[tokio::test]
    async fn test_create_rejects_blank_content() {
        let (service, memory) = setup();

        for content in [None, Some(String::new()), Some(" \n\t ".to_string())] {
            let err = service.create(content, None).await.unwrap_err();
            assert!(matches!(err, BridgeError::Validation(ref m) if m == "No content provided"));
        }
        assert_eq!(memory.call_count(), 0);
        assert_eq!(memory.clip_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_blank_label_is_null() {
        let (service, _memory) = setup();

        let clip = service
            .create(Some("data".to_string()), Some(String::new()))
            .await
            .unwrap();
        assert_eq!(clip.label, None);

        let clip = service
            .create(Some("data".to_string()), Some("env".to_string()))
            .await
            .unwrap();
        assert_eq!(clip.label.as_deref(), Some("env"));
    }

    #[tokio::test]
    async fn test_list_caps_at_fifty() {
        let (service, memory) = setup();
        let start = Utc::now() - Duration::hours(1);
        for i in 0..60 {
            memory
                .seed_clip(&NewClip::new(format!("clip {i}")), start + Duration::seconds(i))
                .await;
        }

        let clips = service.list().await.unwrap();
        assert_eq!(clips.len(), MAX_LISTED_CLIPS);
        assert_eq!(clips[0].content, "clip 59");
        assert_eq!(clips[49].content, "clip 10");
    }

    #[tokio::test]
    async fn test_delete_unknown_id() {
        let (service, _memory) = setup();
        assert!(service.delete(&ClipId::from("nope")).await.is_ok());
    }
}
