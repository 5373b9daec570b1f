//! Upload progress queue.

use std::time::Instant;

use crate::web::dto::UploadResult;

/// Progress of one queued file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueStatus {
    /// Request in flight.
    Uploading,
    /// Stored.
    Done,
    /// Failed.
    Error,
}

/// One file of the current batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueItem {
    /// Filename.
    pub name: String,
    /// Progress.
    pub status: QueueStatus,
}

/// Entries for the most recent batch, cleared after a delay.
#[derive(Debug, Default)]
pub struct UploadQueue {
    items: Vec<QueueItem>,
    clear_at: Option<Instant>,
}

impl UploadQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the queue with a new batch in `Uploading` state.
    ///
    /// A clear scheduled by an earlier batch is cancelled.
    pub fn begin<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clear_at = None;
        self.items = names
            .into_iter()
            .map(|name| QueueItem {
                name: name.into(),
                status: QueueStatus::Uploading,
            })
            .collect();
    }

    /// Replace the entries with the server's per-file results.
    pub fn resolve(&mut self, results: &[UploadResult]) {
        self.items = results
            .iter()
            .map(|r| QueueItem {
                name: r.name.clone(),
                status: if r.success {
                    QueueStatus::Done
                } else {
                    QueueStatus::Error
                },
            })
            .collect();
    }

    /// Mark every entry as failed.
    pub fn fail_all(&mut self) {
        for item in &mut self.items {
            item.status = QueueStatus::Error;
        }
    }

    /// Clear the queue once `at` has passed.
    pub fn schedule_clear(&mut self, at: Instant) {
        self.clear_at = Some(at);
    }

    /// Apply a scheduled clear that is due by `now`.
    pub fn prune(&mut self, now: Instant) {
        if self.clear_at.is_some_and(|at| at <= now) {
            self.items.clear();
            self.clear_at = None;
        }
    }

    /// Current entries.
    pub fn items(&self) -> &[QueueItem] {
        &self.items
    }

    /// Whether the queue has no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
