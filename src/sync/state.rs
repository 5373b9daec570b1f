//! Client-side synchronization state.
//!
//! [`SyncClient`] owns every piece of client state (lists, upload queue,
//! toasts, inputs) and is mutated only through `&mut self`, so there is no
//! shared mutable state to lock. Timed effects are evaluated by
//! [`SyncClient::tick_at`] instead of background timers.

use std::borrow::Cow;
use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::clip::{ClipId, TextClip};
use crate::config::ClientConfig;
use crate::file::IncomingFile;
use crate::web::dto::{FileItem, UploadResult};
use crate::{BridgeError, Result};

use super::api::BridgeApi;
use super::clipboard::ClipboardSink;
use super::queue::UploadQueue;
use super::toast::{Severity, ToastQueue};

/// Timing and display settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    /// Toast lifetime.
    pub toast_timeout: Duration,
    /// Delay before a finished upload queue is cleared.
    pub queue_clear_delay: Duration,
    /// Minimum refresh spinner duration after fetching completes.
    pub refresh_spin: Duration,
    /// Clip preview length in characters.
    pub clip_preview_chars: usize,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

impl From<&ClientConfig> for SyncSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            toast_timeout: Duration::from_millis(config.toast_timeout_ms),
            queue_clear_delay: Duration::from_millis(config.queue_clear_delay_ms),
            refresh_spin: Duration::from_millis(config.refresh_spin_ms),
            clip_preview_chars: config.clip_preview_chars,
        }
    }
}

/// Whether the server answered, whatever the status.
fn answered(result: &Result<()>) -> bool {
    matches!(result, Ok(()) | Err(BridgeError::Api { .. }))
}

fn files_label(n: usize) -> &'static str {
    if n == 1 {
        "file"
    } else {
        "files"
    }
}

/// Client state machine over a [`BridgeApi`].
pub struct SyncClient<A> {
    api: A,
    settings: SyncSettings,
    files: Vec<FileItem>,
    clips: Vec<TextClip>,
    queue: UploadQueue,
    toasts: ToastQueue,
    expanded: HashSet<ClipId>,
    text_content: String,
    text_label: String,
    uploading: bool,
    saving: bool,
    files_loading: bool,
    clips_loading: bool,
    refreshing: bool,
    spin_until: Option<Instant>,
}

impl<A: BridgeApi> SyncClient<A> {
    /// Create a client with empty local state.
    pub fn new(api: A, settings: SyncSettings) -> Self {
        Self {
            api,
            toasts: ToastQueue::new(settings.toast_timeout),
            settings,
            files: Vec::new(),
            clips: Vec::new(),
            queue: UploadQueue::new(),
            expanded: HashSet::new(),
            text_content: String::new(),
            text_label: String::new(),
            uploading: false,
            saving: false,
            files_loading: false,
            clips_loading: false,
            refreshing: false,
            spin_until: None,
        }
    }

    fn toast(&mut self, message: impl Into<String>, severity: Severity) {
        self.toasts.push_at(message, severity, Instant::now());
    }

    /// Show the batch as `uploading` before the request is sent.
    pub fn begin_upload(&mut self, files: &[IncomingFile]) {
        self.uploading = true;
        self.queue.begin(files.iter().map(|f| f.name.clone()));
    }

    /// Upload a batch in one request.
    ///
    /// An empty batch is ignored. The file list is re-fetched after any
    /// response carrying per-file results, whatever they say.
    pub async fn upload(&mut self, files: Vec<IncomingFile>) {
        if files.is_empty() {
            return;
        }
        self.begin_upload(&files);

        let response = self.api.upload(files).await;
        self.finish_upload(response).await;
    }

    async fn finish_upload(&mut self, response: Result<Vec<UploadResult>>) {
        match response {
            Ok(results) => {
                self.queue.resolve(&results);

                let ok = results.iter().filter(|r| r.success).count();
                let failed = results.len() - ok;
                if ok > 0 {
                    self.toast(format!("{ok} {} uploaded", files_label(ok)), Severity::Success);
                }
                if failed > 0 {
                    self.toast(format!("{failed} {} failed", files_label(failed)), Severity::Error);
                }

                self.load_files().await;
            }
            Err(e) => {
                tracing::warn!("Upload request failed: {}", e);
                self.toast("Upload failed", Severity::Error);
                self.queue.fail_all();
            }
        }

        self.uploading = false;
        self.queue
            .schedule_clear(Instant::now() + self.settings.queue_clear_delay);
    }

    /// Delete a file and prune it locally once the server has answered.
    ///
    /// An error status still prunes the entry, so local state may diverge
    /// from the backend until the next refresh. Only a request that never
    /// got an answer leaves the list untouched.
    pub async fn delete_file(&mut self, stored_name: &str, name: &str) {
        let result = self.api.delete_file(stored_name).await;
        if answered(&result) {
            self.files.retain(|f| f.stored_name != stored_name);
        }
        match result {
            Ok(()) => self.toast(format!("Deleted {name}"), Severity::Info),
            Err(e) => {
                tracing::warn!("Delete of {} failed: {}", stored_name, e);
                self.toast("Delete failed", Severity::Error);
            }
        }
    }

    /// Delete a clip and prune it locally once the server has answered.
    pub async fn delete_clip(&mut self, id: &ClipId) {
        let result = self.api.delete_clip(id).await;
        if answered(&result) {
            self.clips.retain(|c| &c.id != id);
            self.expanded.remove(id);
        }
        match result {
            Ok(()) => self.toast("Clip deleted", Severity::Info),
            Err(e) => {
                tracing::warn!("Delete of clip {} failed: {}", id, e);
                self.toast("Delete failed", Severity::Error);
            }
        }
    }

    /// Set the text input.
    pub fn set_text(&mut self, content: impl Into<String>) {
        self.text_content = content.into();
    }

    /// Set the label input.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.text_label = label.into();
    }

    /// Current text input.
    pub fn text(&self) -> &str {
        &self.text_content
    }

    /// Current label input.
    pub fn label(&self) -> &str {
        &self.text_label
    }

    /// Whether saving is currently allowed.
    pub fn can_save(&self) -> bool {
        !self.saving && !self.text_content.trim().is_empty()
    }

    /// Save the text input as a clip.
    ///
    /// On success the clip is prepended locally and both inputs are cleared.
    /// Returns whether a request was made.
    pub async fn save_text(&mut self) -> bool {
        if !self.can_save() {
            return false;
        }
        self.saving = true;

        let label = Some(self.text_label.as_str()).filter(|l| !l.is_empty());
        match self.api.create_clip(&self.text_content, label).await {
            Ok(clip) => {
                self.clips.insert(0, clip);
                self.text_content.clear();
                self.text_label.clear();
                self.toast("Text saved!", Severity::Success);
            }
            Err(e) => {
                tracing::warn!("Saving clip failed: {}", e);
                self.toast("Save failed", Severity::Error);
            }
        }

        self.saving = false;
        true
    }

    fn apply_files(&mut self, result: Result<Vec<FileItem>>) {
        match result {
            Ok(files) => self.files = files,
            Err(e) => {
                tracing::warn!("Loading files failed: {}", e);
                self.toast("Failed to load files", Severity::Error);
            }
        }
        self.files_loading = false;
    }

    fn apply_clips(&mut self, result: Result<Vec<TextClip>>) {
        match result {
            Ok(clips) => self.clips = clips,
            Err(e) => {
                tracing::warn!("Loading clips failed: {}", e);
                self.toast("Failed to load text clips", Severity::Error);
            }
        }
        self.clips_loading = false;
    }

    /// Re-fetch the file list.
    pub async fn load_files(&mut self) {
        self.files_loading = true;
        let result = self.api.list_files().await;
        self.apply_files(result);
    }

    /// Re-fetch the clip list.
    pub async fn load_clips(&mut self) {
        self.clips_loading = true;
        let result = self.api.list_clips().await;
        self.apply_clips(result);
    }

    /// Re-fetch both lists concurrently.
    ///
    /// The spinner keeps running for `refresh_spin` after both fetches
    /// complete, however fast they were.
    pub async fn refresh(&mut self) {
        self.refreshing = true;
        self.spin_until = None;
        self.files_loading = true;
        self.clips_loading = true;

        let (files, clips) = tokio::join!(self.api.list_files(), self.api.list_clips());
        self.apply_files(files);
        self.apply_clips(clips);

        self.spin_until = Some(Instant::now() + self.settings.refresh_spin);
    }

    /// Toggle whether a clip is shown in full.
    pub fn toggle_expand(&mut self, id: &ClipId) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.clone());
        }
    }

    /// Whether a clip is expanded.
    pub fn is_expanded(&self, id: &ClipId) -> bool {
        self.expanded.contains(id)
    }

    /// Whether a clip is long enough to be truncated.
    pub fn is_long(&self, clip: &TextClip) -> bool {
        clip.content.chars().count() > self.settings.clip_preview_chars
    }

    /// Copy a loaded clip's exact content to `sink`.
    ///
    /// Returns whether the copy succeeded.
    pub fn copy_clip<S: ClipboardSink + ?Sized>(&mut self, id: &ClipId, sink: &mut S) -> bool {
        let result = match self.clips.iter().find(|c| &c.id == id) {
            Some(clip) => sink.write_text(&clip.content),
            None => Err(BridgeError::Clipboard(format!("no clip with id {id}"))),
        };

        match result {
            Ok(()) => {
                self.toast("Copied to clipboard!", Severity::Success);
                true
            }
            Err(e) => {
                tracing::warn!("Copy of clip {} failed: {}", id, e);
                self.toast("Copy failed", Severity::Error);
                false
            }
        }
    }

    /// Content to display for a clip.
    pub fn clip_preview<'c>(&self, clip: &'c TextClip) -> Cow<'c, str> {
        if !self.is_long(clip) || self.is_expanded(&clip.id) {
            return Cow::Borrowed(&clip.content);
        }
        let mut preview: String = clip
            .content
            .chars()
            .take(self.settings.clip_preview_chars)
            .collect();
        preview.push('…');
        Cow::Owned(preview)
    }

    /// Apply every timed effect due by `now`.
    pub fn tick_at(&mut self, now: Instant) {
        self.toasts.prune(now);
        self.queue.prune(now);
        if self.spin_until.is_some_and(|at| at <= now) {
            self.refreshing = false;
            self.spin_until = None;
        }
    }

    /// Local file list.
    pub fn files(&self) -> &[FileItem] {
        &self.files
    }

    /// Local clip list.
    pub fn clips(&self) -> &[TextClip] {
        &self.clips
    }

    /// Upload queue.
    pub fn queue(&self) -> &UploadQueue {
        &self.queue
    }

    /// Toast queue.
    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    /// Whether an upload is in flight.
    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// Whether a save is in flight.
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Whether the file list is being fetched.
    pub fn is_files_loading(&self) -> bool {
        self.files_loading
    }

    /// Whether the clip list is being fetched.
    pub fn is_clips_loading(&self) -> bool {
        self.clips_loading
    }

    /// Whether the refresh spinner is showing.
    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    /// The underlying API.
    pub fn api(&self) -> &A {
        &self.api
    }
}
