//! Transient notifications.

use std::time::{Duration, Instant};

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
    /// Neutral confirmation.
    Info,
}

/// A notification shown until it expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Monotonic identifier.
    pub id: u64,
    /// Message text.
    pub message: String,
    /// Severity.
    pub severity: Severity,
    expires_at: Instant,
}

/// Notification queue. Each toast expires on its own timer.
#[derive(Debug)]
pub struct ToastQueue {
    next_id: u64,
    timeout: Duration,
    toasts: Vec<Toast>,
}

impl ToastQueue {
    /// Create an empty queue whose toasts live for `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            next_id: 0,
            timeout,
            toasts: Vec::new(),
        }
    }

    /// Add a toast created at `now` and return its id.
    pub fn push_at(&mut self, message: impl Into<String>, severity: Severity, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            message: message.into(),
            severity,
            expires_at: now + self.timeout,
        });
        id
    }

    /// Drop toasts that have expired by `now`.
    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires_at > now);
    }

    /// Visible toasts, oldest first.
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Whether any visible toast is an error.
    pub fn has_errors(&self) -> bool {
        self.toasts.iter().any(|t| t.severity == Severity::Error)
    }
}
