//! Text clip types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label shown for clips saved without one.
pub const DEFAULT_LABEL: &str = "clip";

/// Backend-assigned clip identifier.
///
/// The table may use integer or UUID keys; the JSON representation is kept
/// as the backend returned it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClipId {
    /// Integer primary key.
    Int(i64),
    /// Text (usually UUID) primary key.
    Text(String),
}

impl ClipId {
    /// Parse an identifier typed by a user.
    ///
    /// All-digit input is treated as an integer key.
    pub fn parse(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(n) if !s.starts_with('+') => ClipId::Int(n),
            _ => ClipId::Text(s.to_string()),
        }
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipId::Int(n) => write!(f, "{n}"),
            ClipId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ClipId {
    fn from(s: &str) -> Self {
        ClipId::Text(s.to_string())
    }
}

impl From<i64> for ClipId {
    fn from(n: i64) -> Self {
        ClipId::Int(n)
    }
}

/// A persisted text snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextClip {
    /// Backend-assigned identifier.
    pub id: ClipId,
    /// Clip content, preserved exactly.
    pub content: String,
    /// Optional label.
    #[serde(default)]
    pub label: Option<String>,
    /// Backend creation timestamp.
    #[serde(deserialize_with = "crate::datetime::deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl TextClip {
    /// Label to display, falling back to [`DEFAULT_LABEL`].
    pub fn display_label(&self) -> &str {
        match self.label.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => DEFAULT_LABEL,
        }
    }
}

/// Data for creating a new clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewClip {
    /// Clip content.
    pub content: String,
    /// Optional label.
    pub label: Option<String>,
}

impl NewClip {
    /// Create a new clip without a label.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            label: None,
        }
    }

    /// Set the label. Blank labels are stored as null.
    pub fn with_label(mut self, label: Option<impl Into<String>>) -> Self {
        self.label = label
            .map(Into::into)
            .filter(|l: &String| !l.trim().is_empty());
        self
    }
}
