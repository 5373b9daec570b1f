//! Destinations for copied clip content.

use std::io::Write;

use crate::{BridgeError, Result};

/// Somewhere clip content can be copied to.
pub trait ClipboardSink {
    /// Write `text` exactly as given.
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Writes copied text to any [`Write`], e.g. stdout for piping.
#[derive(Debug, Default)]
pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ClipboardSink for WriterSink<W> {
    fn write_text(&mut self, text: &str) -> Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

/// The system clipboard.
///
/// The clipboard is opened on each write, so a missing display surfaces as a
/// failed copy rather than at startup. On X11 the text outlives the process
/// only when a clipboard manager takes it over.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| BridgeError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text.to_owned())
            .map_err(|e| BridgeError::Clipboard(e.to_string()))
    }
}
