//! Clipboard seam.
//!
//! The editor treats the clipboard as an external collaborator; the
//! session only needs a sink it can hand the serialized manifest to.

use std::sync::Mutex;

/// Destination for serialized manifest text.
pub trait ClipboardSink: Send + Sync {
    fn write_text(&self, text: &str) -> anyhow::Result<()>;
}

/// In-memory sink for tests and headless use.
#[derive(Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last written text, if any.
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().expect("clipboard lock poisoned").clone()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn write_text(&self, text: &str) -> anyhow::Result<()> {
        *self.contents.lock().expect("clipboard lock poisoned") = Some(text.to_string());
        Ok(())
    }
}
