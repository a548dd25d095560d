//! Clipboard collaborator.
//!
//! The editor only needs a single text value; the platform clipboard (or a
//! test double) plugs in behind [`Clipboard`].

pub trait Clipboard {
    /// Current clipboard text (empty when nothing was copied).
    fn text(&self) -> String;

    fn set_text(&mut self, text: String);
}

/// Process-local clipboard holding one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    text: String,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Clipboard for MemoryClipboard {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }
}
