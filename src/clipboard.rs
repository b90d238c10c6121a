//! Clipboard access for copy, cut and paste.

use crate::error::Result;
#[cfg(feature = "system-clipboard")]
use crate::error::EditError;

pub trait Clipboard {
    /// Current clipboard text, `None` when the clipboard holds no text
    fn get_text(&mut self) -> Option<String>;

    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// Process-local clipboard, used by tests and the replay tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn get_text(&mut self) -> Option<String> {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        self.text = Some(text.to_string());
        Ok(())
    }
}

/// The operating system clipboard
#[cfg(feature = "system-clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let inner = arboard::Clipboard::new().map_err(|e| {
            tracing::warn!("System clipboard unavailable: {}", e);
            EditError::ClipboardUnavailable
        })?;
        Ok(Self { inner })
    }
}

#[cfg(feature = "system-clipboard")]
impl Clipboard for SystemClipboard {
    fn get_text(&mut self) -> Option<String> {
        match self.inner.get_text() {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::debug!("Clipboard has no text: {}", e);
                None
            }
        }
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        self.inner.set_text(text).map_err(|e| {
            tracing::warn!("Failed to write clipboard: {}", e);
            EditError::ClipboardUnavailable
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard() {
        let mut clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.get_text(), None);
        clipboard.set_text("copied").unwrap();
        assert_eq!(clipboard.get_text().as_deref(), Some("copied"));
        assert_eq!(clipboard.contents(), Some("copied"));
    }
}
