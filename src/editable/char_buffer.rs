//! Single-line character buffer addressed by char offsets.

use std::ops::Range;

use crate::error::{EditError, Result};

/// Growable single-line text addressed by character (not byte) offsets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharBuffer {
    text: String,
    len_chars: usize,
}

impl CharBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(s: &str) -> Self {
        Self {
            text: s.to_string(),
            len_chars: s.chars().count(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.len_chars
    }

    pub fn is_empty(&self) -> bool {
        self.len_chars == 0
    }

    /// The first `count` characters
    pub fn prefix(&self, count: usize) -> &str {
        &self.text[..self.char_to_byte(count.min(self.len_chars))]
    }

    /// Characters in `range`, which must lie within the buffer
    pub fn slice(&self, range: Range<usize>) -> Result<&str> {
        self.check_range(&range)?;
        let start = self.char_to_byte(range.start);
        let end = self.char_to_byte(range.end);
        Ok(&self.text[start..end])
    }

    pub fn insert(&mut self, offset: usize, text: &str) -> Result<()> {
        if offset > self.len_chars {
            return Err(EditError::OutOfRange {
                line: 0,
                column: offset,
            });
        }
        let byte = self.char_to_byte(offset);
        self.text.insert_str(byte, text);
        self.len_chars += text.chars().count();
        Ok(())
    }

    pub fn remove(&mut self, range: Range<usize>) -> Result<()> {
        self.check_range(&range)?;
        let start = self.char_to_byte(range.start);
        let end = self.char_to_byte(range.end);
        self.text.replace_range(start..end, "");
        self.len_chars -= range.end - range.start;
        Ok(())
    }

    pub fn set(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.len_chars = text.chars().count();
    }

    fn check_range(&self, range: &Range<usize>) -> Result<()> {
        if range.end < range.start {
            return Err(EditError::InvalidRange);
        }
        if range.end > self.len_chars {
            return Err(EditError::OutOfRange {
                line: 0,
                column: range.end,
            });
        }
        Ok(())
    }

    /// Convert char offset to byte offset
    fn char_to_byte(&self, char_offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_offset)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}
