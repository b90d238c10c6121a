//! Line-addressed text storage for the multi-line editor.
//!
//! `LineStore` wraps a `ropey::Rope` and exposes the text as an ordered list of
//! lines addressed by `(line, column)`. Line breaks are stored as `\n` and are
//! never part of a line's content; the store always holds at least one line.

use std::borrow::Cow;

use ropey::Rope;

use super::position::Position;
use crate::error::{EditError, Result};

/// Replace CRLF and lone CR line breaks with LF
pub fn normalize_line_breaks(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

#[derive(Debug, Clone, Default)]
pub struct LineStore {
    rope: Rope,
}

impl LineStore {
    /// An empty document: exactly one empty line
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(&normalize_line_breaks(text)),
        }
    }

    /// Number of lines (always >= 1)
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn has_line(&self, line: usize) -> bool {
        line < self.line_count()
    }

    /// Length of a line in characters, excluding its line break
    pub fn line_length(&self, line: usize) -> Result<usize> {
        self.check_line(line)?;
        Ok(self.line_length_unchecked(line))
    }

    /// Copy of a line's content without its line break
    pub fn get_line(&self, line: usize) -> Result<String> {
        self.check_line(line)?;
        let start = self.rope.line_to_char(line);
        let len = self.line_length_unchecked(line);
        Ok(self.rope.slice(start..start + len).to_string())
    }

    /// Text between two positions, with line breaks kept between lines
    pub fn get_section(&self, start: Position, end: Position) -> Result<String> {
        let (from, to) = self.section_bounds(start, end)?;
        Ok(self.rope.slice(from..to).to_string())
    }

    /// Character count of `get_section(start, end)`, line breaks included
    pub fn section_length(&self, start: Position, end: Position) -> Result<usize> {
        let (from, to) = self.section_bounds(start, end)?;
        Ok(to - from)
    }

    /// Insert one character. A `\n` splits the line at `column`.
    pub fn insert_char(&mut self, line: usize, column: usize, ch: char) -> Result<()> {
        let idx = self.char_index(Position::new(line, column))?;
        let ch = if ch == '\r' { '\n' } else { ch };
        self.rope.insert_char(idx, ch);
        Ok(())
    }

    /// Delete the character at `column`; the line break is not addressable here
    pub fn delete_char(&mut self, line: usize, column: usize) -> Result<()> {
        let len = self.line_length(line)?;
        if column >= len {
            return Err(EditError::OutOfRange { line, column });
        }
        let idx = self.rope.line_to_char(line) + column;
        self.rope.remove(idx..idx + 1);
        Ok(())
    }

    /// Replace the character at `column` with `ch` (which must not be a line break)
    pub fn replace_char(&mut self, line: usize, column: usize, ch: char) -> Result<()> {
        if ch == '\n' || ch == '\r' {
            return Err(EditError::InvalidRange);
        }
        self.delete_char(line, column)?;
        self.insert_char(line, column, ch)
    }

    /// Append line `line + 1` onto line `line` and drop the break between them
    pub fn merge_lines(&mut self, line: usize) -> Result<()> {
        let line_count = self.line_count();
        if line + 1 >= line_count {
            return Err(EditError::LineOutOfRange {
                line: line + 1,
                line_count,
            });
        }
        let idx = self.rope.line_to_char(line) + self.line_length_unchecked(line);
        self.rope.remove(idx..idx + 1);
        Ok(())
    }

    /// Remove everything between two positions. Validates before mutating.
    pub fn delete_section(&mut self, start: Position, end: Position) -> Result<()> {
        let (from, to) = self.section_bounds(start, end)?;
        if from < to {
            self.rope.remove(from..to);
        }
        Ok(())
    }

    /// Insert possibly multi-line text, returning the position just past it
    pub fn insert_text(&mut self, line: usize, column: usize, text: &str) -> Result<Position> {
        let idx = self.char_index(Position::new(line, column))?;
        let text = normalize_line_breaks(text);
        self.rope.insert(idx, &text);
        let end = idx + text.chars().count();
        Ok(self.index_to_position(end))
    }

    /// Replace the whole document
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(&normalize_line_breaks(text));
    }

    /// Whole document with `\n` between lines
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Total characters across all lines, line breaks excluded
    pub fn length(&self) -> usize {
        self.rope.len_chars() - (self.line_count() - 1)
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Last addressable position in the document
    pub fn end_position(&self) -> Position {
        let last = self.line_count() - 1;
        Position::new(last, self.line_length_unchecked(last))
    }

    /// Convert a validated `(line, column)` into a char index of the rope
    pub fn char_index(&self, pos: Position) -> Result<usize> {
        let len = self.line_length(pos.line)?;
        if pos.column > len {
            return Err(EditError::OutOfRange {
                line: pos.line,
                column: pos.column,
            });
        }
        Ok(self.rope.line_to_char(pos.line) + pos.column)
    }

    /// Convert a char index into a `(line, column)` position (clamped)
    pub fn index_to_position(&self, idx: usize) -> Position {
        let clamped = idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(clamped);
        Position::new(line, clamped - self.rope.line_to_char(line))
    }

    fn section_bounds(&self, start: Position, end: Position) -> Result<(usize, usize)> {
        let from = self.char_index(start)?;
        let to = self.char_index(end)?;
        if to < from {
            return Err(EditError::InvalidRange);
        }
        Ok((from, to))
    }

    fn check_line(&self, line: usize) -> Result<()> {
        let line_count = self.line_count();
        if line >= line_count {
            return Err(EditError::LineOutOfRange { line, line_count });
        }
        Ok(())
    }

    fn line_length_unchecked(&self, line: usize) -> usize {
        let slice = self.rope.line(line);
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }
}
