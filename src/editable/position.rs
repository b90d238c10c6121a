//! Caret positions for the multi-line editor.

use std::fmt;

/// A position in a line store (line and column, both 0-indexed).
///
/// Ordering is line-major, so `(0, 9) < (1, 0)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub const fn zero() -> Self {
        Self { line: 0, column: 0 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The caret of a `TextEdit`, with the column targeted by vertical movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
    /// Column requested by the first of a run of Up/Down presses.
    /// Moving through shorter lines clamps `column` but keeps this value, so a
    /// longer line further on restores the original column.
    pub desired_column: Option<usize>,
}

impl Cursor {
    pub const fn new(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            desired_column: None,
        }
    }

    pub const fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Place the caret and forget any vertical-move column.
    pub fn set(&mut self, pos: Position) {
        self.line = pos.line;
        self.column = pos.column;
        self.desired_column = None;
    }

    /// Clear desired column (call after horizontal movement, edits and clicks)
    pub fn clear_desired_column(&mut self) {
        self.desired_column = None;
    }

    /// Record the current column as the vertical-move target if none is set
    pub fn set_desired_column(&mut self) {
        if self.desired_column.is_none() {
            self.desired_column = Some(self.column);
        }
    }

    /// Column to land on in a line of `line_len` characters
    pub fn column_for_line(&self, line_len: usize) -> usize {
        self.desired_column.unwrap_or(self.column).min(line_len)
    }
}

impl From<Position> for Cursor {
    fn from(pos: Position) -> Self {
        Self::new(pos.line, pos.column)
    }
}

impl From<Cursor> for Position {
    fn from(cursor: Cursor) -> Self {
        cursor.position()
    }
}
