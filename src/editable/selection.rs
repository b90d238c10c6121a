//! Anchor/extend selection tracking and double/triple-click classification.

use super::position::Position;
use crate::error::{EditError, Result};

/// A selection gesture: a fixed anchor plus the normalized range it spans.
///
/// Generic over the caret type: `usize` offsets for `TextEntry`, `Position`
/// for `TextEdit`. The range is re-derived from the anchor on every extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionModel<P> {
    anchor: P,
    start: P,
    end: P,
    active: bool,
}

impl<P: Copy + Ord + Default> SelectionModel<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a selection gesture at `p`
    pub fn begin_at(&mut self, p: P) {
        self.anchor = p;
        self.start = p;
        self.end = p;
        self.active = true;
    }

    /// Move the free end of the active selection to `p`
    pub fn extend_to(&mut self, p: P) -> Result<()> {
        if !self.active {
            return Err(EditError::NoSelection);
        }
        self.start = self.anchor.min(p);
        self.end = self.anchor.max(p);
        tracing::trace!(target: "selection", "extended selection");
        Ok(())
    }

    /// Begin at `anchor` unless a gesture is already running, then extend to `head`
    pub fn anchor_and_extend(&mut self, anchor: P, head: P) {
        if !self.active {
            self.begin_at(anchor);
        }
        self.start = self.anchor.min(head);
        self.end = self.anchor.max(head);
    }

    /// Replace the selection with `anchor..head`
    pub fn select(&mut self, anchor: P, head: P) {
        self.begin_at(anchor);
        self.start = anchor.min(head);
        self.end = anchor.max(head);
    }

    pub fn clear(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Active and spanning at least one character
    pub fn has_content(&self) -> bool {
        self.active && self.start != self.end
    }

    pub fn anchor(&self) -> Option<P> {
        self.active.then_some(self.anchor)
    }

    /// Ordered `(start, end)` bounds while active
    pub fn range(&self) -> Option<(P, P)> {
        self.active.then_some((self.start, self.end))
    }

    /// Check if `p` lies within the selection (end exclusive)
    pub fn contains(&self, p: P) -> bool {
        self.active && p >= self.start && p < self.end
    }
}

/// Character classes used by double-click word selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Alphanumeric characters and `_`
    Word,
    Whitespace,
    /// Punctuation and everything else
    Other,
}

impl CharClass {
    pub fn of(ch: char) -> Self {
        if ch.is_alphanumeric() || ch == '_' {
            CharClass::Word
        } else if ch.is_whitespace() {
            CharClass::Whitespace
        } else {
            CharClass::Other
        }
    }
}

/// Columns `(start, end)` selected by a double-click at column `pos` of `line`.
///
/// A word neighbour wins: the run grows over word characters on whichever
/// sides touch one. Two neighbours of the same non-word class grow together.
/// At a whitespace/punctuation junction each side grows over its own class.
pub fn classify_word_at(line: &str, pos: usize) -> Result<(usize, usize)> {
    let chars: Vec<char> = line.chars().collect();
    let len = chars.len();
    if pos > len {
        return Err(EditError::OutOfRange {
            line: 0,
            column: pos,
        });
    }
    if len == 0 {
        return Ok((0, 0));
    }

    let class_at = |i: usize| CharClass::of(chars[i]);

    // (class grown leftwards, class grown rightwards)
    let (left, right) = if pos == 0 {
        (None, Some(class_at(0)))
    } else if pos == len {
        (Some(class_at(len - 1)), None)
    } else {
        let l = class_at(pos - 1);
        let r = class_at(pos);
        if l == CharClass::Word || r == CharClass::Word {
            (
                (l == CharClass::Word).then_some(CharClass::Word),
                (r == CharClass::Word).then_some(CharClass::Word),
            )
        } else {
            (Some(l), Some(r))
        }
    };

    let mut start = pos;
    if let Some(class) = left {
        while start > 0 && class_at(start - 1) == class {
            start -= 1;
        }
    }

    let mut end = pos;
    if let Some(class) = right {
        while end < len && class_at(end) == class {
            end += 1;
        }
    }

    tracing::debug!(target: "selection", pos, start, end, "word selection");
    Ok((start, end))
}

/// Whole-line selection for a triple-click on `line`.
///
/// Lines before the last one end at column 0 of the following line so the
/// trailing break is part of the selection.
pub fn classify_line_selection(
    line: usize,
    line_len: usize,
    line_count: usize,
) -> (Position, Position) {
    let start = Position::new(line, 0);
    if line + 1 < line_count {
        (start, Position::new(line + 1, 0))
    } else {
        (start, Position::new(line, line_len))
    }
}
