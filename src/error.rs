//! Error taxonomy for text storage, selection and collaborator failures.

use thiserror::Error;

/// Errors raised by line storage, character buffers and widget collaborators.
///
/// Widgets never surface these from `capture_event`; a failed handler is logged
/// and the event is treated as having produced no visible change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// A column lies outside `[0, line_length]` of an existing line
    #[error("position {line}:{column} is out of range")]
    OutOfRange { line: usize, column: usize },

    /// A line index lies outside `[0, line_count)`
    #[error("line {line} is out of range (line count {line_count})")]
    LineOutOfRange { line: usize, line_count: usize },

    /// The end of a range precedes its start
    #[error("range end precedes range start")]
    InvalidRange,

    /// A selection operation needs an active selection
    #[error("no active selection")]
    NoSelection,

    #[error("allocation failure")]
    AllocationFailure,

    /// The clipboard holds no text
    #[error("clipboard has no text available")]
    ClipboardUnavailable,

    /// The metrics collaborator could not resolve a font
    #[error("font unavailable: {0}")]
    FontUnavailable(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EditError>;
