//! Text storage, caret and selection primitives shared by the text widgets.
//!
//! # Architecture
//!
//! - [`LineStore`]: multi-line storage addressed by `(line, column)`, backed by `ropey::Rope`
//! - [`CharBuffer`]: single-line storage addressed by character offset
//! - [`Position`] / [`Cursor`]: caret coordinates, with the column kept across vertical moves
//! - [`SelectionModel`]: anchor/extend selection, plus word and line classification
//! - [`HorizontalPan`] / [`VerticalPan`]: viewport offsets that keep the caret visible
//! - [`ClickTracker`]: single/double/triple click classification
//!
//! # Example
//!
//! ```
//! use neuik::editable::{LineStore, Position};
//!
//! let mut store = LineStore::from_text("hello");
//! let end = store.insert_text(0, 5, "\nworld").unwrap();
//!
//! assert_eq!(store.line_count(), 2);
//! assert_eq!(end, Position::new(1, 5));
//! ```

mod char_buffer;
mod click;
mod line_store;
mod pan;
mod position;
mod selection;

pub use char_buffer::CharBuffer;
pub use click::{ClickKind, ClickTracker, DOUBLE_CLICK_TIMEOUT_MS};
pub use line_store::{normalize_line_breaks, LineStore};
pub use pan::{
    line_pitch, HorizontalPan, PanHint, ScrollbarGeometry, VerticalPan, LINE_PITCH,
    MIN_VIEW_PCT, SCROLL_QUANTUM_PX,
};
pub use position::{Cursor, Position};
pub use selection::{classify_line_selection, classify_word_at, CharClass, SelectionModel};
