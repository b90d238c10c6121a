//! NEUIK text widgets
//!
//! This crate provides the editable text widgets of the NEUIK toolkit: the
//! single-line `TextEntry` and the multi-line `TextEdit`, with their caret,
//! selection, click-gesture and viewport-panning state machines. Rendering,
//! fonts, clipboard and the host window are reached through collaborator
//! traits so the widgets can be driven headlessly.

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod config_paths;
pub mod editable;
pub mod element;
pub mod error;
pub mod input;
pub mod metrics;
pub mod replay;
pub mod tracing;
pub mod widgets;

// Re-export commonly used types
pub use config::{TextEditConfig, TextEntryConfig, WidgetConfig};
pub use editable::{LineStore, Position, SelectionModel};
pub use element::{Element, EventContext, EventState, Rect, Window};
pub use error::{EditError, Result};
pub use input::InputEvent;
pub use widgets::{AnyElement, TextEdit, TextEntry};
