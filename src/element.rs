//! The element interface shared by widgets, and the collaborators they talk to.

use crate::clipboard::Clipboard;
use crate::input::{InputEvent, ShortcutMap};
use crate::metrics::GlyphMetrics;

/// Window-space rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Edges are inclusive on both sides
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x <= self.x + self.w && y >= self.y && y <= self.y + self.h
    }

    pub fn size(&self) -> RenderSize {
        RenderSize {
            w: self.w,
            h: self.h,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSize {
    pub w: i32,
    pub h: i32,
}

/// Whether an element consumed an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventState {
    Captured,
    NotCaptured,
}

impl EventState {
    pub fn is_captured(self) -> bool {
        self == EventState::Captured
    }
}

/// Notifications an element raises towards application code
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Callback {
    /// Enter pressed in a `TextEntry`
    Activated,
    /// A `TextEdit` gained focus by a click
    Click,
    /// The caret of a `TextEdit` moved
    CursorMoved,
}

/// The window hosting an element.
pub trait Window {
    fn request_redraw(&mut self, area: Rect);

    /// Give keyboard focus to the calling element
    fn take_focus(&mut self);

    fn start_text_input(&mut self);

    fn stop_text_input(&mut self);

    fn trigger_callback(&mut self, callback: Callback);
}

/// A window that records what elements asked of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingWindow {
    pub redraws: Vec<Rect>,
    pub focus_requests: usize,
    pub text_input_active: bool,
    pub callbacks: Vec<Callback>,
}

impl RecordingWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget recorded requests; text input state is kept
    pub fn clear(&mut self) {
        self.redraws.clear();
        self.focus_requests = 0;
        self.callbacks.clear();
    }
}

impl Window for RecordingWindow {
    fn request_redraw(&mut self, area: Rect) {
        self.redraws.push(area);
    }

    fn take_focus(&mut self) {
        self.focus_requests += 1;
    }

    fn start_text_input(&mut self) {
        self.text_input_active = true;
    }

    fn stop_text_input(&mut self) {
        self.text_input_active = false;
    }

    fn trigger_callback(&mut self, callback: Callback) {
        self.callbacks.push(callback);
    }
}

/// Everything an element needs from outside while handling one event.
pub struct EventContext<'a> {
    pub metrics: &'a dyn GlyphMetrics,
    pub clipboard: &'a mut dyn Clipboard,
    pub window: &'a mut dyn Window,
    pub shortcuts: ShortcutMap,
    /// Event timestamp in milliseconds, used for click classification
    pub now_ms: u64,
}

impl<'a> EventContext<'a> {
    pub fn new(
        metrics: &'a dyn GlyphMetrics,
        clipboard: &'a mut dyn Clipboard,
        window: &'a mut dyn Window,
    ) -> Self {
        Self {
            metrics,
            clipboard,
            window,
            shortcuts: ShortcutMap::platform(),
            now_ms: 0,
        }
    }

    pub fn with_shortcuts(mut self, shortcuts: ShortcutMap) -> Self {
        self.shortcuts = shortcuts;
        self
    }

    pub fn at(mut self, now_ms: u64) -> Self {
        self.now_ms = now_ms;
        self
    }
}

/// A widget placed in a window.
pub trait Element {
    /// Smallest size the element can be laid out at
    fn min_size(&self, metrics: &dyn GlyphMetrics) -> crate::error::Result<RenderSize>;

    fn bounds(&self) -> Rect;

    /// Position and size assigned by layout
    fn set_bounds(&mut self, bounds: Rect);

    fn has_focus(&self) -> bool;

    fn capture_event(&mut self, event: &InputEvent, ctx: &mut EventContext<'_>) -> EventState;

    /// Drop keyboard focus and any in-progress gesture
    fn defocus(&mut self, ctx: &mut EventContext<'_>);
}
