//! Shared test helpers for integration tests

#![allow(dead_code)]

use neuik::clipboard::MemoryClipboard;
use neuik::config::{TextEditConfig, TextEntryConfig};
use neuik::element::{Element, EventContext, EventState, Rect, RecordingWindow};
use neuik::input::{InputEvent, Key, KeyDown, Modifiers, MouseButton, ShortcutMap};
use neuik::metrics::MonospaceMetrics;
use neuik::widgets::{TextEdit, TextEntry};

/// Glyph advance of the test metrics
pub const ADVANCE: i32 = 10;

/// Line height of the test metrics (line pitch is 22px)
pub const LINE_HEIGHT: i32 = 20;

/// Single-line bounds with a 50px viewport
pub const ENTRY_BOUNDS: Rect = Rect::new(0, 0, 62, 30);

pub const EDIT_BOUNDS: Rect = Rect::new(0, 0, 212, 100);

/// Drives widgets with fixed-width metrics, an in-memory clipboard and a
/// recording window. Shortcuts use Ctrl on every platform.
pub struct Harness {
    pub metrics: MonospaceMetrics,
    pub clipboard: MemoryClipboard,
    pub window: RecordingWindow,
    pub now_ms: u64,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            metrics: MonospaceMetrics::new(ADVANCE, LINE_HEIGHT),
            clipboard: MemoryClipboard::new(),
            window: RecordingWindow::new(),
            now_ms: 10_000,
        }
    }

    pub fn send(&mut self, widget: &mut dyn Element, event: InputEvent) -> EventState {
        let mut ctx = EventContext::new(&self.metrics, &mut self.clipboard, &mut self.window)
            .with_shortcuts(ShortcutMap::with_command(Modifiers::CTRL))
            .at(self.now_ms);
        widget.capture_event(&event, &mut ctx)
    }

    pub fn defocus(&mut self, widget: &mut dyn Element) {
        let mut ctx = EventContext::new(&self.metrics, &mut self.clipboard, &mut self.window)
            .at(self.now_ms);
        widget.defocus(&mut ctx);
    }

    /// Advance the clock far enough that the next click is a fresh single click
    pub fn pause(&mut self) {
        self.now_ms += 1000;
    }

    pub fn key(&mut self, widget: &mut dyn Element, key: Key) -> EventState {
        self.send(widget, InputEvent::key(key))
    }

    pub fn shift_key(&mut self, widget: &mut dyn Element, key: Key) -> EventState {
        self.send(widget, InputEvent::KeyDown(KeyDown::new(key, Modifiers::SHIFT)))
    }

    pub fn ctrl(&mut self, widget: &mut dyn Element, ch: char) -> EventState {
        self.send(
            widget,
            InputEvent::KeyDown(KeyDown::new(Key::Char(ch), Modifiers::CTRL)),
        )
    }

    pub fn type_text(&mut self, widget: &mut dyn Element, text: &str) -> EventState {
        self.send(widget, InputEvent::text(text))
    }

    /// Press and release at a point
    pub fn click(&mut self, widget: &mut dyn Element, x: i32, y: i32) {
        self.send(widget, InputEvent::click(x, y));
        self.send(widget, InputEvent::MouseUp { x, y });
    }

    pub fn shift_click(&mut self, widget: &mut dyn Element, x: i32, y: i32) {
        self.send(
            widget,
            InputEvent::MouseDown {
                x,
                y,
                button: MouseButton::Left,
                modifiers: Modifiers::SHIFT,
            },
        );
        self.send(widget, InputEvent::MouseUp { x, y });
    }

    /// Click `count` times at one point inside the double-click window
    pub fn multi_click(&mut self, widget: &mut dyn Element, x: i32, y: i32, count: usize) {
        for _ in 0..count {
            self.click(widget, x, y);
            self.now_ms += 50;
        }
    }
}

/// Window point over column `col` of a single-line entry (no pan)
pub fn entry_point(col: i32) -> (i32, i32) {
    (6 + ADVANCE * col, 10)
}

/// Window point over column `col` of visible line `line` in a multi-line edit
pub fn edit_point(line: i32, col: i32) -> (i32, i32) {
    (6 + ADVANCE * col, 10 + 22 * line)
}

/// A focused entry with its caret at 0 and no gesture in progress
pub fn focused_entry(h: &mut Harness, text: &str) -> TextEntry {
    focused_entry_with(h, TextEntryConfig::default(), text)
}

pub fn focused_entry_with(h: &mut Harness, config: TextEntryConfig, text: &str) -> TextEntry {
    let mut entry = TextEntry::with_text(config, text);
    entry.set_bounds(ENTRY_BOUNDS);
    h.click(&mut entry, 1, 1);
    h.pause();
    h.window.clear();
    entry
}

/// A focused edit with its caret at (0,0) and no gesture in progress
pub fn focused_edit(h: &mut Harness, text: &str) -> TextEdit {
    focused_edit_with(h, TextEditConfig::default(), text)
}

pub fn focused_edit_with(h: &mut Harness, config: TextEditConfig, text: &str) -> TextEdit {
    let mut edit = TextEdit::with_text(config, text);
    edit.set_bounds(EDIT_BOUNDS);
    let (x, y) = edit_point(0, 0);
    h.click(&mut edit, x, y);
    h.pause();
    h.window.clear();
    edit
}

/// Deterministic pseudo-random numbers for event sequence tests
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    pub fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}
