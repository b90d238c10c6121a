//! Single-line text entry field.

use serde::Serialize;

use super::{field_min_size, viewport_width, LineHit};
use crate::config::TextEntryConfig;
use crate::editable::{CharBuffer, ClickTracker, HorizontalPan, PanHint, SelectionModel};
use crate::element::{Callback, Element, EventContext, EventState, Rect, RenderSize};
use crate::error::{EditError, Result};
use crate::input::{InputEvent, Key, KeyDown, Modifiers, Shortcut};
use crate::metrics::{FontSpec, GlyphMetrics};
use crate::tracing::CaretSnapshot;

/// State of a `TextEntry` as seen by the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEntrySnapshot {
    pub text: String,
    pub cursor: usize,
    /// Selected char range `(start, end)`, end exclusive
    pub selection: Option<(usize, usize)>,
    pub pan: i32,
    pub has_focus: bool,
}

/// A single-line editable text field.
///
/// Text is addressed by char offset. Double-clicking selects the whole field;
/// Up and Down behave like Home and End.
#[derive(Debug, Clone)]
pub struct TextEntry {
    config: TextEntryConfig,
    text: CharBuffer,
    cursor: usize,
    selection: SelectionModel<usize>,
    pan: HorizontalPan,
    clicks: ClickTracker,
    /// Caret position where the current click-drag started
    click_origin: Option<usize>,
    click_held: bool,
    has_focus: bool,
    bounds: Rect,
}

impl TextEntry {
    pub fn new(config: TextEntryConfig) -> Self {
        Self {
            config,
            text: CharBuffer::new(),
            cursor: 0,
            selection: SelectionModel::new(),
            pan: HorizontalPan::new(),
            clicks: ClickTracker::new(),
            click_origin: None,
            click_held: false,
            has_focus: false,
            bounds: Rect::default(),
        }
    }

    pub fn with_text(config: TextEntryConfig, text: &str) -> Self {
        let mut entry = Self::new(config);
        entry.set_text(text);
        entry
    }

    pub fn config(&self) -> &TextEntryConfig {
        &self.config
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Replace the text; line breaks are dropped. Resets caret, selection and pan.
    pub fn set_text(&mut self, text: &str) {
        let single_line: String = text.chars().filter(|&c| c != '\n' && c != '\r').collect();
        self.text.set(&single_line);
        self.cursor = 0;
        self.selection.clear();
        self.pan.reset();
        self.click_origin = None;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection.range()
    }

    pub fn selected_text(&self) -> Option<&str> {
        let (start, end) = self.selection.range()?;
        self.text.slice(start..end).ok()
    }

    /// Horizontal pan in pixels
    pub fn pan(&self) -> i32 {
        self.pan.pixels()
    }

    pub fn is_click_held(&self) -> bool {
        self.click_held
    }

    pub fn snapshot(&self) -> TextEntrySnapshot {
        TextEntrySnapshot {
            text: self.text.as_str().to_string(),
            cursor: self.cursor,
            selection: self.selection.range(),
            pan: self.pan.pixels(),
            has_focus: self.has_focus,
        }
    }

    fn caret_snapshot(&self) -> CaretSnapshot {
        CaretSnapshot {
            caret: (0, self.cursor),
            selection: self.selection.range().map(|(s, e)| ((0, s), (0, e))),
            pan_line: 0,
            pan_pixels: self.pan.pixels(),
            length: self.text.len(),
        }
    }

    fn request_redraw(&self, ctx: &mut EventContext<'_>) {
        ctx.window.request_redraw(self.bounds);
    }

    fn line_hit<'a>(&'a self, metrics: &'a dyn GlyphMetrics, font: &'a FontSpec) -> LineHit<'a> {
        LineHit {
            metrics,
            font,
            text: self.text.as_str(),
            bounds: self.bounds,
            justify: self.config.style.text_h_justify,
            pan: self.pan.pixels(),
        }
    }

    fn column_at(&self, x: i32, ctx: &EventContext<'_>) -> Result<usize> {
        let font = self.config.font();
        self.line_hit(ctx.metrics, &font).column_at(x)
    }

    fn update_pan(&mut self, ctx: &EventContext<'_>, hint: PanHint) -> Result<()> {
        if self.text.is_empty() {
            self.pan.reset();
            return Ok(());
        }
        let font = self.config.font();
        let caret_x = ctx.metrics.width(&font, self.text.prefix(self.cursor))?;
        let text_w = ctx.metrics.width(&font, self.text.as_str())? + 1;
        let at_end = self.cursor == self.text.len();
        self.pan
            .update(caret_x, text_w, viewport_width(self.bounds.w), at_end, hint);
        Ok(())
    }

    /// Remove the selected text, if any, leaving the caret at its start
    fn delete_selection(&mut self) -> Result<bool> {
        match self.selection.range() {
            Some((start, end)) if start < end => {
                self.text.remove(start..end)?;
                self.cursor = start;
                self.selection.clear();
                Ok(true)
            }
            _ => {
                self.selection.clear();
                Ok(false)
            }
        }
    }

    /// Move the caret to `target`; with `extend` the selection follows it
    fn move_caret(&mut self, target: usize, extend: bool) {
        if extend {
            self.selection.anchor_and_extend(self.cursor, target);
            if !self.selection.has_content() {
                self.selection.clear();
            }
        } else {
            self.selection.clear();
        }
        self.cursor = target;
    }

    fn on_mouse_down(
        &mut self,
        x: i32,
        y: i32,
        modifiers: Modifiers,
        ctx: &mut EventContext<'_>,
    ) -> Result<EventState> {
        if !self.bounds.contains(x, y) {
            return Ok(EventState::NotCaptured);
        }

        if !self.has_focus {
            ctx.window.take_focus();
            self.has_focus = true;
            ctx.window.start_text_input();
            self.request_redraw(ctx);
            tracing::debug!("TextEntry focused");
            return Ok(EventState::Captured);
        }

        if self.text.is_empty() {
            return Ok(EventState::Captured);
        }

        let old_cursor = self.cursor;
        if modifiers.shift() {
            let origin = self
                .click_origin
                .or(self.selection.anchor())
                .unwrap_or(self.cursor);
            self.click_origin = Some(origin);
            self.cursor = self.column_at(x, ctx)?;
            self.selection.select(origin, self.cursor);
        } else {
            let len = self.text.len();
            if self.clicks.is_double(ctx.now_ms) && !self.selection.is_active() {
                self.selection.select(0, len);
                self.cursor = len;
                tracing::debug!(target: "selection", len, "double-click selected all");
            } else {
                self.cursor = self.column_at(x, ctx)?;
                self.selection.clear();
            }
            self.click_origin = Some(self.cursor);
            self.clicks.record(ctx.now_ms);
        }

        let hint = if old_cursor > self.cursor {
            PanHint::MovedBack
        } else {
            PanHint::MovedForward
        };
        self.update_pan(ctx, hint)?;
        self.request_redraw(ctx);
        self.click_held = true;
        Ok(EventState::Captured)
    }

    fn on_mouse_move(&mut self, x: i32, y: i32, ctx: &mut EventContext<'_>) -> Result<EventState> {
        if !(self.has_focus && self.click_held) || !self.bounds.contains(x, y) {
            return Ok(EventState::NotCaptured);
        }

        let old_cursor = self.cursor;
        let origin = self.click_origin.unwrap_or(self.cursor);
        self.cursor = self.column_at(x, ctx)?;
        if origin == self.cursor {
            self.selection.clear();
        } else {
            self.selection.select(origin, self.cursor);
        }

        let hint = if old_cursor > self.cursor {
            PanHint::MovedBack
        } else {
            PanHint::MovedForward
        };
        self.update_pan(ctx, hint)?;
        self.request_redraw(ctx);
        Ok(EventState::Captured)
    }

    fn on_text_input(&mut self, text: &str, ctx: &mut EventContext<'_>) -> Result<EventState> {
        if !self.has_focus {
            return Ok(EventState::NotCaptured);
        }
        let text = self.config.style.restriction.filter(text, false);
        let text: String = text.chars().filter(|&c| c != '\n' && c != '\r').collect();
        if text.is_empty() {
            return Ok(EventState::Captured);
        }

        self.delete_selection()?;
        self.text.insert(self.cursor, &text)?;
        self.cursor += text.chars().count();
        self.click_origin = None;

        self.update_pan(ctx, PanHint::TextInserted)?;
        self.request_redraw(ctx);
        Ok(EventState::Captured)
    }

    fn on_key_down(&mut self, key: &KeyDown, ctx: &mut EventContext<'_>) -> Result<EventState> {
        if !self.has_focus {
            return Ok(EventState::NotCaptured);
        }

        let shift = key.modifiers.shift();
        let len = self.text.len();
        let mut hint = PanHint::None;

        match key.key {
            Key::Left => {
                self.click_origin = None;
                match self.selection.range() {
                    Some((start, _)) if !shift => self.move_caret(start, false),
                    _ => self.move_caret(self.cursor.saturating_sub(1), shift),
                }
                hint = PanHint::MovedBack;
            }
            Key::Right => {
                self.click_origin = None;
                match self.selection.range() {
                    Some((_, end)) if !shift => self.move_caret(end, false),
                    _ => self.move_caret((self.cursor + 1).min(len), shift),
                }
                hint = PanHint::MovedForward;
            }
            Key::Home | Key::Up => {
                self.click_origin = None;
                self.move_caret(0, shift);
                hint = PanHint::MovedBack;
            }
            Key::End | Key::Down => {
                self.click_origin = None;
                self.move_caret(len, shift);
                hint = PanHint::MovedForward;
            }
            Key::Backspace => {
                if !self.delete_selection()? && self.cursor > 0 {
                    self.text.remove(self.cursor - 1..self.cursor)?;
                    self.cursor -= 1;
                }
                self.click_origin = None;
                hint = PanHint::TextDeleted;
            }
            Key::Delete => {
                if !self.delete_selection()? && self.cursor < len {
                    self.text.remove(self.cursor..self.cursor + 1)?;
                }
                self.click_origin = None;
                hint = PanHint::TextDeleted;
            }
            Key::Enter => {
                ctx.window.trigger_callback(Callback::Activated);
            }
            _ => {}
        }

        if let Some(shortcut) = ctx.shortcuts.resolve(key) {
            hint = self.apply_shortcut(shortcut, ctx)?.unwrap_or(hint);
        }

        self.update_pan(ctx, hint)?;
        self.request_redraw(ctx);
        Ok(EventState::Captured)
    }

    /// Run a clipboard or select-all shortcut, returning the pan hint it implies
    fn apply_shortcut(
        &mut self,
        shortcut: Shortcut,
        ctx: &mut EventContext<'_>,
    ) -> Result<Option<PanHint>> {
        match shortcut {
            Shortcut::Copy => {
                if let Some(selected) = self.selected_text() {
                    ctx.clipboard.set_text(selected)?;
                }
                Ok(None)
            }
            Shortcut::Cut => {
                if let Some(selected) = self.selected_text() {
                    ctx.clipboard.set_text(selected)?;
                }
                self.delete_selection()?;
                self.click_origin = None;
                Ok(Some(PanHint::TextDeleted))
            }
            Shortcut::Paste => {
                let Some(pasted) = ctx.clipboard.get_text() else {
                    tracing::warn!("Paste ignored: {}", EditError::ClipboardUnavailable);
                    return Ok(None);
                };
                let pasted: String = self
                    .config
                    .style
                    .restriction
                    .filter(&pasted, false)
                    .chars()
                    .filter(|&c| c != '\n' && c != '\r')
                    .collect();
                self.delete_selection()?;
                self.text.insert(self.cursor, &pasted)?;
                self.cursor += pasted.chars().count();
                self.click_origin = None;
                Ok(Some(PanHint::TextReplaced))
            }
            Shortcut::SelectAll => {
                let len = self.text.len();
                if len > 0 {
                    self.selection.select(0, len);
                    self.cursor = len;
                    self.click_origin = None;
                }
                Ok(Some(PanHint::MovedForward))
            }
        }
    }
}

impl Element for TextEntry {
    fn min_size(&self, metrics: &dyn GlyphMetrics) -> Result<RenderSize> {
        field_min_size(metrics, &self.config.font(), self.config.style.em_width)
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn has_focus(&self) -> bool {
        self.has_focus
    }

    fn capture_event(&mut self, event: &InputEvent, ctx: &mut EventContext<'_>) -> EventState {
        let before = self.caret_snapshot();
        let result = match event {
            InputEvent::MouseDown { x, y, modifiers, .. } => {
                self.on_mouse_down(*x, *y, *modifiers, ctx)
            }
            InputEvent::MouseUp { .. } => {
                if self.has_focus {
                    self.click_held = false;
                    Ok(EventState::Captured)
                } else {
                    Ok(EventState::NotCaptured)
                }
            }
            InputEvent::MouseMove { x, y } => self.on_mouse_move(*x, *y, ctx),
            InputEvent::MouseWheel { .. } => Ok(EventState::NotCaptured),
            InputEvent::TextInput { text } => self.on_text_input(text, ctx),
            InputEvent::KeyDown(key) => self.on_key_down(key, ctx),
        };

        match result {
            Ok(state) => {
                if let Some(change) = before.diff(&self.caret_snapshot()) {
                    tracing::debug!(target: "cursor", "TextEntry {}", change);
                }
                state
            }
            Err(e) => {
                tracing::error!("TextEntry failed to handle {:?}: {}", event, e);
                EventState::Captured
            }
        }
    }

    fn defocus(&mut self, ctx: &mut EventContext<'_>) {
        ctx.window.stop_text_input();
        self.selection.clear();
        self.click_held = false;
        self.click_origin = None;
        self.clicks.reset();
        self.has_focus = false;
        self.request_redraw(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::element::RecordingWindow;
    use crate::metrics::MonospaceMetrics;

    const BOUNDS: Rect = Rect::new(0, 0, 62, 30);

    struct Harness {
        metrics: MonospaceMetrics,
        clipboard: MemoryClipboard,
        window: RecordingWindow,
        now_ms: u64,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                metrics: MonospaceMetrics::new(10, 20),
                clipboard: MemoryClipboard::new(),
                window: RecordingWindow::new(),
                now_ms: 10_000,
            }
        }

        fn send(&mut self, entry: &mut TextEntry, event: InputEvent) -> EventState {
            let mut ctx = EventContext::new(&self.metrics, &mut self.clipboard, &mut self.window)
                .with_shortcuts(crate::input::ShortcutMap::with_command(Modifiers::CTRL))
                .at(self.now_ms);
            entry.capture_event(&event, &mut ctx)
        }
    }

    fn focused(text: &str, h: &mut Harness) -> TextEntry {
        let mut entry = TextEntry::with_text(TextEntryConfig::default(), text);
        entry.set_bounds(BOUNDS);
        h.send(&mut entry, InputEvent::click(1, 1));
        h.now_ms += 1000;
        entry
    }

    fn ctrl(ch: char) -> InputEvent {
        InputEvent::KeyDown(KeyDown::new(Key::Char(ch), Modifiers::CTRL))
    }

    fn shift(key: Key) -> InputEvent {
        InputEvent::KeyDown(KeyDown::new(key, Modifiers::SHIFT))
    }

    #[test]
    fn test_focus_in_does_not_move_cursor() {
        let mut h = Harness::new();
        let mut entry = TextEntry::with_text(TextEntryConfig::default(), "hello");
        entry.set_bounds(BOUNDS);
        assert_eq!(h.send(&mut entry, InputEvent::click(40, 5)), EventState::Captured);
        assert!(entry.has_focus());
        assert_eq!(entry.cursor(), 0);
        assert!(h.window.text_input_active);
        assert_eq!(h.window.focus_requests, 1);
    }

    #[test]
    fn test_click_outside_not_captured() {
        let mut h = Harness::new();
        let mut entry = focused("hello", &mut h);
        assert_eq!(h.send(&mut entry, InputEvent::click(200, 5)), EventState::NotCaptured);
    }

    #[test]
    fn test_type_into_empty_entry() {
        let mut h = Harness::new();
        let mut entry = focused("", &mut h);
        h.send(&mut entry, InputEvent::text("hello"));
        assert_eq!(entry.text(), "hello");
        assert_eq!(entry.cursor(), 5);
    }

    #[test]
    fn test_select_all_then_type_replaces() {
        let mut h = Harness::new();
        let mut entry = focused("hello", &mut h);
        h.send(&mut entry, InputEvent::key(Key::End));
        h.send(&mut entry, ctrl('a'));
        assert_eq!(entry.selection(), Some((0, 5)));
        h.send(&mut entry, InputEvent::text("X"));
        assert_eq!(entry.text(), "X");
        assert_eq!(entry.cursor(), 1);
        assert_eq!(entry.selection(), None);
    }

    #[test]
    fn test_click_places_cursor() {
        let mut h = Harness::new();
        let mut entry = focused("hello", &mut h);
        // Text starts at x = 6, chars are 10px wide
        h.send(&mut entry, InputEvent::click(28, 5));
        assert_eq!(entry.cursor(), 2);
        assert!(entry.is_click_held());
        h.send(&mut entry, InputEvent::MouseUp { x: 28, y: 5 });
        assert!(!entry.is_click_held());
    }

    #[test]
    fn test_double_click_selects_all() {
        let mut h = Harness::new();
        let mut entry = focused("hello", &mut h);
        h.send(&mut entry, InputEvent::click(28, 5));
        h.now_ms += 100;
        h.send(&mut entry, InputEvent::click(28, 5));
        assert_eq!(entry.selection(), Some((0, 5)));
        assert_eq!(entry.cursor(), 5);
    }

    #[test]
    fn test_drag_selects() {
        let mut h = Harness::new();
        let mut entry = focused("hello", &mut h);
        h.send(&mut entry, InputEvent::click(18, 5));
        h.send(&mut entry, InputEvent::MouseMove { x: 48, y: 5 });
        assert_eq!(entry.selection(), Some((1, 4)));
        assert_eq!(entry.selected_text(), Some("ell"));
    }

    #[test]
    fn test_shift_click_extends_from_origin() {
        let mut h = Harness::new();
        let mut entry = focused("hello", &mut h);
        h.send(&mut entry, InputEvent::click(38, 5));
        h.now_ms += 1000;
        let shift_click = InputEvent::MouseDown {
            x: 10,
            y: 5,
            button: crate::input::MouseButton::Left,
            modifiers: Modifiers::SHIFT,
        };
        h.send(&mut entry, shift_click);
        assert_eq!(entry.selection(), Some((0, 3)));
        assert_eq!(entry.cursor(), 0);
    }

    #[test]
    fn test_arrows_collapse_selection() {
        let mut h = Harness::new();
        let mut entry = focused("hello", &mut h);
        h.send(&mut entry, InputEvent::key(Key::Right));
        h.send(&mut entry, shift(Key::Right));
        h.send(&mut entry, shift(Key::Right));
        assert_eq!(entry.selection(), Some((1, 3)));
        h.send(&mut entry, InputEvent::key(Key::Left));
        assert_eq!(entry.cursor(), 1);
        assert_eq!(entry.selection(), None);

        h.send(&mut entry, shift(Key::End));
        h.send(&mut entry, InputEvent::key(Key::Right));
        assert_eq!(entry.cursor(), 5);
        assert_eq!(entry.selection(), None);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut h = Harness::new();
        let mut entry = focused("hello", &mut h);
        h.send(&mut entry, InputEvent::key(Key::Delete));
        assert_eq!(entry.text(), "ello");
        h.send(&mut entry, InputEvent::key(Key::Backspace));
        assert_eq!(entry.text(), "ello");
        h.send(&mut entry, InputEvent::key(Key::End));
        h.send(&mut entry, InputEvent::key(Key::Backspace));
        assert_eq!(entry.text(), "ell");
        assert_eq!(entry.cursor(), 3);
        h.send(&mut entry, shift(Key::Home));
        h.send(&mut entry, InputEvent::key(Key::Delete));
        assert_eq!(entry.text(), "");
        assert_eq!(entry.cursor(), 0);
    }

    #[test]
    fn test_up_down_jump_to_ends() {
        let mut h = Harness::new();
        let mut entry = focused("hello", &mut h);
        h.send(&mut entry, InputEvent::key(Key::Down));
        assert_eq!(entry.cursor(), 5);
        h.send(&mut entry, InputEvent::key(Key::Up));
        assert_eq!(entry.cursor(), 0);
    }

    #[test]
    fn test_copy_cut_paste() {
        let mut h = Harness::new();
        let mut entry = focused("hello world", &mut h);
        for _ in 0..5 {
            h.send(&mut entry, shift(Key::Right));
        }
        h.send(&mut entry, ctrl('c'));
        assert_eq!(h.clipboard.contents(), Some("hello"));
        h.send(&mut entry, ctrl('x'));
        assert_eq!(entry.text(), " world");
        h.send(&mut entry, InputEvent::key(Key::End));
        h.send(&mut entry, ctrl('v'));
        assert_eq!(entry.text(), " worldhello");
        assert_eq!(entry.cursor(), 11);
    }

    #[test]
    fn test_paste_strips_line_breaks() {
        let mut h = Harness::new();
        let mut entry = focused("", &mut h);
        h.clipboard = MemoryClipboard::with_text("a\r\nb\nc");
        h.send(&mut entry, ctrl('v'));
        assert_eq!(entry.text(), "abc");
    }

    #[test]
    fn test_paste_with_empty_clipboard_keeps_selection() {
        let mut h = Harness::new();
        let mut entry = focused("hello", &mut h);
        h.send(&mut entry, ctrl('a'));
        h.send(&mut entry, ctrl('v'));
        assert_eq!(entry.text(), "hello");
        assert_eq!(entry.selection(), Some((0, 5)));
    }

    #[test]
    fn test_restriction_filters_input() {
        let mut h = Harness::new();
        let mut config = TextEntryConfig::default();
        config.style.restriction = crate::config::Restriction::Numeric;
        let mut entry = TextEntry::new(config);
        entry.set_bounds(BOUNDS);
        h.send(&mut entry, InputEvent::click(1, 1));
        h.send(&mut entry, InputEvent::text("a1b2"));
        assert_eq!(entry.text(), "12");
    }

    #[test]
    fn test_enter_activates() {
        let mut h = Harness::new();
        let mut entry = focused("x", &mut h);
        h.send(&mut entry, InputEvent::key(Key::Enter));
        assert_eq!(h.window.callbacks, vec![Callback::Activated]);
    }

    #[test]
    fn test_pan_follows_caret() {
        let mut h = Harness::new();
        let mut entry = focused("", &mut h);
        // Viewport is 50px: 62 - 12
        h.send(&mut entry, InputEvent::text("0123456789ab"));
        assert_eq!(entry.pan(), 121 - 50);
        h.send(&mut entry, InputEvent::key(Key::Home));
        assert_eq!(entry.pan(), 0);
        h.send(&mut entry, InputEvent::key(Key::Backspace));
        h.send(&mut entry, shift(Key::End));
        h.send(&mut entry, InputEvent::key(Key::Delete));
        assert_eq!(entry.pan(), 0);
    }

    #[test]
    fn test_unfocused_ignores_keys() {
        let mut h = Harness::new();
        let mut entry = TextEntry::with_text(TextEntryConfig::default(), "hello");
        entry.set_bounds(BOUNDS);
        assert_eq!(h.send(&mut entry, InputEvent::text("x")), EventState::NotCaptured);
        assert_eq!(
            h.send(&mut entry, InputEvent::key(Key::Delete)),
            EventState::NotCaptured
        );
        assert_eq!(entry.text(), "hello");
    }

    #[test]
    fn test_defocus_resets_gesture() {
        let mut h = Harness::new();
        let mut entry = focused("hello", &mut h);
        h.send(&mut entry, ctrl('a'));
        let mut ctx = EventContext::new(&h.metrics, &mut h.clipboard, &mut h.window);
        entry.defocus(&mut ctx);
        assert!(!entry.has_focus());
        assert_eq!(entry.selection(), None);
        assert!(!h.window.text_input_active);
    }
}
