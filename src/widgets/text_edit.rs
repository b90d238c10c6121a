//! Multi-line text editor field.

use serde::Serialize;

use super::{byte_offset, field_min_size, viewport_width, LineHit};
use crate::config::TextEditConfig;
use crate::editable::{
    classify_line_selection, classify_word_at, line_pitch, ClickKind, ClickTracker, Cursor,
    HorizontalPan, LineStore, PanHint, Position, ScrollbarGeometry, SelectionModel, VerticalPan,
    LINE_PITCH,
};
use crate::element::{Callback, Element, EventContext, EventState, Rect, RenderSize};
use crate::error::{EditError, Result};
use crate::input::{InputEvent, Key, KeyDown, Modifiers, Shortcut};
use crate::metrics::{FontSpec, GlyphMetrics};
use crate::tracing::CaretSnapshot;

/// First line baseline offset from the top edge, in pixels
const TOP_MARGIN_PX: f64 = 2.0;

/// State of a `TextEdit` as seen by the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEditSnapshot {
    pub lines: Vec<String>,
    /// `(line, column)`
    pub cursor: (usize, usize),
    /// Selected range as `((line, column), (line, column))`, end exclusive
    pub selection: Option<((usize, usize), (usize, usize))>,
    /// Horizontal pan of the caret line, in pixels
    pub pan_x: i32,
    pub pan_line: usize,
    pub pan_pixels: i32,
    pub has_focus: bool,
}

/// A multi-line editable text field with word and line selection gestures.
#[derive(Debug, Clone)]
pub struct TextEdit {
    config: TextEditConfig,
    lines: LineStore,
    cursor: Cursor,
    selection: SelectionModel<Position>,
    /// Horizontal pan of the caret line
    hpan: HorizontalPan,
    vpan: VerticalPan,
    clicks: ClickTracker,
    click_held: bool,
    has_focus: bool,
    /// Last pointer position seen by any mouse event, for wheel routing
    last_mouse: Option<(i32, i32)>,
    bounds: Rect,
}

impl TextEdit {
    pub fn new(config: TextEditConfig) -> Self {
        Self {
            config,
            lines: LineStore::new(),
            cursor: Cursor::default(),
            selection: SelectionModel::new(),
            hpan: HorizontalPan::new(),
            vpan: VerticalPan::new(),
            clicks: ClickTracker::new(),
            click_held: false,
            has_focus: false,
            last_mouse: None,
            bounds: Rect::default(),
        }
    }

    pub fn with_text(config: TextEditConfig, text: &str) -> Self {
        let mut edit = Self::new(config);
        edit.set_text(text);
        edit
    }

    pub fn config(&self) -> &TextEditConfig {
        &self.config
    }

    pub fn lines(&self) -> &LineStore {
        &self.lines
    }

    /// Whole text with `\n` between lines
    pub fn text(&self) -> String {
        self.lines.text()
    }

    /// Replace the text. Resets caret, selection and both pans.
    pub fn set_text(&mut self, text: &str) {
        self.lines.set_text(text);
        self.cursor = Cursor::default();
        self.selection.clear();
        self.hpan.reset();
        self.vpan.reset();
    }

    pub fn cursor(&self) -> Position {
        self.cursor.position()
    }

    pub fn selection(&self) -> Option<(Position, Position)> {
        self.selection.range()
    }

    pub fn selected_text(&self) -> Result<Option<String>> {
        match self.selection.range() {
            Some((start, end)) => Ok(Some(self.lines.get_section(start, end)?)),
            None => Ok(None),
        }
    }

    pub fn horizontal_pan(&self) -> i32 {
        self.hpan.pixels()
    }

    pub fn vertical_pan(&self) -> VerticalPan {
        self.vpan
    }

    pub fn is_click_held(&self) -> bool {
        self.click_held
    }

    /// Selection extent as `(lines, chars)`.
    ///
    /// `(0, 0)` without a selection; `(0, n)` for a selection within one line;
    /// otherwise the number of lines touched and the section length.
    pub fn highlight_info(&self) -> Result<(usize, usize)> {
        let Some((start, end)) = self.selection.range() else {
            return Ok((0, 0));
        };
        if start.line == end.line {
            return Ok((0, end.column - start.column));
        }
        let chars = self.lines.section_length(start, end)?;
        Ok((1 + end.line - start.line, chars))
    }

    /// Scrollbar thumb placement for the current vertical pan
    pub fn scrollbar(&self, metrics: &dyn GlyphMetrics) -> Result<ScrollbarGeometry> {
        let pitch = line_pitch(metrics.line_height(&self.config.font())?);
        Ok(ScrollbarGeometry::compute(
            self.vpan,
            self.lines.line_count(),
            pitch,
            self.bounds.h - 2,
        ))
    }

    pub fn snapshot(&self) -> TextEditSnapshot {
        TextEditSnapshot {
            lines: (0..self.lines.line_count())
                .filter_map(|i| self.lines.get_line(i).ok())
                .collect(),
            cursor: (self.cursor.line, self.cursor.column),
            selection: self
                .selection
                .range()
                .map(|(s, e)| ((s.line, s.column), (e.line, e.column))),
            pan_x: self.hpan.pixels(),
            pan_line: self.vpan.line,
            pan_pixels: self.vpan.pixels,
            has_focus: self.has_focus,
        }
    }

    fn caret_snapshot(&self) -> CaretSnapshot {
        CaretSnapshot {
            caret: (self.cursor.line, self.cursor.column),
            selection: self
                .selection
                .range()
                .map(|(s, e)| ((s.line, s.column), (e.line, e.column))),
            pan_line: self.vpan.line,
            pan_pixels: self.vpan.pixels,
            length: self.lines.length(),
        }
    }

    fn request_redraw(&self, ctx: &mut EventContext<'_>) {
        ctx.window.request_redraw(self.bounds);
    }

    fn notify_if_moved(&self, before: Position, ctx: &mut EventContext<'_>) {
        if before != self.cursor.position() {
            ctx.window.trigger_callback(Callback::CursorMoved);
        }
    }

    /// Recompute the horizontal pan for the caret line
    fn update_hpan(&mut self, ctx: &EventContext<'_>, hint: PanHint) -> Result<()> {
        if self.lines.is_empty() {
            self.hpan.reset();
            return Ok(());
        }
        let font = self.config.font();
        let line = self.lines.get_line(self.cursor.line)?;
        let column = self.cursor.column.min(line.chars().count());
        let caret_x = ctx.metrics.width(&font, &line[..byte_offset(&line, column)])?;
        let text_w = ctx.metrics.width(&font, &line)? + 1;
        let at_end = column == line.chars().count();
        self.hpan
            .update(caret_x, text_w, viewport_width(self.bounds.w), at_end, hint);
        Ok(())
    }

    /// Recompute the vertical pan after an edit or keyboard move: the pan stays
    /// within the content, resets when everything fits and keeps the caret line
    /// in view.
    fn update_vpan(&mut self, ctx: &EventContext<'_>) -> Result<()> {
        let pitch = line_pitch(ctx.metrics.line_height(&self.config.font())?);
        let line_count = self.lines.line_count();
        let viewport_h = self.bounds.h - 2;
        if self.vpan.line + 1 > line_count {
            self.vpan.line = line_count.saturating_sub(1);
            self.vpan.pixels = 0;
        }
        self.vpan.clamp_to_content(pitch, line_count, viewport_h);
        self.vpan.reveal_line(self.cursor.line, pitch, viewport_h);
        Ok(())
    }

    /// Line under window y coordinate `y`, `None` below the last line
    fn line_at_y(&self, y: i32, font: &FontSpec, metrics: &dyn GlyphMetrics) -> Result<Option<usize>> {
        let pitch = LINE_PITCH * f64::from(metrics.line_height(font)?);
        let y_rel = y - self.bounds.y;

        let mut y_pos = TOP_MARGIN_PX;
        for line in self.vpan.line..self.lines.line_count() {
            y_pos += pitch;
            if line == self.vpan.line {
                // First visible line is cropped by the partial scroll
                y_pos -= f64::from(self.vpan.pixels);
            }
            if y_rel < y_pos as i32 - 1 {
                tracing::trace!(target: "cursor", y_rel, line, "line hit");
                return Ok(Some(line));
            }
        }
        Ok(None)
    }

    /// Caret column for window x coordinate `x` on `line`
    fn column_at(&self, line: usize, x: i32, ctx: &EventContext<'_>) -> Result<usize> {
        let font = self.config.font();
        let text = self.lines.get_line(line)?;
        LineHit {
            metrics: ctx.metrics,
            font: &font,
            text: &text,
            bounds: self.bounds,
            justify: self.config.style.text_h_justify,
            pan: self.hpan.pixels(),
        }
        .column_at(x)
    }

    /// Position under the pointer; below the last line maps to its end
    fn position_at(&self, x: i32, y: i32, ctx: &EventContext<'_>) -> Result<Position> {
        let font = self.config.font();
        match self.line_at_y(y, &font, ctx.metrics)? {
            Some(line) => Ok(Position::new(line, self.column_at(line, x, ctx)?)),
            None => Ok(self.lines.end_position()),
        }
    }

    fn delete_selection(&mut self) -> Result<bool> {
        match self.selection.range() {
            Some((start, end)) if start < end => {
                self.lines.delete_section(start, end)?;
                self.cursor.set(start);
                self.selection.clear();
                Ok(true)
            }
            _ => {
                self.selection.clear();
                Ok(false)
            }
        }
    }

    /// Place the caret at `target`, extending the selection when `extend` is set.
    /// The desired column is left for the caller to manage.
    fn move_caret(&mut self, target: Position, extend: bool) {
        if extend {
            self.selection
                .anchor_and_extend(self.cursor.position(), target);
            if !self.selection.has_content() {
                self.selection.clear();
            }
        } else {
            self.selection.clear();
        }
        self.cursor.line = target.line;
        self.cursor.column = target.column;
    }

    fn line_len(&self, line: usize) -> Result<usize> {
        self.lines.line_length(line)
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
            ctx.window.trigger_callback(Callback::Click);
            ctx.window.start_text_input();
            self.request_redraw(ctx);
            tracing::debug!("TextEdit focused");
        }

        let before = self.cursor.position();
        let shift = modifiers.shift();
        if shift && !self.selection.is_active() {
            self.selection.begin_at(before);
        } else if !shift {
            self.selection.clear();
        }

        let font = self.config.font();
        let Some(line) = self.line_at_y(y, &font, ctx.metrics)? else {
            // Below the last line: caret to the end of the document
            self.cursor.set(self.lines.end_position());
            if self.selection.is_active() {
                self.selection.extend_to(self.cursor.position())?;
            }
            self.update_hpan(ctx, PanHint::MovedForward)?;
            self.notify_if_moved(before, ctx);
            self.request_redraw(ctx);
            self.click_held = true;
            return Ok(EventState::Captured);
        };

        let line_len = self.line_len(line)?;
        self.cursor.line = line;
        self.cursor.column = self.cursor.column.min(line_len);
        self.cursor.clear_desired_column();
        self.update_hpan(ctx, PanHint::MovedForward)?;
        let column = self.column_at(line, x, ctx)?;

        let mut kind = self.clicks.classify(ctx.now_ms);
        if kind == ClickKind::Double && self.selection.is_active() {
            kind = ClickKind::Single;
        }
        tracing::debug!(target: "selection", ?kind, line, column, "TextEdit click");

        match kind {
            ClickKind::Triple => {
                let (start, end) =
                    classify_line_selection(line, line_len, self.lines.line_count());
                self.selection.select(start, end);
                self.cursor.set(end);
            }
            ClickKind::Double => {
                self.clicks.record(ctx.now_ms);
                self.cursor.column = column;
                if line_len > 0 {
                    let text = self.lines.get_line(line)?;
                    let (start, end) = classify_word_at(&text, column)?;
                    self.selection
                        .select(Position::new(line, start), Position::new(line, end));
                    self.cursor.column = end;
                }
            }
            ClickKind::Single => {
                let old_column = self.cursor.column;
                self.cursor.column = column;
                let hint = if old_column > column {
                    PanHint::MovedBack
                } else {
                    PanHint::MovedForward
                };
                self.update_hpan(ctx, hint)?;
                self.clicks.record(ctx.now_ms);
                if self.selection.is_active() {
                    self.selection.extend_to(self.cursor.position())?;
                }
            }
        }

        self.notify_if_moved(before, ctx);
        self.request_redraw(ctx);
        self.click_held = true;
        Ok(EventState::Captured)
    }

    fn on_mouse_move(&mut self, x: i32, y: i32, ctx: &mut EventContext<'_>) -> Result<EventState> {
        if !(self.has_focus && self.click_held) {
            return Ok(EventState::NotCaptured);
        }

        let y = y.clamp(self.bounds.y, self.bounds.y + self.bounds.h);
        let before = self.cursor.position();
        if !self.selection.is_active() {
            self.selection.begin_at(before);
        }

        let target = self.position_at(x, y, ctx)?;
        self.cursor.set(target);
        self.selection.extend_to(target)?;

        let hint = if before > target {
            PanHint::MovedBack
        } else {
            PanHint::MovedForward
        };
        self.update_hpan(ctx, hint)?;
        self.notify_if_moved(before, ctx);
        self.request_redraw(ctx);
        Ok(EventState::Captured)
    }

    fn on_mouse_wheel(&mut self, dy: i32, ctx: &mut EventContext<'_>) -> Result<EventState> {
        let inside = self
            .last_mouse
            .is_some_and(|(x, y)| self.bounds.contains(x, y));
        if !inside {
            return Ok(EventState::NotCaptured);
        }

        let pitch = line_pitch(ctx.metrics.line_height(&self.config.font())?);
        let changed = self
            .vpan
            .scroll(dy, pitch, self.lines.line_count(), self.bounds.h - 2);
        if changed {
            self.request_redraw(ctx);
        }
        Ok(EventState::Captured)
    }

    fn on_text_input(&mut self, text: &str, ctx: &mut EventContext<'_>) -> Result<EventState> {
        if !self.has_focus {
            return Ok(EventState::NotCaptured);
        }
        let text = self.config.style.restriction.filter(text, true);
        if text.is_empty() {
            return Ok(EventState::Captured);
        }

        let before = self.cursor.position();
        self.delete_selection()?;
        let pos = self.cursor.position();
        let end = self.lines.insert_text(pos.line, pos.column, &text)?;
        self.cursor.set(end);

        self.update_hpan(ctx, PanHint::TextInserted)?;
        self.update_vpan(ctx)?;
        self.notify_if_moved(before, ctx);
        self.request_redraw(ctx);
        Ok(EventState::Captured)
    }

    fn on_key_down(&mut self, key: &KeyDown, ctx: &mut EventContext<'_>) -> Result<EventState> {
        if !self.has_focus {
            return Ok(EventState::NotCaptured);
        }

        let shift = key.modifiers.shift();
        let before = self.cursor.position();
        let Position { line, column } = before;
        let line_len = self.line_len(line)?;
        let line_count = self.lines.line_count();
        let mut hint = PanHint::None;

        match key.key {
            Key::Left => {
                self.cursor.clear_desired_column();
                match self.selection.range() {
                    Some((start, _)) if !shift => self.move_caret(start, false),
                    _ => {
                        let target = if column > 0 {
                            Position::new(line, column - 1)
                        } else if line > 0 {
                            Position::new(line - 1, self.line_len(line - 1)?)
                        } else {
                            before
                        };
                        self.move_caret(target, shift);
                    }
                }
                hint = PanHint::MovedBack;
            }
            Key::Right => {
                self.cursor.clear_desired_column();
                match self.selection.range() {
                    Some((_, end)) if !shift => self.move_caret(end, false),
                    _ => {
                        let target = if column < line_len {
                            Position::new(line, column + 1)
                        } else if line + 1 < line_count {
                            Position::new(line + 1, 0)
                        } else {
                            before
                        };
                        self.move_caret(target, shift);
                    }
                }
                hint = PanHint::MovedForward;
            }
            Key::Up => {
                let target = if line > 0 {
                    self.cursor.set_desired_column();
                    Position::new(line - 1, self.cursor.column_for_line(self.line_len(line - 1)?))
                } else {
                    self.cursor.desired_column = Some(0);
                    Position::new(0, 0)
                };
                self.move_caret(target, shift);
                hint = PanHint::MovedBack;
            }
            Key::Down => {
                let target = if line + 1 < line_count {
                    self.cursor.set_desired_column();
                    Position::new(line + 1, self.cursor.column_for_line(self.line_len(line + 1)?))
                } else {
                    self.cursor.desired_column = Some(line_len);
                    Position::new(line, line_len)
                };
                self.move_caret(target, shift);
                hint = PanHint::MovedForward;
            }
            Key::Home => {
                self.cursor.clear_desired_column();
                self.move_caret(Position::new(line, 0), shift);
                hint = PanHint::MovedBack;
            }
            Key::End => {
                self.cursor.clear_desired_column();
                self.move_caret(Position::new(line, line_len), shift);
                hint = PanHint::MovedForward;
            }
            Key::Backspace => {
                if !self.delete_selection()? {
                    if column > 0 {
                        self.lines.delete_char(line, column - 1)?;
                        self.cursor.set(Position::new(line, column - 1));
                    } else if line > 0 {
                        let prev_len = self.line_len(line - 1)?;
                        self.lines.merge_lines(line - 1)?;
                        self.cursor.set(Position::new(line - 1, prev_len));
                    }
                }
                self.cursor.clear_desired_column();
                hint = PanHint::TextDeleted;
            }
            Key::Delete => {
                if !self.delete_selection()? {
                    if column < line_len {
                        self.lines.delete_char(line, column)?;
                    } else if line + 1 < line_count {
                        self.lines.merge_lines(line)?;
                    }
                }
                self.cursor.clear_desired_column();
                hint = PanHint::TextDeleted;
            }
            Key::Enter => {
                self.delete_selection()?;
                let pos = self.cursor.position();
                self.lines.insert_char(pos.line, pos.column, '\n')?;
                self.cursor.set(Position::new(pos.line + 1, 0));
                hint = PanHint::TextInserted;
            }
            _ => {}
        }

        if let Some(shortcut) = ctx.shortcuts.resolve(key) {
            hint = self.apply_shortcut(shortcut, ctx)?.unwrap_or(hint);
        }

        self.update_hpan(ctx, hint)?;
        self.update_vpan(ctx)?;
        self.notify_if_moved(before, ctx);
        self.request_redraw(ctx);
        Ok(EventState::Captured)
    }

    fn apply_shortcut(
        &mut self,
        shortcut: Shortcut,
        ctx: &mut EventContext<'_>,
    ) -> Result<Option<PanHint>> {
        match shortcut {
            Shortcut::Copy => {
                if let Some(selected) = self.selected_text()? {
                    ctx.clipboard.set_text(&selected)?;
                }
                Ok(None)
            }
            Shortcut::Cut => {
                if let Some(selected) = self.selected_text()? {
                    ctx.clipboard.set_text(&selected)?;
                }
                self.delete_selection()?;
                self.cursor.clear_desired_column();
                Ok(Some(PanHint::TextDeleted))
            }
            Shortcut::Paste => {
                let Some(pasted) = ctx.clipboard.get_text() else {
                    tracing::warn!("Paste ignored: {}", EditError::ClipboardUnavailable);
                    return Ok(None);
                };
                let pasted = self.config.style.restriction.filter(&pasted, true);
                self.delete_selection()?;
                let pos = self.cursor.position();
                let end = self.lines.insert_text(pos.line, pos.column, &pasted)?;
                self.cursor.set(end);
                Ok(Some(PanHint::TextReplaced))
            }
            Shortcut::SelectAll => {
                if self.lines.line_count() == 1 && self.lines.is_empty() {
                    return Ok(None);
                }
                let end = self.lines.end_position();
                self.selection.select(Position::zero(), end);
                self.cursor.set(end);
                Ok(Some(PanHint::MovedForward))
            }
        }
    }
}

impl Element for TextEdit {
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
                self.last_mouse = Some((*x, *y));
                self.on_mouse_down(*x, *y, *modifiers, ctx)
            }
            InputEvent::MouseUp { x, y } => {
                self.last_mouse = Some((*x, *y));
                if self.has_focus {
                    self.click_held = false;
                    Ok(EventState::Captured)
                } else {
                    Ok(EventState::NotCaptured)
                }
            }
            InputEvent::MouseMove { x, y } => {
                self.last_mouse = Some((*x, *y));
                self.on_mouse_move(*x, *y, ctx)
            }
            InputEvent::MouseWheel { dy, .. } => self.on_mouse_wheel(*dy, ctx),
            InputEvent::TextInput { text } => self.on_text_input(text, ctx),
            InputEvent::KeyDown(key) => self.on_key_down(key, ctx),
        };

        match result {
            Ok(state) => {
                if let Some(change) = before.diff(&self.caret_snapshot()) {
                    tracing::debug!(target: "cursor", "TextEdit {}", change);
                }
                state
            }
            Err(e) => {
                tracing::error!("TextEdit failed to handle {:?}: {}", event, e);
                EventState::Captured
            }
        }
    }

    fn defocus(&mut self, ctx: &mut EventContext<'_>) {
        ctx.window.stop_text_input();
        self.selection.clear();
        self.cursor.clear_desired_column();
        self.click_held = false;
        self.clicks.reset();
        self.has_focus = false;
        self.request_redraw(ctx);
    }
}
