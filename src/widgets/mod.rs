//! Text widgets: single-line `TextEntry` and multi-line `TextEdit`.
//!
//! Both widgets are event-driven state machines. The host window calls
//! [`Element::capture_event`] for every input event; the widget updates its
//! text, caret, selection and pan, then asks the window for a redraw. The
//! renderer reads the resulting state back through the widget accessors.

mod text_edit;
mod text_entry;

pub use text_edit::{TextEdit, TextEditSnapshot};
pub use text_entry::{TextEntry, TextEntrySnapshot};

use crate::config::HJustify;
use crate::element::{Element, EventContext, EventState, Rect, RenderSize};
use crate::error::Result;
use crate::input::InputEvent;
use crate::metrics::{FontSpec, GlyphMetrics};

/// Horizontal padding between the field border and its text
pub(crate) const TEXT_PADDING: i32 = 6;

/// Width available to text inside a field of width `field_w`
pub(crate) fn viewport_width(field_w: i32) -> i32 {
    field_w - 2 * TEXT_PADDING
}

/// X offset of the text inside the field, relative to the field's left edge.
///
/// Justification only applies while the text is narrower than the viewport;
/// wider text is always drawn from the left padding.
pub(crate) fn text_origin_x(justify: HJustify, field_w: i32, text_w: i32) -> i32 {
    if text_w >= viewport_width(field_w) {
        return TEXT_PADDING;
    }
    match justify {
        HJustify::Left => TEXT_PADDING,
        HJustify::Center => ((field_w - text_w) as f32 / 2.0) as i32,
        HJustify::Right => field_w - text_w - TEXT_PADDING,
    }
}

/// Byte offset of the char at `column` (or the end of `text`)
pub(crate) fn byte_offset(text: &str, column: usize) -> usize {
    text.char_indices()
        .nth(column)
        .map_or(text.len(), |(byte, _)| byte)
}

/// A single line of text laid out inside a field, for pointer hit-testing
pub(crate) struct LineHit<'a> {
    pub metrics: &'a dyn GlyphMetrics,
    pub font: &'a FontSpec,
    pub text: &'a str,
    pub bounds: Rect,
    pub justify: HJustify,
    pub pan: i32,
}

impl LineHit<'_> {
    /// Caret column closest to window x coordinate `x`.
    ///
    /// Columns are found by measuring successive prefixes; a click lands after
    /// a character once it passes the first two thirds of that character.
    pub fn column_at(&self, x: i32) -> Result<usize> {
        let len = self.text.chars().count();
        if len == 0 {
            return Ok(0);
        }

        let text_w = self.metrics.width(self.font, self.text)?;
        let left = self.bounds.x + text_origin_x(self.justify, self.bounds.w, text_w);

        if self.pan == 0 && x <= left {
            return Ok(0);
        }
        if x >= left + text_w {
            return Ok(len);
        }

        let rel = x + self.pan - left;
        if len == 1 {
            return Ok(if rel <= text_w / 2 { 0 } else { 1 });
        }

        let mut last_w = 0;
        let ends = self.text.char_indices().map(|(i, ch)| i + ch.len_utf8());
        for (ctr, end) in (1..).zip(ends) {
            let w = self.metrics.width(self.font, &self.text[..end])?;
            tracing::trace!(target: "cursor", ctr, w, rel, "hit test");
            if rel <= w {
                let char_w = w - last_w;
                return Ok(if rel <= w - char_w / 3 { ctr - 1 } else { ctr });
            }
            last_w = w;
        }
        Ok(len)
    }
}

/// Minimum size shared by both widgets: one space plus the em width, and
/// one and a half lines of text plus the border.
pub(crate) fn field_min_size(
    metrics: &dyn GlyphMetrics,
    font: &FontSpec,
    em_width: i32,
) -> Result<RenderSize> {
    let space = metrics.width(font, " ")?;
    let line_h = metrics.line_height(font)?;
    Ok(RenderSize {
        w: space + em_width,
        h: 2 + (1.5 * line_h as f32) as i32,
    })
}

/// Closed set of text widgets, dispatched statically
pub enum AnyElement {
    TextEntry(TextEntry),
    TextEdit(TextEdit),
}

impl From<TextEntry> for AnyElement {
    fn from(entry: TextEntry) -> Self {
        AnyElement::TextEntry(entry)
    }
}

impl From<TextEdit> for AnyElement {
    fn from(edit: TextEdit) -> Self {
        AnyElement::TextEdit(edit)
    }
}

impl AnyElement {
    fn inner(&self) -> &dyn Element {
        match self {
            AnyElement::TextEntry(e) => e as &dyn Element,
            AnyElement::TextEdit(e) => e as &dyn Element,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Element {
        match self {
            AnyElement::TextEntry(e) => e as &mut dyn Element,
            AnyElement::TextEdit(e) => e as &mut dyn Element,
        }
    }

    /// Current text, with `\n` between lines for a `TextEdit`
    pub fn text(&self) -> String {
        match self {
            AnyElement::TextEntry(e) => e.text().to_string(),
            AnyElement::TextEdit(e) => e.text(),
        }
    }

    pub fn set_text(&mut self, text: &str) {
        match self {
            AnyElement::TextEntry(e) => e.set_text(text),
            AnyElement::TextEdit(e) => e.set_text(text),
        }
    }
}

impl Element for AnyElement {
    fn min_size(&self, metrics: &dyn GlyphMetrics) -> Result<RenderSize> {
        self.inner().min_size(metrics)
    }

    fn bounds(&self) -> Rect {
        self.inner().bounds()
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.inner_mut().set_bounds(bounds)
    }

    fn has_focus(&self) -> bool {
        self.inner().has_focus()
    }

    fn capture_event(&mut self, event: &InputEvent, ctx: &mut EventContext<'_>) -> EventState {
        self.inner_mut().capture_event(event, ctx)
    }

    fn defocus(&mut self, ctx: &mut EventContext<'_>) {
        self.inner_mut().defocus(ctx)
    }
}
