//! Viewport panning that keeps the caret visible.
//!
//! `HorizontalPan` is the single-line form: a pixel offset subtracted from the
//! text draw position. `VerticalPan` is the multi-line form: the first visible
//! line plus a sub-line pixel offset, moved in fixed quanta by the mouse wheel.

/// Pixels scrolled per wheel notch
pub const SCROLL_QUANTUM_PX: i32 = 50;

/// Line pitch of a multi-line field, as a multiple of the font line height
pub const LINE_PITCH: f64 = 1.1;

/// Smallest scrollbar thumb, in percent of the track
pub const MIN_VIEW_PCT: f64 = 5.0;

/// Pixel pitch of one line for a font of `line_height` pixels
pub fn line_pitch(line_height: i32) -> i32 {
    (LINE_PITCH * f64::from(line_height)) as i32
}

/// What caused the caret or text to change, steering how the pan reacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanHint {
    #[default]
    None,
    MovedBack,
    MovedForward,
    TextInserted,
    TextDeleted,
    /// Text was both removed and added (paste over a selection)
    TextReplaced,
}

/// Horizontal pixel pan of a single line of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HorizontalPan {
    pixels: i32,
}

impl HorizontalPan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pixels(&self) -> i32 {
        self.pixels
    }

    pub fn reset(&mut self) {
        self.pixels = 0;
    }

    /// Recompute the pan after a caret move or edit.
    ///
    /// `caret_x` is the pixel width of the text before the caret, `text_w` the
    /// full text width and `viewport_w` the visible width. With `at_end` set
    /// the end of the text is pinned flush against the right edge.
    pub fn update(
        &mut self,
        caret_x: i32,
        text_w: i32,
        viewport_w: i32,
        at_end: bool,
        hint: PanHint,
    ) -> i32 {
        if text_w < viewport_w {
            self.pixels = 0;
            return self.pixels;
        }

        if at_end {
            self.pixels = text_w - viewport_w;
        }

        let back = |pan: &mut i32| {
            if caret_x < *pan {
                *pan = caret_x;
            }
        };
        let forward = |pan: &mut i32| {
            if caret_x > *pan + viewport_w {
                *pan = (1 + caret_x) - viewport_w;
            }
        };
        let deleted = |pan: &mut i32| {
            if text_w - *pan < viewport_w {
                *pan = text_w - viewport_w;
            }
        };

        match hint {
            PanHint::None => {}
            PanHint::MovedBack => back(&mut self.pixels),
            PanHint::MovedForward | PanHint::TextInserted => forward(&mut self.pixels),
            PanHint::TextDeleted => deleted(&mut self.pixels),
            PanHint::TextReplaced => {
                deleted(&mut self.pixels);
                back(&mut self.pixels);
                forward(&mut self.pixels);
            }
        }

        tracing::debug!(caret_x, text_w, viewport_w, ?hint, pan = self.pixels, "horizontal pan");
        self.pixels
    }
}

/// Vertical pan of a multi-line field: first visible line and pixels scrolled into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerticalPan {
    pub line: usize,
    pub pixels: i32,
}

impl VerticalPan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.line = 0;
        self.pixels = 0;
    }

    /// Scroll towards the top by one quantum; stops at `(0, 0)`
    pub fn scroll_up(&mut self, pitch: i32) {
        if self.pixels >= SCROLL_QUANTUM_PX {
            self.pixels -= SCROLL_QUANTUM_PX;
            return;
        }
        loop {
            if self.line == 0 {
                self.pixels = 0;
                break;
            }
            self.line -= 1;
            self.pixels += pitch;
            if self.pixels >= SCROLL_QUANTUM_PX {
                self.pixels -= SCROLL_QUANTUM_PX;
                break;
            }
        }
    }

    /// Scroll towards the bottom by one quantum; never past the last line
    pub fn scroll_down(&mut self, pitch: i32, line_count: usize) {
        self.pixels += SCROLL_QUANTUM_PX;
        if pitch > 0 && self.pixels >= pitch {
            self.line += (self.pixels / pitch) as usize;
            self.pixels %= pitch;
        }
        if self.line + 1 > line_count {
            self.line = line_count.saturating_sub(1);
            self.pixels = 0;
        }
    }

    /// Force the pan to the top when every line fits in `viewport_h`
    pub fn clamp_to_content(&mut self, pitch: i32, line_count: usize, viewport_h: i32) {
        let content_h = line_count as i64 * i64::from(pitch);
        if content_h <= i64::from(viewport_h) {
            self.reset();
        }
    }

    /// Move the pan just far enough that `line` lies inside `viewport_h`.
    ///
    /// A line above the first visible one becomes the first line. A line whose
    /// bottom edge falls below the viewport is brought up until that edge
    /// touches the bottom, but never so far that its top edge leaves the view.
    pub fn reveal_line(&mut self, line: usize, pitch: i32, viewport_h: i32) -> bool {
        if pitch <= 0 {
            return false;
        }
        let before = *self;
        if line < self.line {
            self.line = line;
            self.pixels = 0;
        } else {
            let pitch = i64::from(pitch);
            let offset = self.line as i64 * pitch + i64::from(self.pixels);
            let bottom = (line as i64 + 1) * pitch;
            if bottom - offset > i64::from(viewport_h) {
                let target = (bottom - i64::from(viewport_h)).min(line as i64 * pitch);
                self.line = (target / pitch) as usize;
                self.pixels = (target % pitch) as i32;
            }
        }
        if before != *self {
            tracing::debug!(line, pan_line = self.line, pixels = self.pixels, "reveal line");
        }
        before != *self
    }

    /// Apply one wheel notch in direction `dy` (positive scrolls up)
    pub fn scroll(&mut self, dy: i32, pitch: i32, line_count: usize, viewport_h: i32) -> bool {
        let before = *self;
        match dy.signum() {
            1 => self.scroll_up(pitch),
            -1 => self.scroll_down(pitch, line_count),
            _ => return false,
        }
        self.clamp_to_content(pitch, line_count, viewport_h);
        tracing::debug!(dy, line = self.line, pixels = self.pixels, "vertical pan");
        before != *self
    }
}

/// Scrollbar thumb placement reported to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollbarGeometry {
    /// Thumb position, percent of the scrollable range
    pub scroll_pct: f64,
    /// Thumb size, percent of the track (never below `MIN_VIEW_PCT`)
    pub view_pct: f64,
    /// False when all content fits and no scrollbar should be drawn
    pub visible: bool,
}

impl ScrollbarGeometry {
    pub fn compute(pan: VerticalPan, line_count: usize, pitch: i32, viewport_h: i32) -> Self {
        let lines = line_count.max(1) as f64;
        let pitch = f64::from(pitch.max(1));

        let scroll_pct = if pan.line + 1 == line_count {
            100.0
        } else {
            100.0 * (pan.line as f64 + f64::from(pan.pixels) / pitch) / lines
        };

        let view_pct = (100.0 * (f64::from(viewport_h) / pitch) / lines).max(MIN_VIEW_PCT);

        Self {
            scroll_pct,
            view_pct,
            visible: view_pct < 100.0,
        }
    }

    /// Thumb `(offset, height)` in pixels within a track of `track_h` pixels
    pub fn thumb(&self, track_h: i32) -> (i32, i32) {
        let view_frac = self.view_pct / 100.0;
        let thumb_h = (view_frac * f64::from(track_h)) as i32;
        let travel = track_h - thumb_h;
        let offset = (f64::from(travel) * self.scroll_pct / 100.0) as i32;
        (offset, thumb_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_never_pans() {
        let mut pan = HorizontalPan::new();
        pan.update(90, 120, 50, true, PanHint::MovedForward);
        assert_eq!(pan.pixels(), 70);
        pan.update(10, 40, 50, false, PanHint::TextDeleted);
        assert_eq!(pan.pixels(), 0);
    }

    #[test]
    fn test_end_of_text_is_flush_right() {
        let mut pan = HorizontalPan::new();
        assert_eq!(pan.update(119, 120, 50, true, PanHint::None), 70);
    }

    #[test]
    fn test_move_back_reveals_caret() {
        let mut pan = HorizontalPan::new();
        pan.update(119, 120, 50, true, PanHint::None);
        assert_eq!(pan.update(30, 120, 50, false, PanHint::MovedBack), 30);
        // Caret still visible: no change
        assert_eq!(pan.update(60, 120, 50, false, PanHint::MovedBack), 30);
    }

    #[test]
    fn test_move_forward_reveals_caret() {
        let mut pan = HorizontalPan::new();
        assert_eq!(pan.update(80, 120, 50, false, PanHint::MovedForward), 31);
    }

    #[test]
    fn test_delete_snaps_trailing_gap() {
        let mut pan = HorizontalPan::new();
        pan.update(149, 150, 50, true, PanHint::None);
        assert_eq!(pan.pixels(), 100);
        assert_eq!(pan.update(60, 120, 50, false, PanHint::TextDeleted), 70);
    }

    #[test]
    fn test_scroll_down_carries_into_lines() {
        let mut pan = VerticalPan::new();
        pan.scroll_down(22, 100);
        assert_eq!((pan.line, pan.pixels), (2, 6));
        pan.scroll_down(22, 100);
        assert_eq!((pan.line, pan.pixels), (4, 12));
    }

    #[test]
    fn test_scroll_down_stops_at_last_line() {
        let mut pan = VerticalPan { line: 3, pixels: 10 };
        pan.scroll_down(22, 4);
        assert_eq!((pan.line, pan.pixels), (3, 0));
    }

    #[test]
    fn test_scroll_up_returns_to_top() {
        let mut pan = VerticalPan::new();
        pan.scroll_down(22, 100);
        pan.scroll_down(22, 100);
        assert_eq!((pan.line, pan.pixels), (4, 12));
        pan.scroll_up(22);
        assert_eq!((pan.line, pan.pixels), (2, 6));
        pan.scroll_up(22);
        assert_eq!((pan.line, pan.pixels), (0, 0));
        pan.scroll_up(22);
        assert_eq!((pan.line, pan.pixels), (0, 0));
    }

    #[test]
    fn test_scroll_up_at_top_with_large_offset() {
        let mut pan = VerticalPan { line: 0, pixels: 60 };
        pan.scroll_up(80);
        assert_eq!((pan.line, pan.pixels), (0, 10));
    }

    #[test]
    fn test_content_that_fits_never_scrolls() {
        let mut pan = VerticalPan::new();
        assert!(!pan.scroll(-1, 22, 3, 200));
        assert_eq!(pan, VerticalPan::new());
    }

    #[test]
    fn test_content_exactly_filling_viewport_is_unpanned() {
        let mut pan = VerticalPan { line: 1, pixels: 4 };
        pan.clamp_to_content(22, 4, 88);
        assert_eq!(pan, VerticalPan::new());

        let mut pan = VerticalPan { line: 1, pixels: 4 };
        pan.clamp_to_content(22, 5, 88);
        assert_eq!(pan, VerticalPan { line: 1, pixels: 4 });
    }

    #[test]
    fn test_reveal_line_below_viewport() {
        let mut pan = VerticalPan::new();
        // Lines 0..=3 fit in 98px; line 4 ends at 110
        assert!(!pan.reveal_line(3, 22, 98));
        assert!(pan.reveal_line(4, 22, 98));
        assert_eq!(pan, VerticalPan { line: 0, pixels: 12 });
        assert!(pan.reveal_line(12, 22, 98));
        assert_eq!(pan, VerticalPan { line: 8, pixels: 12 });
    }

    #[test]
    fn test_reveal_line_above_viewport() {
        let mut pan = VerticalPan { line: 8, pixels: 12 };
        // Cropped first line still counts as visible
        assert!(!pan.reveal_line(8, 22, 98));
        assert!(pan.reveal_line(5, 22, 98));
        assert_eq!(pan, VerticalPan { line: 5, pixels: 0 });
    }

    #[test]
    fn test_reveal_line_taller_than_viewport() {
        let mut pan = VerticalPan::new();
        pan.reveal_line(3, 22, 10);
        assert_eq!(pan, VerticalPan { line: 3, pixels: 0 });
        assert!(!pan.reveal_line(3, 0, 10));
    }

    #[test]
    fn test_scrollbar_geometry() {
        let geom = ScrollbarGeometry::compute(VerticalPan::new(), 100, 20, 100);
        assert_eq!(geom.scroll_pct, 0.0);
        assert_eq!(geom.view_pct, 5.0);
        assert!(geom.visible);

        let geom = ScrollbarGeometry::compute(VerticalPan::new(), 2, 20, 100);
        assert!(!geom.visible);

        let geom = ScrollbarGeometry::compute(VerticalPan { line: 9, pixels: 0 }, 10, 20, 40);
        assert_eq!(geom.scroll_pct, 100.0);
        assert_eq!(geom.view_pct, 20.0);
        assert_eq!(geom.thumb(100), (80, 20));
    }

    #[test]
    fn test_line_pitch() {
        assert_eq!(line_pitch(20), 22);
        assert_eq!(line_pitch(0), 0);
    }
}
