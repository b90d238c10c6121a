//! Click-count tracking for double and triple click gestures.

/// Maximum gap between two clicks of a double click, in milliseconds.
/// A triple click must land within twice this of the click two before it.
pub const DOUBLE_CLICK_TIMEOUT_MS: u64 = 200;

/// How a mouse-down relates to the clicks before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    Single,
    Double,
    Triple,
}

/// Timestamps of the last two recorded clicks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickTracker {
    last_click_ms: Option<u64>,
    second_to_last_ms: Option<u64>,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a click at `now_ms` without recording it
    pub fn classify(&self, now_ms: u64) -> ClickKind {
        let within = |t: Option<u64>, limit: u64| {
            t.is_some_and(|t| now_ms.saturating_sub(t) < limit)
        };

        if within(self.second_to_last_ms, 2 * DOUBLE_CLICK_TIMEOUT_MS) {
            ClickKind::Triple
        } else if within(self.last_click_ms, DOUBLE_CLICK_TIMEOUT_MS) {
            ClickKind::Double
        } else {
            ClickKind::Single
        }
    }

    /// True when `now_ms` follows the last click closely enough to be its second half
    pub fn is_double(&self, now_ms: u64) -> bool {
        self.last_click_ms
            .is_some_and(|t| now_ms.saturating_sub(t) < DOUBLE_CLICK_TIMEOUT_MS)
    }

    /// Record a click at `now_ms`, shifting the previous one back
    pub fn record(&mut self, now_ms: u64) {
        self.second_to_last_ms = self.last_click_ms;
        self.last_click_ms = Some(now_ms);
    }

    /// Forget recorded clicks (e.g. on defocus)
    pub fn reset(&mut self) {
        self.last_click_ms = None;
        self.second_to_last_ms = None;
    }

    pub fn last_click_ms(&self) -> Option<u64> {
        self.last_click_ms
    }
}
