//! Scripted event replay.
//!
//! A script names a widget, its bounds and initial text, then lists input
//! events to feed it. Replaying drives the widget headlessly with an in-memory
//! clipboard and a recording window, and reports the final widget state.
//!
//! ```yaml
//! widget: text_edit
//! bounds: { x: 0, y: 0, w: 212, h: 100 }
//! text: "hello world"
//! steps:
//!   - event: { type: mouse_down, x: 10, y: 10 }
//!   - event: { type: key_down, key: end }
//!   - event: { type: text_input, text: "!" }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::clipboard::MemoryClipboard;
use crate::config::WidgetConfig;
use crate::element::{Callback, Element, EventContext, Rect, RecordingWindow};
use crate::input::{InputEvent, Modifiers, ShortcutMap};
use crate::metrics::GlyphMetrics;
use crate::widgets::{AnyElement, TextEdit, TextEditSnapshot, TextEntry, TextEntrySnapshot};

/// Time between steps that carry no explicit timestamp. Long enough that
/// consecutive clicks never count as a double click.
pub const STEP_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    TextEntry,
    TextEdit,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReplayStep {
    /// Event time in milliseconds; defaults to the previous step plus `STEP_INTERVAL_MS`
    #[serde(default)]
    pub at_ms: Option<u64>,
    /// Drop focus instead of sending an event
    #[serde(default)]
    pub defocus: bool,
    #[serde(default)]
    pub event: Option<InputEvent>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReplayScript {
    pub widget: WidgetKind,
    #[serde(default = "default_bounds")]
    pub bounds: Rect,
    #[serde(default)]
    pub text: String,
    /// Initial clipboard contents
    #[serde(default)]
    pub clipboard: Option<String>,
    #[serde(default)]
    pub steps: Vec<ReplayStep>,
}

fn default_bounds() -> Rect {
    Rect::new(0, 0, 212, 100)
}

impl ReplayScript {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        serde_yaml::from_str(s).context("Failed to parse YAML replay script")
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("Failed to parse JSON replay script")
    }

    /// Load a script; `.json` files are parsed as JSON, everything else as YAML
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let script = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        };
        script.with_context(|| format!("Invalid script {}", path.display()))
    }

    fn build_widget(&self, config: &WidgetConfig) -> AnyElement {
        let mut widget: AnyElement = match self.widget {
            WidgetKind::TextEntry => {
                TextEntry::with_text(config.text_entry.clone(), &self.text).into()
            }
            WidgetKind::TextEdit => TextEdit::with_text(config.text_edit.clone(), &self.text).into(),
        };
        widget.set_bounds(self.bounds);
        widget
    }

    /// Run every step against a fresh widget and report the result
    pub fn run(&self, config: &WidgetConfig, metrics: &dyn GlyphMetrics) -> ReplayReport {
        let mut widget = self.build_widget(config);
        let mut clipboard = self
            .clipboard
            .as_deref()
            .map(MemoryClipboard::with_text)
            .unwrap_or_default();
        let mut window = RecordingWindow::new();
        let mut captured = 0;
        let mut now_ms = 0;

        for (i, step) in self.steps.iter().enumerate() {
            now_ms = step.at_ms.unwrap_or(now_ms + STEP_INTERVAL_MS);
            let mut ctx = EventContext::new(metrics, &mut clipboard, &mut window)
                .with_shortcuts(ShortcutMap::with_command(Modifiers::CTRL))
                .at(now_ms);

            if step.defocus {
                widget.defocus(&mut ctx);
            }
            if let Some(event) = &step.event {
                let state = widget.capture_event(event, &mut ctx);
                tracing::debug!(step = i, now_ms, ?state, "replayed {:?}", event);
                if state.is_captured() {
                    captured += 1;
                }
            }
        }

        ReplayReport {
            state: WidgetState::from(&widget),
            callbacks: window.callbacks,
            redraws: window.redraws.len(),
            captured,
            clipboard: clipboard.contents().map(str::to_string),
        }
    }
}

/// Final widget state, tagged by widget kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum WidgetState {
    TextEntry(TextEntrySnapshot),
    TextEdit(TextEditSnapshot),
}

impl From<&AnyElement> for WidgetState {
    fn from(widget: &AnyElement) -> Self {
        match widget {
            AnyElement::TextEntry(e) => WidgetState::TextEntry(e.snapshot()),
            AnyElement::TextEdit(e) => WidgetState::TextEdit(e.snapshot()),
        }
    }
}

/// Outcome of a replay
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub state: WidgetState,
    pub callbacks: Vec<Callback>,
    /// Number of redraw requests
    pub redraws: usize,
    /// Number of events the widget captured
    pub captured: usize,
    pub clipboard: Option<String>,
}

impl ReplayReport {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize replay report")
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize replay report")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MonospaceMetrics;

    const SCRIPT: &str = r#"
widget: text_entry
bounds: { x: 0, y: 0, w: 200, h: 30 }
text: hello
steps:
  - event: { type: mouse_down, x: 5, y: 5 }
  - event: { type: key_down, key: end }
  - event: { type: text_input, text: " world" }
  - event: { type: key_down, key: a, modifiers: [ctrl] }
  - event: { type: key_down, key: c, modifiers: [ctrl] }
"#;

    #[test]
    fn test_parse_and_run_entry_script() {
        let script = ReplayScript::from_yaml_str(SCRIPT).unwrap();
        assert_eq!(script.widget, WidgetKind::TextEntry);
        assert_eq!(script.steps.len(), 5);

        let report = script.run(&WidgetConfig::default(), &MonospaceMetrics::default());
        let WidgetState::TextEntry(state) = &report.state else {
            panic!("expected a text entry");
        };
        assert_eq!(state.text, "hello world");
        assert_eq!(state.selection, Some((0, 11)));
        assert_eq!(report.clipboard.as_deref(), Some("hello world"));
        assert_eq!(report.captured, 5);
    }

    #[test]
    fn test_json_script_with_timestamps() {
        let json = r#"{
            "widget": "text_edit",
            "text": "hello world",
            "steps": [
                {"at_ms": 1000, "event": {"type": "mouse_down", "x": 26, "y": 10}},
                {"at_ms": 1500, "event": {"type": "mouse_down", "x": 26, "y": 10}},
                {"at_ms": 1600, "event": {"type": "mouse_down", "x": 26, "y": 10}}
            ]
        }"#;
        let script = ReplayScript::from_json_str(json).unwrap();
        let report = script.run(&WidgetConfig::default(), &MonospaceMetrics::default());
        let WidgetState::TextEdit(state) = &report.state else {
            panic!("expected a text edit");
        };
        assert_eq!(state.selection, Some(((0, 0), (0, 5))));
        assert_eq!(report.callbacks.first(), Some(&Callback::Click));
    }

    #[test]
    fn test_defocus_step() {
        let yaml = r#"
widget: text_edit
text: abc
steps:
  - event: { type: mouse_down, x: 10, y: 10 }
  - defocus: true
"#;
        let report = ReplayScript::from_yaml_str(yaml)
            .unwrap()
            .run(&WidgetConfig::default(), &MonospaceMetrics::default());
        let WidgetState::TextEdit(state) = &report.state else {
            panic!("expected a text edit");
        };
        assert!(!state.has_focus);
    }

    #[test]
    fn test_report_serializes_widget_tag() {
        let script = ReplayScript::from_yaml_str("widget: text_entry\ntext: x\n").unwrap();
        let report = script.run(&WidgetConfig::default(), &MonospaceMetrics::default());
        let json = report.to_json().unwrap();
        assert!(json.contains("\"widget\": \"text_entry\""));
        assert!(report.to_yaml().unwrap().contains("widget: text_entry"));
    }
}
