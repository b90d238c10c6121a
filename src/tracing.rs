//! Tracing setup for diagnosing caret, selection and pan transitions
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=cursor=trace,selection=debug` - scoped filtering
//! - `RUST_LOG=neuik::editable::pan=debug` - module-level filtering
//!
//! # Log Files
//!
//! When a log directory is given, logs are also written to `neuik.log` in it
//! with daily rotation, at debug level.

use std::path::Path;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the tracing subscriber with console and optional file logging
///
/// Console output respects RUST_LOG (default `warn`). File logging is skipped
/// when `log_dir` is `None` or cannot be created.
pub fn init(log_dir: Option<&Path>) {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = log_dir.and_then(|dir| match std::fs::create_dir_all(dir) {
        Ok(()) => {
            let file_appender = tracing_appender::rolling::daily(dir, "neuik.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    });

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of caret, selection and pan state for diffing.
///
/// Single-line widgets report everything on line 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaretSnapshot {
    /// `(line, column)`
    pub caret: (usize, usize),
    pub selection: Option<((usize, usize), (usize, usize))>,
    pub pan_line: usize,
    pub pan_pixels: i32,
    /// Text length in chars
    pub length: usize,
}

impl CaretSnapshot {
    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &CaretSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.caret != other.caret {
            changes.push(format!(
                "caret ({},{}) → ({},{})",
                self.caret.0, self.caret.1, other.caret.0, other.caret.1
            ));
        }
        if self.selection != other.selection {
            match other.selection {
                Some(((l0, c0), (l1, c1))) => {
                    changes.push(format!("selection ({},{})-({},{})", l0, c0, l1, c1))
                }
                None => changes.push("selection cleared".to_string()),
            }
        }
        if self.pan_line != other.pan_line || self.pan_pixels != other.pan_pixels {
            changes.push(format!(
                "pan {}+{}px → {}+{}px",
                self.pan_line, self.pan_pixels, other.pan_line, other.pan_pixels
            ));
        }
        if self.length != other.length {
            changes.push(format!("length {} → {}", self.length, other.length));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(caret: (usize, usize)) -> CaretSnapshot {
        CaretSnapshot {
            caret,
            selection: None,
            pan_line: 0,
            pan_pixels: 0,
            length: 5,
        }
    }

    #[test]
    fn test_identical_snapshots_have_no_diff() {
        assert_eq!(snapshot((0, 1)).diff(&snapshot((0, 1))), None);
    }

    #[test]
    fn test_diff_reports_caret_and_selection() {
        let before = snapshot((0, 1));
        let mut after = snapshot((1, 2));
        after.selection = Some(((0, 1), (1, 2)));
        assert_eq!(
            before.diff(&after).as_deref(),
            Some("caret (0,1) → (1,2); selection (0,1)-(1,2)")
        );
        assert_eq!(
            after.diff(&before).as_deref(),
            Some("caret (1,2) → (0,1); selection cleared")
        );
    }
}
