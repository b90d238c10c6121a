//! Command-line argument parsing for `neuik-replay`
//!
//! Supports:
//! - Replaying a YAML or JSON event script
//! - Overriding the widget config file
//! - Monospace or TrueType glyph metrics, with optional styled faces
//! - JSON or YAML report output

use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

use crate::metrics::FaceStyle;

/// Replay input event scripts against the text widgets
#[derive(Parser, Debug)]
#[command(
    name = "neuik-replay",
    version,
    about = "Replay input event scripts against NEUIK text widgets"
)]
pub struct CliArgs {
    /// Event script to replay (.yaml or .json)
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Widget config file (defaults to the user config, then built-in defaults)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Measure text with this TrueType/OpenType font instead of fixed-width metrics
    #[arg(long, value_name = "FONT")]
    pub font: Option<PathBuf>,

    /// Bold face for `--font`
    #[arg(long, value_name = "FONT", requires = "font")]
    pub bold_font: Option<PathBuf>,

    /// Italic face for `--font`
    #[arg(long, value_name = "FONT", requires = "font")]
    pub italic_font: Option<PathBuf>,

    /// Bold italic face for `--font`
    #[arg(long, value_name = "FONT", requires = "font")]
    pub bold_italic_font: Option<PathBuf>,

    /// Monospace face for `--font`
    #[arg(long, value_name = "FONT", requires = "font")]
    pub mono_font: Option<PathBuf>,

    /// Glyph advance in pixels for fixed-width metrics
    #[arg(long, value_name = "PX", default_value_t = 10)]
    pub advance: i32,

    /// Line height in pixels for fixed-width metrics
    #[arg(long, value_name = "PX", default_value_t = 20)]
    pub line_height: i32,

    /// Also write debug logs to this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Also write debug logs to the platform log directory
    #[arg(long, conflicts_with = "log_dir")]
    pub log: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl CliArgs {
    /// Directory for the debug log file, if file logging was requested
    pub fn log_dir(&self) -> Option<PathBuf> {
        if self.log {
            crate::config_paths::log_dir()
        } else {
            self.log_dir.clone()
        }
    }

    /// Styled faces given on the command line, in load order
    pub fn extra_faces(&self) -> Vec<(FaceStyle, &Path)> {
        [
            (FaceStyle::Bold, &self.bold_font),
            (FaceStyle::Italic, &self.italic_font),
            (FaceStyle::BoldItalic, &self.bold_italic_font),
            (FaceStyle::Mono, &self.mono_font),
        ]
        .into_iter()
        .filter_map(|(style, path)| path.as_deref().map(|p| (style, p)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let args = CliArgs::try_parse_from(["neuik-replay", "script.yaml"]).unwrap();
        assert_eq!(args.script, PathBuf::from("script.yaml"));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.advance, 10);
        assert!(args.font.is_none());
    }

    #[test]
    fn test_parse_options() {
        let args = CliArgs::try_parse_from([
            "neuik-replay",
            "s.json",
            "--format",
            "yaml",
            "--advance",
            "7",
            "--config",
            "widgets.yaml",
        ])
        .unwrap();
        assert_eq!(args.format, OutputFormat::Yaml);
        assert_eq!(args.advance, 7);
        assert_eq!(args.config, Some(PathBuf::from("widgets.yaml")));
    }

    #[test]
    fn test_log_flags_conflict() {
        let args = CliArgs::try_parse_from(["neuik-replay", "s.yaml", "--log-dir", "/tmp/logs"])
            .unwrap();
        assert_eq!(args.log_dir(), Some(PathBuf::from("/tmp/logs")));
        assert!(CliArgs::try_parse_from([
            "neuik-replay",
            "s.yaml",
            "--log",
            "--log-dir",
            "/tmp/logs"
        ])
        .is_err());
    }

    #[test]
    fn test_styled_faces() {
        let args = CliArgs::try_parse_from([
            "neuik-replay",
            "s.yaml",
            "--font",
            "Regular.ttf",
            "--mono-font",
            "Mono.ttf",
            "--bold-font",
            "Bold.ttf",
        ])
        .unwrap();
        assert_eq!(
            args.extra_faces(),
            vec![
                (FaceStyle::Bold, Path::new("Bold.ttf")),
                (FaceStyle::Mono, Path::new("Mono.ttf")),
            ]
        );
        assert!(CliArgs::try_parse_from(["neuik-replay", "s.yaml"])
            .unwrap()
            .extra_faces()
            .is_empty());
    }

    #[test]
    fn test_styled_face_requires_font() {
        assert!(
            CliArgs::try_parse_from(["neuik-replay", "s.yaml", "--italic-font", "I.ttf"]).is_err()
        );
    }

    #[test]
    fn test_script_is_required() {
        assert!(CliArgs::try_parse_from(["neuik-replay"]).is_err());
    }
}
