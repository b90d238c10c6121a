//! Widget configuration: fonts, colors, justification and input restrictions.
//!
//! Configs are plain structs built once at startup and handed to each widget
//! constructor. They can also be read from `~/.config/neuik/widgets.yaml`:
//!
//! ```yaml
//! text_entry:
//!   font_size: 13
//!   text_h_justify: center
//!   restriction: { kind: numeric }
//! text_edit:
//!   font_mono: true
//!   bg_color: "#202020"
//! ```

use std::fmt;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{EditError, Result};
use crate::metrics::FontSpec;

/// RGBA color (0-255 per channel), serialized as `#RRGGBB` or `#RRGGBBAA`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const LIGHT_BLACK: Color = Color::rgb(28, 28, 30);
    pub const LIGHT_BLUE: Color = Color::rgb(166, 203, 255);
    pub const DARK_BLUE: Color = Color::rgb(45, 90, 220);
    pub const GRAY: Color = Color::rgb(180, 180, 180);
    pub const DARK_GRAY: Color = Color::rgb(140, 140, 140);

    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse from "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> std::result::Result<Self, String> {
        let s = s.trim_start_matches('#');
        let channel = |i: usize| {
            s.get(i..i + 2)
                .ok_or_else(|| format!("Invalid color format: {}", s))
                .and_then(|c| u8::from_str_radix(c, 16).map_err(|e| e.to_string()))
        };
        match s.len() {
            6 => Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(format!("Invalid color format: {}", s)),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        Color::from_hex(&s)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HJustify {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VJustify {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Characters accepted from text input and paste
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "chars", rename_all = "snake_case")]
pub enum Restriction {
    #[default]
    None,
    Alpha,
    Numeric,
    /// Digits and sign characters
    NumericSigned,
    AlphaNumeric,
    /// Digits, sign characters and `.`
    Float,
    /// Only characters contained in the string
    AllowList(String),
    /// Anything except characters contained in the string
    DenyList(String),
}

impl Restriction {
    pub fn allows(&self, ch: char) -> bool {
        match self {
            Restriction::None => true,
            Restriction::Alpha => ch.is_alphabetic(),
            Restriction::Numeric => ch.is_ascii_digit(),
            Restriction::NumericSigned => ch.is_ascii_digit() || ch == '+' || ch == '-',
            Restriction::AlphaNumeric => ch.is_alphanumeric(),
            Restriction::Float => ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.'),
            Restriction::AllowList(chars) => chars.contains(ch),
            Restriction::DenyList(chars) => !chars.contains(ch),
        }
    }

    /// Drop disallowed characters from `text`. Line breaks survive when `keep_breaks` is set.
    pub fn filter(&self, text: &str, keep_breaks: bool) -> String {
        if *self == Restriction::None {
            return text.to_string();
        }
        text.chars()
            .filter(|&ch| (keep_breaks && ch == '\n') || self.allows(ch))
            .collect()
    }
}

/// Font, colors and layout shared by both text widgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldStyle {
    pub font_size: u32,
    pub font_bold: bool,
    pub font_italic: bool,
    pub bg_color: Color,
    pub fg_color: Color,
    /// Background of highlighted (selected) text
    pub bg_color_hl: Color,
    /// Foreground of highlighted (selected) text
    pub fg_color_hl: Color,
    /// Background while the field has focus
    pub bg_color_select: Color,
    pub border_color: Color,
    pub border_color_dark: Color,
    pub text_v_justify: VJustify,
    pub text_h_justify: HJustify,
    /// Extra width added to the minimum size, in pixels
    pub em_width: i32,
    pub restriction: Restriction,
}

impl Default for FieldStyle {
    fn default() -> Self {
        Self {
            font_size: 11,
            font_bold: false,
            font_italic: false,
            bg_color: Color::WHITE,
            fg_color: Color::LIGHT_BLACK,
            bg_color_hl: Color::LIGHT_BLUE,
            fg_color_hl: Color::WHITE,
            bg_color_select: Color::DARK_BLUE,
            border_color: Color::GRAY,
            border_color_dark: Color::DARK_GRAY,
            text_v_justify: VJustify::Center,
            text_h_justify: HJustify::Left,
            em_width: 15,
            restriction: Restriction::None,
        }
    }
}

impl FieldStyle {
    pub fn validate(&self) -> Result<()> {
        if self.font_size == 0 {
            return Err(EditError::Config("font_size must be positive".into()));
        }
        if self.em_width < 0 {
            return Err(EditError::Config("em_width must not be negative".into()));
        }
        Ok(())
    }
}

/// Configuration of a single-line `TextEntry`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextEntryConfig {
    #[serde(flatten)]
    pub style: FieldStyle,
}

impl TextEntryConfig {
    pub fn font(&self) -> FontSpec {
        FontSpec {
            size: self.style.font_size,
            bold: self.style.font_bold,
            italic: self.style.font_italic,
            mono: false,
        }
    }
}

/// Configuration of a multi-line `TextEdit`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextEditConfig {
    #[serde(flatten)]
    pub style: FieldStyle,
    /// Render with the monospace face
    pub font_mono: bool,
    pub bg_scroll_color: Color,
    pub scroll_slider_color: Color,
}

impl Default for TextEditConfig {
    fn default() -> Self {
        Self {
            style: FieldStyle::default(),
            font_mono: false,
            bg_scroll_color: Color::GRAY,
            scroll_slider_color: Color::DARK_GRAY,
        }
    }
}

impl TextEditConfig {
    pub fn font(&self) -> FontSpec {
        FontSpec {
            size: self.style.font_size,
            bold: self.style.font_bold,
            italic: self.style.font_italic,
            mono: self.font_mono,
        }
    }
}

/// Per-widget configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub text_entry: TextEntryConfig,
    pub text_edit: TextEditConfig,
}

impl WidgetConfig {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config: WidgetConfig =
            serde_yaml::from_str(yaml).context("Failed to parse widget config")?;
        config.text_entry.style.validate()?;
        config.text_edit.style.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid config at {}", path.display()))?;
        tracing::info!("Loaded widget config from {}", path.display());
        Ok(config)
    }

    /// Load the user config file, or return defaults if it is missing or invalid
    pub fn load_or_default() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{:#}", e);
                Self::default()
            }
        }
    }

    /// Save config to `path`, creating the parent directory if needed
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        tracing::info!("Saved widget config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let entry = TextEntryConfig::default();
        assert_eq!(entry.style.font_size, 11);
        assert_eq!(entry.style.em_width, 15);
        assert_eq!(entry.style.text_h_justify, HJustify::Left);
        assert_eq!(entry.style.text_v_justify, VJustify::Center);
        assert_eq!(entry.style.bg_color_select, Color::rgb(45, 90, 220));

        let edit = TextEditConfig::default();
        assert!(!edit.font_mono);
        assert_eq!(edit.scroll_slider_color, Color::DARK_GRAY);
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::from_hex("#a6cbff").unwrap(), Color::LIGHT_BLUE);
        assert_eq!(Color::from_hex("ffffff80").unwrap(), Color::rgba(255, 255, 255, 128));
        assert!(Color::from_hex("#fff").is_err());
        assert_eq!(Color::DARK_BLUE.to_string(), "#2d5adc");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "text_entry:\n  font_size: 14\n  text_h_justify: right\n  restriction:\n    kind: numeric\ntext_edit:\n  font_mono: true\n  fg_color: \"#000000\"\n";
        let config = WidgetConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.text_entry.style.font_size, 14);
        assert_eq!(config.text_entry.style.text_h_justify, HJustify::Right);
        assert_eq!(config.text_entry.style.restriction, Restriction::Numeric);
        assert_eq!(config.text_entry.style.em_width, 15);
        assert!(config.text_edit.font_mono);
        assert_eq!(config.text_edit.style.fg_color, Color::rgb(0, 0, 0));
        assert_eq!(config.text_edit.style.font_size, 11);
    }

    #[test]
    fn test_invalid_font_size() {
        assert!(WidgetConfig::from_yaml_str("text_entry:\n  font_size: 0\n").is_err());
    }

    #[test]
    fn test_restriction_filter() {
        let r = Restriction::AllowList("ab".into());
        assert_eq!(r.filter("abcab", false), "abab");
        assert_eq!(Restriction::Numeric.filter("1a\n2", true), "1\n2");
        assert_eq!(Restriction::Numeric.filter("1a\n2", false), "12");
        assert!(Restriction::DenyList("x".into()).allows('y'));
        assert!(Restriction::Float.allows('.'));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("widgets.yaml");
        let mut config = WidgetConfig::default();
        config.text_edit.style.restriction = Restriction::DenyList("#".into());
        config.save(&path).unwrap();
        assert_eq!(WidgetConfig::load(&path).unwrap(), config);
    }
}
