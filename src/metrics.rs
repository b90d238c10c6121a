//! Glyph measurement used for caret placement, hit-testing and panning.

use std::path::Path;

use fontdue::{Font, FontSettings};

use crate::error::{EditError, Result};

/// Font selection for a measurement
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FontSpec {
    /// Point size
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
    /// Use the monospace face instead of the proportional one
    pub mono: bool,
}

impl FontSpec {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }
}

/// Pixel size of a rendered string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextSize {
    pub width: i32,
    pub height: i32,
}

/// Measures rendered text. Implementations must be pure: the same font and
/// text always yield the same size.
pub trait GlyphMetrics {
    fn measure(&self, font: &FontSpec, text: &str) -> Result<TextSize>;

    /// Height of one line of text in pixels
    fn line_height(&self, font: &FontSpec) -> Result<i32>;

    /// Width of `text`, the common case
    fn width(&self, font: &FontSpec, text: &str) -> Result<i32> {
        Ok(self.measure(font, text)?.width)
    }
}

/// Fixed-advance metrics: every character is `advance` pixels wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonospaceMetrics {
    pub advance: i32,
    pub line_height: i32,
}

impl MonospaceMetrics {
    pub fn new(advance: i32, line_height: i32) -> Self {
        Self {
            advance,
            line_height,
        }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(10, 20)
    }
}

impl GlyphMetrics for MonospaceMetrics {
    fn measure(&self, _font: &FontSpec, text: &str) -> Result<TextSize> {
        Ok(TextSize {
            width: text.chars().count() as i32 * self.advance,
            height: self.line_height,
        })
    }

    fn line_height(&self, _font: &FontSpec) -> Result<i32> {
        Ok(self.line_height)
    }
}

/// Optional faces beside the regular one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceStyle {
    Bold,
    Italic,
    BoldItalic,
    Mono,
}

/// Metrics from TrueType/OpenType faces rasterized by fontdue.
pub struct FontdueMetrics {
    regular: Font,
    bold: Option<Font>,
    italic: Option<Font>,
    bold_italic: Option<Font>,
    mono: Option<Font>,
}

impl FontdueMetrics {
    pub fn from_bytes(regular: &[u8]) -> Result<Self> {
        Ok(Self {
            regular: load_font(regular)?,
            bold: None,
            italic: None,
            bold_italic: None,
            mono: None,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let metrics = Self::from_bytes(&read_font_file(path)?)?;
        tracing::info!("Loaded font from {}", path.display());
        Ok(metrics)
    }

    /// Add a styled face used when a `FontSpec` asks for that style
    pub fn with_face(mut self, style: FaceStyle, bytes: &[u8]) -> Result<Self> {
        let font = Some(load_font(bytes)?);
        match style {
            FaceStyle::Bold => self.bold = font,
            FaceStyle::Italic => self.italic = font,
            FaceStyle::BoldItalic => self.bold_italic = font,
            FaceStyle::Mono => self.mono = font,
        }
        Ok(self)
    }

    pub fn with_face_file(self, style: FaceStyle, path: &Path) -> Result<Self> {
        let metrics = self.with_face(style, &read_font_file(path)?)?;
        tracing::info!(?style, "Loaded font face from {}", path.display());
        Ok(metrics)
    }

    /// Pick the closest face; missing styles fall back to the regular face
    fn face(&self, spec: &FontSpec) -> &Font {
        let styled = if spec.mono {
            self.mono.as_ref()
        } else {
            match (spec.bold, spec.italic) {
                (true, true) => self.bold_italic.as_ref().or(self.bold.as_ref()),
                (true, false) => self.bold.as_ref(),
                (false, true) => self.italic.as_ref(),
                (false, false) => None,
            }
        };
        styled.unwrap_or(&self.regular)
    }
}

impl GlyphMetrics for FontdueMetrics {
    fn measure(&self, spec: &FontSpec, text: &str) -> Result<TextSize> {
        let font = self.face(spec);
        let px = spec.size as f32;

        let mut width = 0.0f32;
        let mut prev: Option<char> = None;
        for ch in text.chars() {
            if let Some(left) = prev {
                width += font.horizontal_kern(left, ch, px).unwrap_or(0.0);
            }
            width += font.metrics(ch, px).advance_width;
            prev = Some(ch);
        }

        Ok(TextSize {
            width: width.ceil() as i32,
            height: self.line_height(spec)?,
        })
    }

    fn line_height(&self, spec: &FontSpec) -> Result<i32> {
        let line_metrics = self
            .face(spec)
            .horizontal_line_metrics(spec.size as f32)
            .ok_or_else(|| EditError::FontUnavailable("font has no line metrics".into()))?;
        Ok(line_metrics.new_line_size.ceil() as i32)
    }
}

fn read_font_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| EditError::FontUnavailable(format!("{}: {}", path.display(), e)))
}

fn load_font(bytes: &[u8]) -> Result<Font> {
    Font::from_bytes(bytes, FontSettings::default())
        .map_err(|e| EditError::FontUnavailable(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monospace_measure() {
        let metrics = MonospaceMetrics::new(7, 16);
        let font = FontSpec::new(11);
        assert_eq!(
            metrics.measure(&font, "héllo").unwrap(),
            TextSize {
                width: 35,
                height: 16
            }
        );
        assert_eq!(metrics.width(&font, "").unwrap(), 0);
        assert_eq!(metrics.line_height(&font).unwrap(), 16);
    }

    #[test]
    fn test_fontdue_rejects_garbage() {
        assert!(matches!(
            FontdueMetrics::from_bytes(b"not a font"),
            Err(EditError::FontUnavailable(_))
        ));
    }

    #[test]
    fn test_missing_face_file_is_font_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = FontdueMetrics::from_file(&dir.path().join("missing.ttf")).err();
        assert!(matches!(err, Some(EditError::FontUnavailable(msg)) if msg.contains("missing.ttf")));
    }
}
