//! # Text Overlay
//!
//! Renders centered overlay text onto the composited image. Layout and glyph
//! rasterization are delegated to [fontdue]; this module owns font loading,
//! the literal-`\n` escape handling, block positioning, and blending glyph
//! coverage into the RGB canvas.

use fontdue::layout::{CoordinateSystem, HorizontalAlign, Layout, LayoutSettings, TextStyle};
use fontdue::{Font, FontSettings};
use image::RgbImage;
use tracing::debug;

use crate::{
    config::TextConfig,
    error::{Result, TextError},
};

/// Convert literal two-character `\n` escape sequences into real newlines.
///
/// CLI callers pass multi-line text as a single shell argument, so the
/// escapes arrive as backslash + n rather than actual line breaks.
pub fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

/// Top-left corner of a text block centered horizontally on the image and
/// vertically on the fixed anchor line. The anchor is an absolute y
/// coordinate, deliberately independent of the image height.
pub fn block_origin(image_w: u32, text_w: u32, text_h: u32, anchor_y: i32) -> (i64, i64) {
    let x = (i64::from(image_w) - i64::from(text_w)) / 2;
    let y = i64::from(anchor_y) - i64::from(text_h) / 2;
    (x, y)
}

/// Tight pixel extents of a laid-out run of glyphs
#[derive(Clone, Copy, Debug, Default)]
struct TextExtents {
    min_x: f32,
    min_y: f32,
    width: u32,
    height: u32,
}

/// Font-backed overlay renderer
///
/// Loading the font is the fallible part; a constructed renderer can overlay
/// any number of images.
#[derive(Debug)]
pub struct TextRenderer {
    font: Font,
    config: TextConfig,
}

impl TextRenderer {
    /// Load the font named by the configuration.
    ///
    /// Fails fast with a font-unavailable condition when the file is missing
    /// or not a parsable TTF/OTF, so a bad environment is reported before
    /// any compositing work is wasted.
    pub fn from_config(config: &TextConfig) -> Result<Self> {
        let path = &config.font_path;
        let bytes = std::fs::read(path).map_err(|_| TextError::FontUnavailable {
            path: path.display().to_string(),
        })?;

        let font = Font::from_bytes(bytes, FontSettings::default()).map_err(|reason| {
            TextError::FontParseFailed {
                path: path.display().to_string(),
                reason: reason.to_string(),
            }
        })?;

        debug!("Loaded font from {:?}", path);
        Ok(Self { font, config: config.clone() })
    }

    /// Overlay `text` onto the image, producing a new buffer.
    ///
    /// Literal `\n` escapes become line breaks; lines are center-aligned
    /// within the block; the block is centered horizontally and anchored
    /// vertically per the configuration. Glyph coverage is alpha-blended
    /// with the fill color, so letter edges stay anti-aliased.
    pub fn overlay(&self, image: &RgbImage, text: &str) -> RgbImage {
        let text = unescape_newlines(text);
        let mut output = image.clone();
        if text.trim().is_empty() {
            return output;
        }

        // First pass measures the tight block so the second pass can
        // center-align lines within exactly that width.
        let extents = self.measure(&text, None);
        let (origin_x, origin_y) =
            block_origin(image.width(), extents.width, extents.height, self.config.anchor_y);

        debug!(
            "Text block {}x{} at ({}, {})",
            extents.width, extents.height, origin_x, origin_y
        );

        // The alignment width gets a little slack so side bearings cannot
        // push the longest line over it and trigger a wrap; the uniform
        // shift this introduces is cancelled by re-anchoring on min_x below.
        let align_width = extents.width as f32 + self.config.font_size;
        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        self.lay_out(&mut layout, &text, Some(align_width));
        let aligned = Self::extents_of(&layout);

        for glyph in layout.glyphs() {
            let (metrics, bitmap) = self.font.rasterize_config(glyph.key);
            if metrics.width == 0 || metrics.height == 0 {
                continue;
            }
            let glyph_x = origin_x + (glyph.x - aligned.min_x).round() as i64;
            let glyph_y = origin_y + (glyph.y - aligned.min_y).round() as i64;
            self.blit(&mut output, &bitmap, metrics.width, glyph_x, glyph_y);
        }

        output
    }

    fn lay_out(&self, layout: &mut Layout, text: &str, max_width: Option<f32>) {
        layout.reset(&LayoutSettings {
            x: 0.0,
            y: 0.0,
            max_width,
            horizontal_align: HorizontalAlign::Center,
            ..LayoutSettings::default()
        });
        layout.append(
            &[&self.font],
            &TextStyle::new(text, self.config.font_size, 0),
        );
    }

    fn measure(&self, text: &str, max_width: Option<f32>) -> TextExtents {
        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        self.lay_out(&mut layout, text, max_width);
        Self::extents_of(&layout)
    }

    fn extents_of(layout: &Layout) -> TextExtents {
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        let mut seen = false;

        for glyph in layout.glyphs() {
            if glyph.width == 0 || glyph.height == 0 {
                continue;
            }
            seen = true;
            min_x = min_x.min(glyph.x);
            min_y = min_y.min(glyph.y);
            max_x = max_x.max(glyph.x + glyph.width as f32);
            max_y = max_y.max(glyph.y + glyph.height as f32);
        }

        if !seen {
            return TextExtents::default();
        }

        TextExtents {
            min_x,
            min_y,
            width: (max_x - min_x).ceil() as u32,
            height: (max_y - min_y).ceil() as u32,
        }
    }

    /// Blend a single glyph's coverage bitmap into the canvas at the given
    /// position, clipping anything that falls outside the image.
    fn blit(&self, canvas: &mut RgbImage, coverage: &[u8], row_width: usize, x0: i64, y0: i64) {
        let fill = self.config.fill;
        for (i, &alpha) in coverage.iter().enumerate() {
            if alpha == 0 {
                continue;
            }
            let x = x0 + (i % row_width) as i64;
            let y = y0 + (i / row_width) as i64;
            if x < 0 || y < 0 || x >= i64::from(canvas.width()) || y >= i64::from(canvas.height()) {
                continue;
            }
            let pixel = canvas.get_pixel_mut(x as u32, y as u32);
            for c in 0..3 {
                let src = u16::from(fill[c]) * u16::from(alpha);
                let dst = u16::from(pixel.0[c]) * (255 - u16::from(alpha));
                pixel.0[c] = ((src + dst) / 255) as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TextConfig;
    use std::path::PathBuf;

    #[test]
    fn test_unescape_newlines() {
        assert_eq!(unescape_newlines("A\\nB"), "A\nB");
        assert_eq!(unescape_newlines("no breaks"), "no breaks");
        assert_eq!(unescape_newlines("\\n\\n"), "\n\n");
    }

    #[test]
    fn test_block_origin_is_centered() {
        // 200 wide image, 80 wide text: left margin 60
        let (x, y) = block_origin(200, 80, 100, 265);
        assert_eq!(x, 60);
        assert_eq!(y, 265 - 50);
    }

    #[test]
    fn test_block_origin_anchor_ignores_image_height() {
        let (_, y_small) = block_origin(100, 10, 40, 265);
        let (_, y_large) = block_origin(4000, 10, 40, 265);
        assert_eq!(y_small, y_large);
    }

    #[test]
    fn test_block_origin_text_wider_than_image() {
        let (x, _) = block_origin(100, 300, 50, 265);
        assert_eq!(x, -100);
    }

    #[test]
    fn test_missing_font_is_font_unavailable() {
        let config = TextConfig {
            font_path: PathBuf::from("/definitely/not/a/font.otf"),
            ..TextConfig::default()
        };
        let err = TextRenderer::from_config(&config).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_garbage_font_is_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a-font.ttf");
        std::fs::write(&path, b"this is not a font").unwrap();

        let config = TextConfig { font_path: path, ..TextConfig::default() };
        let err = TextRenderer::from_config(&config).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
