//! Fonts
//!
//! The built-in faces are Latin-1 monospace glyph sets so the degree sign
//! renders. A TrueType/OpenType file can replace them; its glyphs are
//! rasterized at a fixed pixel size and thresholded to ink.

use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use embedded_graphics::Drawable;
use embedded_graphics::Pixel;
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::mono_font::iso_8859_1::{FONT_6X10, FONT_7X13, FONT_9X15, FONT_10X20};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::text::renderer::TextRenderer;
use embedded_graphics::text::{Baseline, Text};
use thiserror::Error;

use super::framebuffer::INK;

/// Pixel size for a font file when no `font_size` is configured
pub const DEFAULT_TRUETYPE_SIZE: u32 = 10;

/// Glyph coverage (0-255) from which a pixel is inked
const COVERAGE_THRESHOLD: u8 = 128;

/// Errors produced while loading a font file
#[derive(Debug, Error)]
pub enum FontError {
    /// The font file could not be read
    #[error("Failed to read font file {path}: {source}")]
    Read {
        /// Font file path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The file is not a usable TrueType/OpenType font
    #[error("Invalid font file {path}: {reason}")]
    Invalid {
        /// Font file path
        path: PathBuf,
        /// Parser message
        reason: String,
    },
}

/// Font used to draw a line of text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FontChoice {
    /// 6x10 pixels
    #[default]
    Small,
    /// 7x13 pixels
    Medium,
    /// 9x15 pixels
    Large,
    /// 10x20 pixels
    ExtraLarge,
}

impl FontChoice {
    /// All fonts, smallest first
    pub const ALL: [Self; 4] = [Self::Small, Self::Medium, Self::Large, Self::ExtraLarge];

    /// Font whose glyph height is closest to `pixels`; ties pick the smaller
    #[must_use]
    pub fn nearest(pixels: u32) -> Self {
        Self::ALL
            .into_iter()
            .min_by_key(|font| font.glyph_height().abs_diff(pixels))
            .unwrap_or_default()
    }

    /// Picks a font from an optional configured size
    #[must_use]
    pub fn from_size(size: Option<u32>) -> Self {
        size.map_or_else(Self::default, Self::nearest)
    }

    /// Underlying glyph set
    #[must_use]
    pub fn mono_font(self) -> &'static MonoFont<'static> {
        match self {
            Self::Small => &FONT_6X10,
            Self::Medium => &FONT_7X13,
            Self::Large => &FONT_9X15,
            Self::ExtraLarge => &FONT_10X20,
        }
    }

    /// Glyph cell height in pixels
    #[must_use]
    pub fn glyph_height(self) -> u32 {
        self.mono_font().character_size.height
    }

    /// Ink-on-paper text style
    #[must_use]
    pub fn style(self) -> MonoTextStyle<'static, BinaryColor> {
        MonoTextStyle::new(self.mono_font(), INK)
    }

    /// Bounding box size of `text` when drawn with this font
    #[must_use]
    pub fn measure(self, text: &str) -> Size {
        self.style()
            .measure_string(text, Point::zero(), Baseline::Top)
            .bounding_box
            .size
    }
}

/// A scalable font rasterized at a fixed pixel size
pub struct TrueTypeFont {
    font: fontdue::Font,
    size_px: f32,
    ascent: f32,
    descent: f32,
}

impl TrueTypeFont {
    /// Reads and parses `path` for drawing at `size_px` pixels
    ///
    /// # Errors
    ///
    /// Returns [`FontError::Read`] if the file cannot be read and
    /// [`FontError::Invalid`] if it is not a font.
    pub fn load(path: &Path, size_px: u32) -> Result<Self, FontError> {
        let data = std::fs::read(path).map_err(|source| FontError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&data, size_px).map_err(|reason| FontError::Invalid {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        })
    }

    /// Parses font data for drawing at `size_px` pixels
    ///
    /// # Errors
    ///
    /// Returns the parser's message if `data` is not a font.
    pub fn from_bytes(data: &[u8], size_px: u32) -> Result<Self, &'static str> {
        let font = fontdue::Font::from_bytes(data, fontdue::FontSettings::default())?;
        let size_px = size_px as f32;
        let (ascent, descent) = font
            .horizontal_line_metrics(size_px)
            .map_or((size_px, 0.0), |m| (m.ascent, m.descent));
        Ok(Self {
            font,
            size_px,
            ascent,
            descent,
        })
    }

    /// Pixel size glyphs are rasterized at
    #[must_use]
    pub const fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Advance width and line height of `text`
    #[must_use]
    pub fn measure(&self, text: &str) -> Size {
        let advance: f32 = text
            .chars()
            .map(|c| self.font.metrics(c, self.size_px).advance_width)
            .sum();
        Size::new(
            advance.ceil() as u32,
            (self.ascent - self.descent).ceil() as u32,
        )
    }

    /// Draws `text` with its line box's top-left corner at `top_left`
    ///
    /// # Errors
    ///
    /// Propagates the draw target's error.
    pub fn draw<D>(&self, text: &str, top_left: Point, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let baseline = top_left.y + self.ascent.round() as i32;
        let mut pen = top_left.x as f32;
        let mut pixels = Vec::new();

        for c in text.chars() {
            let (metrics, coverage) = self.font.rasterize(c, self.size_px);
            let left = pen.round() as i32 + metrics.xmin;
            let top = baseline - metrics.ymin - metrics.height as i32;
            for (i, &alpha) in coverage.iter().enumerate() {
                if alpha >= COVERAGE_THRESHOLD {
                    let (col, row) = (i % metrics.width, i / metrics.width);
                    pixels.push(Pixel(Point::new(left + col as i32, top + row as i32), INK));
                }
            }
            pen += metrics.advance_width;
        }

        target.draw_iter(pixels)
    }
}

impl fmt::Debug for TrueTypeFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrueTypeFont")
            .field("size_px", &self.size_px)
            .field("ascent", &self.ascent)
            .field("descent", &self.descent)
            .finish_non_exhaustive()
    }
}

/// Face used for a page's text: a built-in font or a loaded font file
#[derive(Debug, Clone)]
pub enum FontFace {
    /// Built-in monospace font
    Mono(FontChoice),
    /// Font file rasterized at a fixed size
    TrueType(Rc<TrueTypeFont>),
}

impl FontFace {
    /// Face for the configured `font_file` and `font_size`
    ///
    /// Without a file the built-in font nearest to `font_size` is used.
    ///
    /// # Errors
    ///
    /// Returns [`FontError`] if the font file cannot be loaded.
    pub fn load(font_file: Option<&Path>, font_size: Option<u32>) -> Result<Self, FontError> {
        match font_file {
            None => Ok(Self::Mono(FontChoice::from_size(font_size))),
            Some(path) => {
                let size = font_size.unwrap_or(DEFAULT_TRUETYPE_SIZE);
                tracing::info!(path = %path.display(), size, "Loading font file");
                Ok(Self::TrueType(Rc::new(TrueTypeFont::load(path, size)?)))
            }
        }
    }

    /// Bounding box size of `text` drawn with this face
    #[must_use]
    pub fn measure(&self, text: &str) -> Size {
        match self {
            Self::Mono(font) => font.measure(text),
            Self::TrueType(font) => font.measure(text),
        }
    }

    /// Draws `text` with its top-left corner at `top_left`
    ///
    /// # Errors
    ///
    /// Propagates the draw target's error.
    pub fn draw<D>(&self, text: &str, top_left: Point, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        match self {
            Self::Mono(font) => Text::with_baseline(text, top_left, font.style(), Baseline::Top)
                .draw(target)
                .map(|_| ()),
            Self::TrueType(font) => font.draw(text, top_left, target),
        }
    }
}

impl Default for FontFace {
    fn default() -> Self {
        Self::Mono(FontChoice::default())
    }
}

impl From<FontChoice> for FontFace {
    fn from(font: FontChoice) -> Self {
        Self::Mono(font)
    }
}
