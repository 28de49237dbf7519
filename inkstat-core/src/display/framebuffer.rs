//! In-memory 1-bit page image
//!
//! The framebuffer is laid out in logical (as viewed) coordinates.
//! [`BinaryColor::On`] is ink, [`BinaryColor::Off`] is paper.

use std::convert::Infallible;

use embedded_graphics::Pixel;
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{OriginDimensions, Point, Size};

/// Ink color
pub const INK: BinaryColor = BinaryColor::On;

/// Background color
pub const PAPER: BinaryColor = BinaryColor::Off;

/// A single page of pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    size: Size,
    pixels: Vec<BinaryColor>,
}

impl Framebuffer {
    /// Creates a blank (all paper) framebuffer
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pixels: vec![PAPER; (size.width * size.height) as usize],
        }
    }

    /// Resets every pixel to paper
    pub fn wipe(&mut self) {
        self.pixels.fill(PAPER);
    }

    /// Color at `point`, or `None` outside the page
    #[must_use]
    pub fn pixel(&self, point: Point) -> Option<BinaryColor> {
        self.index_of(point).map(|i| self.pixels[i])
    }

    /// Number of inked pixels
    #[must_use]
    pub fn ink_count(&self) -> usize {
        self.pixels.iter().filter(|&&c| c == INK).count()
    }

    /// Number of inked pixels in rows `[top, bottom)`
    #[must_use]
    pub fn ink_in_rows(&self, top: i32, bottom: i32) -> usize {
        let width = self.size.width as usize;
        let top = top.clamp(0, self.size.height as i32) as usize;
        let bottom = bottom.clamp(0, self.size.height as i32) as usize;
        if top >= bottom {
            return 0;
        }
        self.pixels[top * width..bottom * width]
            .iter()
            .filter(|&&c| c == INK)
            .count()
    }

    fn index_of(&self, point: Point) -> Option<usize> {
        let (x, y) = (u32::try_from(point.x).ok()?, u32::try_from(point.y).ok()?);
        (x < self.size.width && y < self.size.height)
            .then(|| (y * self.size.width + x) as usize)
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        // Text may hang off the page edge; clip silently.
        for Pixel(point, color) in pixels {
            if let Some(i) = self.index_of(point) {
                self.pixels[i] = color;
            }
        }
        Ok(())
    }
}
