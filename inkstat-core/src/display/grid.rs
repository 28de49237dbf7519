//! Line layout for the text grid
//!
//! The display's height, minus a margin at the top and bottom, is split
//! into `line_count` equal lines. Horizontal placement is resolved from a
//! text's measured pixel width; the grid never measures fonts itself.

use embedded_graphics::prelude::{Point, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while computing a line layout
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GridError {
    /// A grid needs at least one line
    #[error("Line count must be at least 1")]
    NoLines,

    /// The vertical margins leave no room for text
    #[error("Vertical margin {margin_y}px leaves no room on a {display_height}px display")]
    MarginsExceedHeight {
        /// Display height in pixels
        display_height: u32,
        /// Margin applied at top and bottom
        margin_y: u32,
    },

    /// More lines than available pixel rows
    #[error("{line_count} lines do not fit in {available}px")]
    TooManyLines {
        /// Requested line count
        line_count: usize,
        /// Pixels available between the margins
        available: u32,
    },

    /// Line spacing pushes line offsets past the pixel coordinate range
    #[error("Line spacing {line_spacing}px is too large for {line_count} lines")]
    SpacingOverflow {
        /// Requested line count
        line_count: usize,
        /// Configured spacing between lines
        line_spacing: u32,
    },
}

/// Horizontal placement of a line's text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justify {
    /// Starts at the left margin
    #[default]
    Left,
    /// Centered on the display, ignoring the margin
    Center,
    /// Ends at the right margin
    Right,
}

/// One line of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpec {
    /// Zero-based line number
    pub index: usize,
    /// Top edge of the line in pixels
    pub y_offset_px: i32,
    /// Line height in pixels
    pub height_px: u32,
}

impl LineSpec {
    /// One past the last pixel row of this line
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y_offset_px + self.height_px as i32
    }
}

/// A computed line layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineGrid {
    lines: Vec<LineSpec>,
    line_height: u32,
}

impl LineGrid {
    /// Lays out `line_count` lines top to bottom
    ///
    /// Each line is `(display_height − 2·margin_y) / line_count` pixels tall
    /// and line `i` starts at `margin_y + i·(height + line_spacing)`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] for a zero line count, margins that consume the
    /// whole display, lines that would be less than a pixel tall, or a
    /// spacing whose offsets do not fit in pixel coordinates.
    pub fn compute(
        line_count: usize,
        display_height: u32,
        margin_y: u32,
        line_spacing: u32,
    ) -> Result<Self, GridError> {
        if line_count == 0 {
            return Err(GridError::NoLines);
        }
        let available = display_height
            .checked_sub(margin_y.saturating_mul(2))
            .filter(|&h| h > 0)
            .ok_or(GridError::MarginsExceedHeight {
                display_height,
                margin_y,
            })?;

        let line_height = u32::try_from(line_count)
            .ok()
            .map_or(0, |count| available / count);
        if line_height == 0 {
            return Err(GridError::TooManyLines {
                line_count,
                available,
            });
        }

        let overflow = || GridError::SpacingOverflow {
            line_count,
            line_spacing,
        };
        let height = i32::try_from(line_height).map_err(|_| overflow())?;
        let step = line_height
            .checked_add(line_spacing)
            .and_then(|step| i32::try_from(step).ok())
            .ok_or_else(overflow)?;
        let top = i32::try_from(margin_y).map_err(|_| overflow())?;

        let lines = (0..line_count)
            .map(|index| {
                i32::try_from(index)
                    .ok()
                    .and_then(|i| i.checked_mul(step))
                    .and_then(|offset| offset.checked_add(top))
                    .filter(|y| y.checked_add(height).is_some())
                    .map(|y_offset_px| LineSpec {
                        index,
                        y_offset_px,
                        height_px: line_height,
                    })
                    .ok_or_else(overflow)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { lines, line_height })
    }

    /// All lines, top to bottom
    #[must_use]
    pub fn lines(&self) -> &[LineSpec] {
        &self.lines
    }

    /// Line `index`, if it exists
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&LineSpec> {
        self.lines.get(index)
    }

    /// Number of lines
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Height of every line in pixels
    #[must_use]
    pub const fn line_height(&self) -> u32 {
        self.line_height
    }

    /// Line nearest the vertical middle
    ///
    /// `count / 2` for even counts, `count / 2 + 1` for odd counts.
    #[must_use]
    pub fn middle_line(&self) -> usize {
        let count = self.line_count();
        if count % 2 == 0 { count / 2 } else { count / 2 + 1 }
    }
}

/// Resolves the left edge of a text `text_width` pixels wide
///
/// `Center` deliberately ignores `margin_x`; `Left` and `Right` respect it.
/// The result may be negative when the text is wider than the display.
#[must_use]
pub fn resolve_x(text_width: u32, display_width: u32, margin_x: i32, justify: Justify) -> i32 {
    let w = text_width as i32;
    let display = display_width as i32;
    match justify {
        Justify::Left => margin_x,
        Justify::Right => display - margin_x - w,
        Justify::Center => display / 2 - w / 2,
    }
}

/// Top-left corner that centers `text` on `display` in both axes
#[must_use]
pub fn resolve_center(text: Size, display: Size) -> Point {
    Point::new(
        display.width as i32 / 2 - text.width as i32 / 2,
        display.height as i32 / 2 - text.height as i32 / 2,
    )
}
