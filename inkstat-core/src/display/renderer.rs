//! Page renderer
//!
//! The renderer owns the surface and a single framebuffer. Pages are built
//! with line-based or free text and pushed to the panel with [`Renderer::flush`].

use embedded_graphics::prelude::{Point, Size};
use thiserror::Error;

use super::font::{FontChoice, FontFace};
use super::framebuffer::Framebuffer;
use super::grid::{GridError, Justify, LineGrid, resolve_center, resolve_x};
use super::surface::{DisplayError, RefreshMode, Surface};
use crate::config::DisplayLayout;

/// Text shown once the panel is ready
pub const INIT_BANNER: &str = "***E INK DISPLAY IS INITIALIZED***";

/// Errors produced while rendering
#[derive(Debug, Error)]
pub enum RenderError {
    /// The line layout could not be computed
    #[error(transparent)]
    Grid(#[from] GridError),

    /// The panel failed
    #[error(transparent)]
    Display(#[from] DisplayError),

    /// Text was addressed to a line that does not exist
    #[error("Line {line} is outside the {line_count}-line grid")]
    LineOutOfRange {
        /// Requested line
        line: usize,
        /// Lines available
        line_count: usize,
    },
}

/// Where free text is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Top-left corner, shifted right by the horizontal margin
    At(Point),
    /// Centered on the display in both axes
    Center,
}

/// Draws pages and refreshes the panel
#[derive(Debug)]
pub struct Renderer {
    surface: Surface,
    frame: Framebuffer,
    grid: LineGrid,
    margin_x: i32,
    font: FontFace,
}

impl Renderer {
    /// Builds the line grid for the surface's logical size
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Grid`] if `layout` does not fit the display.
    pub fn new(
        surface: Surface,
        layout: &DisplayLayout,
        font: impl Into<FontFace>,
    ) -> Result<Self, RenderError> {
        let font = font.into();
        let size = surface.size();
        let grid = LineGrid::compute(
            layout.line_count,
            size.height,
            layout.margin_y,
            layout.line_spacing,
        )?;

        tracing::debug!(
            width = size.width,
            height = size.height,
            line_count = grid.line_count(),
            line_height = grid.line_height(),
            middle_line = grid.middle_line(),
            margin_x = layout.margin_x,
            margin_y = layout.margin_y,
            line_spacing = layout.line_spacing,
            ?font,
            "Line grid computed"
        );

        Ok(Self {
            frame: Framebuffer::new(size),
            surface,
            grid,
            margin_x: layout.margin_x,
            font,
        })
    }

    /// Wakes the panel and shows the initialization banner
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Display`] if the panel fails.
    pub fn initialize(&mut self) -> Result<(), RenderError> {
        tracing::info!("Initializing e-ink display");
        self.surface.init(true)?;
        self.new_page();
        self.write_free(INIT_BANNER, Placement::Center, None);
        self.flush(RefreshMode::Fast)
    }

    /// Logical display size
    #[must_use]
    pub fn size(&self) -> Size {
        self.surface.size()
    }

    /// Current line layout
    #[must_use]
    pub const fn grid(&self) -> &LineGrid {
        &self.grid
    }

    /// Default font face
    #[must_use]
    pub const fn font(&self) -> &FontFace {
        &self.font
    }

    /// Page being built
    #[must_use]
    pub const fn framebuffer(&self) -> &Framebuffer {
        &self.frame
    }

    /// Discards the current page
    pub fn new_page(&mut self) {
        self.frame.wipe();
    }

    /// Size of `text` in `font`, or the default face
    #[must_use]
    pub fn measure(&self, text: &str, font: Option<FontChoice>) -> Size {
        self.face(font).measure(text)
    }

    /// Draws `text` on grid line `line`
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::LineOutOfRange`] without drawing anything if
    /// `line` is not on the grid.
    pub fn set_line(
        &mut self,
        line: usize,
        text: &str,
        justify: Justify,
        font: Option<FontChoice>,
    ) -> Result<(), RenderError> {
        let line_count = self.grid.line_count();
        let Some(spec) = self.grid.line(line).copied() else {
            tracing::warn!(line, line_count, "Line is outside the grid");
            return Err(RenderError::LineOutOfRange { line, line_count });
        };

        let face = self.face(font);
        let width = face.measure(text).width;
        let x = resolve_x(width, self.size().width, self.margin_x, justify);
        tracing::trace!(line, x, y = spec.y_offset_px, text, "Writing line");
        self.draw(text, Point::new(x, spec.y_offset_px), &face);
        Ok(())
    }

    /// Draws `text` outside the line grid
    pub fn write_free(&mut self, text: &str, placement: Placement, font: Option<FontChoice>) {
        let face = self.face(font);
        let position = match placement {
            Placement::At(point) => point + Point::new(self.margin_x, 0),
            Placement::Center => resolve_center(face.measure(text), self.size()),
        };
        tracing::trace!(x = position.x, y = position.y, text, "Writing free text");
        self.draw(text, position, &face);
    }

    /// Sends the current page to the panel
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Display`] if the panel fails.
    pub fn flush(&mut self, mode: RefreshMode) -> Result<(), RenderError> {
        tracing::debug!(refresh = %mode, "Updating e-ink display");
        self.surface.present(&self.frame, mode)?;
        Ok(())
    }

    /// Stores the current page as the base for partial refreshes
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Display`] if the panel fails.
    pub fn set_partial_base(&mut self) -> Result<(), RenderError> {
        tracing::debug!("Setting partial refresh base image");
        self.surface.present_base(&self.frame)?;
        Ok(())
    }

    /// Blanks the panel without touching the current page
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Display`] if the panel fails.
    pub fn clear_display(&mut self) -> Result<(), RenderError> {
        tracing::debug!("Clearing e-ink display");
        self.surface.clear()?;
        Ok(())
    }

    /// Per-call override, or the default face
    fn face(&self, font: Option<FontChoice>) -> FontFace {
        font.map_or_else(|| self.font.clone(), FontFace::Mono)
    }

    fn draw(&mut self, text: &str, position: Point, face: &FontFace) {
        let _ = face.draw(text, position, &mut self.frame);
    }
}
