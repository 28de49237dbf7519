//! Display surface and panel drivers
//!
//! A [`Surface`] sits between the logical framebuffer and a
//! [`DisplayDriver`]. It owns the orientation: layout code sees the display
//! as viewed, while drivers receive packed buffers in the panel's native
//! orientation.

use std::cell::RefCell;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{OriginDimensions, Point, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::framebuffer::{Framebuffer, INK};

/// Native resolution of the 2.13" V4 panel (portrait)
pub const EPD_2IN13_V4_SIZE: Size = Size::new(122, 250);

/// Errors from the display surface or its driver
#[derive(Debug, Error)]
pub enum DisplayError {
    /// The driver rejected a command
    #[error("Display driver error: {0}")]
    Driver(String),

    /// A buffer does not match the panel size
    #[error("Buffer holds {actual} bytes, panel expects {expected}")]
    BufferSize {
        /// Bytes expected by the panel
        expected: usize,
        /// Bytes supplied
        actual: usize,
    },

    /// Failed to write a frame to disk
    #[error("Failed to write frame to {path}: {source}")]
    Io {
        /// Target file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Result type for display operations
pub type DisplayResult<T> = std::result::Result<T, DisplayError>;

/// Panel refresh waveform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshMode {
    /// Quick update, used every steady-state page
    #[default]
    Fast,
    /// Partial update against the stored base image
    Partial,
    /// Full waveform, clears ghosting
    Full,
}

impl fmt::Display for RefreshMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fast => write!(f, "fast"),
            Self::Partial => write!(f, "partial"),
            Self::Full => write!(f, "full"),
        }
    }
}

/// How the panel is mounted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Long edge horizontal; native axes swapped
    #[default]
    Landscape,
    /// Native panel orientation
    Portrait,
}

/// Low-level panel commands
///
/// Buffers are packed 1 bit per pixel, most significant bit first, each
/// row padded to a whole byte, with `1` meaning white.
pub trait DisplayDriver {
    /// Panel size in its native orientation
    fn native_size(&self) -> Size;

    /// Initializes the panel for full refreshes
    ///
    /// # Errors
    ///
    /// Returns an error if the panel does not respond.
    fn init(&mut self) -> DisplayResult<()>;

    /// Initializes the panel for fast refreshes
    ///
    /// # Errors
    ///
    /// Returns an error if the panel does not respond.
    fn init_fast(&mut self) -> DisplayResult<()>;

    /// Blanks the panel
    ///
    /// # Errors
    ///
    /// Returns an error if the panel does not respond.
    fn clear(&mut self) -> DisplayResult<()>;

    /// Shows `buffer` with the full waveform
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer fails.
    fn display(&mut self, buffer: &[u8]) -> DisplayResult<()>;

    /// Shows `buffer` with the fast waveform
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer fails.
    fn display_fast(&mut self, buffer: &[u8]) -> DisplayResult<()>;

    /// Shows `buffer` as a partial update
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer fails.
    fn display_partial(&mut self, buffer: &[u8]) -> DisplayResult<()>;

    /// Stores `buffer` as the base image for later partial updates
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer fails.
    fn display_part_base_image(&mut self, buffer: &[u8]) -> DisplayResult<()>;
}

/// Bytes in a packed buffer for a panel of `size`
#[must_use]
pub const fn packed_len(size: Size) -> usize {
    (size.width.div_ceil(8) * size.height) as usize
}

/// A driver plus the orientation it is mounted in
pub struct Surface {
    driver: Box<dyn DisplayDriver>,
    orientation: Orientation,
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("native_size", &self.driver.native_size())
            .field("orientation", &self.orientation)
            .finish_non_exhaustive()
    }
}

impl Surface {
    /// Wraps `driver`
    #[must_use]
    pub fn new(driver: impl DisplayDriver + 'static, orientation: Orientation) -> Self {
        Self {
            driver: Box::new(driver),
            orientation,
        }
    }

    /// Logical size as viewed
    #[must_use]
    pub fn size(&self) -> Size {
        let native = self.driver.native_size();
        match self.orientation {
            Orientation::Portrait => native,
            Orientation::Landscape => Size::new(native.height, native.width),
        }
    }

    /// Mount orientation
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Initializes the panel, fast or full
    ///
    /// # Errors
    ///
    /// Propagates driver errors.
    pub fn init(&mut self, fast: bool) -> DisplayResult<()> {
        if fast {
            self.driver.init_fast()
        } else {
            self.driver.init()
        }
    }

    /// Blanks the panel
    ///
    /// # Errors
    ///
    /// Propagates driver errors.
    pub fn clear(&mut self) -> DisplayResult<()> {
        self.driver.clear()
    }

    /// Sends `frame` to the panel with the given waveform
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::BufferSize`] if `frame` was not sized for this
    /// surface, or propagates driver errors.
    pub fn present(&mut self, frame: &Framebuffer, mode: RefreshMode) -> DisplayResult<()> {
        let buffer = self.to_native_buffer(frame)?;
        match mode {
            RefreshMode::Fast => self.driver.display_fast(&buffer),
            RefreshMode::Partial => self.driver.display_partial(&buffer),
            RefreshMode::Full => self.driver.display(&buffer),
        }
    }

    /// Stores `frame` as the partial-refresh base image
    ///
    /// # Errors
    ///
    /// Same as [`Surface::present`].
    pub fn present_base(&mut self, frame: &Framebuffer) -> DisplayResult<()> {
        let buffer = self.to_native_buffer(frame)?;
        self.driver.display_part_base_image(&buffer)
    }

    /// Packs a logical frame into the panel's native layout
    ///
    /// In landscape the image is rotated a quarter turn counter-clockwise:
    /// native pixel `(nx, ny)` shows logical pixel `(W − 1 − ny, nx)`.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::BufferSize`] if `frame` is not the logical size.
    pub fn to_native_buffer(&self, frame: &Framebuffer) -> DisplayResult<Vec<u8>> {
        let logical = self.size();
        let native = self.driver.native_size();
        if frame.size() != logical {
            return Err(DisplayError::BufferSize {
                expected: packed_len(native),
                actual: packed_len(frame.size()),
            });
        }

        let row_bytes = native.width.div_ceil(8) as usize;
        let mut buffer = vec![0xFF_u8; packed_len(native)];
        for ny in 0..native.height as i32 {
            for nx in 0..native.width as i32 {
                let source = match self.orientation {
                    Orientation::Portrait => Point::new(nx, ny),
                    Orientation::Landscape => Point::new(logical.width as i32 - 1 - ny, nx),
                };
                if frame.pixel(source) == Some(INK) {
                    let byte = ny as usize * row_bytes + nx as usize / 8;
                    buffer[byte] &= !(0x80 >> (nx % 8));
                }
            }
        }
        Ok(buffer)
    }
}

/// A driver call, as recorded by [`MemoryDriver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCall {
    /// `init`
    Init,
    /// `init_fast`
    InitFast,
    /// `clear`
    Clear,
    /// `display`
    Display,
    /// `display_fast`
    DisplayFast,
    /// `display_partial`
    DisplayPartial,
    /// `display_part_base_image`
    DisplayPartBaseImage,
}

/// Everything a [`MemoryDriver`] has received
#[derive(Debug, Default, Clone)]
pub struct DriverLog {
    /// Calls in order
    pub calls: Vec<DriverCall>,
    /// Frames in order, tagged with the call that delivered them
    pub frames: Vec<(DriverCall, Vec<u8>)>,
}

impl DriverLog {
    /// Most recently delivered frame
    #[must_use]
    pub fn last_frame(&self) -> Option<&[u8]> {
        self.frames.last().map(|(_, frame)| frame.as_slice())
    }

    /// Number of calls of kind `call`
    #[must_use]
    pub fn count(&self, call: DriverCall) -> usize {
        self.calls.iter().filter(|&&c| c == call).count()
    }
}

/// Shared view of a [`MemoryDriver`]'s log
pub type DriverHandle = Rc<RefCell<DriverLog>>;

/// Driver that records frames in memory
///
/// Used for tests and headless runs.
#[derive(Debug)]
pub struct MemoryDriver {
    size: Size,
    log: DriverHandle,
}

impl MemoryDriver {
    /// Creates a driver and a handle to inspect what it receives
    #[must_use]
    pub fn new(size: Size) -> (Self, DriverHandle) {
        let log = DriverHandle::default();
        (
            Self {
                size,
                log: Rc::clone(&log),
            },
            log,
        )
    }

    fn record(&self, call: DriverCall, buffer: Option<&[u8]>) -> DisplayResult<()> {
        if let Some(buffer) = buffer {
            check_len(self.size, buffer)?;
        }
        let mut log = self.log.borrow_mut();
        log.calls.push(call);
        if let Some(buffer) = buffer {
            log.frames.push((call, buffer.to_vec()));
        }
        Ok(())
    }
}

impl DisplayDriver for MemoryDriver {
    fn native_size(&self) -> Size {
        self.size
    }

    fn init(&mut self) -> DisplayResult<()> {
        self.record(DriverCall::Init, None)
    }

    fn init_fast(&mut self) -> DisplayResult<()> {
        self.record(DriverCall::InitFast, None)
    }

    fn clear(&mut self) -> DisplayResult<()> {
        self.record(DriverCall::Clear, None)
    }

    fn display(&mut self, buffer: &[u8]) -> DisplayResult<()> {
        self.record(DriverCall::Display, Some(buffer))
    }

    fn display_fast(&mut self, buffer: &[u8]) -> DisplayResult<()> {
        self.record(DriverCall::DisplayFast, Some(buffer))
    }

    fn display_partial(&mut self, buffer: &[u8]) -> DisplayResult<()> {
        self.record(DriverCall::DisplayPartial, Some(buffer))
    }

    fn display_part_base_image(&mut self, buffer: &[u8]) -> DisplayResult<()> {
        self.record(DriverCall::DisplayPartBaseImage, Some(buffer))
    }
}

/// Driver that writes every frame to a binary PBM (P4) file
///
/// The file shows the panel in its native orientation and is replaced on
/// each refresh, whatever the waveform.
#[derive(Debug, Clone)]
pub struct PbmFileDriver {
    path: PathBuf,
    size: Size,
}

impl PbmFileDriver {
    /// Creates a driver for a panel of `size` writing to `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, size: Size) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    /// Output file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_frame(&self, buffer: &[u8]) -> DisplayResult<()> {
        check_len(self.size, buffer)?;
        fs::write(&self.path, encode_pbm(self.size, buffer)).map_err(|source| DisplayError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::trace!(path = %self.path.display(), bytes = buffer.len(), "Frame written");
        Ok(())
    }
}

impl DisplayDriver for PbmFileDriver {
    fn native_size(&self) -> Size {
        self.size
    }

    fn init(&mut self) -> DisplayResult<()> {
        Ok(())
    }

    fn init_fast(&mut self) -> DisplayResult<()> {
        Ok(())
    }

    fn clear(&mut self) -> DisplayResult<()> {
        self.write_frame(&vec![0xFF; packed_len(self.size)])
    }

    fn display(&mut self, buffer: &[u8]) -> DisplayResult<()> {
        self.write_frame(buffer)
    }

    fn display_fast(&mut self, buffer: &[u8]) -> DisplayResult<()> {
        self.write_frame(buffer)
    }

    fn display_partial(&mut self, buffer: &[u8]) -> DisplayResult<()> {
        self.write_frame(buffer)
    }

    fn display_part_base_image(&mut self, buffer: &[u8]) -> DisplayResult<()> {
        self.write_frame(buffer)
    }
}

/// Encodes a packed panel buffer as a P4 PBM image
///
/// PBM uses `1` for black, so every bit is inverted.
#[must_use]
pub fn encode_pbm(size: Size, buffer: &[u8]) -> Vec<u8> {
    let mut out = format!("P4\n{} {}\n", size.width, size.height).into_bytes();
    out.extend(buffer.iter().map(|b| !b));
    out
}

fn check_len(size: Size, buffer: &[u8]) -> DisplayResult<()> {
    let expected = packed_len(size);
    if buffer.len() == expected {
        Ok(())
    } else {
        Err(DisplayError::BufferSize {
            expected,
            actual: buffer.len(),
        })
    }
}

/// Reads the color of native pixel `(x, y)` from a packed buffer
#[must_use]
pub fn native_pixel(size: Size, buffer: &[u8], x: u32, y: u32) -> Option<BinaryColor> {
    if x >= size.width || y >= size.height {
        return None;
    }
    let byte = buffer.get((y * size.width.div_ceil(8) + x / 8) as usize)?;
    Some(if byte & (0x80 >> (x % 8)) == 0 {
        BinaryColor::On
    } else {
        BinaryColor::Off
    })
}
