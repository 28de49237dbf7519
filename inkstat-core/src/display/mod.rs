//! E-ink display rendering
//!
//! - [`grid`] - line layout and horizontal placement
//! - [`renderer`] - page drawing and refresh
//! - [`surface`] - orientation, buffer packing and panel drivers

mod font;
mod framebuffer;
pub mod grid;
pub mod renderer;
pub mod surface;

pub use font::{DEFAULT_TRUETYPE_SIZE, FontChoice, FontError, FontFace, TrueTypeFont};
pub use framebuffer::{Framebuffer, INK, PAPER};
pub use grid::{GridError, Justify, LineGrid, LineSpec, resolve_center, resolve_x};
pub use renderer::{INIT_BANNER, Placement, RenderError, Renderer};
pub use surface::{
    DisplayDriver, DisplayError, DisplayResult, DriverCall, DriverHandle, DriverLog,
    EPD_2IN13_V4_SIZE, MemoryDriver, Orientation, PbmFileDriver, RefreshMode, Surface,
    encode_pbm, native_pixel, packed_len,
};
