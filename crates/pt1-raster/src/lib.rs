//! Pixel buffer boundary between PT1 images and standard raster formats.
//!
//! The codec only deals in flat byte buffers. This crate attaches the layout needed to hand
//! those bytes to the `image` crate (width, height, stride, channel order) and back.

pub mod buffer;
pub mod convert;
pub mod error;

pub use buffer::{ChannelOrder, PixelBuffer};
pub use convert::{
    dynamic_to_pt1, from_dynamic, load, pt1_to_dynamic, save_png, select_type, to_dynamic,
};
pub use error::{RasterError, Result};
