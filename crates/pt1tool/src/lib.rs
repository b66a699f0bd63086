//! Conversion between the legacy PT1 packed image container and PNG.
//!
//! # Crate Structure
//!
//! - [`codec`]: PT1 header, token stream, and pixel-layout variants
//! - [`raster`]: pixel buffers and conversion to/from the `image` crate

/// Re-export codec types.
pub mod codec {
    pub use pt1_codec::*;
}

/// Re-export raster boundary types.
pub mod raster {
    pub use pt1_raster::*;
}
