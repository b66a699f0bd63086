use pt1_codec::Pt1Error;

/// Errors that can occur at the raster boundary.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// The row stride cannot hold one row of pixels.
    #[error("stride {stride} is smaller than a row ({row} bytes)")]
    StrideTooSmall { stride: usize, row: usize },

    /// The buffer does not cover `stride * height` bytes.
    #[error("pixel buffer too short ({len} bytes, need {needed})")]
    BufferTooShort { len: usize, needed: usize },

    /// Width or height is zero.
    #[error("empty image ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// The external image library failed to load or save.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The PT1 codec rejected the buffer.
    #[error("PT1 error: {0}")]
    Codec(#[from] Pt1Error),
}

pub type Result<T> = std::result::Result<T, RasterError>;
