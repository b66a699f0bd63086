use crate::variant::Predictor;

/// Errors that can occur while reading or writing PT1 images.
#[derive(Debug, thiserror::Error)]
pub enum Pt1Error {
    /// The container header is structurally invalid.
    #[error("invalid PT1 header: {0}")]
    InvalidHeader(#[from] HeaderFault),

    /// The declared unpacked size disagrees with the image dimensions.
    #[error("unpacked size mismatch (header says {declared} bytes, dimensions imply {expected})")]
    SizeMismatch { declared: i64, expected: u64 },

    /// The input ended before the expected data was available.
    #[error("truncated stream at offset {offset} (needed {needed} more bytes)")]
    TruncatedStream { offset: usize, needed: usize },

    /// A back-reference token was found; only literal tokens are understood.
    #[error("unsupported back-reference token at offset {offset}")]
    UnsupportedToken { offset: usize },

    /// A pixel carried a differential prediction tag.
    #[error("unsupported prediction tag {tag:#04x} at pixel ({x}, {y}), predictor {predictor}")]
    UnsupportedPrediction {
        tag: u8,
        x: u32,
        y: u32,
        predictor: Predictor,
    },

    /// The pixel buffer handed to an encoder has the wrong length.
    #[error("pixel buffer length {actual} does not match expected {expected}")]
    BufferLength { expected: usize, actual: usize },

    /// The decoded image would exceed the configured size cap.
    #[error("image too large ({size} bytes, max {max})")]
    ImageTooLarge { size: usize, max: usize },

    /// Strict mode: the payload holds bytes the decoder never consumed.
    #[error("{unused} unused payload bytes after decoding")]
    TrailingData { unused: usize },

    /// An I/O error occurred while reading or writing the container.
    #[error("PT1 I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Specific reasons a header fails structural validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HeaderFault {
    #[error("unknown image type {0} (expected 0-3)")]
    UnknownType(i32),

    #[error("bad sentinel {0} (expected -1)")]
    BadSentinel(i32),

    #[error("non-positive dimensions {width}x{height}")]
    BadDimensions { width: i32, height: i32 },

    #[error("negative packed size {0}")]
    NegativePackedSize(i32),
}

pub type Result<T> = std::result::Result<T, Pt1Error>;
