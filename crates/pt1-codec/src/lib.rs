//! Reader and writer for the PT1 packed image container.
//!
//! A PT1 file is a 32-byte little-endian header followed by a variant-specific payload:
//! - type 0: literal tokens over the raw pixel bytes
//! - type 1: literal tokens over grayscale samples, expanded to three bytes per pixel
//! - type 2: one prediction tag plus three raw bytes per pixel
//! - type 3: a type-2 color plane followed by a length-prefixed type-0 alpha plane
//!
//! Token streams run against a preset 4096-byte [`dictionary`] window that is rebuilt for
//! every image. Decoded buffers are tightly packed BGR, or BGRA for type 3.

pub mod codec;
pub mod dictionary;
pub mod error;
pub mod header;
pub mod reader;
pub mod token;
pub mod variant;
pub mod writer;

pub use codec::{
    decode_file, decode_file_with_config, decode_payload, encode_image, CodecConfig, Pt1Image,
    DEFAULT_MAX_UNPACKED,
};
pub use dictionary::{seed_window, Dictionary, INITIAL_CURSOR, WINDOW_SIZE};
pub use error::{HeaderFault, Pt1Error, Result};
pub use header::{decode_header, encode_header, ImageType, Pt1Header, HEADER_SIZE, SENTINEL};
pub use reader::Pt1Reader;
pub use token::{TokenReader, TokenWriter};
pub use variant::{Decoded, Predictor};
pub use writer::Pt1Writer;
