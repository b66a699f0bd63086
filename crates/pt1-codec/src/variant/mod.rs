//! Pixel-layout variants, one per header `type`.

use std::fmt;

use bytes::BytesMut;
use tracing::debug;

use crate::error::{Pt1Error, Result};
use crate::header::ImageType;

pub mod alpha;
pub mod color;
pub mod gray;
pub mod raw;

/// A decoded plane plus the number of payload bytes it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub pixels: Vec<u8>,
    /// Offset just past the last payload byte read.
    pub consumed: usize,
}

/// Neighbor a differential pixel would be predicted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predictor {
    /// First pixel of the image.
    None,
    /// Preceding pixel in the same row (row 0).
    Left,
    /// Pixel directly above (every later row).
    Up,
}

impl Predictor {
    pub fn for_pixel(x: u32, y: u32) -> Self {
        match (x, y) {
            (0, 0) => Self::None,
            (_, 0) => Self::Left,
            _ => Self::Up,
        }
    }
}

impl fmt::Display for Predictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Left => "left",
            Self::Up => "up",
        })
    }
}

/// Decode a payload with the variant selected by `image_type`.
///
/// The returned buffer holds `width * height * bpp / 8` bytes.
pub fn decode(image_type: ImageType, width: u32, height: u32, payload: &[u8]) -> Result<Decoded> {
    let pixels = width as usize * height as usize;
    let decoded = match image_type {
        ImageType::Raw => raw::decode(payload, pixels * 3)?,
        ImageType::Grayscale => gray::decode(payload, pixels)?,
        ImageType::Color => color::decode(payload, width, height)?,
        ImageType::ColorAlpha => alpha::decode(payload, width, height)?,
    };
    debug!(
        image_type = image_type.name(),
        width,
        height,
        consumed = decoded.consumed,
        unpacked = decoded.pixels.len(),
        "decoded payload"
    );
    Ok(decoded)
}

/// Encode a pixel buffer with the variant selected by `image_type`.
///
/// `pixels` must hold exactly `width * height * bpp / 8` bytes.
pub fn encode(image_type: ImageType, width: u32, height: u32, pixels: &[u8]) -> Result<BytesMut> {
    let expected = width as usize * height as usize * image_type.bytes_per_pixel();
    if pixels.len() != expected {
        return Err(Pt1Error::BufferLength {
            expected,
            actual: pixels.len(),
        });
    }
    let packed = match image_type {
        ImageType::Raw => raw::encode(pixels),
        ImageType::Grayscale => gray::encode(pixels)?,
        ImageType::Color => color::encode(pixels, width, height)?,
        ImageType::ColorAlpha => alpha::encode(pixels, width, height)?,
    };
    debug!(
        image_type = image_type.name(),
        width,
        height,
        packed = packed.len(),
        unpacked = pixels.len(),
        "encoded payload"
    );
    Ok(packed)
}
