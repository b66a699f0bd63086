//! Type 2: 24-bit pixels, each preceded by a prediction tag.
//!
//! Pixels are visited row-major. Row 0 would predict from the pixel to the left, later rows
//! from the pixel above. Only tag 0 (three raw bytes, no prediction) has a known encoding,
//! so it is the only tag written and the only tag accepted.

use bytes::{BufMut, BytesMut};
use tracing::trace;

use super::{Decoded, Predictor};
use crate::error::{Pt1Error, Result};
use crate::token::take;

/// Tag for a pixel stored as three raw bytes.
pub const TAG_RAW: u8 = 0;

const PIXEL_BYTES: usize = 3;

pub fn decode(src: &[u8], width: u32, height: u32) -> Result<Decoded> {
    let mut pixels = Vec::with_capacity(width as usize * height as usize * PIXEL_BYTES);
    let mut pos = 0usize;

    for y in 0..height {
        for x in 0..width {
            let tag_at = pos;
            let tag = take(src, &mut pos, 1)?[0];
            if tag != TAG_RAW {
                let predictor = Predictor::for_pixel(x, y);
                trace!(offset = tag_at, tag, x, y, %predictor, "differential pixel");
                return Err(Pt1Error::UnsupportedPrediction {
                    tag,
                    x,
                    y,
                    predictor,
                });
            }
            pixels.extend_from_slice(take(src, &mut pos, PIXEL_BYTES)?);
        }
    }

    Ok(Decoded {
        pixels,
        consumed: pos,
    })
}

pub fn encode(pixels: &[u8], width: u32, height: u32) -> Result<BytesMut> {
    let count = width as usize * height as usize;
    if pixels.len() != count * PIXEL_BYTES {
        return Err(Pt1Error::BufferLength {
            expected: count * PIXEL_BYTES,
            actual: pixels.len(),
        });
    }

    let mut dst = BytesMut::with_capacity(count * (PIXEL_BYTES + 1));
    for pixel in pixels.chunks_exact(PIXEL_BYTES) {
        dst.put_u8(TAG_RAW);
        dst.put_slice(pixel);
    }
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Vec<u8> {
        (0..width * height * 3)
            .map(|i| (i % 251) as u8 ^ (i / 3) as u8)
            .collect()
    }

    #[test]
    fn roundtrip_various_dimensions() {
        for (w, h) in [(1, 1), (1, 9), (9, 1), (2, 2), (17, 5), (64, 64)] {
            let pixels = gradient(w, h);
            let packed = encode(&pixels, w, h).unwrap();
            assert_eq!(packed.len(), (w * h * 4) as usize);

            let decoded = decode(&packed, w, h).unwrap();
            assert_eq!(decoded.pixels, pixels, "{w}x{h}");
            assert_eq!(decoded.consumed, packed.len());
        }
    }

    #[test]
    fn every_pixel_is_tagged() {
        let packed = encode(&[10, 20, 30, 40, 50, 60], 2, 1).unwrap();
        assert_eq!(packed.as_ref(), &[0, 10, 20, 30, 0, 40, 50, 60]);
    }

    #[test]
    fn rejects_differential_tag_in_first_row() {
        let src = [0, 1, 2, 3, 1, 4, 5, 6];
        let err = decode(&src, 2, 1).unwrap_err();
        assert!(matches!(
            err,
            Pt1Error::UnsupportedPrediction {
                tag: 1,
                x: 1,
                y: 0,
                predictor: Predictor::Left
            }
        ));
    }

    #[test]
    fn rejects_differential_tag_in_later_row() {
        let src = [0, 1, 2, 3, 2];
        let err = decode(&src, 1, 2).unwrap_err();
        assert!(matches!(
            err,
            Pt1Error::UnsupportedPrediction {
                tag: 2,
                x: 0,
                y: 1,
                predictor: Predictor::Up
            }
        ));
    }

    #[test]
    fn truncated_pixel_fails() {
        let src = [0, 1, 2, 3, 0, 4];
        let err = decode(&src, 2, 1).unwrap_err();
        assert!(matches!(
            err,
            Pt1Error::TruncatedStream {
                offset: 6,
                needed: 2
            }
        ));
    }
}
