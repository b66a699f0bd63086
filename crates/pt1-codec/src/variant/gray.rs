//! Type 1: one token per sample, expanded to three equal bytes per pixel on decode.
//!
//! The token stream and the dictionary only ever see samples, so a `w x h` image is
//! `w * h` tokens even though the decoded buffer is `3 * w * h` bytes.

use bytes::BytesMut;
use tracing::warn;

use super::Decoded;
use crate::error::{Pt1Error, Result};
use crate::token::{TokenReader, TokenWriter};

pub fn decode(src: &[u8], samples: usize) -> Result<Decoded> {
    let mut pixels = Vec::with_capacity(samples * 3);
    let mut reader = TokenReader::new(src);
    reader.read_units(samples, |sample| pixels.extend_from_slice(&[sample; 3]))?;
    Ok(Decoded {
        pixels,
        consumed: reader.position(),
    })
}

/// Pack a 3-byte-per-pixel buffer, keeping the first byte of every triplet.
pub fn encode(pixels: &[u8]) -> Result<BytesMut> {
    if pixels.len() % 3 != 0 {
        return Err(Pt1Error::BufferLength {
            expected: pixels.len() - pixels.len() % 3,
            actual: pixels.len(),
        });
    }

    let triplets = pixels.chunks_exact(3);
    let mut writer = TokenWriter::with_capacity(triplets.len());
    let mut mixed = 0usize;
    for triplet in triplets {
        if triplet[1] != triplet[0] || triplet[2] != triplet[0] {
            mixed += 1;
        }
        writer.push_literal(triplet[0]);
    }
    if mixed > 0 {
        warn!(pixels = mixed, "non-gray pixels collapsed to their first channel");
    }
    Ok(writer.finish())
}
