//! Type 3: a type-2 color plane followed by a length-prefixed type-0 alpha plane.
//!
//! ```text
//! ┌─────────────────────┬────────────────────┬────────────────────────┐
//! │ color plane (tagged)│ alpha length (4B LE)│ alpha plane (tokens)   │
//! └─────────────────────┴────────────────────┴────────────────────────┘
//! ```
//!
//! Each plane is decoded with its own dictionary. Decoded pixels interleave the planes as
//! three color bytes followed by the alpha byte.

use bytes::{Buf, BufMut, BytesMut};
use tracing::warn;

use super::{color, raw, Decoded};
use crate::error::{Pt1Error, Result};
use crate::token::take;

const LENGTH_PREFIX: usize = 4;

pub fn decode(src: &[u8], width: u32, height: u32) -> Result<Decoded> {
    let count = width as usize * height as usize;

    let color = color::decode(src, width, height)?;
    let mut pos = color.consumed;
    let alpha_len = take(src, &mut pos, LENGTH_PREFIX)?.get_u32_le() as usize;

    let alpha_end = pos.checked_add(alpha_len).filter(|&end| end <= src.len());
    let Some(alpha_end) = alpha_end else {
        return Err(Pt1Error::TruncatedStream {
            offset: src.len(),
            needed: pos.saturating_add(alpha_len) - src.len(),
        });
    };

    let alpha = raw::decode_at(&src[..alpha_end], pos, count)?;
    if alpha.consumed < alpha_end {
        warn!(
            unused = alpha_end - alpha.consumed,
            "alpha section longer than its token stream"
        );
    }

    let mut pixels = Vec::with_capacity(count * 4);
    for (rgb, &a) in color.pixels.chunks_exact(3).zip(&alpha.pixels) {
        pixels.extend_from_slice(rgb);
        pixels.push(a);
    }

    Ok(Decoded {
        pixels,
        consumed: alpha_end,
    })
}

pub fn encode(pixels: &[u8], width: u32, height: u32) -> Result<BytesMut> {
    let count = width as usize * height as usize;
    if pixels.len() != count * 4 {
        return Err(Pt1Error::BufferLength {
            expected: count * 4,
            actual: pixels.len(),
        });
    }

    let mut rgb = Vec::with_capacity(count * 3);
    let mut alpha = Vec::with_capacity(count);
    for pixel in pixels.chunks_exact(4) {
        rgb.extend_from_slice(&pixel[..3]);
        alpha.push(pixel[3]);
    }

    let color = color::encode(&rgb, width, height)?;
    let alpha = raw::encode(&alpha);

    let mut dst = BytesMut::with_capacity(color.len() + LENGTH_PREFIX + alpha.len());
    dst.put_slice(&color);
    dst.put_u32_le(alpha.len() as u32);
    dst.put_slice(&alpha);
    Ok(dst)
}
