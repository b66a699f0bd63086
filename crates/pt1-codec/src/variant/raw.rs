//! Type 0: one literal token per buffer byte. Also packs the alpha plane of type 3.

use bytes::BytesMut;

use super::Decoded;
use crate::error::Result;
use crate::token::{TokenReader, TokenWriter};

/// Decode `len` bytes from the start of `src`.
pub fn decode(src: &[u8], len: usize) -> Result<Decoded> {
    decode_at(src, 0, len)
}

/// Decode `len` bytes starting at `src[start..]`.
pub(crate) fn decode_at(src: &[u8], start: usize, len: usize) -> Result<Decoded> {
    let mut reader = TokenReader::at(src, start);
    let pixels = reader.read_to_vec(len)?;
    Ok(Decoded {
        pixels,
        consumed: reader.position(),
    })
}

pub fn encode(data: &[u8]) -> BytesMut {
    let mut writer = TokenWriter::with_capacity(data.len());
    writer.extend(data.iter().copied());
    writer.finish()
}
