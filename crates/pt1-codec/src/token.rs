//! Control-byte token stream shared by the dictionary-backed variants.
//!
//! A control byte governs up to eight tokens, least significant bit first. A set bit is a
//! literal byte that is emitted and written into the [`Dictionary`]. A clear bit is a
//! back-reference whose layout is not known, so readers reject it.

use bytes::{BufMut, BytesMut};
use tracing::trace;

use crate::dictionary::Dictionary;
use crate::error::{Pt1Error, Result};

/// Tokens governed by one control byte.
pub const TOKENS_PER_CONTROL: usize = 8;

const ALL_LITERALS: u8 = 0xFF;

/// Take `len` bytes from `src` at `*pos`, advancing the position.
pub(crate) fn take<'a>(src: &'a [u8], pos: &mut usize, len: usize) -> Result<&'a [u8]> {
    let available = src.len().saturating_sub(*pos);
    if available < len {
        return Err(Pt1Error::TruncatedStream {
            offset: src.len(),
            needed: len - available,
        });
    }
    let bytes = &src[*pos..*pos + len];
    *pos += len;
    Ok(bytes)
}

/// Decodes literal tokens out of a packed byte slice.
///
/// Decoding is driven by the number of units the caller asks for, never by the number of
/// control bits: padding bits in the last control byte are left unread.
#[derive(Debug)]
pub struct TokenReader<'a> {
    src: &'a [u8],
    pos: usize,
    dict: Dictionary,
}

impl<'a> TokenReader<'a> {
    /// Read tokens from the start of `src`.
    pub fn new(src: &'a [u8]) -> Self {
        Self::at(src, 0)
    }

    /// Read tokens from `src[start..]`; reported offsets stay relative to `src`.
    pub fn at(src: &'a [u8], start: usize) -> Self {
        Self {
            src,
            pos: start,
            dict: Dictionary::new(),
        }
    }

    /// Decode exactly `count` units, handing each to `emit`.
    pub fn read_units(&mut self, count: usize, mut emit: impl FnMut(u8)) -> Result<()> {
        let mut produced = 0usize;
        while produced < count {
            let control_at = self.pos;
            let control = take(self.src, &mut self.pos, 1)?[0];
            trace!(offset = control_at, control, "control byte");

            for bit in 0..TOKENS_PER_CONTROL {
                if produced == count {
                    break;
                }
                if control & (1 << bit) == 0 {
                    return Err(Pt1Error::UnsupportedToken { offset: self.pos });
                }
                let literal = take(self.src, &mut self.pos, 1)?[0];
                self.dict.push(literal);
                emit(literal);
                produced += 1;
            }
        }
        Ok(())
    }

    /// Decode exactly `count` units into a new buffer.
    pub fn read_to_vec(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(count);
        self.read_units(count, |b| out.push(b))?;
        Ok(out)
    }

    /// Offset of the next unread byte in the source slice.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }
}

/// Encodes units as literal tokens.
///
/// Every control byte is written as `0xFF`, including the one heading a short final group;
/// readers stop at their target length so the surplus bits are never interpreted.
#[derive(Debug)]
pub struct TokenWriter {
    dst: BytesMut,
    dict: Dictionary,
    group_len: usize,
}

impl TokenWriter {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Pre-size the output for `units` literals.
    pub fn with_capacity(units: usize) -> Self {
        Self {
            dst: BytesMut::with_capacity(units + units.div_ceil(TOKENS_PER_CONTROL)),
            dict: Dictionary::new(),
            group_len: 0,
        }
    }

    /// Append one literal token.
    pub fn push_literal(&mut self, literal: u8) {
        if self.group_len == 0 {
            self.dst.put_u8(ALL_LITERALS);
        }
        self.dst.put_u8(literal);
        self.dict.push(literal);
        self.group_len = (self.group_len + 1) % TOKENS_PER_CONTROL;
    }

    pub fn extend(&mut self, literals: impl IntoIterator<Item = u8>) {
        for literal in literals {
            self.push_literal(literal);
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// Bytes written so far, including control bytes.
    pub fn len(&self) -> usize {
        self.dst.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dst.is_empty()
    }

    pub fn finish(self) -> BytesMut {
        self.dst
    }
}

impl Default for TokenWriter {
    fn default() -> Self {
        Self::new()
    }
}
