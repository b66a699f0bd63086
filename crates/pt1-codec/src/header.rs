use std::fmt;

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{HeaderFault, Pt1Error, Result};

/// Header: eight little-endian `i32` fields = 32 bytes.
pub const HEADER_SIZE: usize = 32;

/// Value the field after `type` must hold.
pub const SENTINEL: i32 = -1;

/// Pixel layout selected by the header `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageType {
    /// Plain byte stream, 24 bpp.
    Raw = 0,
    /// One sample per pixel, expanded to 24 bpp.
    Grayscale = 1,
    /// 24 bpp with per-pixel prediction tags.
    Color = 2,
    /// Color plane plus a separately packed alpha plane, 32 bpp.
    ColorAlpha = 3,
}

impl ImageType {
    pub fn from_raw(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Raw),
            1 => Some(Self::Grayscale),
            2 => Some(Self::Color),
            3 => Some(Self::ColorAlpha),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// Bits per pixel of the decoded buffer.
    pub fn bpp(self) -> u32 {
        match self {
            Self::ColorAlpha => 32,
            _ => 24,
        }
    }

    /// Bytes per pixel of the decoded buffer.
    pub fn bytes_per_pixel(self) -> usize {
        (self.bpp() / 8) as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Grayscale => "grayscale",
            Self::Color => "color",
            Self::ColorAlpha => "color+alpha",
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_raw(), self.name())
    }
}

/// A validated PT1 container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pt1Header {
    pub image_type: ImageType,
    /// Informational placement offsets; carried through untouched.
    pub offset_x: i32,
    pub offset_y: i32,
    pub width: u32,
    pub height: u32,
    /// Byte length of the payload following the header.
    pub packed_size: u32,
    /// Byte length of the decoded pixel buffer.
    pub unpacked_size: u32,
}

impl Pt1Header {
    /// Build a header for an image of the given type and dimensions.
    ///
    /// `packed_size` starts at zero; the writer fills it in once the payload is known.
    pub fn new(image_type: ImageType, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(HeaderFault::BadDimensions {
                width: width.min(i32::MAX as u32) as i32,
                height: height.min(i32::MAX as u32) as i32,
            }
            .into());
        }
        let expected = expected_unpacked_size(image_type, width, height);
        let unpacked_size = u32::try_from(expected)
            .ok()
            .filter(|&size| size <= i32::MAX as u32)
            .ok_or(Pt1Error::ImageTooLarge {
                size: usize::try_from(expected).unwrap_or(usize::MAX),
                max: i32::MAX as usize,
            })?;

        Ok(Self {
            image_type,
            offset_x: 0,
            offset_y: 0,
            width,
            height,
            packed_size: 0,
            unpacked_size,
        })
    }

    pub fn bpp(&self) -> u32 {
        self.image_type.bpp()
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn unpacked_len(&self) -> usize {
        self.unpacked_size as usize
    }

    pub fn packed_len(&self) -> usize {
        self.packed_size as usize
    }

    /// Total on-disk size of the container (header + payload).
    pub fn file_size(&self) -> usize {
        HEADER_SIZE + self.packed_len()
    }
}

fn expected_unpacked_size(image_type: ImageType, width: u32, height: u32) -> u64 {
    u64::from(width)
        .saturating_mul(u64::from(height))
        .saturating_mul(image_type.bytes_per_pixel() as u64)
}

/// Encode a header into the wire format.
///
/// Wire format (all fields `i32` little-endian):
/// ```text
/// ┌──────┬──────────┬─────────┬─────────┬───────┬────────┬────────────┬──────────────┐
/// │ type │ sentinel │ offsetX │ offsetY │ width │ height │ packedSize │ unpackedSize │
/// │  0-3 │    -1    │         │         │  > 0  │  > 0   │            │              │
/// └──────┴──────────┴─────────┴─────────┴───────┴────────┴────────────┴──────────────┘
/// ```
pub fn encode_header(header: &Pt1Header, dst: &mut BytesMut) {
    dst.reserve(HEADER_SIZE);
    dst.put_i32_le(header.image_type.as_raw());
    dst.put_i32_le(SENTINEL);
    dst.put_i32_le(header.offset_x);
    dst.put_i32_le(header.offset_y);
    dst.put_i32_le(header.width as i32);
    dst.put_i32_le(header.height as i32);
    dst.put_i32_le(header.packed_size as i32);
    dst.put_i32_le(header.unpacked_size as i32);
}

/// Decode and validate a header from the start of `src`.
///
/// Type and sentinel are checked first, then dimensions, then the size invariant
/// `unpackedSize == width * height * bpp / 8`. Nothing past the header is touched.
pub fn decode_header(src: &[u8]) -> Result<Pt1Header> {
    if src.len() < HEADER_SIZE {
        return Err(Pt1Error::TruncatedStream {
            offset: src.len(),
            needed: HEADER_SIZE - src.len(),
        });
    }

    let mut buf = &src[..HEADER_SIZE];
    let raw_type = buf.get_i32_le();
    let image_type = ImageType::from_raw(raw_type).ok_or(HeaderFault::UnknownType(raw_type))?;

    let sentinel = buf.get_i32_le();
    if sentinel != SENTINEL {
        return Err(HeaderFault::BadSentinel(sentinel).into());
    }

    let offset_x = buf.get_i32_le();
    let offset_y = buf.get_i32_le();
    let width = buf.get_i32_le();
    let height = buf.get_i32_le();
    let packed_size = buf.get_i32_le();
    let unpacked_size = buf.get_i32_le();

    if width <= 0 || height <= 0 {
        return Err(HeaderFault::BadDimensions { width, height }.into());
    }
    if packed_size < 0 {
        return Err(HeaderFault::NegativePackedSize(packed_size).into());
    }

    let expected = expected_unpacked_size(image_type, width as u32, height as u32);
    if unpacked_size < 0 || unpacked_size as u64 != expected {
        return Err(Pt1Error::SizeMismatch {
            declared: i64::from(unpacked_size),
            expected,
        });
    }

    Ok(Pt1Header {
        image_type,
        offset_x,
        offset_y,
        width: width as u32,
        height: height as u32,
        packed_size: packed_size as u32,
        unpacked_size: unpacked_size as u32,
    })
}
