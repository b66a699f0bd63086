use bytes::{BufMut, BytesMut};
use tracing::{debug, warn};

use crate::error::{Pt1Error, Result};
use crate::header::{decode_header, encode_header, ImageType, Pt1Header, HEADER_SIZE};
use crate::variant;

/// Default cap on the decoded pixel buffer: 256 MiB.
pub const DEFAULT_MAX_UNPACKED: usize = 256 * 1024 * 1024;

/// Configuration for PT1 decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Largest `unpackedSize` accepted before any allocation. Default: 256 MiB.
    pub max_unpacked_size: usize,
    /// When true, payload bytes left over after decoding are an error instead of a warning.
    pub strict_packed_size: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_unpacked_size: DEFAULT_MAX_UNPACKED,
            strict_packed_size: false,
        }
    }
}

/// A decoded image: its header plus a tightly packed pixel buffer.
///
/// Pixels are 3 bytes (BGR) per pixel, or 4 bytes (BGRA) for [`ImageType::ColorAlpha`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pt1Image {
    pub header: Pt1Header,
    pub pixels: Vec<u8>,
}

impl Pt1Image {
    /// Wrap a pixel buffer, checking its length against the type and dimensions.
    pub fn new(image_type: ImageType, width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let header = Pt1Header::new(image_type, width, height)?;
        if pixels.len() != header.unpacked_len() {
            return Err(Pt1Error::BufferLength {
                expected: header.unpacked_len(),
                actual: pixels.len(),
            });
        }
        Ok(Self { header, pixels })
    }

    pub fn image_type(&self) -> ImageType {
        self.header.image_type
    }

    pub fn width(&self) -> u32 {
        self.header.width
    }

    pub fn height(&self) -> u32 {
        self.header.height
    }

    /// Encode header and payload into `dst`, returning the header as written.
    pub fn encode(&self, dst: &mut BytesMut) -> Result<Pt1Header> {
        write_container(self.header, &self.pixels, dst)
    }
}

/// Decode the payload that follows a validated header.
///
/// `payload` must hold at least `header.packed_size` bytes; anything past that is ignored.
pub fn decode_payload(header: &Pt1Header, payload: &[u8], config: &CodecConfig) -> Result<Vec<u8>> {
    if header.unpacked_len() > config.max_unpacked_size {
        return Err(Pt1Error::ImageTooLarge {
            size: header.unpacked_len(),
            max: config.max_unpacked_size,
        });
    }
    if payload.len() < header.packed_len() {
        return Err(Pt1Error::TruncatedStream {
            offset: HEADER_SIZE + payload.len(),
            needed: header.packed_len() - payload.len(),
        });
    }

    let payload = &payload[..header.packed_len()];
    let decoded = variant::decode(header.image_type, header.width, header.height, payload)?;

    let unused = payload.len() - decoded.consumed;
    if unused > 0 {
        if config.strict_packed_size {
            return Err(Pt1Error::TrailingData { unused });
        }
        warn!(unused, packed = payload.len(), "payload has unused trailing bytes");
    }
    Ok(decoded.pixels)
}

/// Decode a complete in-memory PT1 file with default configuration.
pub fn decode_file(src: &[u8]) -> Result<Pt1Image> {
    decode_file_with_config(src, &CodecConfig::default())
}

/// Decode a complete in-memory PT1 file.
pub fn decode_file_with_config(src: &[u8], config: &CodecConfig) -> Result<Pt1Image> {
    let header = decode_header(src)?;
    debug!(
        image_type = header.image_type.name(),
        width = header.width,
        height = header.height,
        packed = header.packed_size,
        "read header"
    );
    let pixels = decode_payload(&header, &src[HEADER_SIZE..], config)?;
    Ok(Pt1Image { header, pixels })
}

/// Encode a pixel buffer as a complete PT1 file appended to `dst`.
pub fn encode_image(
    image_type: ImageType,
    width: u32,
    height: u32,
    pixels: &[u8],
    dst: &mut BytesMut,
) -> Result<Pt1Header> {
    write_container(Pt1Header::new(image_type, width, height)?, pixels, dst)
}

fn write_container(header: Pt1Header, pixels: &[u8], dst: &mut BytesMut) -> Result<Pt1Header> {
    let payload = variant::encode(header.image_type, header.width, header.height, pixels)?;
    let packed_size = u32::try_from(payload.len())
        .ok()
        .filter(|&size| size <= i32::MAX as u32)
        .ok_or(Pt1Error::ImageTooLarge {
            size: payload.len(),
            max: i32::MAX as usize,
        })?;

    let header = Pt1Header {
        packed_size,
        ..header
    };
    dst.reserve(HEADER_SIZE + payload.len());
    encode_header(&header, dst);
    dst.put_slice(&payload);
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HeaderFault;

    #[test]
    fn raw_two_pixel_file() {
        let mut buf = BytesMut::new();
        let header = encode_image(ImageType::Raw, 2, 1, &[1, 2, 3, 4, 5, 6], &mut buf).unwrap();

        assert_eq!(header.packed_size, 7);
        assert_eq!(header.unpacked_size, 6);
        assert_eq!(&buf[HEADER_SIZE..], &[0xFF, 1, 2, 3, 4, 5, 6]);

        let image = decode_file(&buf).unwrap();
        assert_eq!(image.header, header);
        assert_eq!(image.pixels, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn alpha_single_pixel_file() {
        let mut buf = BytesMut::new();
        let header =
            encode_image(ImageType::ColorAlpha, 1, 1, &[10, 20, 30, 255], &mut buf).unwrap();

        assert_eq!(header.packed_size, 10);
        assert_eq!(header.unpacked_size, 4);
        assert_eq!(
            &buf[HEADER_SIZE..],
            &[0x00, 10, 20, 30, 2, 0, 0, 0, 0xFF, 255]
        );

        let image = decode_file(&buf).unwrap();
        assert_eq!(image.pixels, vec![10, 20, 30, 255]);
    }

    #[test]
    fn image_encode_preserves_offsets() {
        let mut image = Pt1Image::new(ImageType::Color, 2, 2, (0..12).collect()).unwrap();
        image.header.offset_x = 40;
        image.header.offset_y = 12;

        let mut buf = BytesMut::new();
        let written = image.encode(&mut buf).unwrap();
        assert_eq!(written.packed_size, 16);

        let decoded = decode_file(&buf).unwrap();
        assert_eq!(decoded.header.offset_x, 40);
        assert_eq!(decoded.header.offset_y, 12);
        assert_eq!(decoded.pixels, image.pixels);
    }

    #[test]
    fn image_new_checks_length() {
        let err = Pt1Image::new(ImageType::ColorAlpha, 2, 2, vec![0; 12]).unwrap_err();
        assert!(matches!(err, Pt1Error::BufferLength { expected: 16, .. }));
    }

    #[test]
    fn payload_shorter_than_packed_size() {
        let mut buf = BytesMut::new();
        encode_image(ImageType::Raw, 4, 4, &[7; 48], &mut buf).unwrap();
        buf.truncate(buf.len() - 3);

        let err = decode_file(&buf).unwrap_err();
        assert!(matches!(err, Pt1Error::TruncatedStream { needed: 3, .. }));
    }

    #[test]
    fn packed_size_bounds_the_decoder() {
        let mut buf = BytesMut::new();
        encode_image(ImageType::Raw, 4, 4, &[7; 48], &mut buf).unwrap();
        // Understate packedSize; the bytes are present but out of bounds.
        buf[24..28].copy_from_slice(&10i32.to_le_bytes());

        let err = decode_file(&buf).unwrap_err();
        assert!(matches!(err, Pt1Error::TruncatedStream { .. }));
    }

    #[test]
    fn trailing_bytes_tolerated_unless_strict() {
        let mut buf = BytesMut::new();
        encode_image(ImageType::Color, 1, 1, &[1, 2, 3], &mut buf).unwrap();
        buf[24..28].copy_from_slice(&6i32.to_le_bytes());
        buf.put_slice(&[0xAA, 0xBB]);

        assert_eq!(decode_file(&buf).unwrap().pixels, vec![1, 2, 3]);

        let strict = CodecConfig {
            strict_packed_size: true,
            ..CodecConfig::default()
        };
        let err = decode_file_with_config(&buf, &strict).unwrap_err();
        assert!(matches!(err, Pt1Error::TrailingData { unused: 2 }));
    }

    #[test]
    fn size_cap_checked_before_decoding() {
        let mut buf = BytesMut::new();
        encode_image(ImageType::Raw, 8, 8, &[0; 192], &mut buf).unwrap();
        let cfg = CodecConfig {
            max_unpacked_size: 100,
            ..CodecConfig::default()
        };
        let err = decode_file_with_config(&buf[..HEADER_SIZE], &cfg).unwrap_err();
        assert!(matches!(
            err,
            Pt1Error::ImageTooLarge {
                size: 192,
                max: 100
            }
        ));
    }

    #[test]
    fn header_errors_win_over_payload() {
        let mut buf = BytesMut::new();
        encode_image(ImageType::Raw, 1, 1, &[1, 2, 3], &mut buf).unwrap();
        buf[4..8].copy_from_slice(&0i32.to_le_bytes());

        let err = decode_file(&buf).unwrap_err();
        assert!(matches!(
            err,
            Pt1Error::InvalidHeader(HeaderFault::BadSentinel(0))
        ));
    }
}
