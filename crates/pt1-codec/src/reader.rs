use std::io::{ErrorKind, Read};

use tracing::debug;

use crate::codec::{decode_payload, CodecConfig, Pt1Image};
use crate::error::{Pt1Error, Result};
use crate::header::{decode_header, Pt1Header, HEADER_SIZE};

/// Largest single read while loading a payload. The buffer only grows by what was read, so a
/// header claiming a huge `packedSize` cannot force a matching allocation.
const PAYLOAD_CHUNK: usize = 8 * 1024;

/// Reads PT1 images from any `Read` source.
///
/// The header and the full payload are loaded before token processing starts, so a short
/// source fails with [`Pt1Error::TruncatedStream`] and never yields a partial image.
pub struct Pt1Reader<T> {
    inner: T,
    config: CodecConfig,
    offset: usize,
}

impl<T: Read> Pt1Reader<T> {
    /// Create a new reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, CodecConfig::default())
    }

    /// Create a new reader with explicit configuration.
    pub fn with_config(inner: T, config: CodecConfig) -> Self {
        Self {
            inner,
            config,
            offset: 0,
        }
    }

    /// Read and validate the 32-byte header.
    pub fn read_header(&mut self) -> Result<Pt1Header> {
        let mut raw = [0u8; HEADER_SIZE];
        self.fill(&mut raw)?;
        decode_header(&raw)
    }

    /// Read the header, load `packedSize` payload bytes, and decode the pixels.
    pub fn read_image(&mut self) -> Result<Pt1Image> {
        let header = self.read_header()?;
        if header.unpacked_len() > self.config.max_unpacked_size {
            return Err(Pt1Error::ImageTooLarge {
                size: header.unpacked_len(),
                max: self.config.max_unpacked_size,
            });
        }

        let payload = self.read_payload(header.packed_len())?;
        debug!(
            image_type = header.image_type.name(),
            width = header.width,
            height = header.height,
            packed = payload.len(),
            "loaded payload"
        );

        let pixels = decode_payload(&header, &payload, &self.config)?;
        Ok(Pt1Image { header, pixels })
    }

    fn read_payload(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut payload = Vec::with_capacity(len.min(PAYLOAD_CHUNK));
        let mut chunk = [0u8; PAYLOAD_CHUNK];
        while payload.len() < len {
            let want = (len - payload.len()).min(PAYLOAD_CHUNK);
            match self.inner.read(&mut chunk[..want]) {
                Ok(0) => {
                    return Err(Pt1Error::TruncatedStream {
                        offset: self.offset + payload.len(),
                        needed: len - payload.len(),
                    })
                }
                Ok(n) => payload.extend_from_slice(&chunk[..n]),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(Pt1Error::Io(err)),
            }
        }
        self.offset += len;
        Ok(payload)
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0usize;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(Pt1Error::TruncatedStream {
                        offset: self.offset + filled,
                        needed: buf.len() - filled,
                    })
                }
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(Pt1Error::Io(err)),
            }
        }
        self.offset += filled;
        Ok(())
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying source.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner source.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current reader configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}
