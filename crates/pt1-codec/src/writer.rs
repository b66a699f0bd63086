use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_image, Pt1Image};
use crate::error::{Pt1Error, Result};
use crate::header::{ImageType, Pt1Header};

const INITIAL_BUFFER_CAPACITY: usize = 64 * 1024;

/// Writes complete PT1 images to any `Write` sink.
pub struct Pt1Writer<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> Pt1Writer<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Write a decoded image, keeping its header offsets.
    pub fn write_image(&mut self, image: &Pt1Image) -> Result<Pt1Header> {
        self.buf.clear();
        let header = image.encode(&mut self.buf)?;
        self.write_buffered()?;
        Ok(header)
    }

    /// Encode and write a raw pixel buffer.
    pub fn write_pixels(
        &mut self,
        image_type: ImageType,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<Pt1Header> {
        self.buf.clear();
        let header = encode_image(image_type, width, height, pixels, &mut self.buf)?;
        self.write_buffered()?;
        Ok(header)
    }

    fn write_buffered(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(Pt1Error::Io(std::io::Error::from(ErrorKind::WriteZero))),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(Pt1Error::Io(err)),
            }
        }
        self.flush()
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(Pt1Error::Io(err)),
            }
        }
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying sink.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner sink.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::codec::decode_file;
    use crate::header::HEADER_SIZE;

    #[test]
    fn write_pixels_then_decode() {
        let mut writer = Pt1Writer::new(Cursor::new(Vec::<u8>::new()));
        let header = writer
            .write_pixels(ImageType::Color, 2, 1, &[1, 2, 3, 4, 5, 6])
            .unwrap();
        assert_eq!(header.packed_size, 8);

        let bytes = writer.into_inner().into_inner();
        assert_eq!(bytes.len(), HEADER_SIZE + 8);
        let image = decode_file(&bytes).unwrap();
        assert_eq!(image.pixels, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn write_image_roundtrip() {
        let mut image = Pt1Image::new(ImageType::ColorAlpha, 2, 2, (0..16).collect()).unwrap();
        image.header.offset_x = 3;

        let mut writer = Pt1Writer::new(Cursor::new(Vec::<u8>::new()));
        writer.write_image(&image).unwrap();

        let bytes = writer.into_inner().into_inner();
        let decoded = decode_file(&bytes).unwrap();
        assert_eq!(decoded.pixels, image.pixels);
        assert_eq!(decoded.header.offset_x, 3);
    }

    #[test]
    fn encode_errors_write_nothing() {
        let mut writer = Pt1Writer::new(Cursor::new(Vec::<u8>::new()));
        let err = writer
            .write_pixels(ImageType::Raw, 2, 2, &[0; 5])
            .unwrap_err();
        assert!(matches!(err, Pt1Error::BufferLength { .. }));
        assert!(writer.get_ref().get_ref().is_empty());
    }

    #[test]
    fn flush_propagates() {
        let sink = FlushTrackingWriter::default();
        let flag = Arc::clone(&sink.flushed);
        let mut writer = Pt1Writer::new(sink);

        writer.write_pixels(ImageType::Raw, 1, 1, &[1, 2, 3]).unwrap();

        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn handles_interrupted_write_and_flush() {
        let sink = InterruptedWriteThenFlush {
            wrote_once: false,
            flush_interrupted: false,
            data: Vec::new(),
        };
        let mut writer = Pt1Writer::new(sink);
        writer.write_pixels(ImageType::Raw, 1, 1, &[1, 2, 3]).unwrap();

        let inner = writer.into_inner();
        assert_eq!(inner.data.len(), HEADER_SIZE + 4);
    }

    #[test]
    fn write_zero_is_an_error() {
        let mut writer = Pt1Writer::new(ZeroWriter);
        let err = writer
            .write_pixels(ImageType::Raw, 1, 1, &[1, 2, 3])
            .unwrap_err();
        assert!(matches!(err, Pt1Error::Io(e) if e.kind() == ErrorKind::WriteZero));
    }

    #[test]
    fn accessors_and_into_inner() {
        let mut writer = Pt1Writer::new(Cursor::new(Vec::<u8>::new()));
        let _ = writer.get_ref();
        let _ = writer.get_mut();
        let _inner = writer.into_inner();
    }

    #[derive(Default)]
    struct FlushTrackingWriter {
        flushed: Arc<AtomicBool>,
        data: Vec<u8>,
    }

    impl Write for FlushTrackingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct InterruptedWriteThenFlush {
        wrote_once: bool,
        flush_interrupted: bool,
        data: Vec<u8>,
    }

    impl Write for InterruptedWriteThenFlush {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.wrote_once {
                self.wrote_once = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            if !self.flush_interrupted {
                self.flush_interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
