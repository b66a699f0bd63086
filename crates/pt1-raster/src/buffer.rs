use std::fmt;

use pt1_codec::{ImageType, Pt1Image};

use crate::error::{RasterError, Result};

/// Byte order of the channels inside one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelOrder {
    /// Blue, green, red.
    Bgr,
    /// Blue, green, red, alpha.
    Bgra,
}

impl ChannelOrder {
    /// The order PT1 buffers of `image_type` are stored in.
    pub fn for_type(image_type: ImageType) -> Self {
        match image_type {
            ImageType::ColorAlpha => Self::Bgra,
            _ => Self::Bgr,
        }
    }

    pub fn channels(self) -> usize {
        match self {
            Self::Bgr => 3,
            Self::Bgra => 4,
        }
    }

    pub fn has_alpha(self) -> bool {
        matches!(self, Self::Bgra)
    }
}

impl fmt::Display for ChannelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bgr => "BGR",
            Self::Bgra => "BGRA",
        })
    }
}

/// Pixel bytes plus the layout needed to interpret them.
///
/// Rows are `stride` bytes apart; any bytes past `width * channels` in a row are padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
    stride: usize,
    order: ChannelOrder,
}

impl PixelBuffer {
    /// Wrap `data`, validating stride and length.
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        stride: usize,
        order: ChannelOrder,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyImage { width, height });
        }
        let row = width as usize * order.channels();
        if stride < row {
            return Err(RasterError::StrideTooSmall { stride, row });
        }
        // The last row does not need its padding.
        let needed = stride
            .checked_mul(height as usize - 1)
            .and_then(|rows| rows.checked_add(row));
        match needed {
            Some(needed) if data.len() >= needed => {}
            _ => {
                return Err(RasterError::BufferTooShort {
                    len: data.len(),
                    needed: needed.unwrap_or(usize::MAX),
                })
            }
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
            order,
        })
    }

    /// Wrap a buffer whose rows have no padding.
    pub fn packed(data: Vec<u8>, width: u32, height: u32, order: ChannelOrder) -> Result<Self> {
        let stride = width as usize * order.channels();
        Self::new(data, width, height, stride, order)
    }

    /// View a decoded PT1 image as a buffer.
    pub fn from_pt1(image: Pt1Image) -> Result<Self> {
        let order = ChannelOrder::for_type(image.image_type());
        Self::packed(image.pixels, image.header.width, image.header.height, order)
    }

    /// Turn the buffer into a PT1 image of `image_type`, dropping row padding.
    ///
    /// Channels are adapted when the buffer order differs from what the type stores:
    /// alpha is dropped for 24-bit types and filled opaque for type 3.
    pub fn into_pt1(self, image_type: ImageType) -> Result<Pt1Image> {
        let target = ChannelOrder::for_type(image_type);
        let (width, height) = (self.width, self.height);
        let pixels = self.into_packed(target);
        Ok(Pt1Image::new(image_type, width, height, pixels)?)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Pixel bytes of row `y`, without padding.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize * self.order.channels()]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.height).map(move |y| self.row(y))
    }

    /// Copy out tightly packed pixels in `order`.
    pub fn into_packed(self, order: ChannelOrder) -> Vec<u8> {
        let row = self.width as usize * self.order.channels();
        if order == self.order && self.stride == row && self.data.len() == row * self.height as usize
        {
            return self.data;
        }

        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * order.channels());
        for row in self.rows() {
            for pixel in row.chunks_exact(self.order.channels()) {
                out.extend_from_slice(&pixel[..3]);
                if order.has_alpha() {
                    out.push(pixel.get(3).copied().unwrap_or(u8::MAX));
                }
            }
        }
        out
    }
}
