//! Conversion between [`PixelBuffer`]s and `image` crate values.
//!
//! PT1 buffers are BGR/BGRA; `image` works in RGB/RGBA. Every crossing swaps the first and
//! third channel of each pixel.

use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use pt1_codec::{ImageType, Pt1Image};
use tracing::debug;

use crate::buffer::{ChannelOrder, PixelBuffer};
use crate::error::{RasterError, Result};

/// Pick the PT1 type that keeps everything `img` carries.
///
/// Alpha selects type 3, single-channel images type 1, everything else type 2.
pub fn select_type(img: &DynamicImage) -> ImageType {
    let color = img.color();
    if color.has_alpha() {
        ImageType::ColorAlpha
    } else if !color.has_color() {
        ImageType::Grayscale
    } else {
        ImageType::Color
    }
}

/// Build an RGB or RGBA image from a BGR or BGRA buffer.
pub fn to_dynamic(buf: &PixelBuffer) -> Result<DynamicImage> {
    let channels = buf.order().channels();
    let mut data = Vec::with_capacity(buf.width() as usize * buf.height() as usize * channels);
    for row in buf.rows() {
        for pixel in row.chunks_exact(channels) {
            data.extend_from_slice(&[pixel[2], pixel[1], pixel[0]]);
            if channels == 4 {
                data.push(pixel[3]);
            }
        }
    }

    let len = data.len();
    let image = match buf.order() {
        ChannelOrder::Bgr => RgbImage::from_raw(buf.width(), buf.height(), data)
            .map(DynamicImage::ImageRgb8),
        ChannelOrder::Bgra => RgbaImage::from_raw(buf.width(), buf.height(), data)
            .map(DynamicImage::ImageRgba8),
    };
    image.ok_or(RasterError::BufferTooShort {
        len,
        needed: buf.width() as usize * buf.height() as usize * channels,
    })
}

/// Flatten any `image` value into a packed buffer in `order`.
pub fn from_dynamic(img: &DynamicImage, order: ChannelOrder) -> Result<PixelBuffer> {
    let (width, height) = (img.width(), img.height());
    let mut data = match order {
        ChannelOrder::Bgr => img.to_rgb8().into_raw(),
        ChannelOrder::Bgra => img.to_rgba8().into_raw(),
    };
    for pixel in data.chunks_exact_mut(order.channels()) {
        pixel.swap(0, 2);
    }
    PixelBuffer::packed(data, width, height, order)
}

/// Convert a decoded PT1 image into an `image` value.
pub fn pt1_to_dynamic(image: Pt1Image) -> Result<DynamicImage> {
    to_dynamic(&PixelBuffer::from_pt1(image)?)
}

/// Convert an `image` value into a PT1 image of `image_type`.
pub fn dynamic_to_pt1(img: &DynamicImage, image_type: ImageType) -> Result<Pt1Image> {
    let buf = from_dynamic(img, ChannelOrder::for_type(image_type))?;
    buf.into_pt1(image_type)
}

/// Load any raster format the `image` crate understands.
pub fn load(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let path = path.as_ref();
    let img = image::open(path)?;
    debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        color = ?img.color(),
        "loaded raster"
    );
    Ok(img)
}

/// Save a buffer as PNG.
pub fn save_png(buf: &PixelBuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    to_dynamic(buf)?.save_with_format(path, ImageFormat::Png)?;
    debug!(path = %path.display(), order = %buf.order(), "saved png");
    Ok(())
}
