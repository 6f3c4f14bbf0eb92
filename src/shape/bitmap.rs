use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{RasterError, RasterResult};

/// Byte layout of decoded bitmap pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitmapFormat {
    /// 3 bytes per pixel, opaque.
    Rgb24,
    /// 4 bytes per pixel, premultiplied alpha.
    Rgba32,
}

impl BitmapFormat {
    /// Bytes per pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb24 => 3,
            Self::Rgba32 => 4,
        }
    }
}

/// A decoded image owned by the renderer's caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    stride: usize,
    format: BitmapFormat,
    data: Vec<u8>,
}

/// Decoded video frames share the bitmap representation.
pub type VideoFrame = Bitmap;

impl Bitmap {
    /// Wrap raw rows. RGBA input is straight alpha and is premultiplied here.
    pub fn new(
        width: u32,
        height: u32,
        stride: usize,
        format: BitmapFormat,
        mut data: Vec<u8>,
    ) -> RasterResult<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::config(format!(
                "bitmap dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let row = width as usize * format.bytes_per_pixel();
        if stride < row {
            return Err(RasterError::unsupported(format!(
                "bitmap stride {stride} shorter than a {format:?} row of {row} bytes"
            )));
        }
        let need = stride * (height as usize - 1) + row;
        if data.len() < need {
            return Err(RasterError::unsupported(format!(
                "bitmap buffer holds {} bytes, {width}x{height} {format:?} needs {need}",
                data.len()
            )));
        }
        if format == BitmapFormat::Rgba32 {
            for y in 0..height as usize {
                for px in data[y * stride..y * stride + row].chunks_exact_mut(4) {
                    let p = Rgba8Premul::from_straight_rgba(px[0], px[1], px[2], px[3]);
                    px.copy_from_slice(&[p.r, p.g, p.b, p.a]);
                }
            }
        }
        Ok(Self {
            width,
            height,
            stride,
            format,
            data,
        })
    }

    /// Tightly packed RGB rows.
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> RasterResult<Self> {
        Self::new(width, height, width as usize * 3, BitmapFormat::Rgb24, data)
    }

    /// Tightly packed straight-alpha RGBA rows.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> RasterResult<Self> {
        Self::new(width, height, width as usize * 4, BitmapFormat::Rgba32, data)
    }

    /// Take pixels from a decoded `image` buffer.
    pub fn from_rgba_image(img: image::RgbaImage) -> RasterResult<Self> {
        let (w, h) = img.dimensions();
        Self::from_rgba(w, h, img.into_raw())
    }

    /// Take pixels from a decoded opaque `image` buffer.
    pub fn from_rgb_image(img: image::RgbImage) -> RasterResult<Self> {
        let (w, h) = img.dimensions();
        Self::from_rgb(w, h, img.into_raw())
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel layout.
    pub fn format(&self) -> BitmapFormat {
        self.format
    }

    /// Premultiplied pixel; callers keep coordinates in range.
    pub(crate) fn pixel(&self, x: u32, y: u32) -> Rgba8Premul {
        let i = y as usize * self.stride + x as usize * self.format.bytes_per_pixel();
        match self.format {
            BitmapFormat::Rgb24 => {
                Rgba8Premul::new(self.data[i], self.data[i + 1], self.data[i + 2], 255)
            }
            BitmapFormat::Rgba32 => Rgba8Premul::new(
                self.data[i],
                self.data[i + 1],
                self.data[i + 2],
                self.data[i + 3],
            ),
        }
    }

    /// Pixel lookup that returns `None` outside the image.
    pub(crate) fn pixel_checked(&self, x: i64, y: i64) -> Option<Rgba8Premul> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some(self.pixel(x as u32, y as u32))
    }

    /// Pixel lookup wrapping coordinates around the image.
    pub(crate) fn pixel_wrapped(&self, x: i64, y: i64) -> Rgba8Premul {
        let x = x.rem_euclid(i64::from(self.width)) as u32;
        let y = y.rem_euclid(i64::from(self.height)) as u32;
        self.pixel(x, y)
    }

    /// Pixel lookup clamping coordinates to the nearest edge.
    pub(crate) fn pixel_clamped(&self, x: i64, y: i64) -> Rgba8Premul {
        let x = x.clamp(0, i64::from(self.width) - 1) as u32;
        let y = y.clamp(0, i64::from(self.height) - 1) as u32;
        self.pixel(x, y)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shape/bitmap.rs"]
mod tests;
