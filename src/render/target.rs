use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{RasterError, RasterResult};
use crate::geometry::range::ClipRect;
use crate::render::pixel_format::{PixelFormat, PixelOps};

/// Caller-owned framebuffer bound to a pixel format.
pub(crate) struct PixelTarget<'buf> {
    buf: &'buf mut [u8],
    width: u32,
    height: u32,
    stride: usize,
    ops: &'static dyn PixelOps,
}

impl std::fmt::Debug for PixelTarget<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelTarget")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .finish_non_exhaustive()
    }
}

impl<'buf> PixelTarget<'buf> {
    pub(crate) fn new(
        buf: &'buf mut [u8],
        width: u32,
        height: u32,
        stride: usize,
        format: PixelFormat,
    ) -> RasterResult<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::config(format!(
                "render target must be non-empty, got {width}x{height}"
            )));
        }
        if width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(RasterError::config(format!(
                "render target {width}x{height} exceeds the addressable range"
            )));
        }
        let row_bytes = (width as usize).saturating_mul(format.bytes_per_pixel());
        if stride < row_bytes {
            return Err(RasterError::config(format!(
                "stride {stride} is shorter than a {width}px {} row ({row_bytes} bytes)",
                format.name()
            )));
        }
        let needed = stride
            .saturating_mul(height as usize - 1)
            .saturating_add(row_bytes);
        if buf.len() < needed {
            return Err(RasterError::config(format!(
                "buffer holds {} bytes, {width}x{height} at stride {stride} needs {needed}",
                buf.len()
            )));
        }
        Ok(Self {
            buf,
            width,
            height,
            stride,
            ops: format.ops(),
        })
    }

    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    pub(crate) fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.buf[..]
    }

    fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.buf[start..]
    }

    fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        &mut self.buf[start..]
    }

    pub(crate) fn pixel(&self, x: i32, y: i32) -> Option<Rgba8Premul> {
        let (x, y) = (u32::try_from(x).ok()?, u32::try_from(y).ok()?);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.ops.pixel(self.row(y), x as usize))
    }

    /// Overwrite every pixel of `rect` (clipped to the target) with `c`.
    pub(crate) fn fill_rect(&mut self, rect: &ClipRect, c: Rgba8Premul) {
        let Some(r) = self.clip(rect) else {
            return;
        };
        let ops = self.ops;
        for y in r.y0..=r.y1 {
            ops.copy_hline(self.row_mut(y as u32), r.x0 as usize, r.width() as usize, c);
        }
    }

    /// Source-over `colors` onto row `y` starting at column `x0`.
    pub(crate) fn blend_colors(&mut self, y: i32, x0: i32, colors: &[Rgba8Premul]) {
        let Some((x, lo, hi)) = self.span(y, x0, colors.len()) else {
            return;
        };
        let ops = self.ops;
        ops.blend_color_hspan(self.row_mut(y as u32), x, &colors[lo..hi]);
    }

    /// Source-over solid `c` onto row `y` with per-pixel `covers`.
    pub(crate) fn blend_solid(&mut self, y: i32, x0: i32, c: Rgba8Premul, covers: &[u8]) {
        let Some((x, lo, hi)) = self.span(y, x0, covers.len()) else {
            return;
        };
        let ops = self.ops;
        ops.blend_solid_hspan(self.row_mut(y as u32), x, c, &covers[lo..hi]);
    }

    /// Target column and source sub-range of a span after horizontal clipping.
    fn span(&self, y: i32, x0: i32, len: usize) -> Option<(usize, usize, usize)> {
        if y < 0 || y as u32 >= self.height {
            return None;
        }
        let start = i64::from(x0);
        let end = (start + len as i64).min(i64::from(self.width));
        let first = start.max(0);
        if first >= end {
            return None;
        }
        let lo = (first - start) as usize;
        let hi = (end - start) as usize;
        Some((first as usize, lo, hi))
    }

    fn clip(&self, rect: &ClipRect) -> Option<ClipRect> {
        rect.intersect(&ClipRect::new(
            0,
            0,
            self.width as i32 - 1,
            self.height as i32 - 1,
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/target.rs"]
mod tests;
