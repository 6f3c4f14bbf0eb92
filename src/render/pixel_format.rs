//! Framebuffer pixel layouts.
//!
//! Each [`PixelFormat`] resolves once to a static [`PixelOps`] strategy whose span
//! loops are monomorphised per layout, so the per-pixel path never branches on
//! the format.

use std::marker::PhantomData;

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{RasterError, RasterResult};
use crate::foundation::math::blend_premul;

/// Supported framebuffer layouts. Names describe byte order in memory, except
/// the 16-bit formats which are native-endian words.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PixelFormat {
    /// 16-bit `0RRRRRGGGGGBBBBB`.
    Rgb555,
    /// 16-bit `RRRRRGGGGGGBBBBB`.
    Rgb565,
    /// Bytes R, G, B.
    Rgb24,
    /// Bytes B, G, R.
    Bgr24,
    /// Bytes R, G, B, A.
    Rgba32,
    /// Bytes B, G, R, A.
    Bgra32,
    /// Bytes A, R, G, B.
    Argb32,
    /// Bytes A, B, G, R.
    Abgr32,
}

/// Position of one colour channel inside a packed pixel, in bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelMask {
    /// Bit offset of the least significant bit.
    pub offset: u32,
    /// Bit count.
    pub size: u32,
}

impl ChannelMask {
    /// Build a channel description.
    pub const fn new(offset: u32, size: u32) -> Self {
        Self { offset, size }
    }
}

impl PixelFormat {
    /// Every supported format.
    pub const ALL: [PixelFormat; 8] = [
        Self::Rgb555,
        Self::Rgb565,
        Self::Rgb24,
        Self::Bgr24,
        Self::Rgba32,
        Self::Bgra32,
        Self::Argb32,
        Self::Abgr32,
    ];

    /// Parse a format name such as `"RGBA32"`. `"RGBA16"` is accepted for RGB565.
    pub fn from_name(name: &str) -> RasterResult<Self> {
        let upper = name.trim().to_ascii_uppercase();
        if upper == "RGBA16" {
            return Ok(Self::Rgb565);
        }
        Self::ALL
            .into_iter()
            .find(|f| f.name() == upper)
            .ok_or_else(|| RasterError::config(format!("unknown pixel format '{name}'")))
    }

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Rgb555 => "RGB555",
            Self::Rgb565 => "RGB565",
            Self::Rgb24 => "RGB24",
            Self::Bgr24 => "BGR24",
            Self::Rgba32 => "RGBA32",
            Self::Bgra32 => "BGRA32",
            Self::Argb32 => "ARGB32",
            Self::Abgr32 => "ABGR32",
        }
    }

    /// Bytes per pixel.
    pub fn bytes_per_pixel(self) -> usize {
        self.ops().bytes_per_pixel()
    }

    /// Map a channel-mask description to a format, using the host byte order.
    pub fn detect(
        red: ChannelMask,
        green: ChannelMask,
        blue: ChannelMask,
        bpp: u32,
    ) -> Option<Self> {
        Self::detect_with_byte_order(red, green, blue, bpp, cfg!(target_endian = "big"))
    }

    /// Same as [`PixelFormat::detect`] with an explicit host byte order.
    ///
    /// On big-endian hosts, 24 and 32 bpp offsets are mirrored first because the
    /// format names describe bytes in memory.
    pub fn detect_with_byte_order(
        mut red: ChannelMask,
        mut green: ChannelMask,
        mut blue: ChannelMask,
        bpp: u32,
        big_endian: bool,
    ) -> Option<Self> {
        if big_endian && bpp >= 24 {
            for ch in [&mut red, &mut green, &mut blue] {
                ch.offset = bpp.checked_sub(ch.offset + ch.size)?;
            }
        }
        let key = |c: ChannelMask| (c.offset, c.size);
        match (key(red), key(green), key(blue)) {
            ((10, 5), (5, 5), (0, 5)) => Some(Self::Rgb555),
            ((11, 5), (5, 6), (0, 5)) => Some(Self::Rgb565),
            ((16, 8), (8, 8), (0, 8)) if bpp == 24 => Some(Self::Bgr24),
            ((16, 8), (8, 8), (0, 8)) => Some(Self::Bgra32),
            ((0, 8), (8, 8), (16, 8)) if bpp == 24 => Some(Self::Rgb24),
            ((0, 8), (8, 8), (16, 8)) => Some(Self::Rgba32),
            ((8, 8), (16, 8), (24, 8)) => Some(Self::Argb32),
            ((24, 8), (16, 8), (8, 8)) => Some(Self::Abgr32),
            _ => None,
        }
    }

    pub(crate) fn ops(self) -> &'static dyn PixelOps {
        match self {
            Self::Rgb555 => &RGB555,
            Self::Rgb565 => &RGB565,
            Self::Rgb24 => &RGB24,
            Self::Bgr24 => &BGR24,
            Self::Rgba32 => &RGBA32,
            Self::Bgra32 => &BGRA32,
            Self::Argb32 => &ARGB32,
            Self::Abgr32 => &ABGR32,
        }
    }
}

/// Span-level access to one row of a framebuffer.
pub(crate) trait PixelOps: Sync {
    fn bytes_per_pixel(&self) -> usize;
    fn pixel(&self, row: &[u8], x: usize) -> Rgba8Premul;
    fn copy_hline(&self, row: &mut [u8], x: usize, len: usize, c: Rgba8Premul);
    fn blend_solid_hspan(&self, row: &mut [u8], x: usize, c: Rgba8Premul, covers: &[u8]);
    fn blend_color_hspan(&self, row: &mut [u8], x: usize, colors: &[Rgba8Premul]);
}

trait Layout: Sync {
    const BPP: usize;
    fn read(px: &[u8]) -> Rgba8Premul;
    fn write(px: &mut [u8], c: Rgba8Premul);
}

/// Byte-addressed layout; `A == N` means the format has no alpha byte.
struct Bytes<const N: usize, const R: usize, const G: usize, const B: usize, const A: usize>;

impl<const N: usize, const R: usize, const G: usize, const B: usize, const A: usize> Layout
    for Bytes<N, R, G, B, A>
{
    const BPP: usize = N;

    #[inline]
    fn read(px: &[u8]) -> Rgba8Premul {
        let a = if A < N { px[A] } else { 255 };
        Rgba8Premul::new(px[R], px[G], px[B], a)
    }

    #[inline]
    fn write(px: &mut [u8], c: Rgba8Premul) {
        px[R] = c.r;
        px[G] = c.g;
        px[B] = c.b;
        if A < N {
            px[A] = c.a;
        }
    }
}

fn expand5(v: u16) -> u8 {
    let v = (v & 0x1f) as u8;
    (v << 3) | (v >> 2)
}

fn expand6(v: u16) -> u8 {
    let v = (v & 0x3f) as u8;
    (v << 2) | (v >> 4)
}

struct Word555;

impl Layout for Word555 {
    const BPP: usize = 2;

    #[inline]
    fn read(px: &[u8]) -> Rgba8Premul {
        let v = u16::from_ne_bytes([px[0], px[1]]);
        Rgba8Premul::new(expand5(v >> 10), expand5(v >> 5), expand5(v), 255)
    }

    #[inline]
    fn write(px: &mut [u8], c: Rgba8Premul) {
        let v = 0x8000
            | ((u16::from(c.r) & 0xf8) << 7)
            | ((u16::from(c.g) & 0xf8) << 2)
            | (u16::from(c.b) >> 3);
        px.copy_from_slice(&v.to_ne_bytes());
    }
}

struct Word565;

impl Layout for Word565 {
    const BPP: usize = 2;

    #[inline]
    fn read(px: &[u8]) -> Rgba8Premul {
        let v = u16::from_ne_bytes([px[0], px[1]]);
        Rgba8Premul::new(expand5(v >> 11), expand6(v >> 5), expand5(v), 255)
    }

    #[inline]
    fn write(px: &mut [u8], c: Rgba8Premul) {
        let v = ((u16::from(c.r) & 0xf8) << 8)
            | ((u16::from(c.g) & 0xfc) << 3)
            | (u16::from(c.b) >> 3);
        px.copy_from_slice(&v.to_ne_bytes());
    }
}

struct Packed<L>(PhantomData<L>);

impl<L: Layout> PixelOps for Packed<L> {
    fn bytes_per_pixel(&self) -> usize {
        L::BPP
    }

    fn pixel(&self, row: &[u8], x: usize) -> Rgba8Premul {
        let i = x * L::BPP;
        L::read(&row[i..i + L::BPP])
    }

    fn copy_hline(&self, row: &mut [u8], x: usize, len: usize, c: Rgba8Premul) {
        let start = x * L::BPP;
        for px in row[start..start + len * L::BPP].chunks_exact_mut(L::BPP) {
            L::write(px, c);
        }
    }

    fn blend_solid_hspan(&self, row: &mut [u8], x: usize, c: Rgba8Premul, covers: &[u8]) {
        let start = x * L::BPP;
        let span = &mut row[start..start + covers.len() * L::BPP];
        for (px, &cover) in span.chunks_exact_mut(L::BPP).zip(covers) {
            if cover == 0 {
                continue;
            }
            let out = blend_premul(L::read(px), c, cover);
            L::write(px, out);
        }
    }

    fn blend_color_hspan(&self, row: &mut [u8], x: usize, colors: &[Rgba8Premul]) {
        let start = x * L::BPP;
        let span = &mut row[start..start + colors.len() * L::BPP];
        for (px, &c) in span.chunks_exact_mut(L::BPP).zip(colors) {
            let out = blend_premul(L::read(px), c, 255);
            L::write(px, out);
        }
    }
}

static RGB555: Packed<Word555> = Packed(PhantomData);
static RGB565: Packed<Word565> = Packed(PhantomData);
static RGB24: Packed<Bytes<3, 0, 1, 2, 3>> = Packed(PhantomData);
static BGR24: Packed<Bytes<3, 2, 1, 0, 3>> = Packed(PhantomData);
static RGBA32: Packed<Bytes<4, 0, 1, 2, 3>> = Packed(PhantomData);
static BGRA32: Packed<Bytes<4, 2, 1, 0, 3>> = Packed(PhantomData);
static ARGB32: Packed<Bytes<4, 1, 2, 3, 0>> = Packed(PhantomData);
static ABGR32: Packed<Bytes<4, 3, 2, 1, 0>> = Packed(PhantomData);

#[cfg(test)]
#[path = "../../tests/unit/render/pixel_format.rs"]
mod tests;
