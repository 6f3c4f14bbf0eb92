//! Fill style resolution into span generators.
//!
//! A [`StyleTable`] is built once per character draw and reused for every
//! sub-shape and clip rectangle of that draw.

use std::sync::Arc;

use crate::foundation::core::{Affine, Point, Rgba, Rgba8Premul};
use crate::foundation::math::lerp_u8;
use crate::geometry::cxform::Cxform;
use crate::geometry::matrix::Matrix;
use crate::render::compound::SpanSource;
use crate::render::opts::Quality;
use crate::shape::bitmap::Bitmap;
use crate::shape::style::{
    BitmapFill, FillStyle, GradientFill, GradientKind, GradientRecord, Interpolation,
    SmoothingPolicy, SpreadMode,
};

/// Half extent of the gradient square in gradient units.
const GRADIENT_RADIUS: f64 = 16384.0;
const LINEAR_LUT_SIZE: usize = 256;
const RADIAL_LUT_SIZE: usize = 64;
const MAX_FOCAL: f64 = 0.99;

/// What lies outside a sampled image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EdgeMode {
    /// Tile.
    Wrap,
    /// Transparent.
    Transparent,
    /// Repeat the nearest edge pixel.
    Clamp,
}

fn fetch(bitmap: &Bitmap, x: i64, y: i64, edge: EdgeMode) -> Rgba8Premul {
    match edge {
        EdgeMode::Wrap => bitmap.pixel_wrapped(x, y),
        EdgeMode::Transparent => bitmap
            .pixel_checked(x, y)
            .unwrap_or_else(Rgba8Premul::transparent),
        EdgeMode::Clamp => bitmap.pixel_clamped(x, y),
    }
}

/// Sample `bitmap` at image coordinates `(u, v)`.
pub(crate) fn sample_bitmap(
    bitmap: &Bitmap,
    u: f64,
    v: f64,
    smooth: bool,
    edge: EdgeMode,
) -> Rgba8Premul {
    if !smooth {
        return fetch(bitmap, u.floor() as i64, v.floor() as i64, edge);
    }
    let (u, v) = (u - 0.5, v - 0.5);
    let (x0, y0) = (u.floor(), v.floor());
    let (fx, fy) = (u - x0, v - y0);
    let (x0, y0) = (x0 as i64, y0 as i64);
    let taps = [
        (fetch(bitmap, x0, y0, edge), (1.0 - fx) * (1.0 - fy)),
        (fetch(bitmap, x0 + 1, y0, edge), fx * (1.0 - fy)),
        (fetch(bitmap, x0, y0 + 1, edge), (1.0 - fx) * fy),
        (fetch(bitmap, x0 + 1, y0 + 1, edge), fx * fy),
    ];
    let mut acc = [0.0f64; 4];
    for (c, w) in taps {
        acc[0] += f64::from(c.r) * w;
        acc[1] += f64::from(c.g) * w;
        acc[2] += f64::from(c.b) * w;
        acc[3] += f64::from(c.a) * w;
    }
    let ch = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    Rgba8Premul::new(ch(acc[0]), ch(acc[1]), ch(acc[2]), ch(acc[3]))
}

fn srgb_to_linear(c: u8) -> f64 {
    let c = f64::from(c) / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(v: f64) -> u8 {
    let v = v.clamp(0.0, 1.0);
    let c = if v <= 0.003_130_8 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    };
    (c * 255.0).round() as u8
}

fn interpolate(a: Rgba, b: Rgba, t: f64, mode: Interpolation) -> Rgba {
    match mode {
        Interpolation::Normal => Rgba::new(
            lerp_u8(a.r, b.r, t),
            lerp_u8(a.g, b.g, t),
            lerp_u8(a.b, b.b, t),
            lerp_u8(a.a, b.a, t),
        ),
        Interpolation::LinearRgb => {
            let mix = |x: u8, y: u8| {
                let (x, y) = (srgb_to_linear(x), srgb_to_linear(y));
                linear_to_srgb(x + (y - x) * t)
            };
            Rgba::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b), lerp_u8(a.a, b.a, t))
        }
    }
}

/// Colour lookup table over `[0, 1]` built from gradient stops.
pub(crate) fn build_lut(stops: &[(f64, Rgba)], size: usize, mode: Interpolation) -> Vec<Rgba> {
    let Some((&first, &last)) = stops.first().zip(stops.last()) else {
        return vec![Rgba::transparent(); size];
    };
    (0..size)
        .map(|k| {
            let pos = k as f64 / (size - 1).max(1) as f64;
            if pos <= first.0 {
                return first.1;
            }
            if pos >= last.0 {
                return last.1;
            }
            let i = stops.partition_point(|s| s.0 <= pos).saturating_sub(1);
            let (a, b) = (stops[i], stops[(i + 1).min(stops.len() - 1)]);
            let span = b.0 - a.0;
            if span <= 0.0 {
                return b.1;
            }
            interpolate(a.1, b.1, (pos - a.0) / span, mode)
        })
        .collect()
}

fn spread(t: f64, mode: SpreadMode) -> f64 {
    match mode {
        SpreadMode::Pad => t.clamp(0.0, 1.0),
        SpreadMode::Repeat => t - t.floor(),
        SpreadMode::Reflect => {
            let m = t.rem_euclid(2.0);
            if m > 1.0 { 2.0 - m } else { m }
        }
    }
}

/// Gradient span generator.
#[derive(Debug, Clone)]
pub(crate) struct GradientSpan {
    kind: GradientKind,
    spread: SpreadMode,
    focal: f64,
    inverse: Affine,
    lut: Vec<Rgba>,
    premultiply: bool,
}

impl GradientSpan {
    fn param(&self, p: Point) -> f64 {
        match self.kind {
            GradientKind::Linear => (p.x + GRADIENT_RADIUS) / (2.0 * GRADIENT_RADIUS),
            GradientKind::Radial => p.x.hypot(p.y) / GRADIENT_RADIUS,
            GradientKind::Focal => {
                // Solve |F + s (P - F)| = R for s; the colour position is 1 / s.
                let f = self.focal * GRADIENT_RADIUS;
                let (dx, dy) = (p.x - f, p.y);
                let dd = dx * dx + dy * dy;
                if dd == 0.0 {
                    return 0.0;
                }
                let fd = f * dx;
                let c = f * f - GRADIENT_RADIUS * GRADIENT_RADIUS;
                let s = (-fd + (fd * fd - dd * c).max(0.0).sqrt()) / dd;
                if s <= 0.0 { 1.0 } else { 1.0 / s }
            }
        }
    }

    fn generate(&self, x: i32, y: i32, out: &mut [Rgba8Premul]) {
        let n = self.lut.len() - 1;
        for (i, px) in out.iter_mut().enumerate() {
            let p = self.inverse * Point::new(f64::from(x) + i as f64 + 0.5, f64::from(y) + 0.5);
            let t = spread(self.param(p), self.spread);
            let c = self.lut[((t * n as f64).round() as usize).min(n)];
            *px = if self.premultiply {
                c.premultiply()
            } else {
                Rgba8Premul::new(c.r, c.g, c.b, c.a)
            };
        }
    }
}

/// Bitmap span generator.
#[derive(Debug, Clone)]
pub(crate) struct BitmapSpan {
    bitmap: Arc<Bitmap>,
    inverse: Affine,
    edge: EdgeMode,
    smooth: bool,
    cxform: Cxform,
}

impl BitmapSpan {
    fn generate(&self, x: i32, y: i32, out: &mut [Rgba8Premul]) {
        let transform = !self.cxform.is_identity();
        for (i, px) in out.iter_mut().enumerate() {
            let p = self.inverse * Point::new(f64::from(x) + i as f64 + 0.5, f64::from(y) + 0.5);
            let c = sample_bitmap(&self.bitmap, p.x, p.y, self.smooth, self.edge).clamped();
            *px = if transform {
                self.cxform.transform(c.to_straight()).premultiply()
            } else {
                c
            };
        }
    }
}

/// One resolved fill style.
#[derive(Debug, Clone)]
pub(crate) enum SpanStyle {
    Solid(Rgba8Premul),
    Gradient(GradientSpan),
    Bitmap(BitmapSpan),
}

/// Resolved fill styles for one draw call, indexed by 0-based style.
#[derive(Debug, Clone, Default)]
pub(crate) struct StyleTable {
    styles: Vec<SpanStyle>,
}

/// Sampling transform from device pixels into a fill's own space.
fn sampling_inverse(stage: &Matrix, placement: &Matrix, fill: &Matrix) -> Option<Affine> {
    let forward = stage.to_affine() * placement.to_affine() * fill.to_affine();
    (forward.determinant() != 0.0).then(|| forward.inverse())
}

impl StyleTable {
    /// Resolve `fills` for a character placed with `placement` under `stage`.
    pub(crate) fn build(
        fills: &[FillStyle],
        stage: &Matrix,
        placement: &Matrix,
        cxform: &Cxform,
        quality: Quality,
    ) -> Self {
        let styles = fills
            .iter()
            .map(|f| match f {
                FillStyle::Solid(c) => SpanStyle::Solid(cxform.transform(*c).premultiply()),
                FillStyle::Gradient(g) => Self::gradient(g, stage, placement, cxform),
                FillStyle::Bitmap(b) => Self::bitmap(b, stage, placement, cxform, quality),
            })
            .collect();
        Self { styles }
    }

    /// Table with one solid colour.
    pub(crate) fn single_solid(color: Rgba) -> Self {
        Self {
            styles: vec![SpanStyle::Solid(color.premultiply())],
        }
    }

    fn gradient(g: &GradientFill, stage: &Matrix, placement: &Matrix, cx: &Cxform) -> SpanStyle {
        let transformed: Vec<GradientRecord> = g
            .records
            .iter()
            .map(|r| GradientRecord {
                ratio: r.ratio,
                color: cx.transform(r.color),
            })
            .collect();
        match transformed.as_slice() {
            [] => return SpanStyle::Solid(Rgba8Premul::transparent()),
            [only] => return SpanStyle::Solid(only.color.premultiply()),
            _ => {}
        }
        let Some(inverse) = sampling_inverse(stage, placement, &g.matrix) else {
            return SpanStyle::Solid(Rgba8Premul::transparent());
        };
        let stops: Vec<(f64, Rgba)> = transformed
            .iter()
            .map(|r| (f64::from(r.ratio) / 255.0, r.color))
            .collect();
        let size = match g.kind {
            GradientKind::Linear => LINEAR_LUT_SIZE,
            GradientKind::Radial | GradientKind::Focal => RADIAL_LUT_SIZE,
        };
        SpanStyle::Gradient(GradientSpan {
            kind: g.kind,
            spread: g.spread,
            focal: g.focal_point.clamp(-MAX_FOCAL, MAX_FOCAL),
            inverse,
            lut: build_lut(&stops, size, g.interpolation),
            premultiply: transformed.iter().any(|r| r.color.a < 255),
        })
    }

    fn bitmap(
        b: &BitmapFill,
        stage: &Matrix,
        placement: &Matrix,
        cx: &Cxform,
        quality: Quality,
    ) -> SpanStyle {
        let Some(bitmap) = b.bitmap.clone() else {
            return SpanStyle::Solid(Rgba8Premul::transparent());
        };
        let Some(inverse) = sampling_inverse(stage, placement, &b.matrix) else {
            return SpanStyle::Solid(Rgba8Premul::transparent());
        };
        SpanStyle::Bitmap(BitmapSpan {
            bitmap,
            inverse,
            edge: if b.repeat {
                EdgeMode::Wrap
            } else {
                EdgeMode::Transparent
            },
            smooth: resolve_smoothing(b.smoothing, quality),
            cxform: *cx,
        })
    }
}

/// Whether a bitmap with `policy` is smoothed at `quality`.
pub(crate) fn resolve_smoothing(policy: SmoothingPolicy, quality: Quality) -> bool {
    if quality <= Quality::Low {
        return false;
    }
    match policy {
        SmoothingPolicy::Unspecified => quality >= Quality::Best,
        SmoothingPolicy::On => true,
        SmoothingPolicy::Off => false,
    }
}

impl SpanSource for StyleTable {
    fn is_solid(&self, style: usize) -> bool {
        matches!(self.styles.get(style), Some(SpanStyle::Solid(_)) | None)
    }

    fn color(&self, style: usize) -> Rgba8Premul {
        match self.styles.get(style) {
            Some(SpanStyle::Solid(c)) => *c,
            _ => Rgba8Premul::transparent(),
        }
    }

    fn generate_span(&self, style: usize, x: i32, y: i32, out: &mut [Rgba8Premul]) {
        match self.styles.get(style) {
            Some(SpanStyle::Gradient(g)) => g.generate(x, y, out),
            Some(SpanStyle::Bitmap(b)) => b.generate(x, y, out),
            Some(SpanStyle::Solid(c)) => out.fill(*c),
            None => out.fill(Rgba8Premul::transparent()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/styles.rs"]
mod tests;
