pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Shape geometry is authored in twips: 20 per pixel.
pub const TWIPS_PER_PIXEL: f64 = 20.0;

/// Convert a twips value to pixels.
pub fn twips_to_pixels(twips: f64) -> f64 {
    twips / TWIPS_PER_PIXEL
}

/// Convert a pixel value to twips.
pub fn pixels_to_twips(pixels: f64) -> f64 {
    pixels * TWIPS_PER_PIXEL
}

/// Straight (non-premultiplied) RGBA8 colour as authored in shape styles.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba {
    /// Build a colour from straight channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque colour.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fully transparent black.
    pub const fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Premultiply by alpha.
    pub fn premultiply(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, self.a)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Build a premultiplied colour from channels that are already premultiplied.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully transparent black.
    pub const fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Convert back to straight alpha. Transparent pixels become transparent black.
    pub fn to_straight(self) -> Rgba {
        if self.a == 0 {
            return Rgba::transparent();
        }
        let a = u32::from(self.a);
        let demul = |c: u8| ((u32::from(c) * 255 + a / 2) / a).min(255) as u8;
        Rgba {
            r: demul(self.r),
            g: demul(self.g),
            b: demul(self.b),
            a: self.a,
        }
    }

    /// Clamp colour channels so none exceeds alpha.
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.min(self.a),
            g: self.g.min(self.a),
            b: self.b.min(self.a),
            a: self.a,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
