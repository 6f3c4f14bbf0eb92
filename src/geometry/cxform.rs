use crate::foundation::core::Rgba;

/// Per-channel colour transform: `c' = clamp(c * mult / 256 + add)`.
///
/// Multipliers are 8.8 fixed point (256 = 1.0); offsets are in channel units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Cxform {
    /// Red multiplier.
    pub ra: i16,
    /// Red offset.
    pub rb: i16,
    /// Green multiplier.
    pub ga: i16,
    /// Green offset.
    pub gb: i16,
    /// Blue multiplier.
    pub ba: i16,
    /// Blue offset.
    pub bb: i16,
    /// Alpha multiplier.
    pub aa: i16,
    /// Alpha offset.
    pub ab: i16,
}

impl Default for Cxform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Cxform {
    /// Transform that leaves every colour unchanged.
    pub const fn identity() -> Self {
        Self {
            ra: 256,
            rb: 0,
            ga: 256,
            gb: 0,
            ba: 256,
            bb: 0,
            aa: 256,
            ab: 0,
        }
    }

    /// Only scale alpha by `mult` (8.8).
    pub const fn alpha(mult: i16) -> Self {
        Self {
            aa: mult,
            ..Self::identity()
        }
    }

    /// `true` when [`Cxform::transform`] is a no-op.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Apply to a straight-alpha colour.
    pub fn transform(&self, c: Rgba) -> Rgba {
        if self.is_identity() {
            return c;
        }
        fn channel(v: u8, mult: i16, add: i16) -> u8 {
            ((i32::from(v) * i32::from(mult)) / 256 + i32::from(add)).clamp(0, 255) as u8
        }
        Rgba {
            r: channel(c.r, self.ra, self.rb),
            g: channel(c.g, self.ga, self.gb),
            b: channel(c.b, self.ba, self.bb),
            a: channel(c.a, self.aa, self.ab),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/cxform.rs"]
mod tests;
