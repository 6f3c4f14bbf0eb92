use crate::foundation::core::Rgba8Premul;

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

pub(crate) fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Scale every channel of a premultiplied colour by `cover / 255`.
pub(crate) fn scale_premul(c: Rgba8Premul, cover: u8) -> Rgba8Premul {
    if cover == 255 {
        return c;
    }
    let k = u16::from(cover);
    Rgba8Premul {
        r: mul_div255_u8(u16::from(c.r), k),
        g: mul_div255_u8(u16::from(c.g), k),
        b: mul_div255_u8(u16::from(c.b), k),
        a: mul_div255_u8(u16::from(c.a), k),
    }
}

/// Premultiplied source-over with an extra coverage factor.
pub(crate) fn blend_premul(dst: Rgba8Premul, src: Rgba8Premul, cover: u8) -> Rgba8Premul {
    if cover == 0 || src == Rgba8Premul::transparent() {
        return dst;
    }
    if cover == 255 && src.a == 255 {
        return src;
    }
    let s = scale_premul(src, cover);
    let inv = 255u16 - u16::from(s.a);
    Rgba8Premul {
        r: add_sat_u8(s.r, mul_div255_u8(u16::from(dst.r), inv)),
        g: add_sat_u8(s.g, mul_div255_u8(u16::from(dst.g), inv)),
        b: add_sat_u8(s.b, mul_div255_u8(u16::from(dst.b), inv)),
        a: add_sat_u8(s.a, mul_div255_u8(u16::from(dst.a), inv)),
    }
}

pub(crate) fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
    let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
    v.round().clamp(0.0, 255.0) as u8
}

/// Convert a `[0, 1]` coverage value to an 8-bit cover.
pub(crate) fn unit_to_cover(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
