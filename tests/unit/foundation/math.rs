use super::*;

#[test]
fn mul_div255_endpoints() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(0, 255), 0);
    assert_eq!(mul_div255_u8(255, 0), 0);
    assert_eq!(mul_div255_u8(128, 255), 128);
}

#[test]
fn blend_cover_zero_is_noop() {
    let dst = Rgba8Premul::new(1, 2, 3, 4);
    let src = Rgba8Premul::new(200, 200, 200, 200);
    assert_eq!(blend_premul(dst, src, 0), dst);
}

#[test]
fn blend_opaque_full_cover_replaces() {
    let dst = Rgba8Premul::new(0, 0, 0, 255);
    let src = Rgba8Premul::new(255, 0, 0, 255);
    assert_eq!(blend_premul(dst, src, 255), src);
}

#[test]
fn blend_over_transparent_returns_scaled_src() {
    let dst = Rgba8Premul::transparent();
    let src = Rgba8Premul::new(100, 110, 120, 200);
    assert_eq!(blend_premul(dst, src, 255), src);
}

#[test]
fn blend_half_cover_mixes() {
    let dst = Rgba8Premul::new(0, 0, 255, 255);
    let src = Rgba8Premul::new(255, 0, 0, 255);
    let out = blend_premul(dst, src, 128);
    assert_eq!(out.a, 255);
    assert_eq!(out.r, 128);
    assert_eq!(out.b, 127);
}

#[test]
fn lerp_endpoints() {
    assert_eq!(lerp_u8(10, 200, 0.0), 10);
    assert_eq!(lerp_u8(10, 200, 1.0), 200);
}

#[test]
fn unit_to_cover_clamps() {
    assert_eq!(unit_to_cover(-1.0), 0);
    assert_eq!(unit_to_cover(2.0), 255);
    assert_eq!(unit_to_cover(0.5), 128);
}
