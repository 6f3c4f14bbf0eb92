use super::*;

fn target(buf: &mut [u8], w: u32, h: u32) -> PixelTarget<'_> {
    match PixelTarget::new(buf, w, h, w as usize * 4, PixelFormat::Rgba32) {
        Ok(t) => t,
        Err(e) => panic!("{e}"),
    }
}

#[test]
fn rejects_empty_and_short_buffers() {
    let mut buf = vec![0u8; 64];
    assert!(PixelTarget::new(&mut buf, 0, 4, 16, PixelFormat::Rgba32).is_err());
    assert!(PixelTarget::new(&mut buf, 4, 4, 8, PixelFormat::Rgba32).is_err());
    assert!(PixelTarget::new(&mut buf, 4, 5, 16, PixelFormat::Rgba32).is_err());
    assert!(PixelTarget::new(&mut buf, 4, 4, 16, PixelFormat::Rgba32).is_ok());
    assert!(PixelTarget::new(&mut buf, 10, 3, 20, PixelFormat::Rgb555).is_ok());
}

#[test]
fn last_row_may_be_shorter_than_stride() {
    let mut buf = vec![0u8; 24 + 8];
    let t = PixelTarget::new(&mut buf, 2, 2, 24, PixelFormat::Rgba32);
    assert!(t.is_ok());
}

#[test]
fn fill_rect_is_clipped() {
    let mut buf = vec![0u8; 4 * 4 * 4];
    let mut t = target(&mut buf, 4, 4);
    let red = Rgba8Premul::new(255, 0, 0, 255);
    t.fill_rect(&ClipRect::new(2, 2, 9, 9), red);
    assert_eq!(t.pixel(3, 3), Some(red));
    assert_eq!(t.pixel(1, 3), Some(Rgba8Premul::transparent()));
    assert_eq!(t.pixel(4, 3), None);
    assert_eq!(t.pixel(-1, 0), None);
}

#[test]
fn blend_spans_clip_both_ends() {
    let mut buf = vec![0u8; 4 * 4];
    let mut t = target(&mut buf, 4, 1);
    let colors: Vec<Rgba8Premul> = (0..6)
        .map(|i| Rgba8Premul::new(i * 10, 0, 0, 255))
        .collect();
    t.blend_colors(0, -1, &colors);
    assert_eq!(t.pixel(0, 0).map(|c| c.r), Some(10));
    assert_eq!(t.pixel(3, 0).map(|c| c.r), Some(40));

    t.blend_colors(1, 0, &colors);
    t.blend_colors(0, 4, &colors);
    t.blend_colors(0, -6, &colors);
    assert_eq!(t.pixel(0, 0).map(|c| c.r), Some(10));
}

#[test]
fn blend_solid_uses_covers() {
    let mut buf = vec![0u8; 4 * 4];
    let mut t = target(&mut buf, 4, 1);
    let white = Rgba8Premul::new(255, 255, 255, 255);
    t.blend_solid(0, 1, white, &[255, 128]);
    assert_eq!(t.pixel(0, 0), Some(Rgba8Premul::transparent()));
    assert_eq!(t.pixel(1, 0), Some(white));
    assert_eq!(t.pixel(2, 0), Some(Rgba8Premul::new(128, 128, 128, 128)));
}
