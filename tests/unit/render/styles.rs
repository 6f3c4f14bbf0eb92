use super::*;
use crate::shape::style::GradientFill;

fn span(table: &StyleTable, style: usize, x: i32, y: i32, len: usize) -> Vec<Rgba8Premul> {
    let mut out = vec![Rgba8Premul::transparent(); len];
    table.generate_span(style, x, y, &mut out);
    out
}

fn black_to_white() -> Vec<GradientRecord> {
    vec![
        GradientRecord {
            ratio: 0,
            color: Rgba::opaque(0, 0, 0),
        },
        GradientRecord {
            ratio: 255,
            color: Rgba::opaque(255, 255, 255),
        },
    ]
}

/// Gradient square mapped onto device x in `[0, 10]`.
fn ten_pixel_gradient() -> Matrix {
    let mut m = Matrix::scale(10.0 / 32768.0, 10.0 / 32768.0);
    m.set_translation(5.0, 5.0);
    m
}

fn checker() -> Arc<Bitmap> {
    Arc::new(
        Bitmap::from_rgba(
            2,
            2,
            vec![
                255, 0, 0, 255, 0, 255, 0, 255, //
                0, 0, 255, 255, 255, 255, 255, 255,
            ],
        )
        .unwrap(),
    )
}

fn build(fills: &[FillStyle], cx: &Cxform, quality: Quality) -> StyleTable {
    StyleTable::build(fills, &Matrix::identity(), &Matrix::identity(), cx, quality)
}

#[test]
fn solid_goes_through_cxform_and_premultiplies() {
    let t = build(&[FillStyle::solid(255, 0, 0)], &Cxform::alpha(128), Quality::High);
    assert!(t.is_solid(0));
    assert_eq!(t.color(0), Rgba8Premul::new(127, 0, 0, 127));
}

#[test]
fn out_of_range_style_is_transparent() {
    let t = build(&[], &Cxform::identity(), Quality::High);
    assert!(t.is_solid(3));
    assert_eq!(t.color(3), Rgba8Premul::transparent());
}

#[test]
fn linear_gradient_ramps_across_its_square() {
    let g = GradientFill::new(GradientKind::Linear, ten_pixel_gradient(), black_to_white());
    let t = build(&[FillStyle::Gradient(g)], &Cxform::identity(), Quality::High);
    assert!(!t.is_solid(0));
    let row = span(&t, 0, 0, 5, 10);
    assert!((i16::from(row[0].r) - 13).abs() <= 1);
    assert!((i16::from(row[9].r) - 242).abs() <= 1);
    assert!(row.windows(2).all(|w| w[0].r <= w[1].r));
    assert!(row.iter().all(|c| c.a == 255));
}

#[test]
fn pad_extends_end_colours() {
    let g = GradientFill::new(GradientKind::Linear, ten_pixel_gradient(), black_to_white());
    let t = build(&[FillStyle::Gradient(g)], &Cxform::identity(), Quality::High);
    let row = span(&t, 0, -20, 0, 1);
    assert_eq!(row[0], Rgba8Premul::new(0, 0, 0, 255));
    let row = span(&t, 0, 40, 0, 1);
    assert_eq!(row[0], Rgba8Premul::new(255, 255, 255, 255));
}

#[test]
fn spread_modes_fold_parameter() {
    assert_eq!(spread(1.25, SpreadMode::Pad), 1.0);
    assert_eq!(spread(-0.5, SpreadMode::Pad), 0.0);
    assert!((spread(1.25, SpreadMode::Repeat) - 0.25).abs() < 1e-12);
    assert!((spread(-0.25, SpreadMode::Repeat) - 0.75).abs() < 1e-12);
    assert!((spread(1.25, SpreadMode::Reflect) - 0.75).abs() < 1e-12);
    assert!((spread(-0.25, SpreadMode::Reflect) - 0.25).abs() < 1e-12);
}

#[test]
fn lut_hits_stops_exactly() {
    let stops = [(0.0, Rgba::opaque(0, 0, 0)), (1.0, Rgba::opaque(255, 0, 0))];
    let lut = build_lut(&stops, 256, Interpolation::Normal);
    assert_eq!(lut.len(), 256);
    assert_eq!(lut[0], Rgba::opaque(0, 0, 0));
    assert_eq!(lut[255], Rgba::opaque(255, 0, 0));
    assert_eq!(lut[51].r, 51);
}

#[test]
fn lut_holds_colour_outside_stop_range() {
    let stops = [(0.5, Rgba::opaque(10, 0, 0)), (0.75, Rgba::opaque(20, 0, 0))];
    let lut = build_lut(&stops, 64, Interpolation::Normal);
    assert_eq!(lut[0].r, 10);
    assert_eq!(lut[63].r, 20);
}

#[test]
fn linear_rgb_midpoint_is_brighter() {
    let a = Rgba::opaque(0, 0, 0);
    let b = Rgba::opaque(255, 255, 255);
    let normal = interpolate(a, b, 0.5, Interpolation::Normal);
    let linear = interpolate(a, b, 0.5, Interpolation::LinearRgb);
    assert_eq!(normal.r, 128);
    assert!((i16::from(linear.r) - 188).abs() <= 1);
}

#[test]
fn radial_parameter_runs_centre_to_rim() {
    let g = GradientSpan {
        kind: GradientKind::Radial,
        spread: SpreadMode::Pad,
        focal: 0.0,
        inverse: Affine::IDENTITY,
        lut: vec![Rgba::transparent(); 64],
        premultiply: false,
    };
    assert_eq!(g.param(Point::new(0.0, 0.0)), 0.0);
    assert!((g.param(Point::new(0.0, 16384.0)) - 1.0).abs() < 1e-12);
}

#[test]
fn focal_parameter_is_zero_at_focus_and_one_on_rim() {
    let g = GradientSpan {
        kind: GradientKind::Focal,
        spread: SpreadMode::Pad,
        focal: 0.5,
        inverse: Affine::IDENTITY,
        lut: vec![Rgba::transparent(); 64],
        premultiply: false,
    };
    assert_eq!(g.param(Point::new(8192.0, 0.0)), 0.0);
    assert!((g.param(Point::new(-16384.0, 0.0)) - 1.0).abs() < 1e-9);
    assert!((g.param(Point::new(0.0, 16384.0)) - 1.0).abs() < 1e-9);
    // halfway between focus and rim along +x
    assert!((g.param(Point::new(12288.0, 0.0)) - 0.5).abs() < 1e-9);
}

#[test]
fn degenerate_gradients_become_solid() {
    let one = GradientFill::new(
        GradientKind::Radial,
        Matrix::identity(),
        black_to_white()[1..].to_vec(),
    );
    let none = GradientFill::new(GradientKind::Linear, Matrix::identity(), vec![]);
    let t = build(
        &[FillStyle::Gradient(one), FillStyle::Gradient(none)],
        &Cxform::identity(),
        Quality::High,
    );
    assert_eq!(t.color(0), Rgba8Premul::new(255, 255, 255, 255));
    assert_eq!(t.color(1), Rgba8Premul::transparent());
}

#[test]
fn translucent_stops_are_premultiplied() {
    let mut records = black_to_white();
    records[1].color = Rgba::new(255, 255, 255, 128);
    let g = GradientFill::new(GradientKind::Linear, ten_pixel_gradient(), records);
    let t = build(&[FillStyle::Gradient(g)], &Cxform::identity(), Quality::High);
    let c = span(&t, 0, 40, 0, 1)[0];
    assert_eq!(c, Rgba8Premul::new(128, 128, 128, 128));
}

#[test]
fn clipped_bitmap_is_transparent_outside() {
    let fill = BitmapFill::new(Some(checker()), Matrix::identity());
    let t = build(&[FillStyle::Bitmap(fill)], &Cxform::identity(), Quality::High);
    let row = span(&t, 0, 0, 0, 3);
    assert_eq!(row[0], Rgba8Premul::new(255, 0, 0, 255));
    assert_eq!(row[1], Rgba8Premul::new(0, 255, 0, 255));
    assert_eq!(row[2], Rgba8Premul::transparent());
}

#[test]
fn tiled_bitmap_wraps() {
    let fill = BitmapFill::new(Some(checker()), Matrix::identity()).tiled();
    let t = build(&[FillStyle::Bitmap(fill)], &Cxform::identity(), Quality::High);
    let row = span(&t, 0, 2, 1, 2);
    assert_eq!(row[0], Rgba8Premul::new(0, 0, 255, 255));
    assert_eq!(row[1], Rgba8Premul::new(255, 255, 255, 255));
}

#[test]
fn null_bitmap_is_transparent_solid() {
    let fill = BitmapFill::new(None, Matrix::identity());
    let t = build(&[FillStyle::Bitmap(fill)], &Cxform::identity(), Quality::High);
    assert!(t.is_solid(0));
    assert_eq!(t.color(0), Rgba8Premul::transparent());
}

#[test]
fn bitmap_cxform_is_applied_per_pixel() {
    let fill = BitmapFill::new(Some(checker()), Matrix::identity());
    let t = build(&[FillStyle::Bitmap(fill)], &Cxform::alpha(128), Quality::High);
    let c = span(&t, 0, 0, 0, 1)[0];
    assert_eq!(c, Rgba8Premul::new(127, 0, 0, 127));
}

#[test]
fn smoothing_policy_follows_quality() {
    use SmoothingPolicy::*;
    assert!(!resolve_smoothing(On, Quality::Low));
    assert!(resolve_smoothing(On, Quality::Medium));
    assert!(!resolve_smoothing(Unspecified, Quality::High));
    assert!(resolve_smoothing(Unspecified, Quality::Best));
    assert!(!resolve_smoothing(Off, Quality::Best));
}

#[test]
fn bilinear_sampling_blends_neighbours() {
    let bmp = checker();
    let centre = sample_bitmap(&bmp, 0.5, 0.5, true, EdgeMode::Clamp);
    assert_eq!(centre, Rgba8Premul::new(255, 0, 0, 255));
    let between = sample_bitmap(&bmp, 1.0, 0.5, true, EdgeMode::Clamp);
    assert_eq!(between, Rgba8Premul::new(128, 128, 0, 255));
    let faded = sample_bitmap(&bmp, 0.0, 0.5, true, EdgeMode::Transparent);
    assert_eq!(faded, Rgba8Premul::new(128, 0, 0, 128));
}
