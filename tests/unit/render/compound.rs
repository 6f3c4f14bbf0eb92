use super::*;

const RED: Rgba8Premul = Rgba8Premul::new(255, 0, 0, 255);
const BLUE: Rgba8Premul = Rgba8Premul::new(0, 0, 255, 255);
const CLIP: ClipRect = ClipRect::new(0, 0, 9, 9);

struct Palette;

impl SpanSource for Palette {
    fn is_solid(&self, style: usize) -> bool {
        style < 2
    }

    fn color(&self, style: usize) -> Rgba8Premul {
        if style == 0 { RED } else { BLUE }
    }

    fn generate_span(&self, _style: usize, x: i32, _y: i32, out: &mut [Rgba8Premul]) {
        for (i, c) in out.iter_mut().enumerate() {
            let v = (x + i as i32) as u8 * 10;
            *c = Rgba8Premul::new(v, v, v, 255);
        }
    }
}

struct Halve;

impl CoverModulator for Halve {
    fn modulate(&self, _x: i32, _y: i32, covers: &mut [u8]) {
        for c in covers {
            *c /= 2;
        }
    }
}

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> BezPath {
    let mut p = BezPath::new();
    p.move_to((x0, y0));
    p.line_to((x1, y0));
    p.line_to((x1, y1));
    p.line_to((x0, y1));
    p.line_to((x0, y0));
    p
}

fn render(
    ras: &CompoundRasterizer,
    modulator: Option<&dyn CoverModulator>,
) -> Vec<Vec<Rgba8Premul>> {
    let mut img = vec![vec![Rgba8Premul::transparent(); 10]; 10];
    ras.render(&CLIP, &Palette, modulator, |y, x0, row| {
        for (i, c) in row.iter().enumerate() {
            img[y as usize][x0 as usize + i] = *c;
        }
    });
    img
}

#[test]
fn concentric_paths_leave_a_hole() {
    for rule in [FillRule::EvenOdd, FillRule::NonZero] {
        let mut ras = CompoundRasterizer::new(rule, 0.1);
        ras.set_styles(-1, 0);
        ras.add_path(&rect(1.0, 1.0, 9.0, 9.0));
        ras.set_styles(0, -1);
        ras.add_path(&rect(3.0, 3.0, 7.0, 7.0));
        let img = render(&ras, None);
        assert_eq!(img[2][2], RED, "{rule:?}");
        assert_eq!(img[5][5], Rgba8Premul::transparent(), "{rule:?}");
        assert_eq!(img[0][0], Rgba8Premul::transparent(), "{rule:?}");
    }
}

#[test]
fn adjacent_styles_share_an_edge_without_seam() {
    let mut ras = CompoundRasterizer::new(FillRule::EvenOdd, 0.1);
    ras.set_styles(0, -1);
    ras.add_path(&rect(0.0, 0.0, 5.5, 4.0));
    ras.set_styles(1, -1);
    ras.add_path(&rect(5.5, 0.0, 10.0, 4.0));
    let img = render(&ras, None);
    assert_eq!(img[1][4], RED);
    assert_eq!(img[1][6], BLUE);
    assert_eq!(img[1][5], Rgba8Premul::new(128, 0, 127, 255));
}

#[test]
fn lower_style_index_claims_coverage_first() {
    let mut ras = CompoundRasterizer::new(FillRule::EvenOdd, 0.1);
    ras.set_styles(1, -1);
    ras.add_path(&rect(0.0, 0.0, 6.0, 6.0));
    ras.set_styles(0, -1);
    ras.add_path(&rect(2.0, 2.0, 8.0, 8.0));
    let img = render(&ras, None);
    assert_eq!(img[4][4], RED);
    assert_eq!(img[1][1], BLUE);
}

#[test]
fn style_on_both_sides_cancels() {
    let mut ras = CompoundRasterizer::new(FillRule::EvenOdd, 0.1);
    ras.set_styles(0, 0);
    ras.add_path(&rect(1.0, 1.0, 8.0, 8.0));
    let img = render(&ras, None);
    assert!(img.iter().flatten().all(|c| *c == Rgba8Premul::transparent()));
}

#[test]
fn unpainted_pair_adds_nothing() {
    let mut ras = CompoundRasterizer::new(FillRule::EvenOdd, 0.1);
    ras.set_styles(-1, -1);
    ras.add_path(&rect(1.0, 1.0, 8.0, 8.0));
    let mut called = false;
    ras.render(&CLIP, &Palette, None, |_, _, _| called = true);
    assert!(!called);
}

#[test]
fn generated_spans_start_at_first_covered_pixel() {
    let mut ras = CompoundRasterizer::new(FillRule::EvenOdd, 0.1);
    ras.set_styles(2, -1);
    ras.add_path(&rect(3.0, 0.0, 6.0, 1.0));
    let img = render(&ras, None);
    assert_eq!(img[0][3], Rgba8Premul::new(30, 30, 30, 255));
    assert_eq!(img[0][5], Rgba8Premul::new(50, 50, 50, 255));
    assert_eq!(img[0][6], Rgba8Premul::transparent());
}

#[test]
fn modulator_scales_covers() {
    let mut ras = CompoundRasterizer::new(FillRule::EvenOdd, 0.1);
    ras.set_styles(0, -1);
    ras.add_path(&rect(0.0, 0.0, 4.0, 4.0));
    let img = render(&ras, Some(&Halve));
    assert_eq!(img[1][1], Rgba8Premul::new(127, 0, 0, 127));
}

#[test]
fn banded_rendering_matches_single_band() {
    let scene = |band: u32| {
        let mut ras = CompoundRasterizer::new(FillRule::NonZero, 0.1).with_band_rows(band);
        let mut tri = BezPath::new();
        tri.move_to((0.0, 0.0));
        tri.line_to((5.0, 10.0));
        tri.line_to((0.0, 10.0));
        tri.line_to((0.0, 0.0));
        ras.set_styles(0, -1);
        ras.add_path(&tri);
        ras.set_styles(1, -1);
        ras.add_path(&rect(4.0, 1.5, 9.0, 8.5));
        ras
    };
    let whole = render(&scene(64), None);
    for band in [1, 3, 4] {
        let ras = scene(band);
        assert_eq!(render(&ras, None), whole, "band {band}");

        let mut rows = Vec::new();
        ras.render(&CLIP, &Palette, None, |y, _, _| rows.push(y));
        let mut unique = rows.clone();
        unique.dedup();
        assert_eq!(rows, unique, "band {band}");
    }
    assert_eq!(whole[5][1], RED);
    assert_eq!(whole[5][6], BLUE);
}
