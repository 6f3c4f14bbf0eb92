use super::*;
use crate::foundation::core::{Rect, Rgba};
use kurbo::PathEl;

fn near(a: Point, x: f64, y: f64) -> bool {
    (a.x - x).abs() < 1e-9 && (a.y - y).abs() < 1e-9
}

fn points(path: &BezPath) -> Vec<Point> {
    path.elements()
        .iter()
        .filter_map(|el| match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => Some(p),
            PathEl::QuadTo(_, p) => Some(p),
            _ => None,
        })
        .collect()
}

fn hairline() -> LineStyle {
    LineStyle::solid(20, Rgba::opaque(0, 0, 0))
}

#[test]
fn analyze_reports_fills_and_lines() {
    let fill_only = [Path::new(0.0, 0.0, 1, 0, 0)];
    let line_only = [Path::new(0.0, 0.0, 0, 0, 1)];
    let both = [Path::new(0.0, 0.0, 0, 2, 0), Path::new(0.0, 0.0, 0, 0, 1)];
    let none = [Path::new(0.0, 0.0, 0, 0, 0)];

    assert_eq!(
        analyze_paths(&fill_only),
        PathSummary {
            have_shape: true,
            have_outline: false
        }
    );
    assert!(analyze_paths(&line_only).have_outline);
    assert!(!analyze_paths(&line_only).have_shape);
    let s = analyze_paths(&both);
    assert!(s.have_shape && s.have_outline);
    assert_eq!(analyze_paths(&none), PathSummary::default());
}

#[test]
fn transform_rounds_to_whole_device_twips() {
    let stage = Matrix::scale(0.05, 0.05);
    let placement = Matrix::translation(100, 40);
    let paths = [Path::new(10.0, 10.0, 1, 0, 0).curve_to(33.0, 7.0, 210.0, 10.0)];
    let out = transform_paths(&paths, &stage, &placement);
    assert_eq!(out[0].start, Point::new(110.0, 50.0));
    assert_eq!(out[0].edges[0].control, Some(Point::new(133.0, 47.0)));
    assert_eq!(out[0].edges[0].anchor, Point::new(310.0, 50.0));
    assert_eq!(out[0].fill0, 1);
}

#[test]
fn fill_paths_are_shifted() {
    let paths = [Path::new(20.0, 40.0, 1, 0, 0).line_to(60.0, 40.0)];
    let out = build_fill_paths(&paths);
    let pts = points(&out[0]);
    assert!(near(pts[0], 1.05, 2.05));
    assert!(near(pts[1], 3.05, 2.05));
}

#[test]
fn hairline_snaps_only_the_constant_axis() {
    let path = Path::new(12.0, 34.0, 0, 0, 1).line_to(112.0, 34.0);
    let out = build_outline_path(&path, Some(&hairline()));
    let pts = points(&out);
    assert_eq!(pts.len(), 2);
    assert!(near(pts[0], 1.1, 2.5));
    assert!(near(pts[1], 6.1, 2.5));
}

#[test]
fn pixel_hinting_snaps_both_axes() {
    let style = LineStyle::solid(100, Rgba::opaque(0, 0, 0)).hinted();
    let path = Path::new(12.0, 34.0, 0, 0, 1).line_to(75.0, 93.0);
    let pts = points(&build_outline_path(&path, Some(&style)));
    assert!(near(pts[0], 1.5, 2.5));
    assert!(near(pts[1], 4.5, 5.5));
}

#[test]
fn thick_lines_are_not_snapped() {
    let style = LineStyle::solid(100, Rgba::opaque(0, 0, 0));
    let path = Path::new(12.0, 34.0, 0, 0, 1).line_to(112.0, 34.0);
    let pts = points(&build_outline_path(&path, Some(&style)));
    assert!(near(pts[0], 1.1, 2.2));
    assert!(near(pts[1], 6.1, 2.2));
}

#[test]
fn closed_outline_drops_last_edge_and_closes() {
    let path = Path::rect(Rect::new(0.0, 0.0, 100.0, 100.0), 0, 0, 1);
    let out = build_outline_path(&path, Some(&hairline()));
    let els = out.elements();
    assert!(matches!(els[els.len() - 1], PathEl::ClosePath));
    assert!(matches!(els[els.len() - 2], PathEl::LineTo(p) if near(p, 0.5, 5.5)));
    let back_to_start = els[1..]
        .iter()
        .filter(|e| matches!(e, PathEl::LineTo(p) if near(*p, 0.5, 0.5)))
        .count();
    assert_eq!(back_to_start, 0);
}

#[test]
fn no_close_keeps_every_edge_open() {
    let mut style = hairline();
    style.no_close = true;
    let path = Path::rect(Rect::new(0.0, 0.0, 100.0, 100.0), 0, 0, 1);
    let out = build_outline_path(&path, Some(&style));
    let els = out.elements();
    assert!(!els.iter().any(|e| matches!(e, PathEl::ClosePath)));
    assert!(matches!(els[els.len() - 1], PathEl::LineTo(p) if near(p, 0.5, 0.5)));
}

#[test]
fn leading_curve_starts_at_biased_point() {
    let path = Path::new(0.0, 0.0, 0, 0, 1).curve_to(20.0, 0.0, 20.0, 20.0);
    let out = build_outline_path(&path, Some(&hairline()));
    let els = out.elements();
    assert!(matches!(els[0], PathEl::MoveTo(p) if near(p, 0.5, 0.5)));
    assert!(matches!(els[1], PathEl::QuadTo(c, p) if near(c, 1.5, 0.5) && near(p, 1.5, 1.5)));
}

#[test]
fn realignment_inserts_a_connecting_line() {
    let path = Path::new(0.0, 0.0, 0, 0, 1)
        .line_to(30.0, 10.0)
        .line_to(30.0, 50.0);
    let pts = points(&build_outline_path(&path, Some(&hairline())));
    assert_eq!(pts.len(), 4);
    assert!(near(pts[1], 2.0, 1.0));
    assert!(near(pts[2], 2.5, 1.0));
    assert!(near(pts[3], 2.5, 3.0));
}

#[test]
fn outline_paths_pair_with_style_index() {
    let paths = [
        Path::new(0.0, 0.0, 1, 0, 0).line_to(20.0, 0.0),
        Path::new(0.0, 0.0, 0, 0, 2).line_to(20.0, 0.0),
    ];
    let styles = [hairline(), hairline()];
    let out = build_outline_paths(&paths, &styles);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].0, 1);
}
