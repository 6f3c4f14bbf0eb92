//! Shape paths to device-space geometry.
//!
//! Paths are first mapped into device twips (20 per pixel, rounded to whole
//! units) and only then converted to pixels, so axis-aligned tests on
//! transformed anchors are exact.

use crate::foundation::core::{Affine, BezPath, Point, TWIPS_PER_PIXEL, twips_to_pixels};
use crate::geometry::matrix::Matrix;
use crate::shape::model::Path;
use crate::shape::style::LineStyle;

/// Offset applied to fill geometry.
pub(crate) const FILL_SHIFT: f64 = 0.05;
/// Pixel-centre bias applied to hinted outlines and debug polygons.
pub(crate) const PIXEL_CENTER: f64 = 0.5;

/// Which passes a group of paths needs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PathSummary {
    pub(crate) have_shape: bool,
    pub(crate) have_outline: bool,
}

pub(crate) fn analyze_paths(paths: &[Path]) -> PathSummary {
    let mut s = PathSummary::default();
    for p in paths {
        s.have_shape |= p.has_fill();
        s.have_outline |= p.line != 0;
        if s.have_shape && s.have_outline {
            break;
        }
    }
    s
}

/// World to device-twips transform: `scale(20) * stage * placement`.
pub(crate) fn device_twips_transform(stage: &Matrix, placement: &Matrix) -> Affine {
    Affine::scale(TWIPS_PER_PIXEL) * stage.to_affine() * placement.to_affine()
}

/// Copy `paths` into device twips, rounding every coordinate to a whole twip.
pub(crate) fn transform_paths(paths: &[Path], stage: &Matrix, placement: &Matrix) -> Vec<Path> {
    let m = device_twips_transform(stage, placement);
    paths
        .iter()
        .map(|p| {
            let mut out = p.clone();
            out.map_points(|pt| {
                let d = m * pt;
                Point::new(d.x.round(), d.y.round())
            });
            out
        })
        .collect()
}

fn to_px(p: Point, shift: f64) -> Point {
    Point::new(twips_to_pixels(p.x) + shift, twips_to_pixels(p.y) + shift)
}

/// Device-twips path to pixel geometry offset by `shift`.
pub(crate) fn to_bez_path(path: &Path, shift: f64) -> BezPath {
    let mut out = BezPath::new();
    out.move_to(to_px(path.start, shift));
    for e in &path.edges {
        match e.control {
            Some(c) => out.quad_to(to_px(c, shift), to_px(e.anchor, shift)),
            None => out.line_to(to_px(e.anchor, shift)),
        }
    }
    out
}

/// Fill geometry for every path.
pub(crate) fn build_fill_paths(paths: &[Path]) -> Vec<BezPath> {
    paths.iter().map(|p| to_bez_path(p, FILL_SHIFT)).collect()
}

/// Pixel-hinted outline of one device-twips path.
///
/// Straight segments are snapped per axis when the line style asks for hinting,
/// or when the style is a hairline and the segment keeps that coordinate
/// unchanged. Curves are never snapped. Closed paths drop their final straight
/// edge and emit an explicit close instead.
pub(crate) fn build_outline_path(path: &Path, style: Option<&LineStyle>) -> BezPath {
    let hinting = style.is_some_and(|s| s.pixel_hinting);
    let hairline = style.is_some_and(LineStyle::is_hairline);
    let closed = path.is_closed() && style.is_some_and(|s| !s.no_close);

    let mut edges = path.edges.as_slice();
    if closed && edges.last().is_some_and(|e| e.is_straight()) {
        edges = &edges[..edges.len() - 1];
    }

    let px = |v: f64| twips_to_pixels(v);
    let at = |x: f64, y: f64| Point::new(x + PIXEL_CENTER, y + PIXEL_CENTER);

    let mut out = BezPath::new();
    let (mut prev_x, mut prev_y) = (px(path.start.x), px(path.start.y));
    let (mut prev_align_x, mut prev_align_y) = (true, true);

    for (i, e) in edges.iter().enumerate() {
        let (mut x, mut y) = (px(e.anchor.x), px(e.anchor.y));
        match e.control {
            None => {
                let align_x = hinting || (hairline && prev_x == x);
                let align_y = hinting || (hairline && prev_y == y);
                if align_x {
                    x = x.round();
                }
                if align_y {
                    y = y.round();
                }
                let realign = (align_x && !prev_align_x) || (align_y && !prev_align_y);
                if i == 0 || realign {
                    if align_x {
                        prev_x = prev_x.round();
                    }
                    if align_y {
                        prev_y = prev_y.round();
                    }
                    if i == 0 {
                        out.move_to(at(prev_x, prev_y));
                    } else {
                        out.line_to(at(prev_x, prev_y));
                    }
                }
                out.line_to(at(x, y));
                prev_align_x = align_x;
                prev_align_y = align_y;
            }
            Some(c) => {
                if i == 0 {
                    out.move_to(at(prev_x, prev_y));
                }
                out.quad_to(at(px(c.x), px(c.y)), at(x, y));
                prev_align_x = false;
                prev_align_y = false;
            }
        }
        prev_x = x;
        prev_y = y;
    }

    if closed && !edges.is_empty() {
        out.close_path();
    }
    out
}

/// Hinted outlines for every path carrying a line style, paired with the
/// 0-based style index.
pub(crate) fn build_outline_paths(
    paths: &[Path],
    line_styles: &[LineStyle],
) -> Vec<(usize, BezPath)> {
    paths
        .iter()
        .filter(|p| p.line != 0)
        .map(|p| {
            let idx = usize::from(p.line) - 1;
            (idx, build_outline_path(p, line_styles.get(idx)))
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/path_adapter.rs"]
mod tests;
