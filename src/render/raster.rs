//! Anti-aliased coverage accumulation.
//!
//! Lines are accumulated as signed area deltas into a dense per-row cell grid
//! (the font-rs scheme); a prefix sum along each row yields the winding value
//! of every pixel, which the fill rule turns into an 8-bit cover.

use kurbo::PathEl;

use crate::foundation::core::{BezPath, Point, Rect};
use crate::foundation::math::unit_to_cover;
use crate::geometry::range::ClipRect;

/// How accumulated winding maps to coverage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillRule {
    /// Any non-zero winding is inside.
    #[default]
    NonZero,
    /// Odd winding is inside.
    EvenOdd,
}

impl FillRule {
    #[inline]
    fn coverage(self, acc: f32) -> f32 {
        let a = acc.abs();
        match self {
            Self::NonZero => a.min(1.0),
            Self::EvenOdd => {
                let v = a % 2.0;
                if v > 1.0 { 2.0 - v } else { v }
            }
        }
    }
}

/// A flattened polygon: straight segments in pixel coordinates plus bounds.
#[derive(Clone, Debug, Default)]
pub(crate) struct Polygon {
    lines: Vec<(Point, Point)>,
    bounds: Option<Rect>,
}

impl Polygon {
    pub(crate) fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub(crate) fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub(crate) fn push_line(&mut self, p0: Point, p1: Point) {
        if p0 == p1 {
            return;
        }
        let r = Rect::from_points(p0, p1);
        self.bounds = Some(self.bounds.map_or(r, |b| b.union(r)));
        self.lines.push((p0, p1));
    }

    /// Flatten `path` and append it. With `close`, every subpath is closed back
    /// to its start.
    pub(crate) fn add_path(&mut self, path: &BezPath, tolerance: f64, close: bool) {
        for_each_line(path, tolerance, close, |a, b| self.push_line(a, b));
    }

    pub(crate) fn lines(&self) -> &[(Point, Point)] {
        &self.lines
    }
}

/// Flatten `path` into straight segments.
pub(crate) fn for_each_line(
    path: &BezPath,
    tolerance: f64,
    close: bool,
    mut f: impl FnMut(Point, Point),
) {
    let mut start: Option<Point> = None;
    let mut last: Option<Point> = None;
    kurbo::flatten(path.iter(), tolerance, |el| match el {
        PathEl::MoveTo(p) => {
            if close {
                close_subpath(start, last, &mut f);
            }
            start = Some(p);
            last = Some(p);
        }
        PathEl::ClosePath => {
            close_subpath(start, last, &mut f);
            last = start;
        }
        PathEl::LineTo(p) | PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => {
            if let Some(l) = last {
                f(l, p);
            }
            last = Some(p);
        }
    });
    if close {
        close_subpath(start, last, &mut f);
    }
}

fn close_subpath(start: Option<Point>, last: Option<Point>, f: &mut impl FnMut(Point, Point)) {
    if let (Some(s), Some(l)) = (start, last)
        && s != l
    {
        f(l, s);
    }
}

/// Pixel area covered by `bounds`, clipped to `clip`.
pub(crate) fn pixel_area(bounds: Rect, clip: &ClipRect) -> Option<ClipRect> {
    let area = ClipRect::new(
        bounds.x0.floor().max(f64::from(i32::MIN)) as i32,
        bounds.y0.floor().max(f64::from(i32::MIN)) as i32,
        bounds.x1.ceil().min(f64::from(i32::MAX)) as i32,
        bounds.y1.ceil().min(f64::from(i32::MAX)) as i32,
    );
    area.intersect(clip)
}

/// Signed-area accumulation grid over a pixel rectangle.
#[derive(Clone, Debug)]
pub(crate) struct CoverageGrid {
    area: ClipRect,
    width: usize,
    height: usize,
    stride: usize,
    cells: Vec<f32>,
}

impl CoverageGrid {
    pub(crate) fn new(area: ClipRect) -> Self {
        let width = area.width() as usize;
        let height = area.height() as usize;
        let stride = width + 2;
        Self {
            area,
            width,
            height,
            stride,
            cells: vec![0.0; stride * height],
        }
    }

    /// Grid over `polygon` clipped to `clip`, or `None` when nothing is visible.
    pub(crate) fn from_polygon(polygon: &Polygon, clip: &ClipRect) -> Option<Self> {
        let area = pixel_area(polygon.bounds()?, clip)?;
        let mut grid = Self::new(area);
        for &(a, b) in polygon.lines() {
            grid.add_line(a, b);
        }
        Some(grid)
    }

    pub(crate) fn area(&self) -> ClipRect {
        self.area
    }

    /// Accumulate the segment `p0 -> p1` given in absolute pixel coordinates.
    pub(crate) fn add_line(&mut self, p0: Point, p1: Point) {
        let ox = f64::from(self.area.x0);
        let oy = f64::from(self.area.y0);
        let w = self.width as f64;
        let h = self.height as f64;
        let a = Point::new(p0.x - ox, p0.y - oy);
        let b = Point::new(p1.x - ox, p1.y - oy);

        let Some((a, b)) = clip_y(a, b, 0.0, h) else {
            return;
        };

        // Split where the segment crosses the left and right grid edges.
        let dx = b.x - a.x;
        let mut ts = [0.0, 1.0, 1.0, 1.0];
        let mut n = 1;
        if dx != 0.0 {
            for edge in [0.0, w] {
                let t = (edge - a.x) / dx;
                if t > 0.0 && t < 1.0 {
                    ts[n] = t;
                    n += 1;
                }
            }
        }
        ts[n] = 1.0;
        ts[..=n].sort_by(f64::total_cmp);

        let at = |t: f64| Point::new(a.x + dx * t, a.y + (b.y - a.y) * t);
        for i in 0..n {
            let (s, e) = (at(ts[i]), at(ts[i + 1]));
            let mid = 0.5 * (s.x + e.x);
            if mid > w {
                // nothing right of the grid reaches a visible cell
                continue;
            }
            if mid < 0.0 {
                self.accumulate(Point::new(0.0, s.y), Point::new(0.0, e.y));
            } else {
                self.accumulate(
                    Point::new(s.x.clamp(0.0, w), s.y),
                    Point::new(e.x.clamp(0.0, w), e.y),
                );
            }
        }
    }

    fn accumulate(&mut self, p0: Point, p1: Point) {
        if p0.y == p1.y {
            return;
        }
        let (dir, p0, p1) = if p0.y < p1.y {
            (1.0f32, p0, p1)
        } else {
            (-1.0f32, p1, p0)
        };
        let w = self.width as f32;
        let (x_start, y_start) = (p0.x as f32, p0.y as f32);
        let (x_end, y_end) = (p1.x as f32, p1.y as f32);
        let dxdy = (x_end - x_start) / (y_end - y_start);

        let mut x = x_start;
        let row_start = (y_start.floor().max(0.0)) as usize;
        let row_end = (y_end.ceil() as usize).min(self.height);
        let cells = &mut self.cells;

        for y in row_start..row_end {
            let base = y * self.stride;
            let dy = ((y + 1) as f32).min(y_end) - (y as f32).max(y_start);
            if dy <= 0.0 {
                continue;
            }
            let xnext = (x + dxdy * dy).clamp(0.0, w);
            let d = dy * dir;
            let (x0, x1) = if x < xnext { (x, xnext) } else { (xnext, x) };
            let x0floor = x0.floor();
            let x0i = x0floor as usize;
            let x1ceil = x1.ceil();
            let x1i = x1ceil as usize;

            if x1i <= x0i + 1 {
                let xmf = 0.5 * (x + xnext) - x0floor;
                cells[base + x0i] += d - d * xmf;
                cells[base + x0i + 1] += d * xmf;
            } else {
                let s = (x1 - x0).recip();
                let x0f = x0 - x0floor;
                let a0 = 0.5 * s * (1.0 - x0f) * (1.0 - x0f);
                let x1f = x1 - x1ceil + 1.0;
                let am = 0.5 * s * x1f * x1f;
                cells[base + x0i] += d * a0;
                if x1i == x0i + 2 {
                    cells[base + x0i + 1] += d * (1.0 - a0 - am);
                } else {
                    let a1 = s * (1.5 - x0f);
                    cells[base + x0i + 1] += d * (a1 - a0);
                    for xi in x0i + 2..x1i - 1 {
                        cells[base + xi] += d * s;
                    }
                    let a2 = a1 + (x1i - x0i - 3) as f32 * s;
                    cells[base + x1i - 1] += d * (1.0 - a2 - am);
                }
                cells[base + x1i] += d * am;
            }
            x = xnext;
        }
    }

    /// Resolve the covers of absolute row `y` into `covers[..width]`.
    /// Returns `false` when the row lies outside the grid.
    pub(crate) fn sweep_row(&self, y: i32, rule: FillRule, covers: &mut [u8]) -> bool {
        if y < self.area.y0 || y > self.area.y1 {
            return false;
        }
        let base = (y - self.area.y0) as usize * self.stride;
        let mut acc = 0.0f32;
        for (cover, cell) in covers[..self.width]
            .iter_mut()
            .zip(&self.cells[base..base + self.width])
        {
            acc += cell;
            *cover = unit_to_cover(rule.coverage(acc));
        }
        true
    }
}

fn clip_y(a: Point, b: Point, lo: f64, hi: f64) -> Option<(Point, Point)> {
    let dy = b.y - a.y;
    if dy == 0.0 {
        return None;
    }
    let t_lo = (lo - a.y) / dy;
    let t_hi = (hi - a.y) / dy;
    let t0 = t_lo.min(t_hi).max(0.0);
    let t1 = t_lo.max(t_hi).min(1.0);
    if t0 >= t1 {
        return None;
    }
    let at = |t: f64| {
        let p = a.lerp(b, t);
        Point::new(p.x, p.y.clamp(lo, hi))
    };
    Some((at(t0), at(t1)))
}

/// Single-style rasterizer for strokes, polygons and line strips.
#[derive(Debug, Default)]
pub(crate) struct ScanlineRasterizer {
    polygon: Polygon,
    tolerance: f64,
}

impl ScanlineRasterizer {
    pub(crate) fn new(tolerance: f64) -> Self {
        Self {
            polygon: Polygon::default(),
            tolerance,
        }
    }

    /// Append `path`; open subpaths are closed implicitly.
    pub(crate) fn add_path(&mut self, path: &BezPath) {
        self.polygon.add_path(path, self.tolerance, true);
    }

    /// Rasterize inside `clip`, calling `f(y, x0, covers)` for each row.
    pub(crate) fn render(
        &self,
        clip: &ClipRect,
        rule: FillRule,
        mut f: impl FnMut(i32, i32, &mut [u8]),
    ) {
        let Some(grid) = CoverageGrid::from_polygon(&self.polygon, clip) else {
            return;
        };
        let area = grid.area();
        let mut covers = vec![0u8; area.width() as usize];
        for y in area.y0..=area.y1 {
            grid.sweep_row(y, rule, &mut covers);
            f(y, area.x0, &mut covers);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
