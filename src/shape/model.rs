use crate::foundation::core::{Point, Rect};
use crate::shape::style::{FillStyle, LineStyle};

/// One segment of a path: a straight line, or a quadratic curve when `control`
/// is present.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Edge {
    /// End point.
    pub anchor: Point,
    /// Quadratic control point; `None` for straight edges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<Point>,
}

impl Edge {
    /// Straight edge to `(x, y)`.
    pub fn line(x: f64, y: f64) -> Self {
        Self {
            anchor: Point::new(x, y),
            control: None,
        }
    }

    /// Quadratic curve through control `(cx, cy)` to `(x, y)`.
    pub fn curve(cx: f64, cy: f64, x: f64, y: f64) -> Self {
        Self {
            anchor: Point::new(x, y),
            control: Some(Point::new(cx, cy)),
        }
    }

    /// `true` for straight edges.
    pub fn is_straight(&self) -> bool {
        self.control.is_none()
    }
}

/// A contiguous outline with its style references.
///
/// `fill0`, `fill1` and `line` are 1-based indices into the owning shape's style
/// lists; 0 means "none".
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Path {
    /// Start point.
    pub start: Point,
    /// Edges in drawing order.
    #[serde(default)]
    pub edges: Vec<Edge>,
    /// Fill on the left of the path direction.
    #[serde(default)]
    pub fill0: u16,
    /// Fill on the right of the path direction.
    #[serde(default)]
    pub fill1: u16,
    /// Line style.
    #[serde(default)]
    pub line: u16,
    /// This path starts a new sub-shape.
    #[serde(default)]
    pub new_shape: bool,
}

impl Path {
    /// Empty path starting at `(x, y)` with the given style slots.
    pub fn new(x: f64, y: f64, fill0: u16, fill1: u16, line: u16) -> Self {
        Self {
            start: Point::new(x, y),
            edges: Vec::new(),
            fill0,
            fill1,
            line,
            new_shape: false,
        }
    }

    /// Append a straight edge.
    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.edges.push(Edge::line(x, y));
        self
    }

    /// Append a quadratic curve.
    pub fn curve_to(mut self, cx: f64, cy: f64, x: f64, y: f64) -> Self {
        self.edges.push(Edge::curve(cx, cy, x, y));
        self
    }

    /// Mark this path as the first of a new sub-shape.
    pub fn starting_new_shape(mut self) -> Self {
        self.new_shape = true;
        self
    }

    /// Closed rectangle path through the four corners.
    pub fn rect(r: Rect, fill0: u16, fill1: u16, line: u16) -> Self {
        Self::new(r.x0, r.y0, fill0, fill1, line)
            .line_to(r.x1, r.y0)
            .line_to(r.x1, r.y1)
            .line_to(r.x0, r.y1)
            .line_to(r.x0, r.y0)
    }

    /// `true` when the last anchor coincides with the start point.
    pub fn is_closed(&self) -> bool {
        self.edges.last().is_some_and(|e| e.anchor == self.start)
    }

    /// `true` when the path names at least one fill.
    pub fn has_fill(&self) -> bool {
        self.fill0 != 0 || self.fill1 != 0
    }

    /// Apply `f` to every point, control points included.
    pub fn map_points(&mut self, mut f: impl FnMut(Point) -> Point) {
        self.start = f(self.start);
        for e in &mut self.edges {
            e.anchor = f(e.anchor);
            e.control = e.control.map(&mut f);
        }
    }
}

/// A vector character: style lists, paths and cached bounds (all in twips).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Shape {
    /// Fill styles addressed by `Path::fill0` / `Path::fill1`.
    #[serde(default)]
    pub fill_styles: Vec<FillStyle>,
    /// Line styles addressed by `Path::line`.
    #[serde(default)]
    pub line_styles: Vec<LineStyle>,
    /// Paths in drawing order.
    #[serde(default)]
    pub paths: Vec<Path>,
    /// Bounding box, `None` when the shape is empty.
    #[serde(default)]
    pub bounds: Option<Rect>,
}

impl Shape {
    /// Build a shape and compute its bounds from path geometry.
    pub fn new(fill_styles: Vec<FillStyle>, line_styles: Vec<LineStyle>, paths: Vec<Path>) -> Self {
        let mut shape = Self {
            fill_styles,
            line_styles,
            paths,
            bounds: None,
        };
        shape.bounds = shape.compute_bounds();
        shape
    }

    /// Bounds of all anchors and control points, widened by half of the
    /// widest referenced line.
    pub fn compute_bounds(&self) -> Option<Rect> {
        let mut out: Option<Rect> = None;
        let mut grow = |p: Point| {
            out = Some(match out {
                Some(r) => r.union_pt(p),
                None => Rect::from_points(p, p),
            });
        };
        let mut pad = 0.0_f64;
        for path in &self.paths {
            grow(path.start);
            for e in &path.edges {
                grow(e.anchor);
                if let Some(c) = e.control {
                    grow(c);
                }
            }
            if path.line != 0
                && let Some(ls) = self.line_styles.get(usize::from(path.line) - 1)
            {
                pad = pad.max(f64::from(ls.width) / 2.0);
            }
        }
        out.map(|r| r.inflate(pad, pad))
    }

    /// Split paths into sub-shapes at every `new_shape` marker.
    pub fn subshapes(&self) -> impl Iterator<Item = &[Path]> {
        self.paths.chunk_by(|_, next| !next.new_shape)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shape/model.rs"]
mod tests;
