use smallvec::SmallVec;

use crate::foundation::core::Rect;
use crate::geometry::cxform::Cxform;
use crate::geometry::matrix::Matrix;

/// A rectangle in world units (twips) that may also be empty or unbounded.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldRect {
    /// Covers nothing.
    Null,
    /// Covers everything.
    World,
    /// Finite region.
    Finite(Rect),
}

impl WorldRect {
    /// Finite rectangle from min/max corners. Inverted corners are normalised.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::Finite(Rect::new(x0, y0, x1, y1).abs())
    }

    /// `true` for [`WorldRect::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Finite payload, if any.
    pub fn finite(&self) -> Option<Rect> {
        match self {
            Self::Finite(r) => Some(*r),
            _ => None,
        }
    }
}

/// Inclusive integer pixel rectangle: both `x0` and `x1` are drawable columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ClipRect {
    /// Left column.
    pub x0: i32,
    /// Top row.
    pub y0: i32,
    /// Right column (inclusive).
    pub x1: i32,
    /// Bottom row (inclusive).
    pub y1: i32,
}

impl ClipRect {
    /// Build from inclusive bounds.
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Column count.
    pub fn width(&self) -> u32 {
        (i64::from(self.x1) - i64::from(self.x0) + 1).max(0) as u32
    }

    /// Row count.
    pub fn height(&self) -> u32 {
        (i64::from(self.y1) - i64::from(self.y0) + 1).max(0) as u32
    }

    /// `true` when no pixel is covered.
    pub fn is_empty(&self) -> bool {
        self.x1 < self.x0 || self.y1 < self.y0
    }

    /// Overlap of two rectangles, `None` when disjoint.
    pub fn intersect(&self, other: &ClipRect) -> Option<ClipRect> {
        let r = ClipRect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        };
        (!r.is_empty()).then_some(r)
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &ClipRect) -> ClipRect {
        ClipRect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// `true` when the rectangles share at least one pixel.
    pub fn intersects(&self, other: &ClipRect) -> bool {
        self.intersect(other).is_some()
    }

    /// `true` when `(x, y)` lies inside.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    /// Parts of `self` outside `other`, as up to four disjoint bands.
    pub(crate) fn subtract(&self, other: &ClipRect) -> SmallVec<[ClipRect; 4]> {
        let mut out = SmallVec::new();
        let Some(hole) = self.intersect(other) else {
            out.push(*self);
            return out;
        };
        let bands = [
            ClipRect::new(self.x0, self.y0, self.x1, hole.y0 - 1),
            ClipRect::new(self.x0, hole.y1 + 1, self.x1, self.y1),
            ClipRect::new(self.x0, hole.y0, hole.x0 - 1, hole.y1),
            ClipRect::new(hole.x1 + 1, hole.y0, self.x1, hole.y1),
        ];
        out.extend(bands.into_iter().filter(|b| !b.is_empty()));
        out
    }

    /// Half-open floating point view (`max + 1`).
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            f64::from(self.x0),
            f64::from(self.y0),
            f64::from(self.x1) + 1.0,
            f64::from(self.y1) + 1.0,
        )
    }
}

/// A pixel-space range: empty, unbounded, or a concrete rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelRange {
    /// Covers nothing.
    Null,
    /// Covers everything.
    World,
    /// Concrete rectangle.
    Finite(ClipRect),
}

impl PixelRange {
    /// Intersect with a finite rectangle.
    pub fn clip_to(&self, visible: &ClipRect) -> Option<ClipRect> {
        match self {
            Self::Null => None,
            Self::World => Some(*visible),
            Self::Finite(r) => r.intersect(visible),
        }
    }
}

/// Changed areas of the stage for one frame.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InvalidatedRanges {
    ranges: Vec<WorldRect>,
}

impl InvalidatedRanges {
    /// No invalidated area.
    pub fn new() -> Self {
        Self::default()
    }

    /// A single "everything changed" range.
    pub fn world() -> Self {
        Self {
            ranges: vec![WorldRect::World],
        }
    }

    /// Append a range.
    pub fn add(&mut self, r: WorldRect) {
        self.ranges.push(r);
    }

    /// Replace the content with one "everything" range.
    pub fn set_world(&mut self) {
        self.ranges.clear();
        self.ranges.push(WorldRect::World);
    }

    /// `true` when any range is unbounded.
    pub fn is_world(&self) -> bool {
        self.ranges.iter().any(|r| matches!(r, WorldRect::World))
    }

    /// Stored ranges in insertion order.
    pub fn ranges(&self) -> &[WorldRect] {
        &self.ranges
    }
}

impl FromIterator<WorldRect> for InvalidatedRanges {
    fn from_iter<I: IntoIterator<Item = WorldRect>>(iter: I) -> Self {
        Self {
            ranges: iter.into_iter().collect(),
        }
    }
}

/// Placement of one display object: geometry matrix plus colour transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Transform {
    /// World placement.
    pub matrix: Matrix,
    /// Colour transform applied to every style.
    pub cxform: Cxform,
}

impl Transform {
    /// Placement with identity colour transform.
    pub fn from_matrix(matrix: Matrix) -> Self {
        Self {
            matrix,
            cxform: Cxform::identity(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/range.rs"]
mod tests;
