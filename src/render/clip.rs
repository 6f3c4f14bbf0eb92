//! World/pixel conversion and the per-frame clip set.

use smallvec::SmallVec;

use crate::foundation::core::{Point, Rect};
use crate::geometry::matrix::Matrix;
use crate::geometry::range::{ClipRect, InvalidatedRanges, PixelRange, WorldRect};

/// Absolute part of the snap slack.
const SNAP_EPSILON: f64 = 1e-3;

/// Pixel rectangle covering `r` under `stage`. Minima floor, maxima ceil.
///
/// Edges within the stage's 16.16 rounding error of a pixel boundary snap
/// to it; the slack grows with the distance from the stage origin.
pub(crate) fn world_to_pixel_rect(stage: &Matrix, r: &WorldRect) -> PixelRange {
    match r {
        WorldRect::Null => PixelRange::Null,
        WorldRect::World => PixelRange::World,
        WorldRect::Finite(r) => {
            let px = stage.transform_rect(*r);
            let rel = stage.relative_error();
            let (tx, ty) = (f64::from(stage.tx), f64::from(stage.ty));
            let slack = |v: f64, t: f64| SNAP_EPSILON + (v - t).abs() * rel;
            PixelRange::Finite(ClipRect::new(
                (px.x0 + slack(px.x0, tx)).floor() as i32,
                (px.y0 + slack(px.y0, ty)).floor() as i32,
                (px.x1 - slack(px.x1, tx)).ceil() as i32,
                (px.y1 - slack(px.y1, ty)).ceil() as i32,
            ))
        }
    }
}

/// World point for pixel `(x, y)`, or `None` when `stage` is singular.
pub(crate) fn pixel_to_world(stage: &Matrix, x: i32, y: i32) -> Option<Point> {
    if stage.determinant() == 0.0 {
        return None;
    }
    Some(stage.to_affine().inverse() * Point::new(f64::from(x), f64::from(y)))
}

/// World rectangle covering every pixel of `r`, far edges included.
pub(crate) fn pixel_to_world_rect(stage: &Matrix, r: &ClipRect) -> WorldRect {
    if stage.determinant() == 0.0 {
        return WorldRect::Null;
    }
    WorldRect::Finite(stage.to_affine().inverse().transform_rect_bbox(r.to_rect()))
}

/// Active clip rectangles plus the subset selected for the current character.
#[derive(Debug, Default)]
pub(crate) struct ClipTracker {
    visible: Option<ClipRect>,
    bounds: Vec<ClipRect>,
    selected: SmallVec<[usize; 8]>,
}

impl ClipTracker {
    pub(crate) fn set_viewport(&mut self, width: u32, height: u32) {
        self.visible = (width > 0 && height > 0)
            .then(|| ClipRect::new(0, 0, width as i32 - 1, height as i32 - 1));
    }

    pub(crate) fn visible(&self) -> Option<ClipRect> {
        self.visible
    }

    /// Replace the clip set with the visible pixel image of `ranges`.
    pub(crate) fn set_ranges(&mut self, ranges: &InvalidatedRanges, stage: &Matrix) {
        self.selected.clear();
        self.bounds.clear();
        let Some(visible) = self.visible else {
            return;
        };
        self.bounds.extend(
            ranges
                .ranges()
                .iter()
                .filter_map(|r| world_to_pixel_rect(stage, r).clip_to(&visible)),
        );
    }

    pub(crate) fn bounds(&self) -> &[ClipRect] {
        &self.bounds
    }

    /// `true` when `range` touches any clip rectangle.
    pub(crate) fn intersects_any(&self, range: PixelRange) -> bool {
        match range {
            PixelRange::Null => false,
            PixelRange::World => !self.bounds.is_empty(),
            PixelRange::Finite(r) => self.bounds.iter().any(|c| c.intersects(&r)),
        }
    }

    /// Select the clip rectangles touched by `range`; returns `true` if any.
    pub(crate) fn select(&mut self, range: PixelRange) -> bool {
        self.selected.clear();
        for (i, c) in self.bounds.iter().enumerate() {
            let hit = match range {
                PixelRange::Null => false,
                PixelRange::World => true,
                PixelRange::Finite(r) => c.intersects(&r),
            };
            if hit {
                self.selected.push(i);
            }
        }
        !self.selected.is_empty()
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub(crate) fn selected(&self) -> SmallVec<[ClipRect; 8]> {
        self.selected.iter().map(|&i| self.bounds[i]).collect()
    }
}

/// Pixel range of `bounds` placed with `placement` on `stage`.
pub(crate) fn character_range(
    stage: &Matrix,
    placement: &Matrix,
    bounds: Option<Rect>,
) -> PixelRange {
    match bounds {
        None => PixelRange::Null,
        Some(b) => {
            let world = placement.transform_rect(b);
            world_to_pixel_rect(stage, &WorldRect::Finite(world))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/clip.rs"]
mod tests;
