//! Placement of decoded video frames.

use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgba8Premul};
use crate::geometry::matrix::Matrix;
use crate::render::compound::SpanSource;
use crate::render::opts::Quality;
use crate::render::styles::{EdgeMode, sample_bitmap};
use crate::shape::bitmap::VideoFrame;

/// Samples one frame stretched over its placement bounds.
#[derive(Debug)]
pub(crate) struct VideoSpan<'a> {
    frame: &'a VideoFrame,
    inverse: Affine,
    smooth: bool,
}

impl<'a> VideoSpan<'a> {
    /// `None` when the bounds are empty or the placement is singular.
    pub(crate) fn new(
        frame: &'a VideoFrame,
        stage: &Matrix,
        placement: &Matrix,
        bounds: Rect,
        smooth: bool,
        quality: Quality,
    ) -> Option<Self> {
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return None;
        }
        let forward = stage.to_affine() * placement.to_affine();
        if forward.determinant() == 0.0 {
            return None;
        }
        let to_frame = Affine::scale_non_uniform(
            f64::from(frame.width()) / bounds.width(),
            f64::from(frame.height()) / bounds.height(),
        ) * Affine::translate((-bounds.x0, -bounds.y0));
        Some(Self {
            frame,
            inverse: to_frame * forward.inverse(),
            smooth: smooth && quality >= Quality::High,
        })
    }
}

/// Device-space quad covering `bounds` placed with `placement`.
pub(crate) fn video_outline(stage: &Matrix, placement: &Matrix, bounds: Rect) -> BezPath {
    let m = stage.to_affine() * placement.to_affine();
    let corners = [
        Point::new(bounds.x0, bounds.y0),
        Point::new(bounds.x1, bounds.y0),
        Point::new(bounds.x1, bounds.y1),
        Point::new(bounds.x0, bounds.y1),
    ];
    let mut path = BezPath::new();
    path.move_to(m * corners[0]);
    for &c in &corners[1..] {
        path.line_to(m * c);
    }
    path.close_path();
    path
}

impl SpanSource for VideoSpan<'_> {
    fn is_solid(&self, _style: usize) -> bool {
        false
    }

    fn color(&self, _style: usize) -> Rgba8Premul {
        Rgba8Premul::transparent()
    }

    fn generate_span(&self, _style: usize, x: i32, y: i32, out: &mut [Rgba8Premul]) {
        for (i, px) in out.iter_mut().enumerate() {
            let p = self.inverse * Point::new(f64::from(x) + i as f64 + 0.5, f64::from(y) + 0.5);
            *px = sample_bitmap(self.frame, p.x, p.y, self.smooth, EdgeMode::Clamp);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/video.rs"]
mod tests;
