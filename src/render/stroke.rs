use kurbo::{Cap, Join, Stroke, StrokeOpts};

use crate::foundation::core::{BezPath, twips_to_pixels};
use crate::geometry::matrix::Matrix;
use crate::shape::style::{CapStyle, JoinStyle, LineStyle};

/// Width used for hairlines and the 1 px debug strokes.
pub(crate) const HAIRLINE_PX: f64 = 1.0;

/// On-screen stroke width in pixels for `style` placed with `placement` on a
/// stage scaled by `stage`.
///
/// With a single scale flag only that axis contributes.
pub(crate) fn stroke_width(style: &LineStyle, placement: &Matrix, stage: &Matrix) -> f64 {
    if style.width == 0 {
        return HAIRLINE_PX;
    }
    let thickness = f64::from(style.width);
    let x = placement.x_scale().abs() * stage.x_scale();
    let y = placement.y_scale().abs() * stage.y_scale();
    let scale = match (style.scale_horizontally, style.scale_vertically) {
        (false, false) => return twips_to_pixels(thickness),
        (true, false) => x,
        (false, true) => y,
        (true, true) => {
            let placement_scale = (placement.x_scale().abs() + placement.y_scale().abs()) / 2.0;
            placement_scale * (stage.x_scale() + stage.y_scale()) / 2.0
        }
    };
    (thickness * scale).max(HAIRLINE_PX)
}

/// `true` when only one of the two scale flags is set.
pub(crate) fn is_directional_scaling(style: &LineStyle) -> bool {
    style.width != 0 && style.scale_horizontally != style.scale_vertically
}

fn cap(c: CapStyle) -> Cap {
    match c {
        CapStyle::None => Cap::Butt,
        CapStyle::Square => Cap::Square,
        CapStyle::Round => Cap::Round,
    }
}

fn join(j: JoinStyle) -> Join {
    match j {
        JoinStyle::Bevel => Join::Bevel,
        JoinStyle::Miter => Join::Miter,
        JoinStyle::Round => Join::Round,
    }
}

/// Stroke parameters for a line style at a resolved pixel width.
pub(crate) fn stroke_for(style: &LineStyle, width: f64) -> Stroke {
    Stroke::new(width)
        .with_start_cap(cap(style.start_cap))
        .with_end_cap(cap(style.end_cap))
        .with_join(join(style.join))
        .with_miter_limit(style.miter_limit.max(1.0))
}

/// Round-capped, round-joined stroke used for debug lines and polygon outlines.
pub(crate) fn hairline_stroke() -> Stroke {
    Stroke::new(HAIRLINE_PX)
        .with_caps(Cap::Round)
        .with_join(Join::Round)
}

/// Outline of `path` stroked with `stroke`, as a fillable path.
pub(crate) fn stroke_path(path: &BezPath, stroke: &Stroke, tolerance: f64) -> BezPath {
    kurbo::stroke(path.iter(), stroke, &StrokeOpts::default(), tolerance)
}

#[cfg(test)]
#[path = "../../tests/unit/render/stroke.rs"]
mod tests;
