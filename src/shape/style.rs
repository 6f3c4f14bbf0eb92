use std::sync::Arc;

use crate::foundation::core::Rgba;
use crate::geometry::matrix::Matrix;
use crate::shape::bitmap::Bitmap;

/// How a shape region is painted.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillStyle {
    /// Flat colour.
    Solid(Rgba),
    /// Linear, radial or focal gradient.
    Gradient(GradientFill),
    /// Tiled or clipped bitmap.
    Bitmap(BitmapFill),
}

impl FillStyle {
    /// Shorthand for an opaque solid fill.
    pub fn solid(r: u8, g: u8, b: u8) -> Self {
        Self::Solid(Rgba::opaque(r, g, b))
    }
}

/// Gradient geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientKind {
    /// Along the x axis of the gradient square.
    #[default]
    Linear,
    /// Concentric circles around the square centre.
    Radial,
    /// Radial with the focus shifted along the x axis by `focal_point`.
    Focal,
}

/// Behaviour outside the `[0, 1]` gradient range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreadMode {
    /// Extend the end colours.
    #[default]
    Pad,
    /// Mirror back and forth.
    Reflect,
    /// Restart from the first stop.
    Repeat,
}

/// Colour space used between stops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Interpolate the stored sRGB values.
    #[default]
    Normal,
    /// Interpolate in linear light.
    LinearRgb,
}

/// One colour stop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GradientRecord {
    /// Position in `0..=255`.
    pub ratio: u8,
    /// Straight colour.
    pub color: Rgba,
}

/// Gradient fill parameters. The matrix maps the ±16384 gradient square into
/// shape space.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GradientFill {
    /// Geometry.
    #[serde(default)]
    pub kind: GradientKind,
    /// Gradient square to shape transform.
    #[serde(default)]
    pub matrix: Matrix,
    /// Stops, ratios non-decreasing.
    pub records: Vec<GradientRecord>,
    /// Spread mode.
    #[serde(default)]
    pub spread: SpreadMode,
    /// Interpolation mode.
    #[serde(default)]
    pub interpolation: Interpolation,
    /// Focus offset in `-1.0..=1.0`, used by [`GradientKind::Focal`].
    #[serde(default)]
    pub focal_point: f64,
}

impl GradientFill {
    /// Gradient with default spread and interpolation.
    pub fn new(kind: GradientKind, matrix: Matrix, records: Vec<GradientRecord>) -> Self {
        Self {
            kind,
            matrix,
            records,
            spread: SpreadMode::Pad,
            interpolation: Interpolation::Normal,
            focal_point: 0.0,
        }
    }

    /// Return a copy with a different spread mode.
    pub fn with_spread(mut self, spread: SpreadMode) -> Self {
        self.spread = spread;
        self
    }

    /// Return a copy with a different interpolation mode.
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Return a copy with a focal point (switches the kind to focal).
    pub fn with_focal_point(mut self, focal_point: f64) -> Self {
        self.kind = GradientKind::Focal;
        self.focal_point = focal_point;
        self
    }
}

/// Requested bitmap smoothing, resolved against the render quality.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingPolicy {
    /// Smooth only at the best quality.
    #[default]
    Unspecified,
    /// Smooth above low quality.
    On,
    /// Never smooth.
    Off,
}

/// Bitmap fill parameters. The matrix maps bitmap pixels into shape space.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BitmapFill {
    /// Pixel source. `None` paints nothing.
    #[serde(skip)]
    pub bitmap: Option<Arc<Bitmap>>,
    /// Bitmap to shape transform.
    #[serde(default)]
    pub matrix: Matrix,
    /// Tile instead of clipping at the bitmap edge.
    #[serde(default)]
    pub repeat: bool,
    /// Smoothing request.
    #[serde(default)]
    pub smoothing: SmoothingPolicy,
}

impl BitmapFill {
    /// Clipped, unsmoothed bitmap fill.
    pub fn new(bitmap: Option<Arc<Bitmap>>, matrix: Matrix) -> Self {
        Self {
            bitmap,
            matrix,
            repeat: false,
            smoothing: SmoothingPolicy::Unspecified,
        }
    }

    /// Return a tiled copy.
    pub fn tiled(mut self) -> Self {
        self.repeat = true;
        self
    }

    /// Return a copy with a smoothing policy.
    pub fn with_smoothing(mut self, smoothing: SmoothingPolicy) -> Self {
        self.smoothing = smoothing;
        self
    }
}

/// End cap of a stroke.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapStyle {
    /// Rounded end.
    #[default]
    Round,
    /// Flat end at the endpoint.
    None,
    /// Flat end extended by half the width.
    Square,
}

/// Corner treatment of a stroke.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinStyle {
    /// Rounded corner.
    #[default]
    Round,
    /// Cut corner.
    Bevel,
    /// Sharp corner, limited by `miter_limit`.
    Miter,
}

/// Stroke appearance.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LineStyle {
    /// Thickness in twips; 0 is a hairline.
    pub width: u16,
    /// Straight colour.
    pub color: Rgba,
    /// Cap at the path start.
    pub start_cap: CapStyle,
    /// Cap at the path end.
    pub end_cap: CapStyle,
    /// Join between edges.
    pub join: JoinStyle,
    /// Miter limit factor.
    pub miter_limit: f64,
    /// Snap to whole pixels.
    pub pixel_hinting: bool,
    /// Thickness follows horizontal placement scale.
    pub scale_horizontally: bool,
    /// Thickness follows vertical placement scale.
    pub scale_vertically: bool,
    /// Closed paths are not joined at their start point.
    pub no_close: bool,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            width: 0,
            color: Rgba::opaque(0, 0, 0),
            start_cap: CapStyle::Round,
            end_cap: CapStyle::Round,
            join: JoinStyle::Round,
            miter_limit: 3.0,
            pixel_hinting: false,
            scale_horizontally: true,
            scale_vertically: true,
            no_close: false,
        }
    }
}

impl LineStyle {
    /// Round-capped line scaling in both directions.
    pub fn solid(width: u16, color: Rgba) -> Self {
        Self {
            width,
            color,
            ..Self::default()
        }
    }

    /// Return a copy with pixel hinting enabled.
    pub fn hinted(mut self) -> Self {
        self.pixel_hinting = true;
        self
    }

    /// Return a copy with the given scale flags.
    pub fn with_scaling(mut self, horizontally: bool, vertically: bool) -> Self {
        self.scale_horizontally = horizontally;
        self.scale_vertically = vertically;
        self
    }

    /// Return a copy with caps on both ends.
    pub fn with_caps(mut self, cap: CapStyle) -> Self {
        self.start_cap = cap;
        self.end_cap = cap;
        self
    }

    /// Return a copy with a join style and miter limit.
    pub fn with_join(mut self, join: JoinStyle, miter_limit: f64) -> Self {
        self.join = join;
        self.miter_limit = miter_limit;
        self
    }

    /// `true` for hairlines and lines up to one pixel thick.
    pub fn is_hairline(&self) -> bool {
        self.width <= 20
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shape/style.rs"]
mod tests;
