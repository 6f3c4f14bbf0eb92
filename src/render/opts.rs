use crate::foundation::error::{RasterError, RasterResult};
use crate::render::raster::FillRule;

/// Render quality; drives bitmap and video smoothing.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    /// No smoothing at all.
    Low,
    /// Smooth bitmaps that ask for it.
    Medium,
    /// Also smooth video.
    #[default]
    High,
    /// Smooth bitmaps with no explicit preference.
    Best,
}

impl Quality {
    /// Parse `low`, `medium`, `high` or `best` (case-insensitive).
    pub fn from_name(name: &str) -> RasterResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "best" => Ok(Self::Best),
            other => Err(RasterError::config(format!("unknown quality '{other}'"))),
        }
    }
}

/// Retention limits for released alpha-mask buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MaskPoolOpts {
    /// Maximum number of idle buffers kept for reuse.
    pub max_buffers: usize,
    /// Maximum bytes held by idle buffers.
    pub max_bytes: usize,
}

impl Default for MaskPoolOpts {
    fn default() -> Self {
        Self {
            max_buffers: 4,
            max_bytes: 64 * 1024 * 1024,
        }
    }
}

impl MaskPoolOpts {
    /// Pool that never retains buffers.
    pub fn disabled() -> Self {
        Self {
            max_buffers: 0,
            max_bytes: 0,
        }
    }
}

/// Construction-time renderer options.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RendererOpts {
    /// Smoothing quality.
    pub quality: Quality,
    /// Maximum distance in pixels between a curve and its flattened polyline.
    pub curve_tolerance: f64,
    /// Fill rule for ordinary shapes. Glyphs and masks always use non-zero.
    pub shape_fill_rule: FillRule,
    /// Mask buffer reuse limits.
    pub mask_pool: MaskPoolOpts,
}

impl Default for RendererOpts {
    fn default() -> Self {
        Self {
            quality: Quality::High,
            curve_tolerance: 0.1,
            shape_fill_rule: FillRule::EvenOdd,
            mask_pool: MaskPoolOpts::default(),
        }
    }
}

impl RendererOpts {
    /// Return options with a different quality.
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// Return options with a different curve flattening tolerance.
    pub fn with_curve_tolerance(mut self, tolerance: f64) -> Self {
        self.curve_tolerance = tolerance;
        self
    }

    /// Return options with a different shape fill rule.
    pub fn with_shape_fill_rule(mut self, rule: FillRule) -> Self {
        self.shape_fill_rule = rule;
        self
    }

    /// Return options with different mask pool limits.
    pub fn with_mask_pool(mut self, pool: MaskPoolOpts) -> Self {
        self.mask_pool = pool;
        self
    }

    /// Defaults overridden by `SWF_RASTER_QUALITY` and `SWF_RASTER_MASK_POOL`
    /// (maximum idle mask buffers).
    pub fn from_env() -> RasterResult<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> RasterResult<Self> {
        if let Some(q) = lookup("SWF_RASTER_QUALITY") {
            self.quality = Quality::from_name(&q)?;
        }
        if let Some(n) = lookup("SWF_RASTER_MASK_POOL") {
            self.mask_pool.max_buffers = n.trim().parse::<usize>().map_err(|_| {
                RasterError::config(format!("SWF_RASTER_MASK_POOL must be a count, got '{n}'"))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject values the rasterizer cannot work with.
    pub fn validate(&self) -> RasterResult<()> {
        if !(self.curve_tolerance.is_finite() && self.curve_tolerance > 0.0) {
            return Err(RasterError::config(format!(
                "curve tolerance must be positive, got {}",
                self.curve_tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/opts.rs"]
mod tests;
