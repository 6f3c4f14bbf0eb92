/// Convenience result type used across the rasterizer.
pub type RasterResult<T> = Result<T, RasterError>;

/// Error taxonomy for construction and binding APIs.
///
/// Drawing operations never return errors; they degrade to no-ops and report
/// through [`crate::Diagnostics`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// Unknown pixel format, bad dimensions, or a buffer that cannot hold the
    /// declared surface.
    #[error("configuration error: {0}")]
    Config(String),

    /// A pixel layout combination the rasterizer has no strategy for.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Geometry that cannot be used as requested (for example a singular
    /// matrix that must be inverted).
    #[error("geometry error: {0}")]
    Geometry(String),
}

impl RasterError {
    /// Build a [`RasterError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`RasterError::Unsupported`] value.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Build a [`RasterError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
