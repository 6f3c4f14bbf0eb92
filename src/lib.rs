//! `swf-raster` is a software anti-aliased rasterizer for Flash-style vector
//! shapes.
//!
//! Shapes are lists of paths whose edges name a fill style on each side, so
//! adjacent regions share one edge and holes fall out of the style assignment
//! instead of path orientation. The renderer draws them into a caller-owned
//! framebuffer together with strokes, glyphs, debug polygons, line strips,
//! video frames and nested alpha masks, redrawing only the invalidated
//! regions of each frame.
//!
//! # Frame protocol
//!
//! 1. [`Renderer::init_buffer`] binds the framebuffer (again after a resize).
//! 2. [`Renderer::set_invalidated_regions`] selects what will be redrawn.
//! 3. [`Renderer::begin_display`] clears those regions to the background.
//! 4. Draw calls and mask calls.
//! 5. [`Renderer::end_display`].
//!
//! Geometry is expressed in twips (20 per pixel); the stage matrix maps twips
//! to pixels. Pixels are stored premultiplied.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Fail-soft drawing**: only construction and binding return errors; draw
//!   calls report problems through [`Diagnostics`] and become no-ops.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod geometry;
mod render;
mod shape;

pub use foundation::core::{
    Affine, BezPath, Point, Rect, Rgba, Rgba8Premul, TWIPS_PER_PIXEL, Vec2, pixels_to_twips,
    twips_to_pixels,
};
pub use foundation::diagnostics::{
    DiagnosticRecord, Diagnostics, Level, MemoryDiagnostics, TracingDiagnostics,
};
pub use foundation::error::{RasterError, RasterResult};
pub use geometry::cxform::Cxform;
pub use geometry::matrix::Matrix;
pub use geometry::range::{ClipRect, InvalidatedRanges, PixelRange, Transform, WorldRect};
pub use render::mask::MaskPoolStats;
pub use render::opts::{MaskPoolOpts, Quality, RendererOpts};
pub use render::pixel_format::{ChannelMask, PixelFormat};
pub use render::raster::FillRule;
pub use render::renderer::{DrawStats, Renderer};
pub use shape::bitmap::{Bitmap, BitmapFormat, VideoFrame};
pub use shape::model::{Edge, Path, Shape};
pub use shape::style::{
    BitmapFill, CapStyle, FillStyle, GradientFill, GradientKind, GradientRecord, Interpolation,
    JoinStyle, LineStyle, SmoothingPolicy, SpreadMode,
};
