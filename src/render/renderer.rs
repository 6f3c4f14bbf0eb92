//! Software renderer bound to a caller-owned framebuffer.
//!
//! A frame is driven as: [`Renderer::init_buffer`] (once per surface size),
//! [`Renderer::set_invalidated_regions`], [`Renderer::begin_display`], any
//! number of draw and mask calls, then [`Renderer::end_display`]. Drawing never
//! fails: degenerate input is reported through the [`Diagnostics`] sink and the
//! call becomes a no-op.

use std::sync::Arc;

use crate::foundation::core::{BezPath, Point, Rect, Rgba, Rgba8Premul};
use crate::foundation::diagnostics::{Diagnostics, DiagnosticsLog, Level, TracingDiagnostics};
use crate::foundation::error::{RasterError, RasterResult};
use crate::geometry::matrix::Matrix;
use crate::geometry::range::{ClipRect, InvalidatedRanges, PixelRange, Transform, WorldRect};
use crate::render::clip::{self, ClipTracker, character_range};
use crate::render::compound::{CompoundRasterizer, CoverModulator, SpanSource};
use crate::render::mask::{AlphaMask, MaskPoolStats, MaskStack};
use crate::render::opts::{Quality, RendererOpts};
use crate::render::path_adapter::{
    analyze_paths, build_fill_paths, build_outline_paths, to_bez_path, transform_paths,
};
use crate::render::pixel_format::PixelFormat;
use crate::render::raster::{FillRule, ScanlineRasterizer};
use crate::render::stroke::{
    hairline_stroke, is_directional_scaling, stroke_for, stroke_path, stroke_width,
};
use crate::render::styles::StyleTable;
use crate::render::target::PixelTarget;
use crate::render::video::{VideoSpan, video_outline};
use crate::shape::bitmap::VideoFrame;
use crate::shape::model::{Path, Shape};

const MASK_COLOR: Rgba = Rgba::opaque(255, 255, 255);

/// Per-frame drawing counters, reset by [`Renderer::begin_display`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DrawStats {
    /// Shapes that reached at least one clip rectangle.
    pub shapes: u64,
    /// Sub-shapes rasterized.
    pub subshapes: u64,
    /// Fill style tables resolved; at most one per shape.
    pub style_tables: u64,
}

/// Anti-aliased renderer for compound vector shapes.
pub struct Renderer<'buf> {
    format: PixelFormat,
    opts: RendererOpts,
    log: DiagnosticsLog,
    target: Option<PixelTarget<'buf>>,
    stage: Matrix,
    clip: ClipTracker,
    masks: MaskStack,
    stats: DrawStats,
}

impl std::fmt::Debug for Renderer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("format", &self.format)
            .field("opts", &self.opts)
            .field("target", &self.target)
            .field("stage", &self.stage)
            .field("clip", &self.clip)
            .field("masks", &self.masks)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<'buf> Renderer<'buf> {
    /// Renderer reporting through `tracing`.
    pub fn new(format: PixelFormat, opts: RendererOpts) -> RasterResult<Self> {
        Self::with_diagnostics(format, opts, Arc::new(TracingDiagnostics))
    }

    /// Renderer reporting through `diagnostics`.
    pub fn with_diagnostics(
        format: PixelFormat,
        opts: RendererOpts,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> RasterResult<Self> {
        let log = DiagnosticsLog::new(diagnostics);
        if let Err(e) = opts.validate() {
            log.error(&e.to_string());
            return Err(e);
        }
        let mut renderer = Self {
            format,
            opts,
            log,
            target: None,
            stage: Matrix::identity(),
            clip: ClipTracker::default(),
            masks: MaskStack::new(opts.mask_pool),
            stats: DrawStats::default(),
        };
        renderer.set_scale(1.0, 1.0);
        Ok(renderer)
    }

    /// Renderer for a pixel format given by name (for example `"BGRA32"`).
    pub fn from_format_name(
        name: &str,
        opts: RendererOpts,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> RasterResult<Self> {
        match PixelFormat::from_name(name) {
            Ok(format) => Self::with_diagnostics(format, opts, diagnostics),
            Err(e) => {
                diagnostics.emit(Level::ERROR, &e.to_string());
                Err(e)
            }
        }
    }

    /// Pixel format of the bound buffer.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Construction options.
    pub fn opts(&self) -> &RendererOpts {
        &self.opts
    }

    /// Change the smoothing quality for subsequent draws.
    pub fn set_quality(&mut self, quality: Quality) {
        self.opts.quality = quality;
    }

    /// Bind `buf` as the framebuffer. May be called again after a resize.
    ///
    /// `stride` is the distance in bytes between rows. The whole target
    /// becomes the active clip set.
    pub fn init_buffer(
        &mut self,
        buf: &'buf mut [u8],
        width: u32,
        height: u32,
        stride: usize,
    ) -> RasterResult<()> {
        let target = match PixelTarget::new(buf, width, height, stride, self.format) {
            Ok(t) => t,
            Err(e) => {
                self.log.error(&e.to_string());
                return Err(e);
            }
        };
        self.target = Some(target);
        self.clip.set_viewport(width, height);
        self.masks.resize(width, height);
        self.set_invalidated_region_world();
        Ok(())
    }

    /// Target width in pixels, 0 when unbound.
    pub fn width(&self) -> u32 {
        self.target.as_ref().map_or(0, PixelTarget::width)
    }

    /// Target height in pixels, 0 when unbound.
    pub fn height(&self) -> u32 {
        self.target.as_ref().map_or(0, PixelTarget::height)
    }

    /// Raw bytes of the bound buffer.
    pub fn buffer(&self) -> Option<&[u8]> {
        self.target.as_ref().map(PixelTarget::bytes)
    }

    fn ensure_bound(&mut self, op: &'static str) -> bool {
        if self.target.is_some() {
            return true;
        }
        self.log
            .once(op, Level::ERROR, &format!("{op} called before init_buffer"));
        false
    }

    // ---------------------------------------------------------------------
    // Stage transform

    /// Set the stage scale in pixels per world pixel; resets rotation and
    /// translation.
    pub fn set_scale(&mut self, x_scale: f64, y_scale: f64) {
        self.stage = Matrix::identity();
        self.stage.set_scale(x_scale / 20.0, y_scale / 20.0);
    }

    /// Replace the whole stage transform. Singular transforms are rejected.
    pub fn set_stage_matrix(&mut self, stage: Matrix) -> RasterResult<()> {
        if stage.determinant() == 0.0 {
            return Err(RasterError::geometry(format!(
                "stage transform {stage:?} is not invertible"
            )));
        }
        self.stage = stage;
        Ok(())
    }

    /// Set the stage offset in pixels.
    pub fn set_translation(&mut self, x: f64, y: f64) {
        self.stage.set_translation(x, y);
    }

    /// Current world-to-pixel transform.
    pub fn stage(&self) -> Matrix {
        self.stage
    }

    /// Pixel containing the world point `p`.
    pub fn world_to_pixel(&self, p: Point) -> (i32, i32) {
        let px = self.stage.transform_point(p);
        (px.x.floor() as i32, px.y.floor() as i32)
    }

    /// Pixel rectangle covering a world rectangle.
    pub fn world_to_pixel_rect(&self, r: &WorldRect) -> PixelRange {
        clip::world_to_pixel_rect(&self.stage, r)
    }

    /// World position of pixel `(x, y)`; `None` when the stage is singular.
    pub fn pixel_to_world(&self, x: i32, y: i32) -> Option<Point> {
        clip::pixel_to_world(&self.stage, x, y)
    }

    /// World rectangle covering every pixel of `r`.
    pub fn pixel_to_world_rect(&self, r: &ClipRect) -> WorldRect {
        clip::pixel_to_world_rect(&self.stage, r)
    }

    // ---------------------------------------------------------------------
    // Dirty regions

    /// Restrict drawing to the pixel image of `ranges`.
    ///
    /// Live masks keep their content; only area they have never been
    /// cleared over is zeroed.
    #[tracing::instrument(skip(self, ranges), fields(ranges = ranges.ranges().len()))]
    pub fn set_invalidated_regions(&mut self, ranges: &InvalidatedRanges) {
        self.clip.set_ranges(ranges, &self.stage);
        if !self.masks.is_empty() {
            self.masks.extend_cleared(self.clip.bounds());
        }
    }

    /// Restrict drawing to one world rectangle.
    pub fn set_invalidated_region(&mut self, r: WorldRect) {
        let ranges: InvalidatedRanges = std::iter::once(r).collect();
        self.set_invalidated_regions(&ranges);
    }

    /// Allow drawing everywhere.
    pub fn set_invalidated_region_world(&mut self) {
        self.set_invalidated_regions(&InvalidatedRanges::world());
    }

    /// Active clip rectangles in pixels.
    pub fn clip_bounds(&self) -> &[ClipRect] {
        self.clip.bounds()
    }

    /// `true` when the world rectangle touches the active clip set.
    pub fn bounds_in_clipping_area(&self, r: &WorldRect) -> bool {
        self.clip.intersects_any(self.world_to_pixel_rect(r))
    }

    // ---------------------------------------------------------------------
    // Frame

    /// Start a frame: fill the active clip rectangles with `bg`.
    #[tracing::instrument(skip(self))]
    pub fn begin_display(&mut self, bg: Rgba) {
        if !self.ensure_bound("begin_display") {
            return;
        }
        self.masks.end_submit();
        self.stats = DrawStats::default();
        let color = bg.premultiply();
        let Self {
            target: Some(target),
            clip,
            ..
        } = self
        else {
            return;
        };
        for r in clip.bounds() {
            target.fill_rect(r, color);
        }
    }

    /// Finish a frame. Masks still live at this point are popped.
    pub fn end_display(&mut self) {
        if self.masks.is_drawing() {
            self.log.debug("rendering ended while drawing a mask");
        }
        let live = self.masks.pop_all();
        if live > 0 {
            self.log.warn(&format!(
                "rendering ended while {live} mask(s) were still active"
            ));
        }
    }

    // ---------------------------------------------------------------------
    // Masks

    /// Push a new mask; following shape and glyph draws populate it.
    pub fn begin_submit_mask(&mut self) {
        if !self.ensure_bound("begin_submit_mask") {
            return;
        }
        let (w, h) = (self.width(), self.height());
        self.masks.push(w, h, self.clip.bounds());
    }

    /// Stop populating the newest mask; it now clips drawing.
    pub fn end_submit_mask(&mut self) {
        self.masks.end_submit();
    }

    /// Pop the newest mask.
    pub fn disable_mask(&mut self) {
        if !self.masks.pop() {
            self.log.warn("disable_mask called with no active mask");
        }
    }

    /// Number of live masks.
    pub fn mask_depth(&self) -> usize {
        self.masks.depth()
    }

    /// Mask buffer reuse counters.
    pub fn mask_pool_stats(&self) -> MaskPoolStats {
        self.masks.pool_stats()
    }

    /// Counters for the current frame.
    pub fn draw_stats(&self) -> &DrawStats {
        &self.stats
    }

    // ---------------------------------------------------------------------
    // Drawing

    /// Draw a shape placed with `xform`: fills per sub-shape, then outlines.
    #[tracing::instrument(skip(self, shape, xform), fields(paths = shape.paths.len()))]
    pub fn draw_shape(&mut self, shape: &Shape, xform: &Transform) {
        if !self.ensure_bound("draw_shape") {
            return;
        }
        let range = character_range(&self.stage, &xform.matrix, shape.bounds);
        if !self.clip.intersects_any(range) {
            return;
        }
        self.stats.shapes += 1;
        // Resolved on the first filled sub-shape, then shared.
        let mut table = None;
        for paths in shape.subshapes() {
            self.clip.select(range);
            self.draw_subshape(shape, paths, xform, &mut table);
        }
        self.clip.clear_selection();
    }

    fn draw_subshape(
        &mut self,
        shape: &Shape,
        paths: &[Path],
        xform: &Transform,
        table: &mut Option<StyleTable>,
    ) {
        let (placement, cxform) = (&xform.matrix, &xform.cxform);
        let line_styles = &shape.line_styles;
        let summary = analyze_paths(paths);
        if !summary.have_shape && !summary.have_outline {
            return;
        }
        let device = transform_paths(paths, &self.stage, placement);

        if self.masks.is_drawing() {
            self.draw_mask_shape(&device);
            return;
        }

        let clips = self.clip.selected();
        if clips.is_empty() {
            return;
        }

        self.stats.subshapes += 1;
        if summary.have_shape {
            let table = table.get_or_insert_with(|| {
                self.stats.style_tables += 1;
                StyleTable::build(
                    &shape.fill_styles,
                    &self.stage,
                    placement,
                    cxform,
                    self.opts.quality,
                )
            });
            let fills = build_fill_paths(&device);
            let ras = self.compound(&device, &fills, self.opts.shape_fill_rule);
            self.composite(&ras, &clips, &*table);
        }

        if summary.have_outline {
            let outlines = build_outline_paths(&device, line_styles);
            for (idx, outline) in outlines {
                let Some(style) = line_styles.get(idx) else {
                    continue;
                };
                if is_directional_scaling(style) {
                    self.log.once(
                        "directional-stroke-scaling",
                        Level::WARN,
                        "stroke scaling in one direction only; using the scaled axis",
                    );
                }
                let width = stroke_width(style, placement, &self.stage);
                let stroked = stroke_path(
                    &outline,
                    &stroke_for(style, width),
                    self.opts.curve_tolerance,
                );
                let color = cxform.transform(style.color).premultiply();
                self.fill_solid(&stroked, &clips, color, true);
            }
        }
    }

    /// Draw a glyph outline in one solid colour with the non-zero rule.
    pub fn draw_glyph(&mut self, shape: &Shape, color: Rgba, placement: &Matrix) {
        if !self.ensure_bound("draw_glyph") || shape.paths.is_empty() {
            return;
        }
        let Some(bounds) = shape.bounds else {
            return;
        };
        if !self
            .clip
            .select(character_range(&self.stage, placement, Some(bounds)))
        {
            return;
        }
        let device = transform_paths(&shape.paths, &self.stage, placement);
        if self.masks.is_drawing() {
            self.draw_mask_shape(&device);
        } else {
            let clips = self.clip.selected();
            let fills = build_fill_paths(&device);
            let ras = self.compound(&device, &fills, FillRule::NonZero);
            self.composite(&ras, &clips, &StyleTable::single_solid(color));
        }
        self.clip.clear_selection();
    }

    /// Stroke a polyline 1 px wide with round caps and joins.
    pub fn draw_line(&mut self, points: &[Point], color: Rgba, placement: &Matrix) {
        if !self.ensure_bound("draw_line") || points.is_empty() || self.clip.bounds().is_empty()
        {
            return;
        }
        let m = self.stage.to_affine() * placement.to_affine();
        let mut path = BezPath::new();
        path.move_to(m * points[0]);
        for &p in &points[1..] {
            path.line_to(m * p);
        }
        let stroked = stroke_path(&path, &hairline_stroke(), self.opts.curve_tolerance);
        let clips = self.clip.bounds().to_vec();
        self.fill_solid(&stroked, &clips, color.premultiply(), true);
    }

    /// Debug polygon: pixel-snapped corners, optional fill and 1 px outline.
    ///
    /// `masked` applies the newest mask when one is live.
    pub fn draw_poly(
        &mut self,
        corners: &[Point],
        fill: Rgba,
        outline: Rgba,
        placement: &Matrix,
        masked: bool,
    ) {
        if !self.ensure_bound("draw_poly") || corners.is_empty() || self.clip.bounds().is_empty()
        {
            return;
        }
        let m = self.stage.to_affine() * placement.to_affine();
        let snap = |p: Point| Point::new(p.x.trunc() + 0.5, p.y.trunc() + 0.5);
        let origin = snap(m * Point::new(corners[0].x.trunc(), corners[0].y.trunc()));
        let mut path = BezPath::new();
        path.move_to(origin);
        for &c in &corners[1..] {
            path.line_to(snap(m * c));
        }
        path.line_to(origin);

        let clips = self.clip.bounds().to_vec();
        if fill.a > 0 {
            self.fill_solid(&path, &clips, fill.premultiply(), masked);
        }
        if outline.a > 0 {
            let stroked = stroke_path(&path, &hairline_stroke(), self.opts.curve_tolerance);
            self.fill_solid(&stroked, &clips, outline.premultiply(), masked);
        }
    }

    /// Draw a decoded video frame stretched over `bounds` (world units).
    ///
    /// Smoothing applies when requested and quality is at least High.
    pub fn draw_video_frame(
        &mut self,
        frame: &VideoFrame,
        placement: &Matrix,
        bounds: Rect,
        smooth: bool,
    ) {
        if !self.ensure_bound("draw_video_frame") || self.clip.bounds().is_empty() {
            return;
        }
        let Some(span) = VideoSpan::new(
            frame,
            &self.stage,
            placement,
            bounds,
            smooth,
            self.opts.quality,
        ) else {
            self.log
                .once("degenerate-video", Level::DEBUG, "skipping video with empty placement");
            return;
        };
        let mut ras = CompoundRasterizer::new(FillRule::NonZero, self.opts.curve_tolerance);
        ras.set_styles(0, -1);
        ras.add_path(&video_outline(&self.stage, placement, bounds));
        let clips = self.clip.bounds().to_vec();
        self.composite(&ras, &clips, &span);
    }

    // ---------------------------------------------------------------------
    // Read-back

    /// Stored (premultiplied) pixel, `None` outside the target.
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Rgba8Premul> {
        self.target.as_ref()?.pixel(x, y)
    }

    /// Mean of the `radius`×`radius` block centred on `(x, y)`.
    ///
    /// `None` when `radius` is 0 or any pixel of the block lies outside the
    /// target.
    pub fn get_average_pixel(&self, x: i32, y: i32, radius: u32) -> Option<Rgba8Premul> {
        if radius == 0 {
            return None;
        }
        if radius == 1 {
            return self.get_pixel(x, y);
        }
        let r = i64::from(radius);
        let (x0, y0) = (i64::from(x) - r / 2, i64::from(y) - r / 2);
        if x0 < 0
            || y0 < 0
            || x0 + r > i64::from(self.width())
            || y0 + r > i64::from(self.height())
        {
            return None;
        }
        let mut sum = [0u64; 4];
        for py in y0..y0 + r {
            for px in x0..x0 + r {
                let c = self.get_pixel(i32::try_from(px).ok()?, i32::try_from(py).ok()?)?;
                sum[0] += u64::from(c.r);
                sum[1] += u64::from(c.g);
                sum[2] += u64::from(c.b);
                sum[3] += u64::from(c.a);
            }
        }
        let n = u64::from(radius) * u64::from(radius);
        Some(Rgba8Premul::new(
            (sum[0] / n) as u8,
            (sum[1] / n) as u8,
            (sum[2] / n) as u8,
            (sum[3] / n) as u8,
        ))
    }

    /// Copy of the target as straight-alpha RGBA.
    pub fn render_to_image(&self) -> Option<image::RgbaImage> {
        let target = self.target.as_ref()?;
        Some(image::RgbaImage::from_fn(
            target.width(),
            target.height(),
            |x, y| {
                let c = target
                    .pixel(x as i32, y as i32)
                    .unwrap_or_default()
                    .to_straight();
                image::Rgba([c.r, c.g, c.b, c.a])
            },
        ))
    }

    // ---------------------------------------------------------------------
    // Internals

    fn compound(
        &self,
        device: &[Path],
        geoms: &[BezPath],
        rule: FillRule,
    ) -> CompoundRasterizer {
        let mut ras = CompoundRasterizer::new(rule, self.opts.curve_tolerance);
        for (path, geom) in device.iter().zip(geoms) {
            if !path.has_fill() {
                continue;
            }
            ras.set_styles(i32::from(path.fill0) - 1, i32::from(path.fill1) - 1);
            ras.add_path(geom);
        }
        ras
    }

    fn composite(
        &mut self,
        ras: &CompoundRasterizer,
        clips: &[ClipRect],
        source: &impl SpanSource,
    ) {
        let Self {
            target: Some(target),
            masks,
            ..
        } = self
        else {
            return;
        };
        let mask = masks.top().map(|m| m as &dyn CoverModulator);
        for clip in clips {
            ras.render(clip, source, mask, |y, x0, colors| {
                target.blend_colors(y, x0, colors)
            });
        }
    }

    fn fill_solid(
        &mut self,
        path: &BezPath,
        clips: &[ClipRect],
        color: Rgba8Premul,
        masked: bool,
    ) {
        let Self {
            target: Some(target),
            masks,
            opts,
            ..
        } = self
        else {
            return;
        };
        let mask: Option<&AlphaMask> = if masked { masks.top() } else { None };
        let mut ras = ScanlineRasterizer::new(opts.curve_tolerance);
        ras.add_path(path);
        for clip in clips {
            ras.render(clip, FillRule::NonZero, |y, x0, covers| {
                if let Some(m) = mask {
                    m.modulate(x0, y, covers);
                }
                target.blend_solid(y, x0, color, covers);
            });
        }
    }

    /// Accumulate device-twips paths into the mask being populated, through
    /// its parent mask.
    fn draw_mask_shape(&mut self, device: &[Path]) {
        let mut ras = CompoundRasterizer::new(FillRule::NonZero, self.opts.curve_tolerance);
        for path in device {
            let side = |fill: u16| if fill == 0 { -1 } else { 0 };
            ras.set_styles(side(path.fill0), side(path.fill1));
            ras.add_path(&to_bez_path(path, 0.0));
        }
        let table = StyleTable::single_solid(MASK_COLOR);
        let clips = self.clip.selected();
        let Some((top, parent)) = self.masks.target_and_parent() else {
            return;
        };
        let parent = parent.map(|m| m as &dyn CoverModulator);
        for clip in &clips {
            ras.render(clip, &table, parent, |y, x0, colors| {
                top.blend_row(y, x0, colors)
            });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
