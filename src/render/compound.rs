//! Multi-style fill for Flash-style shapes.
//!
//! Every path edge names the style on its left and on its right. Each style
//! collects its own closed boundary (left edges as-is, right edges reversed)
//! and is rasterized on its own grid; styles are then composited per pixel in
//! ascending index order, each limited to the coverage not yet claimed.
//!
//! Grids cover one band of rows at a time, so memory stays at
//! `styles * width * band` however tall the shape is.

use std::collections::BTreeMap;

use crate::foundation::core::{BezPath, Rgba8Premul};
use crate::foundation::math::{add_sat_u8, scale_premul};
use crate::geometry::range::ClipRect;
use crate::render::raster::{CoverageGrid, FillRule, Polygon, for_each_line};

/// Rows rasterized per band.
const BAND_ROWS: u32 = 64;

/// Colour source for compound fills, indexed by 0-based style.
pub(crate) trait SpanSource {
    /// `true` when the style is a flat colour.
    fn is_solid(&self, style: usize) -> bool;
    /// Colour of a solid style.
    fn color(&self, style: usize) -> Rgba8Premul;
    /// Fill `out` with colours for pixels `x..x + out.len()` on row `y`.
    fn generate_span(&self, style: usize, x: i32, y: i32, out: &mut [Rgba8Premul]);
}

/// Per-pixel multiplier applied to covers before compositing.
pub(crate) trait CoverModulator {
    /// Scale `covers` for pixels `x..x + covers.len()` on row `y`.
    fn modulate(&self, x: i32, y: i32, covers: &mut [u8]);
}

#[derive(Debug)]
pub(crate) struct CompoundRasterizer {
    rule: FillRule,
    tolerance: f64,
    left: Option<usize>,
    right: Option<usize>,
    styles: BTreeMap<usize, Polygon>,
    band_rows: u32,
}

impl CompoundRasterizer {
    pub(crate) fn new(rule: FillRule, tolerance: f64) -> Self {
        Self {
            rule,
            tolerance,
            left: None,
            right: None,
            styles: BTreeMap::new(),
            band_rows: BAND_ROWS,
        }
    }

    /// Rasterize `rows` rows per band (at least one).
    pub(crate) fn with_band_rows(mut self, rows: u32) -> Self {
        self.band_rows = rows.max(1);
        self
    }

    /// Select the styles for following paths. Negative values mean "unpainted".
    pub(crate) fn set_styles(&mut self, left: i32, right: i32) {
        self.left = usize::try_from(left).ok();
        self.right = usize::try_from(right).ok();
    }

    /// Append `path` with the current style pair. Subpaths are not closed.
    pub(crate) fn add_path(&mut self, path: &BezPath) {
        let (left, right) = (self.left, self.right);
        if left.is_none() && right.is_none() {
            return;
        }
        let styles = &mut self.styles;
        for_each_line(path, self.tolerance, false, |a, b| {
            if let Some(l) = left {
                styles.entry(l).or_default().push_line(a, b);
            }
            if let Some(r) = right {
                styles.entry(r).or_default().push_line(b, a);
            }
        });
    }

    /// Composite all styles inside `clip` and hand each finished row to `emit`
    /// as premultiplied colours starting at column `x0`.
    pub(crate) fn render(
        &self,
        clip: &ClipRect,
        source: &impl SpanSource,
        modulator: Option<&dyn CoverModulator>,
        mut emit: impl FnMut(i32, i32, &[Rgba8Premul]),
    ) {
        let Some(rows) = self
            .styles
            .values()
            .filter_map(|poly| {
                let b = poly.bounds()?;
                let band = ClipRect::new(clip.x0, b.y0.floor() as i32, clip.x1, b.y1.ceil() as i32);
                band.intersect(clip)
            })
            .reduce(|a, b| a.union(&b))
        else {
            return;
        };
        let step = i64::from(self.band_rows);
        let mut y0 = i64::from(rows.y0);
        while y0 <= i64::from(rows.y1) {
            let y1 = (y0 + step - 1).min(i64::from(rows.y1));
            let band = ClipRect::new(clip.x0, y0 as i32, clip.x1, y1 as i32);
            self.render_band(&band, source, modulator, &mut emit);
            y0 = y1 + 1;
        }
    }

    fn render_band(
        &self,
        clip: &ClipRect,
        source: &impl SpanSource,
        modulator: Option<&dyn CoverModulator>,
        emit: &mut impl FnMut(i32, i32, &[Rgba8Premul]),
    ) {
        let grids: Vec<(usize, CoverageGrid)> = self
            .styles
            .iter()
            .filter_map(|(&style, poly)| {
                CoverageGrid::from_polygon(poly, clip).map(|grid| (style, grid))
            })
            .collect();
        let Some(union) = grids.iter().map(|(_, g)| g.area()).reduce(|a, b| a.union(&b)) else {
            return;
        };

        let width = union.width() as usize;
        let mut mix = vec![Rgba8Premul::transparent(); width];
        let mut used = vec![0u8; width];
        let mut covers = vec![0u8; width];
        let mut span = vec![Rgba8Premul::transparent(); width];

        for y in union.y0..=union.y1 {
            mix.fill(Rgba8Premul::transparent());
            used.fill(0);
            let mut painted = false;

            for (style, grid) in &grids {
                let area = grid.area();
                let covers = &mut covers[..area.width() as usize];
                if !grid.sweep_row(y, self.rule, covers) {
                    continue;
                }
                if let Some(m) = modulator {
                    m.modulate(area.x0, y, covers);
                }
                let Some(first) = covers.iter().position(|&c| c != 0) else {
                    continue;
                };
                let last = covers.iter().rposition(|&c| c != 0).unwrap_or(first);
                let offset = (area.x0 - union.x0) as usize;

                let colors = &mut span[..=last - first];
                if source.is_solid(*style) {
                    colors.fill(source.color(*style));
                } else {
                    source.generate_span(*style, area.x0 + first as i32, y, colors);
                }

                for (i, color) in (first..=last).zip(colors.iter()) {
                    let j = offset + i;
                    let cover = covers[i].min(255 - used[j]);
                    if cover == 0 {
                        continue;
                    }
                    let c = scale_premul(*color, cover);
                    let m = &mut mix[j];
                    *m = Rgba8Premul::new(
                        add_sat_u8(m.r, c.r),
                        add_sat_u8(m.g, c.g),
                        add_sat_u8(m.b, c.b),
                        add_sat_u8(m.a, c.a),
                    );
                    used[j] += cover;
                    painted = true;
                }
            }

            if painted {
                emit(y, union.x0, &mix);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compound.rs"]
mod tests;
