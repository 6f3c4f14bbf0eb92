//! Nested alpha masks.
//!
//! The stack owns one target-sized 8-bit buffer per nesting level. A mask is
//! always populated through its parent, so the top buffer already holds the
//! intersection of every live mask and readers never walk the stack.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::foundation::core::Rgba8Premul;
use crate::foundation::math::mul_div255_u8;
use crate::geometry::range::ClipRect;
use crate::render::compound::CoverModulator;
use crate::render::opts::MaskPoolOpts;

/// One single-channel coverage layer the size of the render target.
#[derive(Debug)]
pub(crate) struct AlphaMask {
    width: u32,
    height: u32,
    data: Vec<u8>,
    /// Rectangles zeroed since this mask was pushed.
    cleared: Vec<ClipRect>,
}

impl AlphaMask {
    fn from_buffer(width: u32, height: u32, mut data: Vec<u8>) -> Self {
        data.resize(byte_len(width, height), 0);
        Self {
            width,
            height,
            data,
            cleared: Vec::new(),
        }
    }

    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self::from_buffer(width, height, Vec::new())
    }

    fn into_buffer(self) -> Vec<u8> {
        self.data
    }

    /// Zero the mask inside every rectangle of `rects`.
    pub(crate) fn clear(&mut self, rects: &[ClipRect]) {
        let bounds = ClipRect::new(0, 0, self.width as i32 - 1, self.height as i32 - 1);
        for r in rects {
            let Some(r) = r.intersect(&bounds) else {
                continue;
            };
            for y in r.y0..=r.y1 {
                let row = self.row_start(y);
                self.data[row + r.x0 as usize..=row + r.x1 as usize].fill(0);
            }
            self.cleared.push(r);
        }
    }

    /// Zero the parts of `rects` not cleared since the push. Content drawn
    /// inside earlier rectangles is kept.
    pub(crate) fn clear_uncovered(&mut self, rects: &[ClipRect]) {
        let mut fresh: Vec<ClipRect> = Vec::new();
        for r in rects {
            let mut parts: SmallVec<[ClipRect; 4]> = smallvec::smallvec![*r];
            for done in &self.cleared {
                parts = parts.iter().flat_map(|p| p.subtract(done)).collect();
                if parts.is_empty() {
                    break;
                }
            }
            fresh.extend(parts);
        }
        self.clear(&fresh);
    }

    /// Accumulate the alpha of `colors` into row `y` starting at column `x0`.
    pub(crate) fn blend_row(&mut self, y: i32, x0: i32, colors: &[Rgba8Premul]) {
        if y < 0 || y as u32 >= self.height {
            return;
        }
        let row = self.row_start(y);
        for (i, c) in colors.iter().enumerate() {
            let x = x0 + i as i32;
            if c.a == 0 || x < 0 || x as u32 >= self.width {
                continue;
            }
            let v = &mut self.data[row + x as usize];
            *v = v.saturating_add(mul_div255_u8(u16::from(255 - *v), u16::from(c.a)));
        }
    }

    /// Mask value at `(x, y)`; zero outside the buffer.
    pub(crate) fn value(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return 0;
        }
        self.data[self.row_start(y) + x as usize]
    }

    fn row_start(&self, y: i32) -> usize {
        y as usize * self.width as usize
    }
}

impl CoverModulator for AlphaMask {
    fn modulate(&self, x: i32, y: i32, covers: &mut [u8]) {
        for (i, c) in covers.iter_mut().enumerate() {
            if *c != 0 {
                *c = mul_div255_u8(u16::from(*c), u16::from(self.value(x + i as i32, y)));
            }
        }
    }
}

fn byte_len(width: u32, height: u32) -> usize {
    (width as usize).saturating_mul(height as usize)
}

/// Counters describing mask buffer reuse.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MaskPoolStats {
    /// Idle buffers currently held for reuse.
    pub retained_buffers: usize,
    /// Bytes held by idle buffers.
    pub retained_bytes: usize,
    /// Fresh buffers allocated.
    pub alloc_buffers: u64,
    /// Bytes allocated for fresh buffers.
    pub alloc_bytes: u64,
    /// Buffers handed out from the pool instead of allocated.
    pub reused_buffers: u64,
    /// Released buffers dropped because a limit was reached.
    pub dropped_on_release: u64,
}

/// Bounded pool of mask buffers keyed by target size.
///
/// Borrow and release happen once per mask push/pop, never per pixel.
#[derive(Debug)]
pub(crate) struct MaskPool {
    opts: MaskPoolOpts,
    stats: MaskPoolStats,
    buckets: HashMap<(u32, u32), Vec<Vec<u8>>>,
}

impl MaskPool {
    pub(crate) fn new(opts: MaskPoolOpts) -> Self {
        Self {
            opts,
            stats: MaskPoolStats::default(),
            buckets: HashMap::new(),
        }
    }

    pub(crate) fn stats(&self) -> MaskPoolStats {
        self.stats.clone()
    }

    /// Mask of the given size. Reused buffers keep stale contents; callers
    /// clear the rectangles they are about to draw into.
    pub(crate) fn acquire(&mut self, width: u32, height: u32) -> AlphaMask {
        let bytes = byte_len(width, height);
        if let Some(buf) = self.buckets.get_mut(&(width, height)).and_then(Vec::pop) {
            self.stats.retained_buffers = self.stats.retained_buffers.saturating_sub(1);
            self.stats.retained_bytes = self.stats.retained_bytes.saturating_sub(bytes);
            self.stats.reused_buffers = self.stats.reused_buffers.saturating_add(1);
            return AlphaMask::from_buffer(width, height, buf);
        }

        self.stats.alloc_buffers = self.stats.alloc_buffers.saturating_add(1);
        self.stats.alloc_bytes = self.stats.alloc_bytes.saturating_add(bytes as u64);
        AlphaMask::new(width, height)
    }

    pub(crate) fn release(&mut self, mask: AlphaMask) {
        let bytes = byte_len(mask.width, mask.height);
        if self.stats.retained_buffers >= self.opts.max_buffers
            || self.stats.retained_bytes.saturating_add(bytes) > self.opts.max_bytes
        {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }
        let key = (mask.width, mask.height);
        self.buckets.entry(key).or_default().push(mask.into_buffer());
        self.stats.retained_buffers = self.stats.retained_buffers.saturating_add(1);
        self.stats.retained_bytes = self.stats.retained_bytes.saturating_add(bytes);
    }

    /// Drop every idle buffer whose size differs from `(width, height)`.
    pub(crate) fn retain_size(&mut self, width: u32, height: u32) {
        self.buckets.retain(|&k, _| k == (width, height));
        let kept = self.buckets.values().map(Vec::len).sum::<usize>();
        self.stats.retained_buffers = kept;
        self.stats.retained_bytes = kept.saturating_mul(byte_len(width, height));
    }
}

/// Stack of live masks plus the "currently drawing into the top mask" flag.
#[derive(Debug)]
pub(crate) struct MaskStack {
    masks: Vec<AlphaMask>,
    pool: MaskPool,
    drawing: bool,
}

impl MaskStack {
    pub(crate) fn new(opts: MaskPoolOpts) -> Self {
        Self {
            masks: Vec::new(),
            pool: MaskPool::new(opts),
            drawing: false,
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.masks.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    pub(crate) fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Push a new mask, cleared over `clip`, and start populating it.
    pub(crate) fn push(&mut self, width: u32, height: u32, clip: &[ClipRect]) {
        let mut mask = self.pool.acquire(width, height);
        mask.clear(clip);
        self.masks.push(mask);
        self.drawing = true;
    }

    /// Stop populating the top mask; it now modulates drawing.
    pub(crate) fn end_submit(&mut self) {
        self.drawing = false;
    }

    /// Pop the top mask. Returns `false` when the stack was already empty.
    pub(crate) fn pop(&mut self) -> bool {
        let Some(mask) = self.masks.pop() else {
            return false;
        };
        self.pool.release(mask);
        self.drawing = false;
        true
    }

    /// Pop every mask; returns how many were live.
    pub(crate) fn pop_all(&mut self) -> usize {
        let n = self.masks.len();
        while self.pop() {}
        n
    }

    /// Mask that modulates ordinary drawing.
    pub(crate) fn top(&self) -> Option<&AlphaMask> {
        self.masks.last()
    }

    /// The mask being populated and the one it is populated through.
    pub(crate) fn target_and_parent(&mut self) -> Option<(&mut AlphaMask, Option<&AlphaMask>)> {
        let (top, rest) = self.masks.split_last_mut()?;
        Some((top, rest.last()))
    }

    /// Extend every live mask over `rects`, zeroing only area it has not
    /// cleared before.
    pub(crate) fn extend_cleared(&mut self, rects: &[ClipRect]) {
        for m in &mut self.masks {
            m.clear_uncovered(rects);
        }
    }

    /// Forget pooled buffers sized for a previous target.
    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        self.pop_all();
        self.pool.retain_size(width, height);
    }

    pub(crate) fn pool_stats(&self) -> MaskPoolStats {
        self.pool.stats()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/mask.rs"]
mod tests;
