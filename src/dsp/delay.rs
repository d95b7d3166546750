use std::ops::Range;

use crate::dsp::tuning::DENORMAL_THRESHOLD;
use crate::error::{ConfigError, Result};

/*
Delay memory layout
===================

Every filter family gets exactly one allocation. The arena is carved into
back-to-back segments, one per delay line:

  comb arena:  | L0 1116 | R0 1139 | L1 1188 | R1 1211 | ... | R7 1640 |
  allpass arena: | L0 556 | R0 579 | L1 441 | ... | R3 248 |

Filters keep a SegmentView (offset + length) into the arena rather than a
pointer. The bank owns the arena and lends it to each filter per sample.
*/

/// Flush values too small to matter to exact zero.
///
/// Feedback loops decaying towards silence otherwise end up in subnormal
/// territory, which is very slow on most FPUs.
#[inline]
pub fn flush_denormal(sample: f32) -> f32 {
    if sample.abs() < DENORMAL_THRESHOLD {
        0.0
    } else {
        sample
    }
}

/// Non-owning view of a sub-range of a [`SampleArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentView {
    offset: usize,
    len: usize,
}

impl SegmentView {
    /// Describe `len` samples starting at `offset`.
    ///
    /// The view is only checked against an arena by [`SampleArena::validate`].
    pub const fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last sample of the segment
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    pub fn overlaps(&self, other: &SegmentView) -> bool {
        self.offset < other.end() && other.offset < self.end()
    }
}

/// Contiguous backing buffer shared by one family of delay lines
#[derive(Debug, Clone)]
pub struct SampleArena {
    samples: Vec<f32>,
}

impl SampleArena {
    /// Allocate a zeroed arena of `capacity` samples
    pub fn zeroed(capacity: usize) -> Self {
        Self {
            samples: vec![0.0; capacity],
        }
    }

    /// Allocate one arena sized to the sum of `lengths` and slice it into
    /// back-to-back segments, in order.
    pub fn carve(lengths: &[usize]) -> Result<(Self, Vec<SegmentView>)> {
        let mut views = Vec::with_capacity(lengths.len());
        let mut offset = 0;

        for (index, &len) in lengths.iter().enumerate() {
            if len == 0 {
                return Err(ConfigError::EmptySegment { index });
            }
            views.push(SegmentView::new(offset, len));
            offset += len;
        }

        let arena = Self::zeroed(offset);
        arena.validate(&views)?;
        Ok((arena, views))
    }

    /// Check that every view is non-empty, in bounds, and disjoint from all
    /// the others.
    pub fn validate(&self, views: &[SegmentView]) -> Result<()> {
        for (index, view) in views.iter().enumerate() {
            if view.is_empty() {
                return Err(ConfigError::EmptySegment { index });
            }
            if view.end() > self.samples.len() {
                return Err(ConfigError::SegmentOutOfBounds {
                    index,
                    end: view.end(),
                    capacity: self.samples.len(),
                });
            }
            if views[..index].iter().any(|earlier| earlier.overlaps(view)) {
                return Err(ConfigError::SegmentOverlap {
                    index,
                    offset: view.offset(),
                    end: view.end(),
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Zero every sample
    pub fn clear(&mut self) {
        self.samples.fill(0.0);
    }
}

/// Circular delay cursor over one arena segment.
///
/// `idx` always points at the oldest sample, which is the next one to be
/// overwritten. Callers read before they write on every tick.
#[derive(Debug, Clone)]
pub struct DelayLine {
    view: SegmentView,
    idx: usize,
}

impl DelayLine {
    pub fn new(view: SegmentView) -> Self {
        Self { view, idx: 0 }
    }

    pub fn view(&self) -> SegmentView {
        self.view
    }

    /// Delay length in samples
    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    pub fn position(&self) -> usize {
        self.idx
    }

    /// Oldest sample in the line
    #[inline]
    pub fn read(&self, arena: &[f32]) -> f32 {
        arena[self.view.offset() + self.idx]
    }

    /// Overwrite the oldest sample and step the cursor
    #[inline]
    pub fn write(&mut self, arena: &mut [f32], sample: f32) {
        arena[self.view.offset() + self.idx] = flush_denormal(sample);
        self.idx += 1;
        if self.idx >= self.view.len() {
            self.idx = 0;
        }
    }

    /// Zero this line's segment and rewind the cursor
    pub fn clear(&mut self, arena: &mut [f32]) {
        arena[self.view.range()].fill(0.0);
        self.idx = 0;
    }
}
