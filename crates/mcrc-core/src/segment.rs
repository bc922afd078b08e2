//! Alignment segmentation: splitting an update into software and hardware runs.
//!
//! An update over `len` bytes starting at address `addr` is cut into
//! contiguous [`Segment`]s. Leading bytes up to the next 8-byte boundary and a
//! trailing remainder shorter than one word go to the bit-serial path. The
//! aligned body goes to the block path in runs capped by the burst limit.
//!
//! Two strategies are available:
//!
//! - [`SegmentMode::SinglePass`]: one alignment pass, then uniformly capped
//!   aligned runs. Software bytes only ever appear at the very start and end.
//! - [`SegmentMode::PerBurst`]: the update is first cut into bursts (the first
//!   one extended by the start address's offset below its word boundary) and
//!   each burst is aligned independently. Hardware runs are never split inside
//!   a burst, and a burst whose end is not word aligned leaks its tail to the
//!   software path. This reproduces the transaction pattern of the MCRC
//!   driver's burst loop.
//!
//! Both strategies fold every byte exactly once in order, so the final
//! signature does not depend on the choice.

use std::ops::Range;

use crate::types::WORD_SIZE;

const WORD_MASK: usize = WORD_SIZE - 1;

/// Which accumulator folds a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Path {
    /// Folded one byte at a time by the bit-serial accumulator.
    Software,
    /// Folded one 8-byte big-endian word at a time by a block accumulator.
    Hardware,
}

/// A contiguous sub-range of an update, relative to its first byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Byte offsets into the update.
    pub range: Range<usize>,
    /// The accumulator that folds these bytes.
    pub path: Path,
}

impl Segment {
    fn software(range: Range<usize>) -> Self {
        Self {
            range,
            path: Path::Software,
        }
    }

    fn hardware(range: Range<usize>) -> Self {
        Self {
            range,
            path: Path::Hardware,
        }
    }

    /// Number of bytes covered.
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Whether the segment covers no bytes (never produced by [`Segments`]).
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Whether the segment goes to the block accumulator.
    pub fn is_hardware(&self) -> bool {
        self.path == Path::Hardware
    }
}

/// Segmentation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SegmentMode {
    /// Align once, then cap aligned runs at the burst limit.
    #[default]
    SinglePass,
    /// Cut into bursts first and align each burst independently.
    PerBurst,
}

/// Iterator over the segments of one update.
#[derive(Debug, Clone)]
pub struct Segments {
    addr: usize,
    len: usize,
    burst_limit: usize,
    mode: SegmentMode,
    pos: usize,
    /// End of the current burst (per-burst mode only).
    burst_end: usize,
}

impl Segments {
    /// Segment `len` bytes starting at address `addr`.
    ///
    /// A `burst_limit` of zero means unlimited.
    pub fn new(addr: usize, len: usize, burst_limit: usize, mode: SegmentMode) -> Self {
        Self {
            addr,
            len,
            burst_limit,
            mode,
            pos: 0,
            burst_end: 0,
        }
    }

    /// Segment a slice at its actual memory address.
    pub fn for_slice(data: &[u8], burst_limit: usize, mode: SegmentMode) -> Self {
        Self::new(data.as_ptr() as usize, data.len(), burst_limit, mode)
    }

    /// Largest aligned run handed to the block path in single-pass mode.
    ///
    /// Limits below one word still allow a single-word run.
    pub fn hardware_cap(burst_limit: usize) -> Option<usize> {
        match burst_limit {
            0 => None,
            limit => Some((limit & !WORD_MASK).max(WORD_SIZE)),
        }
    }

    fn misalignment(&self) -> usize {
        self.addr.wrapping_add(self.pos) & WORD_MASK
    }

    /// Cut the next segment out of `[pos, end)`, with hardware runs capped at `cap`.
    fn next_within(&self, end: usize, cap: Option<usize>) -> Segment {
        let start = self.pos;
        let remaining = end - start;

        let misalignment = self.misalignment();
        if misalignment != 0 {
            let prefix = (WORD_SIZE - misalignment).min(remaining);
            return Segment::software(start..start + prefix);
        }

        if remaining < WORD_SIZE {
            return Segment::software(start..end);
        }

        let body = remaining & !WORD_MASK;
        let run = cap.map_or(body, |cap| body.min(cap));
        Segment::hardware(start..start + run)
    }

    fn start_burst(&mut self) {
        let remaining = self.len - self.pos;
        let size = if self.burst_limit == 0 {
            remaining
        } else if self.pos == 0 {
            // The first burst also covers the bytes below the start's word boundary.
            self.burst_limit.saturating_add(self.addr & WORD_MASK)
        } else {
            self.burst_limit
        };
        self.burst_end = self.pos + size.min(remaining);
    }
}

impl Iterator for Segments {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        if self.pos >= self.len {
            return None;
        }

        let segment = match self.mode {
            SegmentMode::SinglePass => {
                self.next_within(self.len, Self::hardware_cap(self.burst_limit))
            }
            SegmentMode::PerBurst => {
                if self.pos >= self.burst_end {
                    self.start_burst();
                }
                self.next_within(self.burst_end, None)
            }
        };

        self.pos = segment.range.end;
        Some(segment)
    }
}

impl std::iter::FusedIterator for Segments {}

/// Segment `len` bytes at `addr` with single-pass alignment.
pub fn segment(addr: usize, len: usize, burst_limit: usize) -> Vec<Segment> {
    Segments::new(addr, len, burst_limit, SegmentMode::SinglePass).collect()
}
