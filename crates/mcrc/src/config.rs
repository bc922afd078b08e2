//! Engine configuration.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use mcrc_core::SegmentMode;

/// Upper bound on bytes handed to the block accumulator per transaction.
///
/// Zero means unlimited. The value is shared: every clone observes `set`
/// calls, and each update reads it exactly once.
#[derive(Debug, Clone)]
pub struct BurstLimit(Arc<AtomicUsize>);

impl BurstLimit {
    /// A new, unshared limit.
    pub fn new(bytes: usize) -> Self {
        Self(Arc::new(AtomicUsize::new(bytes)))
    }

    /// A new, unshared, unlimited limit.
    pub fn unlimited() -> Self {
        Self::new(0)
    }

    /// The process-wide limit, unlimited until set.
    pub fn global() -> Self {
        static GLOBAL: OnceLock<BurstLimit> = OnceLock::new();
        GLOBAL.get_or_init(BurstLimit::unlimited).clone()
    }

    /// Current limit in bytes.
    pub fn get(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }

    /// Change the limit. Affects segmentation of later updates only.
    pub fn set(&self, bytes: usize) {
        self.0.store(bytes, Ordering::Relaxed);
    }

    pub fn is_unlimited(&self) -> bool {
        self.get() == 0
    }

    /// Whether two handles share the same underlying value.
    pub fn shares_with(&self, other: &BurstLimit) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Configuration for a transform and the digest contexts it creates.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Burst limit read at every update.
    pub burst_limit: BurstLimit,
    /// How updates are cut into software and hardware runs.
    pub segment_mode: SegmentMode,
}

impl EngineConfig {
    /// Use the given burst limit handle.
    pub fn with_burst_limit(mut self, burst_limit: BurstLimit) -> Self {
        self.burst_limit = burst_limit;
        self
    }

    /// Use a fixed, unshared burst limit.
    pub fn with_fixed_burst(self, bytes: usize) -> Self {
        self.with_burst_limit(BurstLimit::new(bytes))
    }

    /// Use the given segmentation strategy.
    pub fn with_segment_mode(mut self, segment_mode: SegmentMode) -> Self {
        self.segment_mode = segment_mode;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            burst_limit: BurstLimit::global(),
            segment_mode: SegmentMode::SinglePass,
        }
    }
}
