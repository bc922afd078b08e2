//! The streaming digest state machine.
//!
//! A [`DigestContext`] owns one running signature. Updates are segmented by
//! address alignment: unaligned edges are folded bit-serially and aligned
//! words go to the block accumulator, if there is one. Without an accelerator
//! every byte is folded bit-serially. Either way the digest is the same.

use mcrc_core::{advance_slice, Digest, Path, Segments};
use mcrc_device::{BlockAccumulator, SoftwareBlock};
use tracing::{trace, warn};

use crate::algorithm::Shash;
use crate::config::EngineConfig;
use crate::error::Result;

/// Lifecycle of a digest context.
///
/// A context cannot exist before its transform is set up, so construction
/// yields [`Phase::Ready`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Created, signature zero, no data yet.
    Ready,
    /// `init` has run; zero or more updates applied.
    Accumulating,
    /// A digest has been emitted. Call `init` before reuse.
    Finalized,
}

/// Per-computation CRC-64 state.
///
/// Not synchronized: use one context per thread, or serialize access.
#[derive(Debug, Clone)]
pub struct DigestContext<A> {
    signature: u64,
    phase: Phase,
    accel: Option<A>,
    config: EngineConfig,
}

impl DigestContext<SoftwareBlock> {
    /// A context that folds everything bit-serially.
    pub fn software(config: EngineConfig) -> Self {
        Self::new(None, config)
    }
}

impl<A: BlockAccumulator> DigestContext<A> {
    /// Create a context, optionally backed by a block accumulator.
    pub fn new(accel: Option<A>, config: EngineConfig) -> Self {
        Self {
            signature: 0,
            phase: Phase::Ready,
            accel,
            config,
        }
    }

    /// Create a context backed by `accel`.
    pub fn with_accelerator(accel: A, config: EngineConfig) -> Self {
        Self::new(Some(accel), config)
    }

    /// The running signature.
    pub fn signature(&self) -> u64 {
        self.signature
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether aligned words go to a block accumulator.
    pub fn is_accelerated(&self) -> bool {
        self.accel.is_some()
    }

    /// Give back the block accumulator.
    pub fn into_accelerator(self) -> Option<A> {
        self.accel
    }

    /// Reset the signature for a new computation.
    pub fn init(&mut self) {
        self.signature = 0;
        self.phase = Phase::Accumulating;
    }

    /// Fold `data` into the signature.
    ///
    /// On error the signature is unchanged: either the whole update applies
    /// or none of it does.
    pub fn update(&mut self, data: &[u8]) -> Result<()> {
        if self.phase == Phase::Finalized {
            warn!("mcrc update after finalize without init; continuing from the emitted signature");
        }

        let signature = match self.accel.as_mut() {
            None => advance_slice(self.signature, data),
            Some(accel) => fold_segmented(accel, &self.config, self.signature, data)?,
        };

        self.signature = signature;
        self.phase = Phase::Accumulating;
        Ok(())
    }

    /// Emit the digest: the signature in little-endian byte order.
    ///
    /// Does not reset. Finalizing twice without `init` is a caller error and
    /// returns the same digest again.
    pub fn finalize(&mut self) -> Digest {
        if self.phase == Phase::Finalized {
            warn!("mcrc finalize called twice without init");
        }
        self.phase = Phase::Finalized;
        Digest::from_signature(self.signature)
    }
}

/// Fold `data` starting from `signature`, routing aligned words to `accel`.
fn fold_segmented<A: BlockAccumulator>(
    accel: &mut A,
    config: &EngineConfig,
    signature: u64,
    data: &[u8],
) -> Result<u64> {
    let burst_limit = config.burst_limit.get();
    let mut sig = signature;
    let mut hw_runs = 0usize;
    let mut sw_bytes = 0usize;

    for segment in Segments::for_slice(data, burst_limit, config.segment_mode) {
        let bytes = &data[segment.range];
        sig = match segment.path {
            Path::Software => {
                sw_bytes += bytes.len();
                advance_slice(sig, bytes)
            }
            Path::Hardware => {
                hw_runs += 1;
                accel.advance_blocks(sig, bytes).map_err(|e| {
                    warn!(error = %e, len = data.len(), "mcrc accelerator failure, update discarded");
                    e
                })?
            }
        };
    }

    trace!(
        len = data.len(),
        burst_limit,
        hw_runs,
        sw_bytes,
        "mcrc update segmented"
    );
    Ok(sig)
}

impl<A: BlockAccumulator> Shash for DigestContext<A> {
    fn init(&mut self) {
        DigestContext::init(self)
    }

    fn update(&mut self, data: &[u8]) -> Result<()> {
        DigestContext::update(self, data)
    }

    fn finalize(&mut self) -> Digest {
        DigestContext::finalize(self)
    }
}
