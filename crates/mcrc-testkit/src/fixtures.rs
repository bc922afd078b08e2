//! Test fixtures and helpers.
//!
//! Instrumented block accumulators, misaligned buffers, and emulated devices
//! for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mcrc_core::{fold_word, WORD_SIZE};
use mcrc_device::{
    BlockAccumulator, Channel, ChannelAccelerator, DeviceError, EmulatedRegisters, McrcDevice,
    Mode, PowerGuard, Result,
};

/// Counts the work routed to the block path.
///
/// Clones share their counters.
#[derive(Debug, Clone, Default)]
pub struct CountingAccelerator {
    transactions: Arc<AtomicUsize>,
    words: Arc<AtomicUsize>,
}

impl CountingAccelerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `advance_blocks` calls.
    pub fn transactions(&self) -> usize {
        self.transactions.load(Ordering::SeqCst)
    }

    /// Number of words folded.
    pub fn words(&self) -> usize {
        self.words.load(Ordering::SeqCst)
    }

    /// Bytes folded through the block path.
    pub fn bytes(&self) -> usize {
        self.words() * WORD_SIZE
    }
}

impl BlockAccumulator for CountingAccelerator {
    fn advance_block(&mut self, signature: u64, word: u64) -> Result<u64> {
        self.words.fetch_add(1, Ordering::SeqCst);
        Ok(fold_word(signature, word))
    }

    fn advance_blocks(&mut self, signature: u64, words: &[u8]) -> Result<u64> {
        self.transactions.fetch_add(1, Ordering::SeqCst);
        if words.len() % WORD_SIZE != 0 {
            return Err(DeviceError::PartialWord { len: words.len() });
        }
        words.chunks_exact(WORD_SIZE).try_fold(signature, |sig, chunk| {
            let mut bytes = [0u8; WORD_SIZE];
            bytes.copy_from_slice(chunk);
            self.advance_block(sig, u64::from_be_bytes(bytes))
        })
    }
}

/// Folds words correctly until its budget runs out, then faults.
///
/// Clones share the remaining budget.
#[derive(Debug, Clone)]
pub struct FaultyAccelerator {
    remaining: Arc<AtomicUsize>,
}

impl FaultyAccelerator {
    /// Allow `words` successful words before failing.
    pub fn after(words: usize) -> Self {
        Self {
            remaining: Arc::new(AtomicUsize::new(words)),
        }
    }

    /// Fail on the first word.
    pub fn always() -> Self {
        Self::after(0)
    }

    /// Words left before the next fault.
    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::SeqCst)
    }

    /// Restore the budget.
    pub fn refill(&self, words: usize) {
        self.remaining.store(words, Ordering::SeqCst);
    }
}

impl BlockAccumulator for FaultyAccelerator {
    fn advance_block(&mut self, signature: u64, word: u64) -> Result<u64> {
        let spent = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        match spent {
            Ok(_) => Ok(fold_word(signature, word)),
            Err(_) => Err(DeviceError::Fault("injected fault".into())),
        }
    }
}

/// A copy of some bytes placed at a chosen offset from word alignment.
#[derive(Debug, Clone)]
pub struct OffsetBuffer {
    storage: Vec<u8>,
    start: usize,
    len: usize,
}

impl OffsetBuffer {
    /// Copy `data` so that its first byte sits `offset % 8` bytes past an
    /// 8-byte boundary.
    pub fn new(data: &[u8], offset: usize) -> Self {
        let mut storage = vec![0u8; data.len() + 2 * WORD_SIZE];
        let base = storage.as_ptr() as usize;
        let start = (offset % WORD_SIZE + WORD_SIZE - base % WORD_SIZE) % WORD_SIZE;
        storage[start..start + data.len()].copy_from_slice(data);
        Self {
            storage,
            start,
            len: data.len(),
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.storage[self.start..self.start + self.len]
    }

    /// Offset of the first byte from word alignment.
    pub fn misalignment(&self) -> usize {
        self.as_slice().as_ptr() as usize % WORD_SIZE
    }
}

/// An emulated device with one channel configured for full-CPU folding.
pub struct DeviceFixture {
    pub device: Arc<McrcDevice<EmulatedRegisters>>,
    pub channel: Channel,
    guard: PowerGuard<McrcDevice<EmulatedRegisters>>,
}

impl DeviceFixture {
    /// Power the device and configure `channel`.
    pub fn new(channel: Channel) -> Result<Self> {
        let device = Arc::new(McrcDevice::new(EmulatedRegisters::default()));
        let guard = PowerGuard::acquire(Arc::clone(&device))?;
        device.set_mode(channel, Mode::FullCpu)?;
        device.reset_signature(channel)?;
        Ok(Self {
            device,
            channel,
            guard,
        })
    }

    /// A block accumulator on the fixture's channel.
    pub fn accelerator(&self) -> ChannelAccelerator<EmulatedRegisters> {
        ChannelAccelerator::new(Arc::clone(&self.device), self.channel)
    }

    /// Number of PSA register folds performed so far.
    pub fn psa_writes(&self) -> u64 {
        self.device.with_registers(|regs| regs.psa_writes())
    }

    /// Release the power reference held by the fixture.
    pub fn power_down(self) -> Arc<McrcDevice<EmulatedRegisters>> {
        drop(self.guard);
        self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcrc_core::advance_slice;

    #[test]
    fn test_offset_buffer_alignment() {
        let data: Vec<u8> = (0..40).collect();
        for offset in 0..WORD_SIZE {
            let buf = OffsetBuffer::new(&data, offset);
            assert_eq!(buf.as_slice(), &data[..]);
            assert_eq!(buf.misalignment(), offset);
        }
    }

    #[test]
    fn test_counting_accelerator() {
        let mut accel = CountingAccelerator::new();
        let shared = accel.clone();
        let sig = accel.advance_blocks(0, &[0xab; 24]).unwrap();
        assert_eq!(sig, advance_slice(0, &[0xab; 24]));
        assert_eq!(shared.transactions(), 1);
        assert_eq!(shared.words(), 3);
        assert_eq!(shared.bytes(), 24);
    }

    #[test]
    fn test_faulty_accelerator_budget() {
        let mut accel = FaultyAccelerator::after(2);
        assert!(accel.advance_blocks(0, &[1; 16]).is_ok());
        assert_eq!(accel.remaining(), 0);
        assert!(matches!(
            accel.advance_block(0, 1),
            Err(DeviceError::Fault(_))
        ));
        accel.refill(1);
        assert_eq!(accel.advance_block(0, 1).unwrap(), fold_word(0, 1));
    }

    #[test]
    fn test_device_fixture_folds() {
        let fixture = DeviceFixture::new(Channel::Two).unwrap();
        let mut accel = fixture.accelerator();
        let sig = accel.advance_blocks(0, b"abcdefgh").unwrap();
        assert_eq!(sig, 0xbe93_88c9_d2ff_e40f);
        assert_eq!(fixture.psa_writes(), 1);

        let device = fixture.power_down();
        assert!(!device.is_powered());
    }
}
