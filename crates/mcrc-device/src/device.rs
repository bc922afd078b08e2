//! The MCRC accelerator: channel configuration, power, and PSA transfers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::accumulator::{be_word, check_words, BlockAccumulator};
use crate::error::{DeviceError, Result};
use crate::regs::{Channel, Mode, RegisterIo, CRC_CTRL0, CRC_CTRL1, CRC_CTRL2, PWDN};
use mcrc_core::WORD_SIZE;

/// Something that must be powered while in use.
pub trait PowerDomain {
    /// Take a usage reference, powering up on the first one.
    fn get(&self) -> Result<()>;

    /// Drop a usage reference, powering down after the last one.
    fn put(&self);
}

/// A usage reference on a [`PowerDomain`], released on drop.
pub struct PowerGuard<P: PowerDomain> {
    domain: Arc<P>,
}

impl<P: PowerDomain> PowerGuard<P> {
    /// Acquire a usage reference.
    pub fn acquire(domain: Arc<P>) -> Result<Self> {
        domain.get()?;
        Ok(Self { domain })
    }

    /// The guarded domain.
    pub fn domain(&self) -> &Arc<P> {
        &self.domain
    }
}

impl<P: PowerDomain> Drop for PowerGuard<P> {
    fn drop(&mut self) {
        self.domain.put();
    }
}

impl<P: PowerDomain> std::fmt::Debug for PowerGuard<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PowerGuard").finish_non_exhaustive()
    }
}

struct DeviceInner<R> {
    regs: R,
    usage: usize,
}

/// An MCRC accelerator behind a register file.
///
/// Thread-safe via a Mutex held for one register sequence at a time.
pub struct McrcDevice<R> {
    inner: Mutex<DeviceInner<R>>,
}

impl<R: RegisterIo> McrcDevice<R> {
    /// Wrap a register file. The device is left powered down with no users.
    pub fn new(mut regs: R) -> Self {
        let ctrl1 = regs.read32(CRC_CTRL1);
        regs.write32(CRC_CTRL1, ctrl1 | PWDN);
        Self {
            inner: Mutex::new(DeviceInner { regs, usage: 0 }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DeviceInner<R>> {
        // Register state stays consistent even if a holder panicked.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set a channel's operating mode.
    pub fn set_mode(&self, channel: Channel, mode: Mode) -> Result<()> {
        let mut inner = self.lock();
        let ctrl2 = inner.regs.read32(CRC_CTRL2);
        inner
            .regs
            .write32(CRC_CTRL2, mode.apply_to_ctrl2(ctrl2, channel));
        debug!(%channel, ?mode, "mcrc channel mode set");
        Ok(())
    }

    /// Set a channel's mode from raw register numbers.
    pub fn set_mode_raw(&self, channel: u32, mode: u32) -> Result<()> {
        self.set_mode(Channel::try_from(channel)?, Mode::try_from(mode)?)
    }

    /// Read a channel's operating mode.
    pub fn mode(&self, channel: Channel) -> Mode {
        Mode::from_ctrl2(self.lock().regs.read32(CRC_CTRL2), channel)
    }

    /// Pulse a channel's PSA software reset, zeroing its signature.
    pub fn reset_signature(&self, channel: Channel) -> Result<()> {
        let mut inner = self.lock();
        let ctrl0 = inner.regs.read32(CRC_CTRL0);
        inner.regs.write32(CRC_CTRL0, ctrl0 | channel.psa_swre());
        inner.regs.write32(CRC_CTRL0, ctrl0 & !channel.psa_swre());
        debug!(%channel, "mcrc signature reset");
        Ok(())
    }

    /// Read a channel's signature register.
    pub fn signature(&self, channel: Channel) -> u64 {
        self.lock().regs.read64(channel.psa_sigregl())
    }

    /// Whether the device is powered.
    pub fn is_powered(&self) -> bool {
        self.lock().regs.read32(CRC_CTRL1) & PWDN == 0
    }

    /// Current number of usage references.
    pub fn usage(&self) -> usize {
        self.lock().usage
    }

    /// Run `f` against the register file.
    pub fn with_registers<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        f(&mut self.lock().regs)
    }

    /// Fold whole words through a channel's signature register.
    ///
    /// The register folds `register ^ written`, so each word is written XORed
    /// with `signature ^ register`. The result is independent of what the
    /// register held before, which lets contexts share one channel.
    pub fn transfer(&self, channel: Channel, signature: u64, words: &[u8]) -> Result<u64> {
        check_words(words)?;

        let mut inner = self.lock();
        if inner.regs.read32(CRC_CTRL1) & PWDN != 0 {
            return Err(DeviceError::PoweredDown);
        }
        let mode = Mode::from_ctrl2(inner.regs.read32(CRC_CTRL2), channel);
        if mode != Mode::FullCpu {
            return Err(DeviceError::NotConfigured { channel, mode });
        }

        let psa = channel.psa_sigregl();
        let mut register = inner.regs.read64(psa);
        let mut sig = signature;
        for chunk in words.chunks_exact(WORD_SIZE) {
            inner.regs.write64(psa, be_word(chunk) ^ sig ^ register);
            sig = inner.regs.read64(psa);
            register = sig;
        }
        Ok(sig)
    }
}

impl<R: RegisterIo> PowerDomain for McrcDevice<R> {
    fn get(&self) -> Result<()> {
        let mut inner = self.lock();
        inner.usage += 1;
        if inner.usage == 1 {
            let ctrl1 = inner.regs.read32(CRC_CTRL1);
            inner.regs.write32(CRC_CTRL1, ctrl1 & !PWDN);
            debug!("mcrc powered up");
        }
        Ok(())
    }

    fn put(&self) {
        let mut inner = self.lock();
        inner.usage = inner.usage.saturating_sub(1);
        if inner.usage == 0 {
            let ctrl1 = inner.regs.read32(CRC_CTRL1);
            inner.regs.write32(CRC_CTRL1, ctrl1 | PWDN);
            debug!("mcrc powered down");
        }
    }
}

impl<R> std::fmt::Debug for McrcDevice<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McrcDevice").finish_non_exhaustive()
    }
}

/// A [`BlockAccumulator`] bound to one channel of a shared device.
pub struct ChannelAccelerator<R> {
    device: Arc<McrcDevice<R>>,
    channel: Channel,
}

impl<R: RegisterIo> ChannelAccelerator<R> {
    pub fn new(device: Arc<McrcDevice<R>>, channel: Channel) -> Self {
        Self { device, channel }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn device(&self) -> &Arc<McrcDevice<R>> {
        &self.device
    }
}

impl<R> Clone for ChannelAccelerator<R> {
    fn clone(&self) -> Self {
        Self {
            device: Arc::clone(&self.device),
            channel: self.channel,
        }
    }
}

impl<R> std::fmt::Debug for ChannelAccelerator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelAccelerator")
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

impl<R: RegisterIo> BlockAccumulator for ChannelAccelerator<R> {
    fn advance_block(&mut self, signature: u64, word: u64) -> Result<u64> {
        self.device
            .transfer(self.channel, signature, &word.to_be_bytes())
    }

    fn advance_blocks(&mut self, signature: u64, words: &[u8]) -> Result<u64> {
        self.device.transfer(self.channel, signature, words)
    }
}
