//! Register map, channel and mode definitions, and an emulated register file.
//!
//! The accelerator exposes four PSA (parallel signature analysis) channels.
//! Each channel has a 64-bit signature register; in full-CPU mode every
//! 64-bit write to it folds the written word into the signature.

use std::fmt;

use mcrc_core::fold_word;

use crate::error::DeviceError;

/// Global control register 0: per-channel PSA software reset.
pub const CRC_CTRL0: usize = 0x0000;

/// Global control register 1: power down.
pub const CRC_CTRL1: usize = 0x0008;

/// Power-down bit in [`CRC_CTRL1`].
pub const PWDN: u32 = 1 << 0;

/// Global control register 2: per-channel mode.
pub const CRC_CTRL2: usize = 0x0010;

/// Number of PSA channels.
pub const CHANNEL_COUNT: usize = 4;

const MODE_FIELD_MASK: u32 = 0x3;

/// A PSA channel, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum Channel {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl Channel {
    /// All channels in register order.
    pub const ALL: [Channel; CHANNEL_COUNT] =
        [Channel::One, Channel::Two, Channel::Three, Channel::Four];

    /// The channel number (1..=4).
    pub const fn number(self) -> u32 {
        self as u32
    }

    /// Zero-based index.
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    const fn shift(self) -> u32 {
        (self.number() - 1) << 3
    }

    /// PSA software-reset bit for this channel in [`CRC_CTRL0`].
    pub const fn psa_swre(self) -> u32 {
        1 << self.shift()
    }

    /// Mode field value for this channel in [`CRC_CTRL2`].
    pub const fn mode_bits(self, mode: Mode) -> u32 {
        (mode as u32) << self.shift()
    }

    const fn mode_mask(self) -> u32 {
        MODE_FIELD_MASK << self.shift()
    }

    /// Offset of this channel's signature register.
    pub const fn psa_sigregl(self) -> usize {
        (0x6 + 4 * self.index()) << 4
    }
}

impl TryFrom<u32> for Channel {
    type Error = DeviceError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Channel::One),
            2 => Ok(Channel::Two),
            3 => Ok(Channel::Three),
            4 => Ok(Channel::Four),
            other => Err(DeviceError::InvalidChannel(other)),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Operating mode of a PSA channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Mode {
    /// Signature captured from an external data bus.
    #[default]
    DataCapture = 0,
    /// DMA-driven compression with automatic compare.
    Auto = 1,
    /// DMA-driven compression, CPU compare.
    SemiCpu = 2,
    /// CPU writes words directly into the signature register.
    FullCpu = 3,
}

impl TryFrom<u32> for Mode {
    type Error = DeviceError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Mode::DataCapture),
            1 => Ok(Mode::Auto),
            2 => Ok(Mode::SemiCpu),
            3 => Ok(Mode::FullCpu),
            other => Err(DeviceError::InvalidMode(other)),
        }
    }
}

impl Mode {
    /// Decode a channel's mode from a [`CRC_CTRL2`] value.
    pub fn from_ctrl2(ctrl2: u32, channel: Channel) -> Self {
        match (ctrl2 & channel.mode_mask()) >> channel.shift() {
            1 => Mode::Auto,
            2 => Mode::SemiCpu,
            3 => Mode::FullCpu,
            _ => Mode::DataCapture,
        }
    }

    /// Replace a channel's mode field in a [`CRC_CTRL2`] value.
    pub fn apply_to_ctrl2(self, ctrl2: u32, channel: Channel) -> u32 {
        (ctrl2 & !channel.mode_mask()) | channel.mode_bits(self)
    }
}

/// Relaxed memory-mapped register access.
pub trait RegisterIo {
    fn read32(&self, offset: usize) -> u32;
    fn write32(&mut self, offset: usize, value: u32);
    fn read64(&self, offset: usize) -> u64;
    fn write64(&mut self, offset: usize, value: u64);
}

/// A software model of the accelerator's register file.
///
/// - A PSA write folds the word only in full-CPU mode, and only while the
///   device is powered and the channel is out of reset.
/// - Setting a channel's reset bit in `CRC_CTRL0` clears its signature.
/// - Unknown offsets read as zero and ignore writes.
#[derive(Debug, Clone, Default)]
pub struct EmulatedRegisters {
    ctrl0: u32,
    ctrl1: u32,
    ctrl2: u32,
    psa: [u64; CHANNEL_COUNT],
    psa_writes: u64,
}

impl EmulatedRegisters {
    /// A register file in its reset state (powered, all channels in data capture).
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of signature-register writes that folded a word.
    pub fn psa_writes(&self) -> u64 {
        self.psa_writes
    }

    fn channel_at(offset: usize) -> Option<Channel> {
        Channel::ALL
            .into_iter()
            .find(|channel| channel.psa_sigregl() == offset)
    }
}

impl RegisterIo for EmulatedRegisters {
    fn read32(&self, offset: usize) -> u32 {
        match offset {
            CRC_CTRL0 => self.ctrl0,
            CRC_CTRL1 => self.ctrl1,
            CRC_CTRL2 => self.ctrl2,
            _ => 0,
        }
    }

    fn write32(&mut self, offset: usize, value: u32) {
        match offset {
            CRC_CTRL0 => {
                for channel in Channel::ALL {
                    if value & channel.psa_swre() != 0 {
                        self.psa[channel.index()] = 0;
                    }
                }
                self.ctrl0 = value;
            }
            CRC_CTRL1 => self.ctrl1 = value,
            CRC_CTRL2 => self.ctrl2 = value,
            _ => {}
        }
    }

    fn read64(&self, offset: usize) -> u64 {
        match Self::channel_at(offset) {
            Some(channel) if self.ctrl1 & PWDN == 0 => self.psa[channel.index()],
            _ => 0,
        }
    }

    fn write64(&mut self, offset: usize, value: u64) {
        let Some(channel) = Self::channel_at(offset) else {
            return;
        };
        if self.ctrl1 & PWDN != 0 || self.ctrl0 & channel.psa_swre() != 0 {
            return;
        }
        if Mode::from_ctrl2(self.ctrl2, channel) == Mode::FullCpu {
            let psa = &mut self.psa[channel.index()];
            *psa = fold_word(*psa, value);
            self.psa_writes += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_offsets() {
        assert_eq!(Channel::One.psa_sigregl(), 0x60);
        assert_eq!(Channel::Two.psa_sigregl(), 0xa0);
        assert_eq!(Channel::Three.psa_sigregl(), 0xe0);
        assert_eq!(Channel::Four.psa_sigregl(), 0x120);
    }

    #[test]
    fn test_channel_bits() {
        assert_eq!(Channel::One.psa_swre(), 0x1);
        assert_eq!(Channel::Two.psa_swre(), 0x100);
        assert_eq!(Channel::Four.mode_bits(Mode::FullCpu), 0x0300_0000);
    }

    #[test]
    fn test_channel_try_from() {
        assert_eq!(Channel::try_from(3), Ok(Channel::Three));
        assert_eq!(Channel::try_from(0), Err(DeviceError::InvalidChannel(0)));
        assert_eq!(Channel::try_from(5), Err(DeviceError::InvalidChannel(5)));
    }

    #[test]
    fn test_mode_try_from() {
        assert_eq!(Mode::try_from(3), Ok(Mode::FullCpu));
        assert_eq!(Mode::try_from(4), Err(DeviceError::InvalidMode(4)));
    }

    #[test]
    fn test_mode_field_replaced_not_ored() {
        let ctrl2 = Mode::FullCpu.apply_to_ctrl2(0, Channel::Two);
        let ctrl2 = Mode::Auto.apply_to_ctrl2(ctrl2, Channel::Two);
        assert_eq!(Mode::from_ctrl2(ctrl2, Channel::Two), Mode::Auto);
        assert_eq!(Mode::from_ctrl2(ctrl2, Channel::One), Mode::DataCapture);
    }

    #[test]
    fn test_psa_write_folds_in_full_cpu_mode() {
        let mut regs = EmulatedRegisters::new();
        let offset = Channel::One.psa_sigregl();

        regs.write64(offset, 1);
        assert_eq!(regs.read64(offset), 0, "data capture mode ignores CPU writes");

        regs.write32(CRC_CTRL2, Channel::One.mode_bits(Mode::FullCpu));
        regs.write64(offset, u64::from_be_bytes(*b"abcdefgh"));
        assert_eq!(regs.read64(offset), 0xbe93_88c9_d2ff_e40f);
        assert_eq!(regs.psa_writes(), 1);
    }

    #[test]
    fn test_psa_reset_and_power_down() {
        let mut regs = EmulatedRegisters::new();
        let offset = Channel::Three.psa_sigregl();
        regs.write32(CRC_CTRL2, Channel::Three.mode_bits(Mode::FullCpu));
        regs.write64(offset, 1);
        assert_ne!(regs.read64(offset), 0);

        regs.write32(CRC_CTRL0, Channel::Three.psa_swre());
        assert_eq!(regs.read64(offset), 0);
        regs.write64(offset, 1);
        assert_eq!(regs.read64(offset), 0, "held in reset");
        regs.write32(CRC_CTRL0, 0);

        regs.write32(CRC_CTRL1, PWDN);
        regs.write64(offset, 1);
        regs.write32(CRC_CTRL1, 0);
        assert_eq!(regs.read64(offset), 0, "writes while powered down are lost");
    }
}
