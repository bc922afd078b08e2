//! Error types for the device layer.

use thiserror::Error;

use crate::regs::{Channel, Mode};

/// Errors raised by a block accumulator or the device behind it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// Channel number outside 1..=4.
    #[error("invalid channel: {0}")]
    InvalidChannel(u32),

    /// Mode number outside the supported modes.
    #[error("invalid mode: {0}")]
    InvalidMode(u32),

    /// A transfer was attempted while the device is powered down.
    #[error("device is powered down")]
    PoweredDown,

    /// The channel is not in full-CPU mode.
    #[error("channel {channel} is in {mode:?} mode, not full-CPU")]
    NotConfigured { channel: Channel, mode: Mode },

    /// A block transfer was not a whole number of words.
    #[error("transfer of {len} bytes is not a whole number of 8-byte words")]
    PartialWord { len: usize },

    /// The device reported a fault.
    #[error("device fault: {0}")]
    Fault(String),
}

/// Result type for device operations.
pub type Result<T> = std::result::Result<T, DeviceError>;
