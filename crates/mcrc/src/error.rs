//! Error types for the engine.

use mcrc_core::CoreError;
use mcrc_device::DeviceError;
use thiserror::Error;

/// Errors that can occur during checksum operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum McrcError {
    /// Key setup was given something other than 4 bytes.
    #[error("invalid key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    /// The block accumulator failed. The update that hit it had no effect.
    #[error("accelerator failure: {0}")]
    AcceleratorFailure(#[from] DeviceError),

    /// Other core error.
    #[error("core error: {0}")]
    Core(CoreError),
}

impl From<CoreError> for McrcError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidKeyLength { expected, got } => {
                McrcError::InvalidKeyLength { expected, got }
            }
            other => McrcError::Core(other),
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, McrcError>;
