//! Error types for MCRC Core.

use thiserror::Error;

/// Core errors that can occur while preparing a checksum computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("invalid key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("invalid digest length: expected {expected} bytes, got {got}")]
    InvalidDigestLength { expected: usize, got: usize },

    #[error("invalid hex digest: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}
