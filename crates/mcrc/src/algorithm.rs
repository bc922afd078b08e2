//! Hashing-framework surface: algorithm metadata and the digest operations.

use std::fmt;

use serde::Serialize;

use mcrc_core::{Digest, BLOCK_SIZE, DIGEST_SIZE, KEY_SIZE, WORD_SIZE};

use crate::error::Result;

/// Registration metadata a hashing framework binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlgorithmInfo {
    /// Generic algorithm name.
    pub name: &'static str,
    /// Name of this implementation.
    pub driver_name: &'static str,
    /// Selection priority among implementations of `name`.
    pub priority: u32,
    pub digest_size: usize,
    pub block_size: usize,
    /// Input address mask for best performance (alignment minus one).
    pub align_mask: usize,
    /// Whether `setkey` may be skipped.
    pub optional_key: bool,
    pub key_size: usize,
}

impl AlgorithmInfo {
    /// Preferred input alignment in bytes.
    pub const fn alignment(&self) -> usize {
        self.align_mask + 1
    }
}

impl fmt::Display for AlgorithmInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "name         : {}", self.name)?;
        writeln!(f, "driver       : {}", self.driver_name)?;
        writeln!(f, "priority     : {}", self.priority)?;
        writeln!(f, "type         : shash")?;
        writeln!(f, "blocksize    : {}", self.block_size)?;
        write!(f, "digestsize   : {}", self.digest_size)
    }
}

/// The CRC-64 algorithm served by this crate.
pub const CRC64_ALG: AlgorithmInfo = AlgorithmInfo {
    name: "crc64",
    driver_name: "mcrc",
    priority: 200,
    digest_size: DIGEST_SIZE,
    block_size: BLOCK_SIZE,
    align_mask: WORD_SIZE - 1,
    optional_key: true,
    key_size: KEY_SIZE,
};

/// Synchronous hash operations on a digest context.
pub trait Shash {
    /// Start a new computation.
    fn init(&mut self);

    /// Fold more input.
    fn update(&mut self, data: &[u8]) -> Result<()>;

    /// Emit the digest without resetting.
    fn finalize(&mut self) -> Digest;

    /// `update` then `finalize`.
    fn finup(&mut self, data: &[u8]) -> Result<Digest> {
        self.update(data)?;
        Ok(self.finalize())
    }

    /// `init`, `update`, then `finalize`.
    fn digest(&mut self, data: &[u8]) -> Result<Digest> {
        self.init();
        self.finup(data)
    }
}
