//! The block accumulator interface.
//!
//! A block accumulator folds big-endian 64-bit words into a signature. After
//! each word the returned signature must equal eight bit-serial steps over the
//! word's bytes. Implementations may be hardware (a PSA register) or software.

use mcrc_core::{fold_word, WORD_SIZE};

use crate::error::{DeviceError, Result};

/// Decode one big-endian word from an exactly 8-byte chunk.
pub(crate) fn be_word(chunk: &[u8]) -> u64 {
    let mut bytes = [0u8; WORD_SIZE];
    bytes.copy_from_slice(chunk);
    u64::from_be_bytes(bytes)
}

/// Reject transfers that are not a whole number of words.
pub(crate) fn check_words(words: &[u8]) -> Result<()> {
    if words.len() % WORD_SIZE != 0 {
        return Err(DeviceError::PartialWord { len: words.len() });
    }
    Ok(())
}

/// A capability that folds 8-byte words into a CRC-64 signature.
pub trait BlockAccumulator {
    /// Fold one word, given as its big-endian integer value.
    fn advance_block(&mut self, signature: u64, word: u64) -> Result<u64>;

    /// Fold a run of words as one transaction.
    ///
    /// `words.len()` must be a multiple of 8.
    fn advance_blocks(&mut self, signature: u64, words: &[u8]) -> Result<u64> {
        check_words(words)?;
        words
            .chunks_exact(WORD_SIZE)
            .try_fold(signature, |sig, chunk| self.advance_block(sig, be_word(chunk)))
    }
}

impl<A: BlockAccumulator + ?Sized> BlockAccumulator for &mut A {
    fn advance_block(&mut self, signature: u64, word: u64) -> Result<u64> {
        (**self).advance_block(signature, word)
    }

    fn advance_blocks(&mut self, signature: u64, words: &[u8]) -> Result<u64> {
        (**self).advance_blocks(signature, words)
    }
}

impl<A: BlockAccumulator + ?Sized> BlockAccumulator for Box<A> {
    fn advance_block(&mut self, signature: u64, word: u64) -> Result<u64> {
        (**self).advance_block(signature, word)
    }

    fn advance_blocks(&mut self, signature: u64, words: &[u8]) -> Result<u64> {
        (**self).advance_blocks(signature, words)
    }
}

/// Folds words on the CPU.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoftwareBlock;

impl BlockAccumulator for SoftwareBlock {
    fn advance_block(&mut self, signature: u64, word: u64) -> Result<u64> {
        Ok(fold_word(signature, word))
    }
}
