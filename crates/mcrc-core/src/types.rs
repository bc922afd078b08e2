//! Strong type definitions for MCRC.
//!
//! The digest and key are newtypes so the wire layout of each is fixed in one
//! place.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Size of a digest in bytes.
pub const DIGEST_SIZE: usize = 8;

/// Block size advertised to a hashing framework.
pub const BLOCK_SIZE: usize = 1;

/// Size of one block-accumulator word in bytes.
pub const WORD_SIZE: usize = 8;

/// Size of a transform key in bytes.
pub const KEY_SIZE: usize = 4;

/// An 8-byte CRC-64 digest: the little-endian encoding of the signature.
///
/// This is the literal byte layout any consumer must match.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Digest(pub [u8; DIGEST_SIZE]);

impl Digest {
    /// Serialize a signature.
    pub const fn from_signature(signature: u64) -> Self {
        Self(signature.to_le_bytes())
    }

    /// Recover the signature.
    pub const fn signature(&self) -> u64 {
        u64::from_le_bytes(self.0)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Convert to hex string (wire byte order).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string (wire byte order).
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s)?;
        Self::try_from(bytes.as_slice())
    }

    /// The all-zero digest of an empty stream.
    pub const ZERO: Self = Self([0u8; DIGEST_SIZE]);
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({:#018x})", self.signature())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; DIGEST_SIZE]> for Digest {
    fn from(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }
}

impl From<Digest> for u64 {
    fn from(digest: Digest) -> Self {
        digest.signature()
    }
}

impl TryFrom<&[u8]> for Digest {
    type Error = CoreError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; DIGEST_SIZE] =
            slice.try_into().map_err(|_| CoreError::InvalidDigestLength {
                expected: DIGEST_SIZE,
                got: slice.len(),
            })?;
        Ok(Self(arr))
    }
}

/// The optional 32-bit transform key.
///
/// Accepted for framework compatibility. It never influences the signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Key(pub u32);

impl Key {
    /// Decode a key from exactly [`KEY_SIZE`] little-endian bytes.
    pub fn from_le_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        let arr: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| CoreError::InvalidKeyLength {
            expected: KEY_SIZE,
            got: bytes.len(),
        })?;
        Ok(Self(u32::from_le_bytes(arr)))
    }

    /// Get the raw value.
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// The cleared key.
    pub const ZERO: Self = Self(0);
}
