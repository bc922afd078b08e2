//! Golden test vectors for the CRC-64 signature.
//!
//! Polynomial `0x1B`, MSB-first, zero initial value, no final XOR. The digest
//! is the little-endian encoding of the signature.

use serde::Serialize;

use mcrc_core::{advance_slice, Digest};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Input bytes.
    pub input: Vec<u8>,
    /// Expected signature after folding `input` from zero.
    pub expected_signature: u64,
}

impl GoldenVector {
    fn new(name: &'static str, input: impl Into<Vec<u8>>, expected_signature: u64) -> Self {
        Self {
            name,
            input: input.into(),
            expected_signature,
        }
    }

    /// Expected digest bytes.
    pub fn expected_digest(&self) -> Digest {
        Digest::from_signature(self.expected_signature)
    }

    /// Hex-encoded form for export.
    pub fn to_record(&self) -> VectorRecord {
        VectorRecord {
            name: self.name.to_string(),
            input: hex::encode(&self.input),
            signature: format!("{:016x}", self.expected_signature),
            digest: self.expected_digest().to_hex(),
        }
    }
}

/// A golden vector with all fields hex-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VectorRecord {
    pub name: String,
    pub input: String,
    pub signature: String,
    pub digest: String,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector::new("empty", Vec::new(), 0),
        GoldenVector::new("single zero byte", [0x00], 0),
        GoldenVector::new("sixteen zero bytes", [0x00; 16], 0),
        GoldenVector::new("single one byte", [0x01], 0x1b),
        GoldenVector::new("single high bit", [0x80], 0xd80),
        GoldenVector::new("one all-ones word", [0xff; 8], 0xca),
        GoldenVector::new("one ascii word", *b"abcdefgh", 0xbe93_88c9_d2ff_e40f),
        GoldenVector::new("check string", *b"123456789", 0xe4ff_bea5_8893_3790),
        GoldenVector::new("hello world", *b"hello world", 0x113a_6454_4e96_d667),
        GoldenVector::new(
            "every byte value",
            (0..=255u8).collect::<Vec<u8>>(),
            0xd5c7_2766_d214_45c9,
        ),
    ]
}

/// Check every vector against the bit-serial accumulator.
///
/// Returns `(name, matches, actual signature hex)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let actual = advance_slice(0, &v.input);
            (
                v.name.to_string(),
                actual == v.expected_signature,
                format!("{actual:016x}"),
            )
        })
        .collect()
}
