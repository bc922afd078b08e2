//! # MCRC Core
//!
//! Pure primitives for the MCRC CRC-64 engine: bit-serial accumulation,
//! alignment segmentation, and the digest and key types.
//!
//! This crate contains no I/O and no device access. It is pure computation
//! over a 64-bit signature.
//!
//! ## Key Types
//!
//! - [`Digest`] - The 8-byte little-endian serialization of a signature
//! - [`Key`] - The optional (and inert) 32-bit transform key
//! - [`Segment`] - A sub-range of an update tagged with the path that folds it
//! - [`SegmentMode`] - Single-pass or per-burst segmentation
//!
//! ## The Polynomial
//!
//! The signature is an MSB-first CRC-64 with generator `0x1B`, zero initial
//! value and no final XOR. See [`serial`].

pub mod error;
pub mod segment;
pub mod serial;
pub mod types;

pub use error::CoreError;
pub use segment::{segment, Path, Segment, SegmentMode, Segments};
pub use serial::{advance, advance_slice, fold_word, POLY, TOP_BIT};
pub use types::{Digest, Key, BLOCK_SIZE, DIGEST_SIZE, KEY_SIZE, WORD_SIZE};
