//! # MCRC Testkit
//!
//! Testing utilities for MCRC.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known inputs with expected signatures
//! - **Generators**: Proptest strategies for payloads, partitions and burst limits
//! - **Fixtures**: Instrumented accelerators and misaligned buffers
//!
//! ## Golden Vectors
//!
//! ```rust
//! use mcrc_testkit::vectors::all_vectors;
//!
//! for vector in all_vectors() {
//!     assert_eq!(
//!         mcrc_core::advance_slice(0, &vector.input),
//!         vector.expected_signature,
//!         "{}",
//!         vector.name
//!     );
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use mcrc_testkit::generators::{partitioned_payload, split_at_cuts};
//!
//! proptest! {
//!     #[test]
//!     fn split_invariance((data, cuts) in partitioned_payload(1024)) {
//!         let parts = split_at_cuts(&data, &cuts);
//!         // fold each part in turn and compare with the one-shot digest
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{CountingAccelerator, DeviceFixture, FaultyAccelerator, OffsetBuffer};
pub use generators::{split_at_cuts, EngineParams};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
