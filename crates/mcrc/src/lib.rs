//! # MCRC
//!
//! A streaming CRC-64 engine with two interchangeable accumulation paths:
//! a block path that folds 8-byte aligned words through an accelerator, and a
//! bit-serial path that folds one byte at a time.
//!
//! ## Overview
//!
//! - **Split invariance**: any partition of the input into update calls gives
//!   the same digest as one call over the whole input
//! - **Path equivalence**: words folded by the accelerator and bytes folded on
//!   the CPU advance the signature identically
//! - **Burst independence**: the burst limit changes how work is split, never
//!   the result
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use mcrc::{Channel, EmulatedRegisters, EngineConfig, McrcDevice, Shash, Transform};
//!
//! let device = Arc::new(McrcDevice::new(EmulatedRegisters::new()));
//! let tfm = Transform::for_device(device, Channel::One, EngineConfig::default()).unwrap();
//!
//! let mut ctx = tfm.context();
//! ctx.init();
//! ctx.update(b"12345").unwrap();
//! let digest = ctx.finup(b"6789").unwrap();
//!
//! assert_eq!(digest, tfm.digest(b"123456789").unwrap());
//! assert_eq!(digest.signature(), 0xe4ff_bea5_8893_3790);
//! ```
//!
//! ## Re-exports
//!
//! - `mcrc::core` - Accumulators, segmentation, digest and key types
//! - `mcrc::device` - Block accumulator interface and the device model

pub mod algorithm;
pub mod config;
pub mod engine;
pub mod error;
pub mod transform;

// Re-export component crates
pub use mcrc_core as core;
pub use mcrc_device as device;

pub use algorithm::{AlgorithmInfo, Shash, CRC64_ALG};
pub use config::{BurstLimit, EngineConfig};
pub use engine::{DigestContext, Phase};
pub use error::{McrcError, Result};
pub use transform::Transform;

// Re-export commonly used component types
pub use mcrc_core::{Digest, Key, SegmentMode};
pub use mcrc_device::{
    BlockAccumulator, Channel, ChannelAccelerator, DeviceError, EmulatedRegisters, McrcDevice,
    Mode, SoftwareBlock,
};
