//! # MCRC Device
//!
//! The block accumulator interface and a model of the MCRC accelerator that
//! implements it.
//!
//! ## Overview
//!
//! The engine folds 8-byte aligned words through anything implementing
//! [`BlockAccumulator`]. This crate provides:
//!
//! - [`SoftwareBlock`] - Folds words on the CPU, no device needed
//! - [`ChannelAccelerator`] - Folds words through one PSA channel of an [`McrcDevice`]
//! - [`EmulatedRegisters`] - A register file that behaves like the accelerator
//!
//! ## Lifecycle
//!
//! The device must be powered and its channel configured in
//! [`Mode::FullCpu`] before words reach it. [`PowerGuard`] holds a usage
//! reference on a [`PowerDomain`] and releases it on drop.
//!
//! ```rust
//! use std::sync::Arc;
//! use mcrc_device::{
//!     BlockAccumulator, Channel, ChannelAccelerator, EmulatedRegisters, McrcDevice, Mode,
//!     PowerGuard,
//! };
//!
//! let device = Arc::new(McrcDevice::new(EmulatedRegisters::new()));
//! let _power = PowerGuard::acquire(Arc::clone(&device)).unwrap();
//! device.set_mode(Channel::One, Mode::FullCpu).unwrap();
//! device.reset_signature(Channel::One).unwrap();
//!
//! let mut accel = ChannelAccelerator::new(device, Channel::One);
//! let sig = accel.advance_blocks(0, b"abcdefgh").unwrap();
//! assert_eq!(sig, mcrc_core::advance_slice(0, b"abcdefgh"));
//! ```

pub mod accumulator;
pub mod device;
pub mod error;
pub mod regs;

pub use accumulator::{BlockAccumulator, SoftwareBlock};
pub use device::{ChannelAccelerator, McrcDevice, PowerDomain, PowerGuard};
pub use error::{DeviceError, Result};
pub use regs::{Channel, EmulatedRegisters, Mode, RegisterIo};
