//! Transforms: the per-user handle that owns the key and device access.
//!
//! A [`Transform`] corresponds to one user of the algorithm. It clears the
//! key on creation, optionally holds the accelerator powered for its whole
//! lifetime, and creates [`DigestContext`]s that share its accelerator.

use std::any::Any;
use std::sync::Arc;

use mcrc_core::{Digest, Key};
use mcrc_device::{
    BlockAccumulator, Channel, ChannelAccelerator, McrcDevice, Mode, PowerDomain, PowerGuard,
    RegisterIo, SoftwareBlock,
};
use tracing::debug;

use crate::algorithm::{AlgorithmInfo, Shash, CRC64_ALG};
use crate::config::EngineConfig;
use crate::engine::DigestContext;
use crate::error::Result;

/// A keyed handle for computing CRC-64 digests.
pub struct Transform<A> {
    key: Key,
    accel: Option<A>,
    config: EngineConfig,
    /// Held only to be dropped with the transform.
    power: Option<Box<dyn Any + Send + Sync>>,
}

impl Transform<SoftwareBlock> {
    /// A transform with no accelerator.
    pub fn software(config: EngineConfig) -> Self {
        Self {
            key: Key::ZERO,
            accel: None,
            config,
            power: None,
        }
    }
}

impl<R: RegisterIo + Send + 'static> Transform<ChannelAccelerator<R>> {
    /// Power `device`, put `channel` in full-CPU mode with a cleared
    /// signature, and build a transform that keeps it powered until dropped.
    pub fn for_device(
        device: Arc<McrcDevice<R>>,
        channel: Channel,
        config: EngineConfig,
    ) -> Result<Self> {
        let guard = PowerGuard::acquire(Arc::clone(&device))?;
        device.set_mode(channel, Mode::FullCpu)?;
        device.reset_signature(channel)?;
        Ok(Self::new(ChannelAccelerator::new(device, channel), config).with_power_guard(guard))
    }
}

impl<A: BlockAccumulator + Clone> Transform<A> {
    /// A transform that routes aligned words to `accel`.
    pub fn new(accel: A, config: EngineConfig) -> Self {
        Self {
            key: Key::ZERO,
            accel: Some(accel),
            config,
            power: None,
        }
    }

    /// Keep `guard` alive for as long as the transform.
    pub fn with_power_guard<P>(mut self, guard: PowerGuard<P>) -> Self
    where
        P: PowerDomain + Send + Sync + 'static,
    {
        self.power = Some(Box::new(guard));
        self
    }

    /// Set the key from exactly 4 little-endian bytes.
    ///
    /// The key is stored but does not affect digests.
    pub fn setkey(&mut self, key: &[u8]) -> Result<()> {
        self.key = Key::from_le_slice(key)?;
        debug!(key = self.key.value(), "mcrc key set");
        Ok(())
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn algorithm(&self) -> &'static AlgorithmInfo {
        &CRC64_ALG
    }

    /// Whether this transform holds a power reference.
    pub fn holds_power(&self) -> bool {
        self.power.is_some()
    }

    /// A fresh digest context sharing this transform's accelerator.
    pub fn context(&self) -> DigestContext<A> {
        DigestContext::new(self.accel.clone(), self.config.clone())
    }

    /// One-shot digest of `data`.
    pub fn digest(&self, data: &[u8]) -> Result<Digest> {
        self.context().digest(data)
    }
}

impl<A> std::fmt::Debug for Transform<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transform")
            .field("key", &self.key)
            .field("accelerated", &self.accel.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::McrcError;
    use mcrc_device::EmulatedRegisters;

    #[test]
    fn test_key_starts_cleared() {
        let tfm = Transform::software(EngineConfig::default());
        assert_eq!(tfm.key(), Key::ZERO);
    }

    #[test]
    fn test_setkey_length() {
        let mut tfm = Transform::software(EngineConfig::default());
        tfm.setkey(&[1, 0, 0, 0]).unwrap();
        assert_eq!(tfm.key().value(), 1);

        assert_eq!(
            tfm.setkey(&[1, 2, 3]),
            Err(McrcError::InvalidKeyLength {
                expected: 4,
                got: 3
            })
        );
        assert_eq!(tfm.key().value(), 1, "failed setkey keeps the old key");
    }

    #[test]
    fn test_key_does_not_change_digest() {
        let mut tfm = Transform::software(EngineConfig::default());
        let unkeyed = tfm.digest(b"123456789").unwrap();
        tfm.setkey(&0xdead_beefu32.to_le_bytes()).unwrap();
        assert_eq!(tfm.digest(b"123456789").unwrap(), unkeyed);
    }

    #[test]
    fn test_device_transform_holds_power() {
        let device = Arc::new(McrcDevice::new(EmulatedRegisters::new()));
        let tfm = Transform::for_device(
            Arc::clone(&device),
            Channel::Two,
            EngineConfig::default().with_fixed_burst(0),
        )
        .unwrap();
        assert!(tfm.holds_power());
        assert!(device.is_powered());
        assert_eq!(device.mode(Channel::Two), Mode::FullCpu);

        let digest = tfm.digest(&[0xab; 100]).unwrap();
        assert_eq!(
            digest.signature(),
            mcrc_core::advance_slice(0, &[0xab; 100])
        );

        drop(tfm);
        assert!(!device.is_powered());
    }

    #[test]
    fn test_algorithm_metadata() {
        let tfm = Transform::software(EngineConfig::default());
        assert_eq!(tfm.algorithm().driver_name, "mcrc");
    }
}
