//! Integration tests against the emulated MCRC device.

use std::sync::Arc;
use std::thread;

use mcrc::core::advance_slice;
use mcrc::device::DeviceError;
use mcrc::{
    Channel, ChannelAccelerator, DigestContext, EmulatedRegisters, EngineConfig, McrcDevice,
    McrcError, Phase, SegmentMode, Shash, Transform,
};
use mcrc_testkit::{DeviceFixture, FaultyAccelerator, OffsetBuffer};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn emulated() -> Arc<McrcDevice<EmulatedRegisters>> {
    Arc::new(McrcDevice::new(EmulatedRegisters::default()))
}

#[test]
fn test_transform_holds_power_for_its_lifetime() {
    let device = emulated();
    assert!(!device.is_powered());

    let first = Transform::for_device(Arc::clone(&device), Channel::One, EngineConfig::default())
        .unwrap();
    let second =
        Transform::for_device(Arc::clone(&device), Channel::Three, EngineConfig::default())
            .unwrap();
    assert!(device.is_powered());
    assert_eq!(device.usage(), 2);
    assert!(first.holds_power());

    drop(first);
    assert!(device.is_powered());
    drop(second);
    assert!(!device.is_powered());
    assert_eq!(device.usage(), 0);
}

#[test]
fn test_words_reach_the_signature_register() {
    init_tracing();
    let fixture = DeviceFixture::new(Channel::One).unwrap();
    let transform = Transform::new(
        fixture.accelerator(),
        EngineConfig::default().with_fixed_burst(0),
    );

    let data: Vec<u8> = (0..=255u8).collect();
    let buf = OffsetBuffer::new(&data, 0);
    let digest = transform.digest(buf.as_slice()).unwrap();

    assert_eq!(digest.signature(), 0xd5c7_2766_d214_45c9);
    assert_eq!(fixture.psa_writes(), 32);
}

#[test]
fn test_interleaved_contexts_share_a_channel() {
    init_tracing();
    let device = emulated();
    let config = EngineConfig::default().with_fixed_burst(16);
    let left = Transform::for_device(Arc::clone(&device), Channel::Two, config.clone()).unwrap();
    let right = Transform::for_device(Arc::clone(&device), Channel::Two, config).unwrap();

    let a: Vec<u8> = (0..200u32).map(|i| (i * 7) as u8).collect();
    let b: Vec<u8> = (0..200u32).map(|i| (i * 13 + 1) as u8).collect();
    let (a_buf, b_buf) = (OffsetBuffer::new(&a, 3), OffsetBuffer::new(&b, 0));

    let mut ctx_a = left.context();
    let mut ctx_b = right.context();
    ctx_a.init();
    ctx_b.init();
    for (chunk_a, chunk_b) in a_buf.as_slice().chunks(37).zip(b_buf.as_slice().chunks(29)) {
        ctx_a.update(chunk_a).unwrap();
        ctx_b.update(chunk_b).unwrap();
    }
    let consumed_b = a.len().div_ceil(37).min(b.len().div_ceil(29)) * 29;
    ctx_b.update(&b_buf.as_slice()[consumed_b.min(b.len())..]).unwrap();

    assert_eq!(ctx_a.finalize().signature(), advance_slice(0, &a));
    assert_eq!(ctx_b.finalize().signature(), advance_slice(0, &b));
}

#[test]
fn test_threads_on_one_device() {
    let device = emulated();
    let data: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();
    let expected = advance_slice(0, &data);

    thread::scope(|s| {
        for (i, channel) in Channel::ALL.into_iter().chain(Channel::ALL).enumerate() {
            let device = Arc::clone(&device);
            let data = &data;
            s.spawn(move || {
                let transform = Transform::for_device(
                    device,
                    channel,
                    EngineConfig::default()
                        .with_fixed_burst(8 * (i + 1))
                        .with_segment_mode(SegmentMode::PerBurst),
                )
                .unwrap();
                for _ in 0..20 {
                    assert_eq!(transform.digest(data).unwrap().signature(), expected);
                }
            });
        }
    });

    assert!(!device.is_powered());
}

#[test]
fn test_unpowered_device_fails_without_side_effects() {
    init_tracing();
    let device = emulated();
    device.set_mode(Channel::One, mcrc::Mode::FullCpu).unwrap();
    let mut ctx = DigestContext::with_accelerator(
        ChannelAccelerator::new(Arc::clone(&device), Channel::One),
        EngineConfig::default().with_fixed_burst(0),
    );

    let data = [0x42u8; 32];
    let buf = OffsetBuffer::new(&data, 0);
    ctx.init();
    let err = ctx.update(buf.as_slice()).unwrap_err();
    assert_eq!(err, McrcError::AcceleratorFailure(DeviceError::PoweredDown));
    assert_eq!(ctx.signature(), 0);
    assert_eq!(ctx.phase(), Phase::Accumulating);
}

#[test]
fn test_unconfigured_channel_is_reported() {
    let fixture = DeviceFixture::new(Channel::One).unwrap();
    let mut ctx = DigestContext::with_accelerator(
        ChannelAccelerator::new(Arc::clone(&fixture.device), Channel::Four),
        EngineConfig::default().with_fixed_burst(0),
    );
    let buf = OffsetBuffer::new(&[0u8; 16], 0);
    assert!(matches!(
        ctx.digest(buf.as_slice()),
        Err(McrcError::AcceleratorFailure(DeviceError::NotConfigured {
            channel: Channel::Four,
            ..
        }))
    ));
}

#[test]
fn test_failed_update_can_be_retried() {
    init_tracing();
    let faulty = FaultyAccelerator::after(3);
    let transform = Transform::new(faulty.clone(), EngineConfig::default().with_fixed_burst(8));

    let data: Vec<u8> = (0..=255u8).collect();
    let buf = OffsetBuffer::new(&data, 5);
    let (head, tail) = buf.as_slice().split_at(100);

    let mut ctx = transform.context();
    ctx.init();
    ctx.update(&head[..2]).unwrap();
    let before = ctx.signature();

    let err = ctx.update(&head[2..]).unwrap_err();
    assert!(matches!(err, McrcError::AcceleratorFailure(DeviceError::Fault(_))));
    assert_eq!(ctx.signature(), before);

    faulty.refill(usize::MAX);
    ctx.update(&head[2..]).unwrap();
    ctx.update(tail).unwrap();
    assert_eq!(ctx.finalize().signature(), 0xd5c7_2766_d214_45c9);
}
