//! Proptest generators for property-based testing.

use proptest::prelude::*;

use mcrc_core::{SegmentMode, WORD_SIZE};

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a payload together with sorted cut points into it.
///
/// Cut points may repeat and may sit at either end, which yields empty parts.
pub fn partitioned_payload(max_len: usize) -> impl Strategy<Value = (Vec<u8>, Vec<usize>)> {
    payload(max_len)
        .prop_flat_map(|data| {
            let len = data.len();
            (Just(data), prop::collection::vec(0..=len, 0..8))
        })
        .prop_map(|(data, mut cuts)| {
            cuts.sort_unstable();
            (data, cuts)
        })
}

/// Split `data` at sorted `cuts` into consecutive parts.
pub fn split_at_cuts<'a>(data: &'a [u8], cuts: &[usize]) -> Vec<&'a [u8]> {
    let mut parts = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for &cut in cuts {
        let cut = cut.clamp(start, data.len());
        parts.push(&data[start..cut]);
        start = cut;
    }
    parts.push(&data[start..]);
    parts
}

/// Generate a burst limit in bytes.
///
/// Covers unlimited (0), sub-word limits, word multiples and odd sizes.
pub fn burst_limit() -> impl Strategy<Value = usize> {
    prop_oneof![
        Just(0usize),
        1usize..WORD_SIZE,
        (1usize..=64).prop_map(|words| words * WORD_SIZE),
        1usize..=512,
    ]
}

/// Generate a segmentation mode.
pub fn segment_mode() -> impl Strategy<Value = SegmentMode> {
    prop_oneof![Just(SegmentMode::SinglePass), Just(SegmentMode::PerBurst)]
}

/// Generate an offset from word alignment.
pub fn misalignment() -> impl Strategy<Value = usize> {
    0usize..WORD_SIZE
}

/// Parameters for configuring an engine under test.
#[derive(Debug, Clone)]
pub struct EngineParams {
    pub burst_limit: usize,
    pub segment_mode: SegmentMode,
    pub misalignment: usize,
}

impl Arbitrary for EngineParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (burst_limit(), segment_mode(), misalignment())
            .prop_map(|(burst_limit, segment_mode, misalignment)| EngineParams {
                burst_limit,
                segment_mode,
                misalignment,
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_at_cuts_edges() {
        let data = b"abcdef";
        let parts = split_at_cuts(data, &[0, 2, 2, 6]);
        let expected: Vec<&[u8]> = vec![&b""[..], &b"ab"[..], &b""[..], &b"cdef"[..], &b""[..]];
        assert_eq!(parts, expected);
    }

    #[test]
    fn test_split_without_cuts() {
        assert_eq!(split_at_cuts(b"xyz", &[]), vec![&b"xyz"[..]]);
    }

    proptest! {
        #[test]
        fn prop_partition_reassembles((data, cuts) in partitioned_payload(256)) {
            let parts = split_at_cuts(&data, &cuts);
            prop_assert_eq!(parts.len(), cuts.len() + 1);
            prop_assert_eq!(parts.concat(), data);
        }

        #[test]
        fn prop_params_in_range(params in any::<EngineParams>()) {
            prop_assert!(params.misalignment < WORD_SIZE);
            prop_assert!(params.burst_limit <= 512);
        }
    }
}
