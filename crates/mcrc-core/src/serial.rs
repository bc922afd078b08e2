//! Bit-serial CRC-64 accumulation.
//!
//! The signature register shifts left one bit per input bit. The feedback bit
//! is the register's top bit XOR the incoming data bit, and when it is set the
//! register is XORed with the generator [`POLY`]. Bytes are consumed most
//! significant bit first.
//!
//! [`fold_word`] is the same register folding a whole big-endian 64-bit word
//! at once. Because the register is 64 bits wide, feeding a word `w` from
//! state `s` is identical to shifting `s ^ w` 64 times with no further input,
//! which is exactly what a block accelerator computes per transaction.

/// The generator constant XORed into the register on feedback.
pub const POLY: u64 = 0x0000_0000_0000_001b;

/// Mask selecting the register's feedback bit.
pub const TOP_BIT: u64 = 0x8000_0000_0000_0000;

/// Advance `signature` by one input byte.
#[inline]
#[must_use]
pub const fn advance(signature: u64, byte: u8) -> u64 {
    let mut crc = signature;
    let mut j: u32 = 0;
    while j < 8 {
        let mut feedback = crc & TOP_BIT != 0;
        crc <<= 1;
        if byte & (0x80 >> j) != 0 {
            feedback = !feedback;
        }
        if feedback {
            crc ^= POLY;
        }
        j += 1;
    }
    crc
}

/// Advance `signature` over every byte of `data`, in order.
#[inline]
#[must_use]
pub fn advance_slice(signature: u64, data: &[u8]) -> u64 {
    data.iter().fold(signature, |crc, &byte| advance(crc, byte))
}

/// Fold one big-endian 64-bit word into `signature`.
///
/// Equivalent to eight [`advance`] steps over `word.to_be_bytes()`.
#[inline]
#[must_use]
pub const fn fold_word(signature: u64, word: u64) -> u64 {
    let mut crc = signature ^ word;
    let mut i: u32 = 0;
    while i < 64 {
        let feedback = crc & TOP_BIT != 0;
        crc <<= 1;
        if feedback {
            crc ^= POLY;
        }
        i += 1;
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_byte_keeps_zero_signature() {
        assert_eq!(advance(0, 0x00), 0);
        assert_eq!(advance_slice(0, &[0u8; 64]), 0);
    }

    #[test]
    fn test_single_low_bit_yields_poly() {
        // One set bit at the end of the byte triggers exactly one feedback.
        assert_eq!(advance(0, 0x01), POLY);
    }

    #[test]
    fn test_high_bit_shifts_through() {
        assert_eq!(advance(0, 0x80), 0xd80);
    }

    #[test]
    fn test_check_value() {
        assert_eq!(advance_slice(0, b"123456789"), 0xe4ff_bea5_8893_3790);
    }

    #[test]
    fn test_fold_word_matches_eight_steps() {
        let word = u64::from_be_bytes(*b"abcdefgh");
        assert_eq!(fold_word(0, word), advance_slice(0, b"abcdefgh"));
        assert_eq!(fold_word(0, word), 0xbe93_88c9_d2ff_e40f);
    }

    #[test]
    fn test_fold_word_from_nonzero_signature() {
        let seed = advance_slice(0, b"123");
        let word = u64::from_be_bytes(*b"45678901");
        assert_eq!(fold_word(seed, word), advance_slice(seed, b"45678901"));
        assert_eq!(fold_word(seed, word), 0xbea5_8893_379a_97c2);
    }

    #[test]
    fn test_all_ones_word() {
        assert_eq!(fold_word(0, u64::MAX), 0xca);
        assert_eq!(advance_slice(0, &[0xff; 8]), 0xca);
    }

    #[test]
    fn test_advance_is_const() {
        const SIG: u64 = advance(0, 0x01);
        assert_eq!(SIG, 0x1b);
    }
}
