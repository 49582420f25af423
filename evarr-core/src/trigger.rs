//! Codec for external trigger events.
//!
//! Trigger words carry only polarity (edge direction) and time. Bits 62..32
//! are never read by the decoders.

use crate::packed;

/// Stride of one trigger record in a flat event buffer.
pub const BYTES_PER_EVENT: usize = packed::BYTES_PER_EVENT;

/// Decodes only the edge polarity.
#[inline]
pub fn decode_p(word: u64) -> bool {
    packed::get_polarity(word)
}

/// Decodes time and polarity.
///
/// Returns `(t, polarity)` with `t = time_base + dt`.
#[inline]
pub fn decode_t_p(word: u64, time_base: u64) -> (u64, bool) {
    (
        packed::absolute_time(time_base, packed::get_dt(word)),
        packed::get_polarity(word),
    )
}

/// Packs a trigger event with the coordinate bits zeroed.
#[inline]
pub fn encode(polarity: bool, dt: u32) -> u64 {
    packed::pack(polarity, 0, 0, dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mono;

    #[test]
    fn test_decode_t_p_known_word() {
        assert_eq!(decode_t_p(0x0000000000000064, 1000), (1100, false));
        assert_eq!(decode_t_p(0x8000000000000064, 1000), (1100, true));
    }

    #[test]
    fn test_decode_p_ignores_low_bits() {
        assert!(!decode_p(0x7FFF_FFFF_FFFF_FFFF));
        assert!(decode_p(0x8000_0000_0000_0000));
        assert!(decode_p(u64::MAX));
        assert!(!decode_p(0));
    }

    #[test]
    fn test_reserved_bits_ignored() {
        let clean = encode(true, 42);
        let dirty = clean | packed::TRIGGER_RESERVED_MASK;
        assert_eq!(decode_t_p(clean, 10), decode_t_p(dirty, 10));
    }

    #[test]
    fn test_encode_zeroes_reserved_bits() {
        let word = encode(true, u32::MAX);
        assert_eq!(word & packed::TRIGGER_RESERVED_MASK, 0);
        assert_eq!(word, 0x8000_0000_FFFF_FFFF);
    }

    #[test]
    fn test_mono_encoded_word_decodes_as_trigger() {
        let word = mono::encode(false, 300, 200, 5);
        assert_eq!(decode_t_p(word, 0), (5, false));
    }

    #[test]
    fn test_time_wraps() {
        assert_eq!(decode_t_p(encode(true, 1), u64::MAX), (0, true));
    }
}
