//! Codec for mono (pixel change) events.
//!
//! All functions are pure and operate on a single packed word. Absolute time
//! is `time_base + dt`; keeping `dt` inside 32 bits is up to the producer.

use crate::buffer::EncodeError;
use crate::packed;

/// Stride of one mono record in a flat event buffer.
pub const BYTES_PER_EVENT: usize = packed::BYTES_PER_EVENT;

/// Decodes the coordinates and polarity of an event, skipping time.
///
/// Returns `(x, y, polarity)`.
#[inline]
pub fn decode_x_y_p(word: u64) -> (u16, u16, bool) {
    (
        packed::get_x(word),
        packed::get_y(word),
        packed::get_polarity(word),
    )
}

/// Decodes all fields of an event.
///
/// Returns `(t, x, y, polarity)` with `t = time_base + dt`.
#[inline]
pub fn decode_t_x_y_p(word: u64, time_base: u64) -> (u64, u16, u16, bool) {
    (
        packed::absolute_time(time_base, packed::get_dt(word)),
        packed::get_x(word),
        packed::get_y(word),
        packed::get_polarity(word),
    )
}

/// Decodes only the absolute time of an event.
#[inline]
pub fn decode_t(word: u64, time_base: u64) -> u64 {
    packed::absolute_time(time_base, packed::get_dt(word))
}

/// Packs an event into a word.
///
/// `y` must be below 2^15; higher bits are dropped silently. Use
/// [`try_encode`] to reject such values instead. The C++ `event_array_msgs`
/// encoder does not mask `y`, so for a `y` with bit 15 set it also sets the
/// polarity bit and its word differs from the one produced here.
#[inline]
pub fn encode(polarity: bool, x: u16, y: u16, dt: u32) -> u64 {
    packed::pack(polarity, x, y, dt)
}

/// Packs an event into a word, rejecting a `y` that does not fit 15 bits.
pub fn try_encode(polarity: bool, x: u16, y: u16, dt: u32) -> Result<u64, EncodeError> {
    if y > packed::MAX_Y {
        return Err(EncodeError::CoordinateOutOfRange { x, y });
    }
    Ok(encode(polarity, x, y, dt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_word() {
        let word = encode(true, 100, 50, 12345);
        assert_eq!(word, 0x8032006400003039);
        assert_eq!(decode_x_y_p(word), (100, 50, true));
    }

    #[test]
    fn test_decode_t_x_y_p() {
        let word = encode(false, 640, 479, 4_000_000_000);
        let (t, x, y, p) = decode_t_x_y_p(word, 1_000_000_000);
        assert_eq!(t, 5_000_000_000);
        assert_eq!(x, 640);
        assert_eq!(y, 479);
        assert!(!p);
    }

    #[test]
    fn test_round_trip_extremes() {
        for &p in &[false, true] {
            for &x in &[0u16, 1, 0x7FFF, 0xFFFF] {
                for &y in &[0u16, 1, 0x4000, 0x7FFF] {
                    for &dt in &[0u32, 1, 0x8000_0000, u32::MAX] {
                        let word = encode(p, x, y, dt);
                        assert_eq!(
                            decode_t_x_y_p(word, 77),
                            (77 + dt as u64, x, y, p),
                            "p={} x={} y={} dt={}",
                            p,
                            x,
                            y,
                            dt
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_field_isolation() {
        let base = encode(true, 1234, 567, 89);

        let dt_changed = encode(true, 1234, 567, 0xDEAD_BEEF);
        assert_eq!(decode_x_y_p(dt_changed), decode_x_y_p(base));

        let x_changed = encode(true, 0xFFFF, 567, 89);
        assert_eq!(decode_t(x_changed, 0), decode_t(base, 0));
        assert_eq!(decode_x_y_p(x_changed).1, 567);
        assert!(decode_x_y_p(x_changed).2);

        let y_changed = encode(true, 1234, 0x7FFF, 89);
        assert_eq!(decode_t(y_changed, 0), 89);
        assert_eq!(decode_x_y_p(y_changed).0, 1234);
        assert!(decode_x_y_p(y_changed).2);

        let p_changed = encode(false, 1234, 567, 89);
        assert_eq!(decode_t(p_changed, 0), 89);
        assert_eq!(decode_x_y_p(p_changed), (1234, 567, false));
    }

    #[test]
    fn test_truncation() {
        // x is 16 bits wide, so bit 16 is lost before it reaches the word
        let x = 0x1_0000u32 as u16;
        assert_eq!(decode_x_y_p(encode(false, x, 0, 0)).0, 0);

        // y with bit 15 set keeps only the low 15 bits
        let (x, y, p) = decode_x_y_p(encode(false, 3, 0x8005, 0));
        assert_eq!((x, y, p), (3, 5, false));

        // an unmasked shift would have carried bit 15 of y into the polarity bit
        let unmasked = (0x8005u64 << 48) | (3u64 << 32);
        assert_eq!(unmasked >> 63, 1);
        assert_eq!(encode(false, 3, 0x8005, 0), unmasked & !(1 << 63));
    }

    #[test]
    fn test_try_encode_rejects_wide_y() {
        assert_eq!(try_encode(true, 1, 0x7FFF, 2).unwrap(), encode(true, 1, 0x7FFF, 2));
        assert!(matches!(
            try_encode(true, 1, 0x8000, 2),
            Err(EncodeError::CoordinateOutOfRange { x: 1, y: 0x8000 })
        ));
    }

    #[test]
    fn test_decode_t_wraps() {
        let word = encode(true, 5, 5, 1);
        assert_eq!(decode_t(word, u64::MAX), 0);
        assert_eq!(decode_t(0xFFFF_FFFF_0000_0010, 1000), 1016);
    }
}
