#![allow(clippy::unusual_byte_groupings)]
//! Bit layout of a packed 64-bit event word.
//!
//! Every event occupies exactly one word:
//!
//! ```text
//!  63 | 62 ........ 48 | 47 ........ 32 | 31 ................ 0
//!  p  |    y (15 bit)  |    x (16 bit)  |     dt (32 bit)
//! ```
//!
//! Trigger events share the layout but leave bits 62..32 unused. On the wire
//! and on disk a word is always stored little-endian.

use crate::buffer::{DecodeError, EncodeError};
use byteorder::{ByteOrder, LittleEndian};

/// Size of one packed event record in bytes.
pub const BYTES_PER_EVENT: usize = 8;

pub const POLARITY_SHIFT: u32 = 63;
pub const Y_SHIFT: u32 = 48;
pub const Y_MASK: u64 = 0x7FFF;
pub const X_SHIFT: u32 = 32;
pub const X_MASK: u64 = 0xFFFF;
pub const DT_MASK: u64 = 0xFFFF_FFFF;

/// Largest representable row coordinate.
pub const MAX_Y: u16 = Y_MASK as u16;

/// Bits 62..32, unused by trigger events.
pub const TRIGGER_RESERVED_MASK: u64 = (Y_MASK << Y_SHIFT) | (X_MASK << X_SHIFT);

// ============================================================================
// Field extraction
// ============================================================================

/// Extracts the polarity bit (bit 63).
#[inline]
pub fn get_polarity(word: u64) -> bool {
    (word >> POLARITY_SHIFT) != 0
}

/// Extracts the 15-bit row coordinate (bits 62..48).
#[inline]
pub fn get_y(word: u64) -> u16 {
    ((word >> Y_SHIFT) & Y_MASK) as u16
}

/// Extracts the 16-bit column coordinate (bits 47..32).
#[inline]
pub fn get_x(word: u64) -> u16 {
    ((word >> X_SHIFT) & X_MASK) as u16
}

/// Extracts the 32-bit time delta (bits 31..0).
#[inline]
pub fn get_dt(word: u64) -> u32 {
    (word & DT_MASK) as u32
}

/// Adds a time delta to a time base, wrapping on 64-bit overflow.
#[inline]
pub fn absolute_time(time_base: u64, dt: u32) -> u64 {
    time_base.wrapping_add(dt as u64)
}

// ============================================================================
// Field insertion
// ============================================================================

/// Packs all four fields. `y` is masked to 15 bits so it never reaches the
/// polarity bit.
#[inline]
pub fn pack(polarity: bool, x: u16, y: u16, dt: u32) -> u64 {
    ((polarity as u64) << POLARITY_SHIFT)
        | ((y as u64 & Y_MASK) << Y_SHIFT)
        | ((x as u64) << X_SHIFT)
        | dt as u64
}

// ============================================================================
// Byte access
// ============================================================================

/// Reads the little-endian word stored at `offset` in `buf`.
#[inline]
pub fn read_word(buf: &[u8], offset: usize) -> Result<u64, DecodeError> {
    match offset
        .checked_add(BYTES_PER_EVENT)
        .and_then(|end| buf.get(offset..end))
    {
        Some(bytes) => Ok(LittleEndian::read_u64(bytes)),
        None => Err(DecodeError::TruncatedRecord {
            offset,
            len: buf.len(),
        }),
    }
}

/// Stores `word` little-endian at `offset` in `buf`.
#[inline]
pub fn write_word(buf: &mut [u8], offset: usize, word: u64) -> Result<(), EncodeError> {
    let len = buf.len();
    match offset
        .checked_add(BYTES_PER_EVENT)
        .and_then(|end| buf.get_mut(offset..end))
    {
        Some(bytes) => {
            LittleEndian::write_u64(bytes, word);
            Ok(())
        }
        None => Err(EncodeError::NoRoomForRecord { offset, len }),
    }
}
