//! Decoded event types.
//!
//! These are the unpacked counterparts of a packed word, carrying absolute
//! time instead of a delta.

use crate::buffer::{DecodeError, EncodeError};
use crate::{mono, packed, trigger};
use std::fmt;
use std::str::FromStr;

/// A decoded mono (pixel brightness change) event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct MonoEvent {
    /// Column coordinate (0-65535)
    pub x: u16,
    /// Row coordinate (0-32767)
    pub y: u16,
    /// `true` = ON (increase), `false` = OFF (decrease in brightness)
    pub polarity: bool,
    /// Absolute time, in the unit of the time base
    pub t: u64,
}

impl MonoEvent {
    /// Creates a new mono event.
    #[inline]
    pub fn new(x: u16, y: u16, polarity: bool, t: u64) -> Self {
        Self { x, y, polarity, t }
    }

    /// Unpacks a word relative to `time_base`.
    #[inline]
    pub fn from_word(word: u64, time_base: u64) -> Self {
        let (t, x, y, polarity) = mono::decode_t_x_y_p(word, time_base);
        Self { x, y, polarity, t }
    }

    /// Packs the event relative to `time_base`.
    pub fn to_word(&self, time_base: u64) -> Result<u64, EncodeError> {
        let dt = delta(self.t, time_base)?;
        mono::try_encode(self.polarity, self.x, self.y, dt)
    }
}

/// A decoded external trigger event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct TriggerEvent {
    /// Edge polarity: `true` = rising, `false` = falling
    pub polarity: bool,
    /// Absolute time, in the unit of the time base
    pub t: u64,
}

impl TriggerEvent {
    /// Creates a new trigger event.
    #[inline]
    pub fn new(polarity: bool, t: u64) -> Self {
        Self { polarity, t }
    }

    /// Unpacks a word relative to `time_base`.
    #[inline]
    pub fn from_word(word: u64, time_base: u64) -> Self {
        let (t, polarity) = trigger::decode_t_p(word, time_base);
        Self { polarity, t }
    }

    /// Packs the event relative to `time_base`.
    pub fn to_word(&self, time_base: u64) -> Result<u64, EncodeError> {
        Ok(trigger::encode(self.polarity, delta(self.t, time_base)?))
    }
}

/// Computes the 32-bit delta of `t` from `time_base`.
fn delta(t: u64, time_base: u64) -> Result<u32, EncodeError> {
    let dt = t
        .checked_sub(time_base)
        .ok_or(EncodeError::TimeBeforeBase { t, time_base })?;
    if dt > packed::DT_MASK {
        return Err(EncodeError::DeltaOverflow { dt });
    }
    Ok(dt as u32)
}

/// Event record variant stored in a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Pixel change events with coordinates
    #[default]
    Mono,
    /// External trigger events
    Trigger,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mono => "mono",
            Self::Trigger => "trigger",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mono" => Ok(Self::Mono),
            "trigger" => Ok(Self::Trigger),
            other => Err(DecodeError::UnknownEncoding(other.to_string())),
        }
    }
}
