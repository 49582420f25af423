//! Deterministic synthetic mono events.
//!
//! Useful for exercising consumers without a camera. Event `i` sits at
//! `((i + width/2) % width, (i + height/2) % height)`, polarity alternates
//! starting with OFF, and its delta is `i * dt` truncated to 32 bits.

use crate::buffer::EncodeError;
use crate::{mono, packed};

/// Parameters of a synthetic event sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthConfig {
    /// Number of events to generate
    pub count: usize,
    /// Time between consecutive events
    pub dt: u64,
    /// Sensor width in pixels
    pub width: u32,
    /// Sensor height in pixels
    pub height: u32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            count: 50,
            dt: 1000,
            width: 640,
            height: 480,
        }
    }
}

impl SynthConfig {
    /// Checks that every generated coordinate fits the packed layout.
    pub fn validate(&self) -> Result<(), EncodeError> {
        let fits = self.width > 0
            && self.height > 0
            && self.width <= 1 << 16
            && self.height <= packed::MAX_Y as u32 + 1;
        if !fits {
            return Err(EncodeError::InvalidGeometry {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Returns an iterator over the packed words of this sequence.
    pub fn words(&self) -> Result<SynthWords, EncodeError> {
        self.validate()?;
        Ok(SynthWords {
            config: *self,
            index: 0,
        })
    }
}

/// Iterator produced by [`SynthConfig::words`].
#[derive(Debug, Clone)]
pub struct SynthWords {
    config: SynthConfig,
    index: usize,
}

impl Iterator for SynthWords {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.index >= self.config.count {
            return None;
        }
        let i = self.index as u64;
        self.index += 1;

        let width = self.config.width as u64;
        let height = self.config.height as u64;
        let x = ((i + width / 2) % width) as u16;
        let y = ((i + height / 2) % height) as u16;
        let dt = (i.wrapping_mul(self.config.dt) & packed::DT_MASK) as u32;
        Some(mono::encode(i % 2 == 1, x, y, dt))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.config.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SynthWords {}
