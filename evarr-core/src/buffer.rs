//! Flat event buffers.
//!
//! A buffer of N events is N packed little-endian words laid end to end, with
//! no header or padding. The number of events follows from the byte length
//! and the caller supplies the time base that applies to all of them.

use crate::packed::{self, BYTES_PER_EVENT};
use crate::types::{MonoEvent, TriggerEvent};
use byteorder::{ByteOrder, LittleEndian};
use std::iter::FusedIterator;
use std::slice::ChunksExact;
use thiserror::Error;

/// Errors that can occur while reading packed events.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Buffer length {len} is not a multiple of 8 bytes")]
    TruncatedBuffer { len: usize },

    #[error("No complete record at offset {offset} in buffer of {len} bytes")]
    TruncatedRecord { offset: usize, len: usize },

    #[error("Unknown encoding: {0}. Use mono or trigger")]
    UnknownEncoding(String),
}

/// Errors that can occur while packing events.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Coordinate out of range: x={x}, y={y} (y must be below 32768)")]
    CoordinateOutOfRange { x: u16, y: u16 },

    #[error("Event time {t} precedes time base {time_base}")]
    TimeBeforeBase { t: u64, time_base: u64 },

    #[error("Time delta {dt} does not fit in 32 bits, advance the time base")]
    DeltaOverflow { dt: u64 },

    #[error("No room for a record at offset {offset} in buffer of {len} bytes")]
    NoRoomForRecord { offset: usize, len: usize },

    #[error("Invalid sensor geometry {width}x{height}")]
    InvalidGeometry { width: u32, height: u32 },
}

/// Returns the number of events in a buffer, rejecting a partial trailing record.
#[inline]
pub fn event_count(bytes: &[u8]) -> Result<usize, DecodeError> {
    if bytes.len() % BYTES_PER_EVENT != 0 {
        return Err(DecodeError::TruncatedBuffer { len: bytes.len() });
    }
    Ok(bytes.len() / BYTES_PER_EVENT)
}

/// Iterator over the raw words of a buffer.
#[derive(Debug, Clone)]
pub struct Words<'a> {
    chunks: ChunksExact<'a, u8>,
}

impl<'a> Words<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self, DecodeError> {
        event_count(bytes)?;
        Ok(Self {
            chunks: bytes.chunks_exact(BYTES_PER_EVENT),
        })
    }
}

impl Iterator for Words<'_> {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        self.chunks.next().map(LittleEndian::read_u64)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Words<'_> {}
impl FusedIterator for Words<'_> {}

/// Iterator decoding mono events from a buffer.
#[derive(Debug, Clone)]
pub struct MonoIter<'a> {
    words: Words<'a>,
    time_base: u64,
}

impl<'a> MonoIter<'a> {
    pub fn new(bytes: &'a [u8], time_base: u64) -> Result<Self, DecodeError> {
        Ok(Self {
            words: Words::new(bytes)?,
            time_base,
        })
    }
}

impl Iterator for MonoIter<'_> {
    type Item = MonoEvent;

    #[inline]
    fn next(&mut self) -> Option<MonoEvent> {
        self.words
            .next()
            .map(|word| MonoEvent::from_word(word, self.time_base))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.words.size_hint()
    }
}

impl ExactSizeIterator for MonoIter<'_> {}
impl FusedIterator for MonoIter<'_> {}

/// Iterator decoding trigger events from a buffer.
#[derive(Debug, Clone)]
pub struct TriggerIter<'a> {
    words: Words<'a>,
    time_base: u64,
}

impl<'a> TriggerIter<'a> {
    pub fn new(bytes: &'a [u8], time_base: u64) -> Result<Self, DecodeError> {
        Ok(Self {
            words: Words::new(bytes)?,
            time_base,
        })
    }
}

impl Iterator for TriggerIter<'_> {
    type Item = TriggerEvent;

    #[inline]
    fn next(&mut self) -> Option<TriggerEvent> {
        self.words
            .next()
            .map(|word| TriggerEvent::from_word(word, self.time_base))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.words.size_hint()
    }
}

impl ExactSizeIterator for TriggerIter<'_> {}
impl FusedIterator for TriggerIter<'_> {}

/// Decodes every mono event in a buffer.
pub fn decode_mono_buffer(bytes: &[u8], time_base: u64) -> Result<Vec<MonoEvent>, DecodeError> {
    Ok(MonoIter::new(bytes, time_base)?.collect())
}

/// Decodes every trigger event in a buffer.
pub fn decode_trigger_buffer(
    bytes: &[u8],
    time_base: u64,
) -> Result<Vec<TriggerEvent>, DecodeError> {
    Ok(TriggerIter::new(bytes, time_base)?.collect())
}

/// Packs mono events relative to `time_base` and appends them to `out`.
///
/// On error `out` is left unchanged.
pub fn encode_mono_events(
    events: &[MonoEvent],
    time_base: u64,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    append_words(events, out, |event| event.to_word(time_base))
}

/// Packs trigger events relative to `time_base` and appends them to `out`.
///
/// On error `out` is left unchanged.
pub fn encode_trigger_events(
    events: &[TriggerEvent],
    time_base: u64,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    append_words(events, out, |event| event.to_word(time_base))
}

fn append_words<T, F>(events: &[T], out: &mut Vec<u8>, pack: F) -> Result<(), EncodeError>
where
    F: Fn(&T) -> Result<u64, EncodeError>,
{
    let start = out.len();
    out.resize(start + events.len() * BYTES_PER_EVENT, 0);
    for (i, event) in events.iter().enumerate() {
        let offset = start + i * BYTES_PER_EVENT;
        let result = pack(event).and_then(|word| packed::write_word(out, offset, word));
        if let Err(e) = result {
            out.truncate(start);
            return Err(e);
        }
    }
    Ok(())
}

/// Returns the word at event index `index`.
#[inline]
pub fn word_at(bytes: &[u8], index: usize) -> Result<u64, DecodeError> {
    let offset = index
        .checked_mul(BYTES_PER_EVENT)
        .ok_or(DecodeError::TruncatedRecord {
            offset: usize::MAX,
            len: bytes.len(),
        })?;
    packed::read_word(bytes, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mono;

    fn buffer_of(words: &[u64]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    #[test]
    fn test_event_count() {
        assert_eq!(event_count(&[]).unwrap(), 0);
        assert_eq!(event_count(&[0u8; 24]).unwrap(), 3);
        assert!(matches!(
            event_count(&[0u8; 23]),
            Err(DecodeError::TruncatedBuffer { len: 23 })
        ));
    }

    #[test]
    fn test_decode_mono_buffer() {
        let bytes = buffer_of(&[
            mono::encode(false, 320, 240, 0),
            mono::encode(true, 321, 241, 1000),
            mono::encode(false, 322, 242, 2000),
        ]);

        let events = decode_mono_buffer(&bytes, 5_000).unwrap();
        assert_eq!(
            events,
            vec![
                MonoEvent::new(320, 240, false, 5_000),
                MonoEvent::new(321, 241, true, 6_000),
                MonoEvent::new(322, 242, false, 7_000),
            ]
        );
    }

    #[test]
    fn test_decode_trigger_buffer() {
        let bytes = buffer_of(&[0x0000000000000064, 0x8000000000000065]);
        let events = decode_trigger_buffer(&bytes, 1000).unwrap();
        assert_eq!(
            events,
            vec![TriggerEvent::new(false, 1100), TriggerEvent::new(true, 1101)]
        );
    }

    #[test]
    fn test_iterator_is_exact_size() {
        let bytes = buffer_of(&[1, 2, 3, 4]);
        let mut iter = MonoIter::new(&bytes, 0).unwrap();
        assert_eq!(iter.len(), 4);
        iter.next();
        assert_eq!(iter.len(), 3);
    }

    #[test]
    fn test_truncated_buffer_rejected() {
        let mut bytes = buffer_of(&[1, 2]);
        bytes.push(0);
        assert!(MonoIter::new(&bytes, 0).is_err());
        assert!(decode_trigger_buffer(&bytes, 0).is_err());
    }

    #[test]
    fn test_encode_mono_events() {
        let events = [
            MonoEvent::new(100, 50, true, 1_012_345),
            MonoEvent::new(0, 0, false, 1_000_000),
        ];
        let mut out = Vec::new();
        encode_mono_events(&events, 1_000_000, &mut out).unwrap();
        assert_eq!(out.len(), 16);
        assert_eq!(word_at(&out, 0).unwrap(), 0x8032006400003039);
        assert_eq!(word_at(&out, 1).unwrap(), 0);
        assert!(word_at(&out, 2).is_err());
    }

    #[test]
    fn test_encode_appends_after_existing_bytes() {
        let mut out = vec![0xAA; 3];
        encode_trigger_events(
            &[TriggerEvent::new(false, 10), TriggerEvent::new(true, 20)],
            0,
            &mut out,
        )
        .unwrap();
        assert_eq!(out.len(), 3 + 2 * BYTES_PER_EVENT);
        assert_eq!(&out[..3], &[0xAA; 3]);
        assert_eq!(packed::read_word(&out, 3).unwrap(), 10);
        assert_eq!(packed::read_word(&out, 11).unwrap(), 0x8000_0000_0000_0014);
    }

    #[test]
    fn test_encode_error_leaves_output_untouched() {
        let mut out = vec![0xAA; 8];
        let events = [
            MonoEvent::new(1, 1, true, 10),
            MonoEvent::new(1, 0x8000, true, 10),
        ];
        let err = encode_mono_events(&events, 0, &mut out).unwrap_err();
        assert!(matches!(err, EncodeError::CoordinateOutOfRange { .. }));
        assert_eq!(out, vec![0xAA; 8]);

        let triggers = [TriggerEvent::new(true, 5)];
        assert!(encode_trigger_events(&triggers, 6, &mut out).is_err());
        assert_eq!(out.len(), 8);
    }

    #[test]
    fn test_encode_trigger_events() {
        let mut out = Vec::new();
        encode_trigger_events(&[TriggerEvent::new(true, 1100)], 1000, &mut out).unwrap();
        assert_eq!(word_at(&out, 0).unwrap(), 0x8000000000000064);
    }
}
