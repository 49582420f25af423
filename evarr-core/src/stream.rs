//! Streaming readers and writers for packed word files.
//!
//! A packed file holds nothing but little-endian event words; the time base
//! and encoding are known out of band.

use crate::buffer::{DecodeError, EncodeError};
use crate::packed::BYTES_PER_EVENT;
use crate::types::{MonoEvent, TriggerEvent};
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

/// Reads packed words from a byte stream.
pub struct PackedReader<R: Read> {
    reader: BufReader<R>,
    position: u64,
}

impl PackedReader<File> {
    /// Opens a packed file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DecodeError> {
        Ok(Self::new(File::open(path)?))
    }
}

impl<R: Read> PackedReader<R> {
    /// Creates a new reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            position: 0,
        }
    }

    /// Byte offset of the next record.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Reads the next word, or `None` at a clean end of stream.
    ///
    /// A stream that ends inside a record is an error.
    pub fn read_word(&mut self) -> Result<Option<u64>, DecodeError> {
        let mut record = [0u8; BYTES_PER_EVENT];
        let mut filled = 0;
        while filled < BYTES_PER_EVENT {
            match self.reader.read(&mut record[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        match filled {
            0 => Ok(None),
            BYTES_PER_EVENT => {
                self.position += BYTES_PER_EVENT as u64;
                Ok(Some(LittleEndian::read_u64(&record)))
            }
            partial => Err(DecodeError::TruncatedRecord {
                offset: self.position as usize,
                len: self.position as usize + partial,
            }),
        }
    }

    /// Appends up to `max` words to `words`, returning how many were read.
    pub fn read_chunk(&mut self, words: &mut Vec<u64>, max: usize) -> Result<usize, DecodeError> {
        let mut count = 0;
        while count < max {
            match self.read_word()? {
                Some(word) => words.push(word),
                None => break,
            }
            count += 1;
        }
        Ok(count)
    }

    /// Reads the next mono event.
    pub fn read_mono(&mut self, time_base: u64) -> Result<Option<MonoEvent>, DecodeError> {
        Ok(self
            .read_word()?
            .map(|word| MonoEvent::from_word(word, time_base)))
    }

    /// Reads the next trigger event.
    pub fn read_trigger(&mut self, time_base: u64) -> Result<Option<TriggerEvent>, DecodeError> {
        Ok(self
            .read_word()?
            .map(|word| TriggerEvent::from_word(word, time_base)))
    }
}

/// Writes packed words to a byte stream.
pub struct PackedWriter<W: Write> {
    writer: BufWriter<W>,
    events_written: u64,
}

impl PackedWriter<File> {
    /// Creates (or truncates) a packed file on disk.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, EncodeError> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> PackedWriter<W> {
    /// Creates a new writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            events_written: 0,
        }
    }

    /// Number of records written so far.
    pub fn events_written(&self) -> u64 {
        self.events_written
    }

    /// Writes one raw word.
    #[inline]
    pub fn write_word(&mut self, word: u64) -> Result<(), EncodeError> {
        self.writer.write_u64::<LittleEndian>(word)?;
        self.events_written += 1;
        Ok(())
    }

    /// Writes a mono event relative to `time_base`.
    pub fn write_mono(&mut self, event: &MonoEvent, time_base: u64) -> Result<(), EncodeError> {
        self.write_word(event.to_word(time_base)?)
    }

    /// Writes a trigger event relative to `time_base`.
    pub fn write_trigger(
        &mut self,
        event: &TriggerEvent,
        time_base: u64,
    ) -> Result<(), EncodeError> {
        self.write_word(event.to_word(time_base)?)
    }

    /// Flushes the writer.
    pub fn flush(&mut self) -> Result<(), EncodeError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W, EncodeError> {
        self.writer
            .into_inner()
            .map_err(|e| EncodeError::Io(e.into_error()))
    }
}
