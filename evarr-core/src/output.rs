//! CSV writers for decoded events.

use crate::types::{MonoEvent, TriggerEvent};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output writing.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

const FIELD_NAMES: [&str; 4] = ["x", "y", "polarity", "t"];

/// Field ordering for mono CSV output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldOrder {
    /// x, y, p, t (default)
    #[default]
    XYPT,
    /// t, x, y, p
    TXYP,
    /// x, y, t, p
    XYTP,
    /// Custom order specified by indices
    Custom([usize; 4]),
}

impl std::str::FromStr for FieldOrder {
    type Err = OutputError;

    /// Parses a field order from a format string like "x,y,p,t" or "t,x,y,p".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<String> = s.split(',').map(|p| p.trim().to_lowercase()).collect();

        if parts.len() != 4 {
            return Err(OutputError::InvalidFormat(
                "Format must have exactly 4 fields: x, y, p, t".to_string(),
            ));
        }

        // x=0, y=1, p=2, t=3
        let mut indices = [0usize; 4];
        let mut used = [false; 4];

        for (i, part) in parts.iter().enumerate() {
            let field_idx = match part.as_str() {
                "x" => 0,
                "y" => 1,
                "p" | "pol" | "polarity" => 2,
                "t" | "time" | "timestamp" => 3,
                _ => {
                    return Err(OutputError::InvalidFormat(format!(
                        "Unknown field: {}. Use x, y, p, t",
                        part
                    )))
                }
            };

            if used[field_idx] {
                return Err(OutputError::InvalidFormat(format!(
                    "Duplicate field: {}",
                    part
                )));
            }

            indices[i] = field_idx;
            used[field_idx] = true;
        }

        Ok(Self::from_indices(indices))
    }
}

impl FieldOrder {
    fn from_indices(indices: [usize; 4]) -> Self {
        match indices {
            [0, 1, 2, 3] => Self::XYPT,
            [3, 0, 1, 2] => Self::TXYP,
            [0, 1, 3, 2] => Self::XYTP,
            _ => Self::Custom(indices),
        }
    }

    /// Field indices in output order (x=0, y=1, p=2, t=3).
    pub fn indices(&self) -> [usize; 4] {
        match self {
            Self::XYPT => [0, 1, 2, 3],
            Self::TXYP => [3, 0, 1, 2],
            Self::XYTP => [0, 1, 3, 2],
            Self::Custom(indices) => *indices,
        }
    }

    /// Returns the CSV header line for this field order.
    pub fn header(&self) -> String {
        self.indices()
            .iter()
            .map(|&i| FIELD_NAMES[i])
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// CSV output writer for mono events.
pub struct CsvWriter<W: Write> {
    writer: BufWriter<W>,
    field_order: FieldOrder,
}

impl<W: Write> CsvWriter<W> {
    /// Creates a new CSV writer.
    pub fn new(writer: W, field_order: FieldOrder) -> Self {
        Self {
            writer: BufWriter::new(writer),
            field_order,
        }
    }

    /// Writes the column header line.
    pub fn write_header(&mut self) -> Result<(), OutputError> {
        writeln!(self.writer, "{}", self.field_order.header())?;
        Ok(())
    }

    /// Writes a batch of mono events.
    pub fn write_events(&mut self, events: &[MonoEvent]) -> Result<(), OutputError> {
        for event in events {
            self.write_event(event)?;
        }
        Ok(())
    }

    /// Writes a single mono event.
    #[inline]
    pub fn write_event(&mut self, event: &MonoEvent) -> Result<(), OutputError> {
        let p = event.polarity as u8;
        match self.field_order {
            FieldOrder::XYPT => {
                writeln!(self.writer, "{},{},{},{}", event.x, event.y, p, event.t)?;
            }
            FieldOrder::TXYP => {
                writeln!(self.writer, "{},{},{},{}", event.t, event.x, event.y, p)?;
            }
            FieldOrder::XYTP => {
                writeln!(self.writer, "{},{},{},{}", event.x, event.y, event.t, p)?;
            }
            FieldOrder::Custom(indices) => {
                let values = [event.x as u64, event.y as u64, p as u64, event.t];
                writeln!(
                    self.writer,
                    "{},{},{},{}",
                    values[indices[0]], values[indices[1]], values[indices[2]], values[indices[3]]
                )?;
            }
        }
        Ok(())
    }

    /// Flushes the writer.
    pub fn flush(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// CSV writer for trigger events.
pub struct TriggerCsvWriter<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> TriggerCsvWriter<W> {
    /// Creates a new trigger CSV writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Writes the column header line.
    pub fn write_header(&mut self) -> Result<(), OutputError> {
        writeln!(self.writer, "polarity,t")?;
        Ok(())
    }

    /// Writes a batch of trigger events.
    pub fn write_events(&mut self, events: &[TriggerEvent]) -> Result<(), OutputError> {
        for event in events {
            self.write_event(event)?;
        }
        Ok(())
    }

    /// Writes a single trigger event.
    #[inline]
    pub fn write_event(&mut self, event: &TriggerEvent) -> Result<(), OutputError> {
        writeln!(self.writer, "{},{}", event.polarity as u8, event.t)?;
        Ok(())
    }

    /// Flushes the writer.
    pub fn flush(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes mono events to a CSV file.
pub fn write_csv<P: AsRef<Path>>(
    path: P,
    events: &[MonoEvent],
    field_order: FieldOrder,
) -> Result<(), OutputError> {
    let file = File::create(path)?;
    let mut writer = CsvWriter::new(file, field_order);
    writer.write_header()?;
    writer.write_events(events)?;
    writer.flush()?;
    Ok(())
}

/// Writes trigger events to a CSV file.
pub fn write_trigger_csv<P: AsRef<Path>>(
    path: P,
    events: &[TriggerEvent],
) -> Result<(), OutputError> {
    let file = File::create(path)?;
    let mut writer = TriggerCsvWriter::new(file);
    writer.write_header()?;
    writer.write_events(events)?;
    writer.flush()?;
    Ok(())
}
