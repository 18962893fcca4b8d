//! Recorded readings
//!
//! `frame,value` table of raw recognizer output; a blank value is an unrecognized
//! frame. Replaying it feeds the builder exactly what the recognizer produced.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use contracts::{RawReading, ReadingSource};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{Result, SeriesIoError};

/// Column order of a readings table
pub const READING_COLUMNS: [&str; 2] = ["frame", "value"];

#[derive(Debug, Deserialize)]
struct ReadingRow {
    frame: u64,
    #[serde(default)]
    value: Option<f64>,
}

/// Readings loaded from a table, handed out in file order
#[derive(Debug, Clone, Default)]
pub struct ReadingsReplay {
    readings: VecDeque<RawReading>,
    total: u64,
}

impl ReadingsReplay {
    /// Load a readings table from `path`
    #[instrument(name = "readings_open", skip_all, fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let replay = Self::from_reader(file).map_err(|e| match e {
            SeriesIoError::Csv { source, .. } => SeriesIoError::csv(path, source),
            SeriesIoError::MissingColumn { column, .. } => {
                SeriesIoError::missing_column(path, column)
            }
            other => other,
        })?;
        debug!(readings = replay.total, "readings loaded");
        Ok(replay)
    }

    /// Load a readings table from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers = csv
            .headers()
            .map_err(|e| SeriesIoError::csv("<reader>", e))?
            .clone();
        for column in READING_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(SeriesIoError::missing_column("<reader>", column));
            }
        }

        let readings = csv
            .deserialize::<ReadingRow>()
            .map(|row| row.map(|r| RawReading::new(r.frame, r.value)))
            .collect::<std::result::Result<VecDeque<_>, _>>()
            .map_err(|e| SeriesIoError::csv("<reader>", e))?;
        let total = readings.len() as u64;
        Ok(Self { readings, total })
    }

    /// Readings not yet handed out
    pub fn remaining(&self) -> usize {
        self.readings.len()
    }
}

impl ReadingSource for ReadingsReplay {
    fn next_reading(&mut self) -> Option<RawReading> {
        self.readings.pop_front()
    }

    fn len_hint(&self) -> Option<u64> {
        Some(self.total)
    }
}

/// Record readings to `path`
pub fn save_readings(path: &Path, readings: &[RawReading]) -> Result<()> {
    let file = File::create(path)?;
    write_readings(file, readings).map_err(|e| match e {
        SeriesIoError::Csv { source, .. } => SeriesIoError::csv(path, source),
        other => other,
    })
}

/// Write readings as CSV to any writer
pub fn write_readings<W: Write>(writer: W, readings: &[RawReading]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(READING_COLUMNS)
        .map_err(|e| SeriesIoError::csv("<writer>", e))?;
    for reading in readings {
        let value = reading.value.map(|v| v.to_string()).unwrap_or_default();
        csv.write_record([reading.frame_index.to_string(), value])
            .map_err(|e| SeriesIoError::csv("<writer>", e))?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_value_is_unrecognized() {
        let data = "frame,value\n0,60\n1,\n2,61.5\n";
        let mut replay = ReadingsReplay::from_reader(data.as_bytes()).unwrap();

        assert_eq!(replay.len_hint(), Some(3));
        assert_eq!(replay.next_reading(), Some(RawReading::new(0, Some(60.0))));
        assert_eq!(replay.next_reading(), Some(RawReading::unrecognized(1)));
        assert_eq!(replay.next_reading(), Some(RawReading::new(2, Some(61.5))));
        assert_eq!(replay.next_reading(), None);
        assert_eq!(replay.remaining(), 0);
    }

    #[test]
    fn test_record_and_replay() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readings.csv");
        let readings = vec![
            RawReading::new(40, Some(88.0)),
            RawReading::unrecognized(41),
            RawReading::new(42, Some(90.0)),
        ];
        save_readings(&path, &readings).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("frame,value\n40,88\n41,\n"));

        let mut replay = ReadingsReplay::open(&path).unwrap();
        let replayed: Vec<RawReading> = std::iter::from_fn(|| replay.next_reading()).collect();
        assert_eq!(replayed, readings);
    }

    #[test]
    fn test_missing_value_column() {
        let err = ReadingsReplay::from_reader("frame\n1\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("missing column 'value'"));
    }
}
