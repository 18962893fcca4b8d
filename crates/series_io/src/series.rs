//! Persisted series table
//!
//! Header row, then one row per sample: `frame,speed,distance,time,accel`.
//! Distance is written with 3 decimals.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use contracts::{TelemetrySample, TelemetrySeries};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{Result, SeriesIoError};

/// Column order of a persisted series
pub const SERIES_COLUMNS: [&str; 5] = ["frame", "speed", "distance", "time", "accel"];

/// Columns a series table cannot do without
const REQUIRED_COLUMNS: [&str; 3] = ["frame", "speed", "distance"];

#[derive(Debug, Deserialize)]
struct SeriesRow {
    frame: u64,
    speed: f64,
    distance: f64,
    #[serde(default)]
    time: Option<f64>,
    #[serde(default)]
    accel: Option<f64>,
}

impl From<SeriesRow> for TelemetrySample {
    fn from(row: SeriesRow) -> Self {
        Self {
            frame_index: row.frame,
            speed: row.speed,
            distance: row.distance,
            time: row.time.unwrap_or(0.0),
            acceleration: row.accel.unwrap_or(0.0),
        }
    }
}

/// Write `series` to `path`, replacing any existing file
#[instrument(
    name = "series_save",
    skip_all,
    fields(path = %path.display(), samples = series.len())
)]
pub fn save_series(path: &Path, series: &TelemetrySeries) -> Result<()> {
    let file = File::create(path)?;
    write_series(file, series).map_err(|e| with_path(e, path))?;
    debug!("series saved");
    Ok(())
}

/// Write `series` as CSV to any writer
pub fn write_series<W: Write>(writer: W, series: &TelemetrySeries) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(SERIES_COLUMNS)
        .map_err(|e| SeriesIoError::csv("<writer>", e))?;
    for sample in series {
        csv.write_record([
            sample.frame_index.to_string(),
            sample.speed.to_string(),
            format!("{:.3}", sample.distance),
            sample.time.to_string(),
            sample.acceleration.to_string(),
        ])
        .map_err(|e| SeriesIoError::csv("<writer>", e))?;
    }
    csv.flush()?;
    Ok(())
}

/// Read a series table from `path`.
///
/// Columns are matched by header name; `time` and `accel` may be absent and then
/// read as 0.
#[instrument(name = "series_load", skip_all, fields(path = %path.display()))]
pub fn load_series(path: &Path) -> Result<TelemetrySeries> {
    let file = File::open(path)?;
    let series = read_series(file).map_err(|e| with_path(e, path))?;
    debug!(samples = series.len(), "series loaded");
    Ok(series)
}

/// Read a series table from any reader
pub fn read_series<R: Read>(reader: R) -> Result<TelemetrySeries> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = csv
        .headers()
        .map_err(|e| SeriesIoError::csv("<reader>", e))?
        .clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(SeriesIoError::missing_column("<reader>", column));
        }
    }

    let samples = csv
        .deserialize::<SeriesRow>()
        .map(|row| row.map(TelemetrySample::from))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| SeriesIoError::csv("<reader>", e))?;
    Ok(TelemetrySeries::from(samples))
}

/// Replace the placeholder path of a reader/writer error with the real one
fn with_path(err: SeriesIoError, path: &Path) -> SeriesIoError {
    match err {
        SeriesIoError::Csv { source, .. } => SeriesIoError::csv(path, source),
        SeriesIoError::MissingColumn { column, .. } => SeriesIoError::missing_column(path, column),
        other => other,
    }
}
