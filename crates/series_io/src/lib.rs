//! # Series IO
//!
//! CSV persistence of reconstructed series and recorded readings.
//!
//! ```ignore
//! use series_io::{load_series, save_series};
//!
//! save_series(Path::new("u9x_database.csv"), &series)?;
//! let series = load_series(Path::new("u9x_database.csv"))?;
//! ```

mod error;
mod readings;
mod series;

pub use error::{Result, SeriesIoError};
pub use readings::{save_readings, write_readings, ReadingsReplay, READING_COLUMNS};
pub use series::{load_series, read_series, save_series, write_series, SERIES_COLUMNS};
