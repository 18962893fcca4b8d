//! Sync engine errors

use thiserror::Error;

/// Analyzer / synchronizer error
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SyncError {
    /// Fewer than two samples of a series fall inside the selected window
    #[error("insufficient data: series '{series}' has {samples} sample(s) in [{x_low}, {x_high}] m")]
    InsufficientData {
        series: String,
        samples: usize,
        x_low: f64,
        x_high: f64,
    },

    /// No analyzer with that name
    #[error("unknown series '{name}'")]
    UnknownSeries { name: String },

    /// Analyzer name already taken in the session
    #[error("series '{name}' is already loaded")]
    DuplicateSeries { name: String },

    /// Operation needs a selected series
    #[error("no series selected")]
    NoSelection,

    /// Comparison needs two series
    #[error("time delta needs two series, {count} loaded")]
    NotEnoughSeries { count: usize },
}

impl SyncError {
    pub fn unknown_series(name: impl Into<String>) -> Self {
        Self::UnknownSeries { name: name.into() }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
