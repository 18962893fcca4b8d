//! Series IO error types

use std::path::PathBuf;

use thiserror::Error;

/// Persistence errors
#[derive(Debug, Error)]
pub enum SeriesIoError {
    /// Required column absent from the header row
    #[error("{}: missing column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },

    /// Malformed CSV or a value that does not parse
    #[error("{}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SeriesIoError {
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    pub fn missing_column(path: impl Into<PathBuf>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            path: path.into(),
            column: column.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SeriesIoError>;
