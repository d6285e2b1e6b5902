//! Error types for meterstat-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the meterstat-io crate.
///
/// This enum covers missing files and columns, unparseable cells, CSV and
/// Parquet library failures, and validation problems found after a table
/// has been read.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Returned when a required column is absent from a table's header.
    #[error("column '{column}' not found in {}", path.display())]
    MissingColumn {
        /// Name of the missing column.
        column: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a cell cannot be parsed as the type its column requires.
    #[error("{}:{line}: invalid value {value:?} in column '{column}'", path.display())]
    InvalidValue {
        /// File containing the cell.
        path: PathBuf,
        /// 1-based line number of the record.
        line: u64,
        /// Column name.
        column: String,
        /// Raw cell text.
        value: String,
    },

    /// Wraps an error originating from the CSV library.
    #[error("csv error in {}: {reason}", path.display())]
    Csv {
        /// File being read or written.
        path: PathBuf,
        /// Description of the underlying CSV failure.
        reason: String,
    },

    /// Wraps an error originating from the Parquet or Arrow libraries.
    #[error("parquet error: {reason}")]
    Parquet {
        /// Description of the underlying Parquet failure.
        reason: String,
    },

    /// Wraps an error originating from the meterstat-calendar crate.
    #[error("calendar error: {reason}")]
    Calendar {
        /// Description of the underlying calendar failure.
        reason: String,
    },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },
}

impl From<parquet::errors::ParquetError> for IoError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<arrow::error::ArrowError> for IoError {
    fn from(e: arrow::error::ArrowError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<meterstat_calendar::CalendarError> for IoError {
    fn from(e: meterstat_calendar::CalendarError) -> Self {
        IoError::Calendar {
            reason: e.to_string(),
        }
    }
}

impl IoError {
    /// Wraps a CSV library error with the path it concerns.
    pub(crate) fn csv(path: impl Into<PathBuf>, e: csv::Error) -> Self {
        IoError::Csv {
            path: path.into(),
            reason: e.to_string(),
        }
    }
}
