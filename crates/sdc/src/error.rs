//! Error types for meterstat-sdc.

use std::path::PathBuf;

use meterstat_calendar::CalendarError;
use meterstat_io::IoError;
use meterstat_stats::StatsError;

/// Error type for all fallible operations in the meterstat-sdc crate.
#[derive(Debug, thiserror::Error)]
pub enum SdcError {
    /// Returned when a disclosure or segmentation setting is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a pass needs an energy table that was not supplied.
    #[error("missing input table '{table}' for {year}")]
    MissingInputTable {
        /// Description of the table, e.g. `temperature-banded daily`.
        table: String,
        /// Year being processed.
        year: i32,
    },

    /// Returned when a time period tag cannot be read as a year where one
    /// is needed.
    #[error("time period '{value}' is not a calendar year")]
    InvalidTimePeriod {
        /// The tag as given.
        value: String,
    },

    /// Wraps an error from the meterstat-stats crate.
    #[error("statistics error: {reason}")]
    Stats {
        /// Description of the underlying failure.
        reason: String,
    },

    /// Wraps an error from the meterstat-calendar crate.
    #[error("calendar error: {reason}")]
    Calendar {
        /// Description of the underlying failure.
        reason: String,
    },

    /// Returned when an output file cannot be written.
    #[error("cannot write {}: {reason}", path.display())]
    Output {
        /// Destination file.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },
}

impl From<StatsError> for SdcError {
    fn from(e: StatsError) -> Self {
        SdcError::Stats {
            reason: e.to_string(),
        }
    }
}

impl From<CalendarError> for SdcError {
    fn from(e: CalendarError) -> Self {
        SdcError::Calendar {
            reason: e.to_string(),
        }
    }
}

impl SdcError {
    pub(crate) fn output(path: &std::path::Path, reason: impl ToString) -> Self {
        SdcError::Output {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn io(path: &std::path::Path, e: IoError) -> Self {
        Self::output(path, e)
    }
}
