//! Error types for meterstat-household.

use meterstat_calendar::CalendarError;

/// Error type for all fallible operations in the meterstat-household crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HouseholdError {
    /// Returned when a profile configuration is out of range.
    #[error("invalid profile configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a temperature band cannot be built or parsed.
    #[error("invalid temperature band '{label}': {reason}")]
    InvalidBand {
        /// The band as given.
        label: String,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a rollup input is not a monthly table.
    #[error("rollup needs monthly tables, got a {kind} table for {year}")]
    NotMonthly {
        /// Kind of the offending table.
        kind: String,
        /// Year the table was tagged with.
        year: i32,
    },

    /// Returned when rollup inputs mix daily and half-hourly tables.
    #[error("rollup inputs mix daily and half-hourly tables")]
    MixedGranularity,

    /// Returned when no monthly table covers a year the period needs.
    #[error("no monthly table for {year}, needed by period {period}")]
    MissingMonthTable {
        /// The uncovered year.
        year: i32,
        /// Label of the period being rolled up.
        period: String,
    },

    /// Wraps a calendar failure.
    #[error("calendar error: {0}")]
    Calendar(#[from] CalendarError),
}
