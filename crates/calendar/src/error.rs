//! Error types for the meterstat-calendar crate.

use chrono::NaiveDate;

/// Error type for all fallible operations in the meterstat-calendar crate.
///
/// This enum covers invalid month and half-hour indices, unparseable
/// day-type labels, and malformed rollup periods.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[allow(clippy::enum_variant_names)]
pub enum CalendarError {
    /// Returned when a month number is outside the valid range 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month number that was provided.
        month: u8,
    },

    /// Returned when a half-hour index is outside the valid range 1..=48.
    #[error("invalid half-hour index: {index} (must be 1..=48)")]
    InvalidHalfHour {
        /// The invalid half-hour index that was provided.
        index: u8,
    },

    /// Returned when a year cannot be represented as a calendar date.
    #[error("year {year} is out of range")]
    InvalidYear {
        /// The unrepresentable year.
        year: i32,
    },

    /// Returned when a day-type label is not one of `both`, `weekday`, `weekend`.
    #[error("unknown day type: {value:?}")]
    UnknownDayType {
        /// The label that could not be parsed.
        value: String,
    },

    /// Returned when a period does not end strictly after it starts.
    #[error("invalid period: {start} .. {end} (end must be after start)")]
    InvalidPeriod {
        /// Inclusive start of the rejected period.
        start: NaiveDate,
        /// Exclusive end of the rejected period.
        end: NaiveDate,
    },

    /// Returned when a period boundary does not fall on the first of a month.
    #[error("period boundary {date} is not the first day of a month")]
    NotMonthAligned {
        /// The misaligned boundary.
        date: NaiveDate,
    },

    /// Returned when a month lies outside the period it is weighted against.
    #[error("month {year}-{month:02} is outside period {period}")]
    MonthOutsidePeriod {
        /// Calendar year of the month.
        year: i32,
        /// Month number.
        month: u8,
        /// Label of the period.
        period: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_month() {
        let err = CalendarError::InvalidMonth { month: 13 };
        assert_eq!(err.to_string(), "invalid month: 13 (must be 1..=12)");
    }

    #[test]
    fn error_invalid_half_hour() {
        let err = CalendarError::InvalidHalfHour { index: 49 };
        assert_eq!(err.to_string(), "invalid half-hour index: 49 (must be 1..=48)");
    }

    #[test]
    fn error_unknown_day_type() {
        let err = CalendarError::UnknownDayType {
            value: "holiday".to_string(),
        };
        assert_eq!(err.to_string(), "unknown day type: \"holiday\"");
    }

    #[test]
    fn error_invalid_period() {
        let d = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let err = CalendarError::InvalidPeriod { start: d, end: d };
        assert_eq!(
            err.to_string(),
            "invalid period: 2021-01-01 .. 2021-01-01 (end must be after start)"
        );
    }

    #[test]
    fn error_month_outside_period() {
        let err = CalendarError::MonthOutsidePeriod {
            year: 2020,
            month: 7,
            period: "2020_2021".to_string(),
        };
        assert_eq!(err.to_string(), "month 2020-07 is outside period 2020_2021");
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<CalendarError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<CalendarError>();
    }

    #[test]
    fn error_is_partial_eq() {
        let a = CalendarError::InvalidMonth { month: 0 };
        let b = CalendarError::InvalidMonth { month: 0 };
        assert_eq!(a, b);

        let c = CalendarError::InvalidMonth { month: 13 };
        assert_ne!(a, c);
    }
}
