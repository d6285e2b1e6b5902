//! Weekday/weekend classification and day counting.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::CalendarError;

/// Which days of the week a record or statistic covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DayType {
    /// Every day of the week.
    Both,
    /// Monday to Friday.
    Weekday,
    /// Saturday and Sunday.
    Weekend,
}

impl DayType {
    /// All day types in output order.
    pub const ALL: [DayType; 3] = [DayType::Both, DayType::Weekday, DayType::Weekend];

    /// Label used in input and output tables.
    pub fn as_str(self) -> &'static str {
        match self {
            DayType::Both => "both",
            DayType::Weekday => "weekday",
            DayType::Weekend => "weekend",
        }
    }

    /// Returns `true` if `date` falls on a day of this type.
    pub fn includes(self, date: NaiveDate) -> bool {
        let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        match self {
            DayType::Both => true,
            DayType::Weekday => !weekend,
            DayType::Weekend => weekend,
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayType {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "both" => Ok(DayType::Both),
            "weekday" => Ok(DayType::Weekday),
            "weekend" => Ok(DayType::Weekend),
            other => Err(CalendarError::UnknownDayType {
                value: other.to_string(),
            }),
        }
    }
}

/// Counts the days of `day_type` in the half-open range `[start, end)`.
///
/// Returns 0 when `end <= start`.
pub fn days_of_type(start: NaiveDate, end: NaiveDate, day_type: DayType) -> u32 {
    start
        .iter_days()
        .take_while(|d| *d < end)
        .filter(|d| day_type.includes(*d))
        .count() as u32
}

/// First day of the given month.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidMonth`] if `month` is outside 1..=12, or
/// [`CalendarError::InvalidYear`] if the year cannot be represented.
pub fn month_start(year: i32, month: u8) -> Result<NaiveDate, CalendarError> {
    if !(1..=12).contains(&month) {
        return Err(CalendarError::InvalidMonth { month });
    }
    NaiveDate::from_ymd_opt(year, u32::from(month), 1).ok_or(CalendarError::InvalidYear { year })
}

/// First day of the month after the given one.
pub(crate) fn next_month_start(year: i32, month: u8) -> Result<NaiveDate, CalendarError> {
    if month == 12 {
        month_start(year + 1, 1)
    } else {
        month_start(year, month + 1)
    }
}

/// Counts the days of `day_type` in a calendar month.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidMonth`] if `month` is outside 1..=12.
///
/// # Examples
///
/// ```ignore
/// // January 2021 starts on a Friday.
/// assert_eq!(days_of_type_in_month(2021, 1, DayType::Both).unwrap(), 31);
/// assert_eq!(days_of_type_in_month(2021, 1, DayType::Weekday).unwrap(), 21);
/// assert_eq!(days_of_type_in_month(2021, 1, DayType::Weekend).unwrap(), 10);
/// ```
pub fn days_of_type_in_month(year: i32, month: u8, day_type: DayType) -> Result<u32, CalendarError> {
    let start = month_start(year, month)?;
    let end = next_month_start(year, month)?;
    Ok(days_of_type(start, end, day_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_and_display_round_trip() {
        for dt in DayType::ALL {
            assert_eq!(dt.as_str().parse::<DayType>().unwrap(), dt);
            assert_eq!(dt.to_string(), dt.as_str());
        }
    }

    #[test]
    fn parse_unknown() {
        assert_eq!(
            "Weekday".parse::<DayType>().unwrap_err(),
            CalendarError::UnknownDayType {
                value: "Weekday".to_string()
            }
        );
    }

    #[test]
    fn includes_saturday_only_in_weekend() {
        let sat = date(2021, 1, 2);
        assert!(DayType::Both.includes(sat));
        assert!(DayType::Weekend.includes(sat));
        assert!(!DayType::Weekday.includes(sat));
    }

    #[test]
    fn january_2021_counts() {
        assert_eq!(days_of_type_in_month(2021, 1, DayType::Both).unwrap(), 31);
        assert_eq!(days_of_type_in_month(2021, 1, DayType::Weekday).unwrap(), 21);
        assert_eq!(days_of_type_in_month(2021, 1, DayType::Weekend).unwrap(), 10);
    }

    #[test]
    fn february_leap_year() {
        assert_eq!(days_of_type_in_month(2020, 2, DayType::Both).unwrap(), 29);
        assert_eq!(days_of_type_in_month(2021, 2, DayType::Both).unwrap(), 28);
    }

    #[test]
    fn december_rolls_into_next_year() {
        assert_eq!(days_of_type_in_month(2021, 12, DayType::Both).unwrap(), 31);
    }

    #[test]
    fn weekday_and_weekend_partition_month() {
        for m in 1..=12 {
            let both = days_of_type_in_month(2022, m, DayType::Both).unwrap();
            let wd = days_of_type_in_month(2022, m, DayType::Weekday).unwrap();
            let we = days_of_type_in_month(2022, m, DayType::Weekend).unwrap();
            assert_eq!(both, wd + we);
        }
    }

    #[test]
    fn full_year_2021() {
        let start = date(2021, 1, 1);
        let end = date(2022, 1, 1);
        assert_eq!(days_of_type(start, end, DayType::Both), 365);
        assert_eq!(days_of_type(start, end, DayType::Weekday), 261);
        assert_eq!(days_of_type(start, end, DayType::Weekend), 104);
    }

    #[test]
    fn empty_range() {
        let d = date(2021, 3, 1);
        assert_eq!(days_of_type(d, d, DayType::Both), 0);
    }

    #[test]
    fn invalid_month() {
        assert_eq!(
            days_of_type_in_month(2021, 13, DayType::Both).unwrap_err(),
            CalendarError::InvalidMonth { month: 13 }
        );
    }
}
