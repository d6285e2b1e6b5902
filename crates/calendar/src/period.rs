//! Month-aligned rollup periods.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::day_type::{DayType, days_of_type, days_of_type_in_month, month_start, next_month_start};
use crate::error::CalendarError;

/// First month of the heating season.
pub const HEATING_SEASON_START_MONTH: u8 = 10;

/// First month after the heating season ends.
pub const HEATING_SEASON_END_MONTH: u8 = 6;

/// A calendar month identified by year and month number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    /// Calendar year.
    pub year: i32,
    /// Month number (1..=12).
    pub month: u8,
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// A half-open, month-aligned date range `[start, end)` over which monthly
/// household means are combined.
///
/// Construct with [`annual`](Self::annual),
/// [`heating_season`](Self::heating_season) or [`custom`](Self::custom).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollupPeriod {
    start: NaiveDate,
    end: NaiveDate,
    label: String,
}

impl RollupPeriod {
    /// The calendar year `[year-01-01, year+1-01-01)`, labelled `"{year}"`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidYear`] if the year cannot be represented.
    pub fn annual(year: i32) -> Result<Self, CalendarError> {
        Ok(Self {
            start: month_start(year, 1)?,
            end: month_start(year + 1, 1)?,
            label: year.to_string(),
        })
    }

    /// The heating season `[start_year-10-01, start_year+1-06-01)`, labelled
    /// `"{start_year}_{start_year + 1}"`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidYear`] if either year cannot be represented.
    pub fn heating_season(start_year: i32) -> Result<Self, CalendarError> {
        let end_year = start_year + 1;
        Ok(Self {
            start: month_start(start_year, HEATING_SEASON_START_MONTH)?,
            end: month_start(end_year, HEATING_SEASON_END_MONTH)?,
            label: format!("{start_year}_{end_year}"),
        })
    }

    /// An arbitrary month-aligned range, labelled `"{start}_{end}"`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::NotMonthAligned`] if either boundary is not the
    /// first of a month, or [`CalendarError::InvalidPeriod`] if `end <= start`.
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Result<Self, CalendarError> {
        for date in [start, end] {
            if date.day() != 1 {
                return Err(CalendarError::NotMonthAligned { date });
            }
        }
        if end <= start {
            return Err(CalendarError::InvalidPeriod { start, end });
        }
        Ok(Self {
            start,
            end,
            label: format!("{start}_{end}"),
        })
    }

    /// Inclusive start date.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Exclusive end date.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Time-period tag written to output tables.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The months covered by this period, in chronological order.
    pub fn months(&self) -> Vec<YearMonth> {
        let mut months = Vec::new();
        let mut year = self.start.year();
        let mut month = self.start.month() as u8;
        loop {
            let ym = YearMonth { year, month };
            match month_start(year, month) {
                Ok(d) if d < self.end => months.push(ym),
                _ => break,
            }
            if month == 12 {
                year += 1;
                month = 1;
            } else {
                month += 1;
            }
        }
        months
    }

    /// Returns `true` if the month lies inside the period.
    pub fn contains(&self, ym: YearMonth) -> bool {
        match (month_start(ym.year, ym.month), next_month_start(ym.year, ym.month)) {
            (Ok(first), Ok(next)) => first >= self.start && next <= self.end,
            _ => false,
        }
    }

    /// Number of days of `day_type` in the whole period.
    pub fn days_of_type(&self, day_type: DayType) -> u32 {
        days_of_type(self.start, self.end, day_type)
    }

    /// Weight of one month's mean in the period mean for `day_type`: the
    /// month's days of that type over the period's days of that type.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::MonthOutsidePeriod`] if the month is not
    /// inside the period, or [`CalendarError::InvalidMonth`] for a bad month.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let q1 = RollupPeriod::custom(d(2021, 1, 1), d(2021, 4, 1)).unwrap();
    /// let w = q1.weight(YearMonth { year: 2021, month: 2 }, DayType::Both).unwrap();
    /// assert_eq!(w, 28.0 / 90.0);
    /// ```
    pub fn weight(&self, ym: YearMonth, day_type: DayType) -> Result<f64, CalendarError> {
        let in_month = days_of_type_in_month(ym.year, ym.month, day_type)?;
        if !self.contains(ym) {
            return Err(CalendarError::MonthOutsidePeriod {
                year: ym.year,
                month: ym.month,
                period: self.label.clone(),
            });
        }
        Ok(f64::from(in_month) / f64::from(self.days_of_type(day_type)))
    }
}

impl fmt::Display for RollupPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
