//! Human-readable `summary_time` labels.

use crate::day_type::month_start;
use crate::error::CalendarError;

/// Number of half-hour slots in a day.
pub const HALF_HOURS_PER_DAY: u8 = 48;

fn check_half_hour(index: u8) -> Result<(), CalendarError> {
    if !(1..=HALF_HOURS_PER_DAY).contains(&index) {
        return Err(CalendarError::InvalidHalfHour { index });
    }
    Ok(())
}

/// Clock time at the end of half-hour slot `index`, as `(hour, minute)`.
///
/// Slot 1 ends at 00:30 and slot 48 ends at midnight, reported as `(0, 0)`.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidHalfHour`] if `index` is outside 1..=48.
pub fn half_hour_clock(index: u8) -> Result<(u8, u8), CalendarError> {
    check_half_hour(index)?;
    let hour = (index / 2) % 24;
    let minute = (index % 2) * 30;
    Ok((hour, minute))
}

/// `HH:MM` label for half-hour slot `index`.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidHalfHour`] if `index` is outside 1..=48.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(half_hour_label(1).unwrap(), "00:30");
/// assert_eq!(half_hour_label(48).unwrap(), "00:00");
/// ```
pub fn half_hour_label(index: u8) -> Result<String, CalendarError> {
    let (hour, minute) = half_hour_clock(index)?;
    Ok(format!("{hour:02}:{minute:02}"))
}

/// `Mon-YY` label for a month, e.g. `Jan-21`.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidMonth`] if `month` is outside 1..=12.
pub fn month_label(year: i32, month: u8) -> Result<String, CalendarError> {
    Ok(month_start(year, month)?.format("%b-%y").to_string())
}
