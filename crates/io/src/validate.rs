//! Accumulated validation utilities.
//!
//! Provides [`ValidationCollector`] for gathering multiple validation errors
//! into a single [`IoError::Validation`], plus the key checks applied to every
//! energy table after it is read.

use meterstat_calendar::HALF_HOURS_PER_DAY;

use crate::energy::{EnergyTable, Layout};
use crate::error::IoError;

/// Messages kept verbatim in the error details; the rest are only counted.
const MAX_DETAILS: usize = 20;

// ---------------------------------------------------------------------------
// ValidationCollector
// ---------------------------------------------------------------------------

/// Accumulates validation errors and converts them into a single
/// [`IoError::Validation`].
///
/// Create a collector, push zero or more error messages, then call
/// [`finish`](Self::finish) to obtain `Ok(())` when everything is valid or a
/// single `Err` that summarises every violation.
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    /// Create an empty collector.
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record one validation error.
    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Returns `true` when no errors have been recorded.
    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of recorded errors.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    /// Consume the collector and return `Ok(())` if no errors were recorded,
    /// or `Err(IoError::Validation { count, details })` otherwise.
    ///
    /// The `details` string joins the first messages with `"; "`.
    pub(crate) fn finish(self) -> Result<(), IoError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let count = self.errors.len();
        let mut details = self.errors[..count.min(MAX_DETAILS)].join("; ");
        if count > MAX_DETAILS {
            details.push_str(&format!("; and {} more", count - MAX_DETAILS));
        }
        Err(IoError::Validation { count, details })
    }
}

// ---------------------------------------------------------------------------
// Energy table checks
// ---------------------------------------------------------------------------

/// Check that every row carries the keys its table kind requires, in range.
///
/// Monthly rows need a month in 1..=12, monthly and period rows a day type,
/// banded rows a temperature band, and half-hourly rows a half-hour index in
/// 1..=48.
pub(crate) fn validate_energy_table(table: &EnergyTable) -> ValidationCollector {
    let mut c = ValidationCollector::new();
    let kind = table.kind();

    for (i, row) in table.rows().iter().enumerate() {
        if row.puprn.is_empty() {
            c.push(format!("row {i}: empty PUPRN"));
        }
        match kind.layout {
            Layout::Monthly => {
                match row.month {
                    Some(m) if (1..=12).contains(&m) => {}
                    other => c.push(format!("row {i}: month {other:?} out of range")),
                }
                if row.day_type.is_none() {
                    c.push(format!("row {i}: missing weekday_weekend"));
                }
            }
            Layout::Period => {
                if row.day_type.is_none() {
                    c.push(format!("row {i}: missing weekday_weekend"));
                }
            }
            Layout::TemperatureBanded => {
                if row.temp_band.is_none() {
                    c.push(format!("row {i}: missing temp_band"));
                }
            }
        }
        if kind.is_half_hourly() {
            match row.half_hour {
                Some(h) if (1..=HALF_HOURS_PER_DAY).contains(&h) => {}
                other => c.push(format!("row {i}: half-hour {other:?} out of range")),
            }
        }
    }

    c
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use meterstat_calendar::DayType;

    use super::*;
    use crate::energy::{EnergyRow, Granularity, TableKind};

    // -- ValidationCollector -------------------------------------------------

    #[test]
    fn collector_empty_is_ok() {
        let c = ValidationCollector::new();
        assert!(c.is_empty());
        assert_eq!(c.len(), 0);
        assert!(c.finish().is_ok());
    }

    #[test]
    fn collector_non_empty_is_err_with_correct_count() {
        let mut c = ValidationCollector::new();
        c.push("error one");
        c.push("error two");
        assert!(!c.is_empty());
        assert_eq!(c.len(), 2);

        let err = c.finish().unwrap_err();
        match err {
            IoError::Validation { count, details } => {
                assert_eq!(count, 2);
                assert!(details.contains("error one"));
                assert!(details.contains("error two"));
                assert!(details.contains("; "));
            }
            other => panic!("expected IoError::Validation, got {other:?}"),
        }
    }

    #[test]
    fn collector_truncates_long_details() {
        let mut c = ValidationCollector::new();
        for i in 0..25 {
            c.push(format!("e{i}"));
        }
        match c.finish().unwrap_err() {
            IoError::Validation { count, details } => {
                assert_eq!(count, 25);
                assert!(details.contains("e19"));
                assert!(!details.contains("e20"));
                assert!(details.ends_with("and 5 more"));
            }
            other => panic!("expected IoError::Validation, got {other:?}"),
        }
    }

    // -- validate_energy_table -----------------------------------------------

    fn monthly_hh(rows: Vec<EnergyRow>) -> EnergyTable {
        EnergyTable::new(TableKind::new(Granularity::HalfHourly, Layout::Monthly), rows)
    }

    #[test]
    fn well_formed_monthly_rows_pass() {
        let row = EnergyRow {
            month: Some(12),
            half_hour: Some(48),
            day_type: Some(DayType::Weekend),
            ..EnergyRow::new("P1")
        };
        let c = validate_energy_table(&monthly_hh(vec![row]));
        assert!(c.is_empty());
    }

    #[test]
    fn out_of_range_keys_are_reported() {
        let row = EnergyRow {
            month: Some(13),
            half_hour: Some(0),
            day_type: None,
            ..EnergyRow::new("")
        };
        let c = validate_energy_table(&monthly_hh(vec![row]));
        assert_eq!(c.len(), 4);
    }

    #[test]
    fn banded_rows_need_a_band() {
        let table = EnergyTable::new(
            TableKind::new(Granularity::Daily, Layout::TemperatureBanded),
            vec![EnergyRow::new("P1")],
        );
        let err = validate_energy_table(&table).finish().unwrap_err();
        assert!(err.to_string().contains("temp_band"));
    }
}
