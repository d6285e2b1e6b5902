//! Day-weighted rollup of monthly household means into period means.
//!
//! A month's mean counts in proportion to how many days of the row's day
//! type it contributes to the period, so a household's annual weekday mean
//! is the true mean over all weekdays of the year rather than a mean of
//! twelve monthly means.

use std::collections::BTreeMap;

use chrono::Datelike;
use meterstat_calendar::{DayType, RollupPeriod, YearMonth};
use meterstat_io::{EnergyRow, EnergyTable, Layout, TableKind};
use meterstat_stats::strict_sum;
use tracing::{info, warn};

use crate::error::HouseholdError;

type GroupKey = (String, DayType, Option<u8>);

/// Rolls monthly tables up to one row per household, day type and (for
/// half-hourly tables) half-hour over `period`.
///
/// `sources` pairs each monthly table with the calendar year its months
/// belong to; a heating season needs the tables of both its years. Every
/// numeric field is the weighted sum of its monthly values. A field is null
/// when any contributing month has it null, and every field is null when
/// the household lacks a row for any month of the period.
///
/// Rows are ordered by household, day type and half-hour.
///
/// # Errors
///
/// Returns [`HouseholdError::NotMonthly`] for a table that is not monthly,
/// [`HouseholdError::MixedGranularity`] when daily and half-hourly tables
/// are mixed, and [`HouseholdError::MissingMonthTable`] when a year of the
/// period has no table.
///
/// # Example
///
/// ```
/// use meterstat_calendar::{DayType, RollupPeriod};
/// use meterstat_household::rollup;
/// use meterstat_io::{EnergyRow, EnergyTable, Granularity, Layout, TableKind};
///
/// let rows = (1..=12)
///     .map(|month| EnergyRow {
///         elec: Some(5.0),
///         day_type: Some(DayType::Both),
///         month: Some(month),
///         ..EnergyRow::new("P1")
///     })
///     .collect();
/// let monthly = EnergyTable::new(TableKind::new(Granularity::Daily, Layout::Monthly), rows);
///
/// let period = RollupPeriod::annual(2021).unwrap();
/// let annual = rollup(&[(2021, &monthly)], &period).unwrap();
/// assert!((annual.rows()[0].elec.unwrap() - 5.0).abs() < 1e-12);
/// ```
pub fn rollup(
    sources: &[(i32, &EnergyTable)],
    period: &RollupPeriod,
) -> Result<EnergyTable, HouseholdError> {
    let months = period.months();

    for (year, table) in sources {
        if table.kind().layout != Layout::Monthly {
            return Err(HouseholdError::NotMonthly {
                kind: table.kind().to_string(),
                year: *year,
            });
        }
    }
    for ym in &months {
        if !sources.iter().any(|(year, _)| *year == ym.year) {
            return Err(HouseholdError::MissingMonthTable {
                year: ym.year,
                period: period.label().to_string(),
            });
        }
    }
    let Some((_, first)) = sources.first() else {
        return Err(HouseholdError::MissingMonthTable {
            year: period.start().year(),
            period: period.label().to_string(),
        });
    };
    let granularity = first.kind().granularity;
    if sources.iter().any(|(_, t)| t.kind().granularity != granularity) {
        return Err(HouseholdError::MixedGranularity);
    }

    let mut weights: BTreeMap<(YearMonth, DayType), f64> = BTreeMap::new();
    for &ym in &months {
        for day_type in DayType::ALL {
            weights.insert((ym, day_type), period.weight(ym, day_type)?);
        }
    }

    let mut groups: BTreeMap<GroupKey, BTreeMap<YearMonth, &EnergyRow>> = BTreeMap::new();
    let mut n_duplicates = 0usize;
    let mut n_unkeyed = 0usize;
    for (year, table) in sources {
        for row in table.rows() {
            let (Some(month), Some(day_type)) = (row.month, row.day_type) else {
                n_unkeyed += 1;
                continue;
            };
            let ym = YearMonth { year: *year, month };
            if !period.contains(ym) {
                continue;
            }
            let key = (row.puprn.clone(), day_type, row.half_hour);
            if groups.entry(key).or_default().insert(ym, row).is_some() {
                n_duplicates += 1;
            }
        }
    }
    if n_unkeyed > 0 {
        warn!(n_rows = n_unkeyed, "monthly rows without month or day type ignored");
    }
    if n_duplicates > 0 {
        warn!(n_rows = n_duplicates, "duplicate monthly rows; the last one was used");
    }

    let mut n_incomplete = 0usize;
    let mut rows = Vec::with_capacity(groups.len());
    for ((puprn, day_type, half_hour), by_month) in groups {
        let mut out = EnergyRow::new(puprn);
        out.day_type = Some(day_type);
        out.half_hour = half_hour;

        if by_month.len() == months.len() {
            let weighted = |field: fn(&EnergyRow) -> Option<f64>| {
                strict_sum(by_month.iter().map(|(ym, row)| {
                    let w = weights.get(&(*ym, day_type)).copied();
                    field(row).zip(w).map(|(v, w)| v * w)
                }))
            };
            out.elec = weighted(|r| r.elec);
            out.gas = weighted(|r| r.gas);
            out.total = weighted(|r| r.total);
            out.temp_elec = weighted(|r| r.temp_elec);
            out.temp_gas = weighted(|r| r.temp_gas);
            out.temp_weighted = weighted(|r| r.temp_weighted);
            out.hdd_elec = weighted(|r| r.hdd_elec);
            out.hdd_gas = weighted(|r| r.hdd_gas);
            out.hdd_weighted = weighted(|r| r.hdd_weighted);
        } else {
            n_incomplete += 1;
        }
        rows.push(out);
    }

    if n_incomplete > 0 {
        warn!(
            period = %period,
            n_groups = n_incomplete,
            "households missing months of the period; their values are null"
        );
    }
    info!(period = %period, n_rows = rows.len(), "rolled up monthly profiles");
    Ok(EnergyTable::new(TableKind::new(granularity, Layout::Period), rows))
}
