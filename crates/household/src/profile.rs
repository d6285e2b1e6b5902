//! Per-household mean consumption profiles from cleaned readings.
//!
//! Each profile slice (a month and day type, optionally a half-hour, or a
//! temperature band) reports a fuel's mean only when enough of the slice's
//! readings are present. Temperatures and heating degree days are averaged
//! over the same readings as the fuel they accompany.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use meterstat_calendar::{DayType, HALF_HOURS_PER_DAY, days_of_type_in_month};
use meterstat_io::{DailyReading, EnergyRow, EnergyTable, Granularity, HalfHourReading, Layout, TableKind};
use meterstat_stats::mean;
use tracing::{debug, info};

use crate::config::ProfileConfig;
use crate::error::HouseholdError;

const MONTHS: usize = 12;
const HALF_HOURS: usize = HALF_HOURS_PER_DAY as usize;
const DAY_TYPES: usize = DayType::ALL.len();

// ---------------------------------------------------------------------------
// Slice summaries
// ---------------------------------------------------------------------------

/// One reading reduced to the fields a slice summary needs.
#[derive(Debug, Clone, Copy, Default)]
struct Obs {
    elec: Option<f64>,
    gas: Option<f64>,
    temp: Option<f64>,
    hdd: Option<f64>,
}

#[derive(Debug, Default)]
struct SliceMeans {
    elec: Option<f64>,
    gas: Option<f64>,
    temp: [Option<f64>; 3],
    hdd: [Option<f64>; 3],
}

impl SliceMeans {
    fn apply(&self, row: &mut EnergyRow, with_hdd: bool) {
        row.elec = self.elec;
        row.gas = self.gas;
        row.total = self.elec.zip(self.gas).map(|(e, g)| e + g);
        [row.temp_elec, row.temp_gas, row.temp_weighted] = self.temp;
        if with_hdd {
            [row.hdd_elec, row.hdd_gas, row.hdd_weighted] = self.hdd;
        }
    }
}

/// A fuel's readings within one slice.
struct FuelSlice<'a> {
    obs: &'a [Obs],
    pick: fn(&Obs) -> Option<f64>,
    mean: Option<f64>,
}

impl<'a> FuelSlice<'a> {
    fn new(obs: &'a [Obs], pick: fn(&Obs) -> Option<f64>, threshold: f64) -> Self {
        let values: Vec<f64> = obs.iter().filter_map(pick).filter(|v| !v.is_nan()).collect();
        let enough = !obs.is_empty() && values.len() as f64 / obs.len() as f64 >= threshold;
        Self {
            obs,
            pick,
            mean: if enough { mean(&values) } else { None },
        }
    }

    /// The auxiliary values on readings where this fuel is present, or
    /// `None` when the fuel mean itself is withheld.
    fn matched(&self, aux: fn(&Obs) -> Option<f64>) -> Option<Vec<Option<f64>>> {
        self.mean?;
        Some(
            self.obs
                .iter()
                .filter(|o| (self.pick)(o).is_some_and(|v| !v.is_nan()))
                .map(aux)
                .collect(),
        )
    }
}

/// Means of the electricity-matched and gas-matched values and their pooled
/// mean. A side is `None` when any of its values is missing; the pooled mean
/// needs both sides.
fn paired_means(elec: Option<Vec<Option<f64>>>, gas: Option<Vec<Option<f64>>>) -> [Option<f64>; 3] {
    let complete = |v: Vec<Option<f64>>| -> Option<Vec<f64>> {
        v.into_iter().map(|x| x.filter(|x| !x.is_nan())).collect()
    };
    let elec = elec.and_then(complete);
    let gas = gas.and_then(complete);
    let pooled = match (&elec, &gas) {
        (Some(e), Some(g)) => {
            let all: Vec<f64> = e.iter().chain(g).copied().collect();
            mean(&all)
        }
        _ => None,
    };
    [
        elec.as_deref().and_then(mean),
        gas.as_deref().and_then(mean),
        pooled,
    ]
}

fn summarise(obs: &[Obs], threshold: f64) -> SliceMeans {
    let elec = FuelSlice::new(obs, |o| o.elec, threshold);
    let gas = FuelSlice::new(obs, |o| o.gas, threshold);
    SliceMeans {
        elec: elec.mean,
        gas: gas.mean,
        temp: paired_means(elec.matched(|o| o.temp), gas.matched(|o| o.temp)),
        hdd: paired_means(elec.matched(|o| o.hdd), gas.matched(|o| o.hdd)),
    }
}

// ---------------------------------------------------------------------------
// Grouping helpers
// ---------------------------------------------------------------------------

/// Groups items by household, households in order of first appearance.
fn group_by_puprn<'a, T>(
    items: impl Iterator<Item = &'a T>,
    key: impl Fn(&'a T) -> &'a str,
) -> Vec<(&'a str, Vec<&'a T>)>
where
    T: 'a,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&T>)> = Vec::new();
    for item in items {
        let puprn = key(item);
        let i = *index.entry(puprn).or_insert_with(|| {
            groups.push((puprn, Vec::new()));
            groups.len() - 1
        });
        groups[i].1.push(item);
    }
    groups
}

fn day_type_slots(date: NaiveDate) -> impl Iterator<Item = usize> {
    DayType::ALL
        .into_iter()
        .enumerate()
        .filter(move |(_, dt)| dt.includes(date))
        .map(|(i, _)| i)
}

fn half_hour_slot(half_hour: u8) -> Result<usize, HouseholdError> {
    if (1..=HALF_HOURS_PER_DAY).contains(&half_hour) {
        Ok(usize::from(half_hour - 1))
    } else {
        Err(meterstat_calendar::CalendarError::InvalidHalfHour { index: half_hour }.into())
    }
}

fn in_year<'a, T>(
    readings: &'a [T],
    year: i32,
    date: impl Fn(&T) -> NaiveDate + 'a,
) -> impl Iterator<Item = &'a T> {
    let outside = readings.iter().filter(|r| date(r).year() != year).count();
    if outside > 0 {
        debug!(year, n_skipped = outside, "readings outside the profile year ignored");
    }
    readings.iter().filter(move |r| date(r).year() == year)
}

fn month_slot(date: NaiveDate) -> usize {
    date.month0() as usize
}

fn finish(kind: TableKind, rows: Vec<EnergyRow>, n_households: usize) -> EnergyTable {
    info!(%kind, n_households, n_rows = rows.len(), "built household profiles");
    EnergyTable::new(kind, rows)
}

// ---------------------------------------------------------------------------
// Monthly profiles
// ---------------------------------------------------------------------------

/// Builds the monthly daily profile for `year`: one row per household, month
/// and day type, holding mean daily kWh.
///
/// Every household in the readings gets all 36 rows; slices without enough
/// data carry null means. Readings from other years are ignored.
///
/// # Errors
///
/// Returns [`HouseholdError::InvalidConfig`] for a bad configuration, or a
/// calendar error if `year` cannot be represented.
pub fn monthly_daily_profiles(
    readings: &[DailyReading],
    year: i32,
    config: &ProfileConfig,
) -> Result<EnergyTable, HouseholdError> {
    config.validate()?;
    let threshold = config.missing_threshold();
    let groups = group_by_puprn(in_year(readings, year, |r| r.date), |r| r.puprn.as_str());

    let mut rows = Vec::with_capacity(groups.len() * MONTHS * DAY_TYPES);
    for (puprn, group) in &groups {
        let mut slots = vec![Vec::new(); MONTHS * DAY_TYPES];
        for r in group {
            let obs = Obs {
                elec: r.elec,
                gas: r.gas,
                temp: r.mean_temp,
                hdd: r.hdd,
            };
            for d in day_type_slots(r.date) {
                slots[month_slot(r.date) * DAY_TYPES + d].push(obs);
            }
        }

        for month in 1..=MONTHS as u8 {
            for (d, day_type) in DayType::ALL.into_iter().enumerate() {
                let obs = &slots[usize::from(month - 1) * DAY_TYPES + d];
                let mut row = EnergyRow::new(*puprn);
                summarise(obs, threshold).apply(&mut row, true);
                row.day_type = Some(day_type);
                row.month = Some(month);
                row.days_in_month = Some(days_of_type_in_month(year, month, day_type)?);
                rows.push(row);
            }
        }
    }

    Ok(finish(
        TableKind::new(Granularity::Daily, Layout::Monthly),
        rows,
        groups.len(),
    ))
}

/// Builds the monthly half-hourly profile for `year`: one row per household,
/// month, day type and half-hour, holding mean Wh per half-hour.
///
/// # Errors
///
/// As [`monthly_daily_profiles`], plus a calendar error for a half-hour
/// index outside 1..=48.
pub fn monthly_hh_profiles(
    readings: &[HalfHourReading],
    year: i32,
    config: &ProfileConfig,
) -> Result<EnergyTable, HouseholdError> {
    config.validate()?;
    let threshold = config.missing_threshold();
    let groups = group_by_puprn(in_year(readings, year, |r| r.date), |r| r.puprn.as_str());

    let mut rows = Vec::with_capacity(groups.len() * MONTHS * DAY_TYPES * HALF_HOURS);
    for (puprn, group) in &groups {
        let mut slots = vec![Vec::new(); MONTHS * DAY_TYPES * HALF_HOURS];
        for r in group {
            let hh = half_hour_slot(r.half_hour)?;
            let obs = Obs {
                elec: r.elec,
                gas: r.gas,
                temp: r.temp,
                hdd: None,
            };
            for d in day_type_slots(r.date) {
                slots[(month_slot(r.date) * DAY_TYPES + d) * HALF_HOURS + hh].push(obs);
            }
        }

        for month in 1..=MONTHS as u8 {
            for (d, day_type) in DayType::ALL.into_iter().enumerate() {
                let days = days_of_type_in_month(year, month, day_type)?;
                for half_hour in 1..=HALF_HOURS_PER_DAY {
                    let slot = (usize::from(month - 1) * DAY_TYPES + d) * HALF_HOURS
                        + usize::from(half_hour - 1);
                    let mut row = EnergyRow::new(*puprn);
                    summarise(&slots[slot], threshold).apply(&mut row, false);
                    row.day_type = Some(day_type);
                    row.month = Some(month);
                    row.half_hour = Some(half_hour);
                    row.days_in_month = Some(days);
                    rows.push(row);
                }
            }
        }
    }

    Ok(finish(
        TableKind::new(Granularity::HalfHourly, Layout::Monthly),
        rows,
        groups.len(),
    ))
}

// ---------------------------------------------------------------------------
// Temperature-banded profiles
// ---------------------------------------------------------------------------

/// Builds the temperature-banded daily profile for `year`: one row per
/// household and band over the days whose mean temperature lies in the band.
///
/// Days without a temperature belong to no band.
///
/// # Errors
///
/// Returns [`HouseholdError::InvalidConfig`] for a bad configuration.
pub fn banded_daily_profiles(
    readings: &[DailyReading],
    year: i32,
    config: &ProfileConfig,
) -> Result<EnergyTable, HouseholdError> {
    config.validate()?;
    let threshold = config.missing_threshold();
    let groups = group_by_puprn(in_year(readings, year, |r| r.date), |r| r.puprn.as_str());

    let mut rows = Vec::with_capacity(groups.len() * config.bands().len());
    for (puprn, group) in &groups {
        for band in config.bands() {
            let obs: Vec<Obs> = group
                .iter()
                .filter(|r| r.mean_temp.is_some_and(|t| band.contains(t)))
                .map(|r| Obs {
                    elec: r.elec,
                    gas: r.gas,
                    temp: r.mean_temp,
                    hdd: r.hdd,
                })
                .collect();
            let mut row = EnergyRow::new(*puprn);
            summarise(&obs, threshold).apply(&mut row, true);
            row.temp_band = Some(band.label().to_string());
            rows.push(row);
        }
    }

    Ok(finish(
        TableKind::new(Granularity::Daily, Layout::TemperatureBanded),
        rows,
        groups.len(),
    ))
}

/// Builds the temperature-banded half-hourly profile for `year`: one row per
/// household, band and half-hour.
///
/// A day is assigned to bands by the mean of its half-hourly temperatures;
/// within the band each half-hour keeps its own temperature.
///
/// # Errors
///
/// As [`banded_daily_profiles`], plus a calendar error for a half-hour index
/// outside 1..=48.
pub fn banded_hh_profiles(
    readings: &[HalfHourReading],
    year: i32,
    config: &ProfileConfig,
) -> Result<EnergyTable, HouseholdError> {
    config.validate()?;
    let threshold = config.missing_threshold();
    let groups = group_by_puprn(in_year(readings, year, |r| r.date), |r| r.puprn.as_str());

    let mut rows = Vec::with_capacity(groups.len() * config.bands().len() * HALF_HOURS);
    for (puprn, group) in &groups {
        let mut day_temps: HashMap<NaiveDate, Vec<f64>> = HashMap::new();
        for r in group {
            let temps = day_temps.entry(r.date).or_default();
            if let Some(t) = r.temp.filter(|t| !t.is_nan()) {
                temps.push(t);
            }
        }
        let day_mean: HashMap<NaiveDate, Option<f64>> = day_temps
            .into_iter()
            .map(|(date, temps)| (date, mean(&temps)))
            .collect();

        for band in config.bands() {
            let mut slots = vec![Vec::new(); HALF_HOURS];
            for r in group {
                let in_band = day_mean
                    .get(&r.date)
                    .copied()
                    .flatten()
                    .is_some_and(|t| band.contains(t));
                if in_band {
                    slots[half_hour_slot(r.half_hour)?].push(Obs {
                        elec: r.elec,
                        gas: r.gas,
                        temp: r.temp,
                        hdd: None,
                    });
                }
            }
            for (i, obs) in slots.iter().enumerate() {
                let mut row = EnergyRow::new(*puprn);
                summarise(obs, threshold).apply(&mut row, false);
                row.temp_band = Some(band.label().to_string());
                row.half_hour = Some(i as u8 + 1);
                rows.push(row);
            }
        }
    }

    Ok(finish(
        TableKind::new(Granularity::HalfHourly, Layout::TemperatureBanded),
        rows,
        groups.len(),
    ))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn obs(elec: Option<f64>, gas: Option<f64>, temp: Option<f64>) -> Obs {
        Obs {
            elec,
            gas,
            temp,
            hdd: None,
        }
    }

    #[test]
    fn threshold_is_share_of_slice() {
        let half = [obs(Some(2.0), None, None), obs(None, None, None)];
        assert_eq!(summarise(&half, 0.5).elec, Some(2.0));
        assert_eq!(summarise(&half, 0.6).elec, None);
        assert_eq!(summarise(&[], 0.5).elec, None);
    }

    #[test]
    fn temperatures_follow_their_fuel() {
        let slice = [
            obs(Some(1.0), Some(10.0), Some(2.0)),
            obs(Some(3.0), None, Some(4.0)),
            obs(Some(5.0), Some(20.0), Some(6.0)),
        ];
        let means = summarise(&slice, 0.5);
        assert_relative_eq!(means.elec.unwrap(), 3.0);
        assert_relative_eq!(means.gas.unwrap(), 15.0);
        assert_relative_eq!(means.temp[0].unwrap(), 4.0);
        assert_relative_eq!(means.temp[1].unwrap(), 4.0);
        // pooled over 3 electricity and 2 gas readings
        assert_relative_eq!(means.temp[2].unwrap(), 20.0 / 5.0);
        assert_eq!(means.hdd, [None, None, None]);
    }

    #[test]
    fn missing_temperature_withholds_mean() {
        let slice = [
            obs(Some(1.0), None, Some(2.0)),
            obs(Some(3.0), None, None),
        ];
        let means = summarise(&slice, 0.5);
        assert_eq!(means.temp[0], None);
        assert_eq!(means.temp[1], None);
        assert_eq!(means.temp[2], None);
    }

    #[test]
    fn total_needs_both_fuels() {
        let mut row = EnergyRow::new("P");
        summarise(&[obs(Some(1.0), Some(2.0), None)], 0.5).apply(&mut row, false);
        assert_eq!(row.total, Some(3.0));
        summarise(&[obs(Some(1.0), None, None)], 0.5).apply(&mut row, false);
        assert_eq!(row.total, None);
    }

    #[test]
    fn groups_keep_first_appearance_order() {
        let items = ["b", "a", "b", "c"];
        let groups = group_by_puprn(items.iter(), |s| *s);
        let keys: Vec<&str> = groups.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(groups[0].1.len(), 2);
    }
}
