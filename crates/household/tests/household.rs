//! Integration test: readings to monthly profiles to annual rollup, with the
//! no-gas correction.

use std::collections::BTreeSet;

use approx::assert_relative_eq;
use chrono::{Datelike, NaiveDate};
use meterstat_calendar::{DayType, RollupPeriod};
use meterstat_household::{
    ProfileConfig, TemperatureBand, apply_no_gas_total, banded_daily_profiles,
    banded_hh_profiles, monthly_daily_profiles, monthly_hh_profiles, rollup,
};
use meterstat_io::{DailyReading, EnergyRow, HalfHourReading, Layout};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// P1: every day of 2021, electricity equal to the month number, no gas,
/// 4 °C in January and 12 °C after.
/// P2: January only, electricity on the first 16 days, gas every day.
fn readings() -> Vec<DailyReading> {
    let mut out = Vec::new();
    let mut d = date(2021, 1, 1);
    while d.year() == 2021 {
        let temp = if d.month() == 1 { 4.0 } else { 12.0 };
        out.push(DailyReading {
            puprn: "P1".to_string(),
            date: d,
            elec: Some(f64::from(d.month())),
            gas: None,
            mean_temp: Some(temp),
            hdd: Some(15.5 - temp),
        });
        d = d.succ_opt().unwrap();
    }
    for day in 1..=31 {
        out.push(DailyReading {
            puprn: "P2".to_string(),
            date: date(2021, 1, day),
            elec: (day <= 16).then_some(2.0),
            gas: Some(3.0),
            mean_temp: Some(4.0),
            hdd: Some(11.5),
        });
    }
    // a reading from another year is ignored
    out.push(DailyReading {
        puprn: "P3".to_string(),
        date: date(2020, 12, 31),
        elec: Some(1.0),
        gas: Some(1.0),
        mean_temp: Some(1.0),
        hdd: None,
    });
    out
}

fn find<'a>(rows: &'a [EnergyRow], puprn: &str, month: u8, dt: DayType) -> &'a EnergyRow {
    rows.iter()
        .find(|r| r.puprn == puprn && r.month == Some(month) && r.day_type == Some(dt))
        .expect("row present")
}

#[test]
fn monthly_profile_shape_and_values() {
    let table = monthly_daily_profiles(&readings(), 2021, &ProfileConfig::default()).unwrap();
    assert_eq!(table.kind().layout, Layout::Monthly);
    // 2 households x 12 months x 3 day types
    assert_eq!(table.len(), 72);
    assert_eq!(table.puprns().len(), 2);

    let rows = table.rows();
    let jan = find(rows, "P1", 1, DayType::Both);
    assert_eq!(jan.elec, Some(1.0));
    assert_eq!(jan.gas, None);
    assert_eq!(jan.total, None);
    assert_eq!(jan.days_in_month, Some(31));
    assert_relative_eq!(jan.temp_elec.unwrap(), 4.0);
    assert_relative_eq!(jan.hdd_elec.unwrap(), 11.5);
    assert_eq!(jan.temp_weighted, None);

    let feb_weekend = find(rows, "P1", 2, DayType::Weekend);
    assert_eq!(feb_weekend.days_in_month, Some(8));
    assert_eq!(feb_weekend.elec, Some(2.0));

    // 16 of 31 days present clears the 50% threshold
    let p2 = find(rows, "P2", 1, DayType::Both);
    assert_eq!(p2.elec, Some(2.0));
    assert_eq!(p2.total, Some(5.0));
    assert_relative_eq!(p2.temp_weighted.unwrap(), 4.0);

    let p2_feb = find(rows, "P2", 2, DayType::Both);
    assert_eq!(p2_feb.elec, None);
    assert_eq!(p2_feb.days_in_month, Some(28));
}

#[test]
fn stricter_threshold_withholds_sparse_month() {
    let config = ProfileConfig::new().with_missing_threshold(0.6);
    let table = monthly_daily_profiles(&readings(), 2021, &config).unwrap();
    let p2 = find(table.rows(), "P2", 1, DayType::Both);
    assert_eq!(p2.elec, None);
    assert_eq!(p2.gas, Some(3.0));
}

#[test]
fn annual_rollup_and_no_gas_total() {
    let monthly = monthly_daily_profiles(&readings(), 2021, &ProfileConfig::default()).unwrap();
    let period = RollupPeriod::annual(2021).unwrap();
    let mut annual = rollup(&[(2021, &monthly)], &period).unwrap();
    assert_eq!(annual.kind().layout, Layout::Period);
    assert_eq!(annual.len(), 6);

    let expected: f64 = (1..=12u32)
        .map(|m| {
            let next = if m == 12 { date(2022, 1, 1) } else { date(2021, m + 1, 1) };
            let days = (next - date(2021, m, 1)).num_days() as f64;
            f64::from(m) * days
        })
        .sum::<f64>()
        / 365.0;
    let both = |t: &meterstat_io::EnergyTable, p: &str| {
        t.rows()
            .iter()
            .find(|r| r.puprn == p && r.day_type == Some(DayType::Both))
            .cloned()
            .expect("row present")
    };
    let p1 = both(&annual, "P1");
    assert_relative_eq!(p1.elec.unwrap(), expected, epsilon = 1e-9);
    assert_eq!(p1.total, None);

    // P2 has no data after January
    assert_eq!(both(&annual, "P2").elec, None);

    let no_gas = BTreeSet::from(["P1".to_string()]);
    assert_eq!(apply_no_gas_total(&mut annual, &no_gas), 3);
    for row in annual.rows().iter().filter(|r| r.puprn == "P1") {
        assert_eq!(row.total, row.elec);
        assert!(row.elec.is_some());
    }
}

#[test]
fn banded_daily_uses_day_temperature() {
    let table = banded_daily_profiles(&readings(), 2021, &ProfileConfig::default()).unwrap();
    assert_eq!(table.kind().layout, Layout::TemperatureBanded);
    assert_eq!(table.len(), 10);

    let band = |p: &str, label: &str| {
        table
            .rows()
            .iter()
            .find(|r| r.puprn == p && r.temp_band.as_deref() == Some(label))
            .expect("row present")
    };
    assert_eq!(band("P1", "0_to_5").elec, Some(1.0));
    assert_eq!(band("P1", "5_to_10").elec, None);
    let warm = band("P1", "10_to_15");
    assert!(warm.elec.unwrap() > 2.0 && warm.elec.unwrap() < 12.0);
    assert_eq!(warm.day_type, None);
}

#[test]
fn half_hourly_profiles() {
    let mut readings = Vec::new();
    // Friday 2021-01-01 averages 3 °C, Saturday 2021-01-02 averages 7 °C
    for (day, temp, elec) in [(1, 3.0, 100.0), (2, 7.0, 300.0)] {
        for hh in 1..=48u8 {
            readings.push(HalfHourReading {
                puprn: "H1".to_string(),
                date: date(2021, 1, day),
                half_hour: hh,
                elec: Some(elec + f64::from(hh)),
                gas: None,
                temp: Some(temp),
            });
        }
    }

    let config = ProfileConfig::new().with_bands(vec![
        TemperatureBand::new(0.0, 5.0).unwrap(),
        TemperatureBand::new(5.0, 10.0).unwrap(),
    ]);

    let banded = banded_hh_profiles(&readings, 2021, &config).unwrap();
    assert_eq!(banded.len(), 2 * 48);
    let cold_first = &banded.rows()[0];
    assert_eq!(cold_first.temp_band.as_deref(), Some("0_to_5"));
    assert_eq!(cold_first.half_hour, Some(1));
    assert_eq!(cold_first.elec, Some(101.0));
    assert_eq!(cold_first.temp_elec, Some(3.0));
    assert_eq!(banded.rows()[48 + 47].elec, Some(348.0));

    let monthly = monthly_hh_profiles(&readings, 2021, &config).unwrap();
    assert_eq!(monthly.len(), 12 * 3 * 48);
    let row = |dt: DayType, hh: u8| {
        monthly
            .rows()
            .iter()
            .find(|r| r.month == Some(1) && r.day_type == Some(dt) && r.half_hour == Some(hh))
            .expect("row present")
    };
    assert_eq!(row(DayType::Both, 2).elec, Some(202.0));
    assert_eq!(row(DayType::Weekday, 2).elec, Some(102.0));
    assert_eq!(row(DayType::Weekend, 2).elec, Some(302.0));
    assert_eq!(row(DayType::Both, 2).hdd_elec, None);
    assert_eq!(row(DayType::Weekday, 2).days_in_month, Some(21));
}
