//! Integration test: energy table reading.

use std::io::Write;
use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use meterstat_calendar::DayType;
use meterstat_io::{Granularity, IoError, Layout, TableKind, read_energy_table};

fn write_file(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    let mut f = std::fs::File::create(&path).expect("create file");
    f.write_all(body.as_bytes()).expect("write file");
    path
}

const MONTHLY_DAILY: &str = "\
PUPRN,Clean_elec_net_kWh_d_mean,Clean_gas_kWh_d_mean,weekday_weekend,month_local_time,days_in_month,temp_elec_C,temp_gas_C,temp_weighted_C,hdd_elec,hdd_gas,hdd_weighted_C,Clean_total_kWh_d_mean
P1,8.5,30.25,both,1,31,4.1,4.2,4.15,11.0,11.5,11.25,38.75
P1,,31,weekday,1,21,NA,4.0,,,,,
P2,7.0,nan,weekend,2.0,8,5,5,5,10,10,10,
";

#[test]
fn read_daily_monthly_table() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = write_file(dir.path(), "monthly.csv", MONTHLY_DAILY);
    let kind = TableKind::new(Granularity::Daily, Layout::Monthly);

    let table = read_energy_table(&path, kind).expect("read succeeds");
    assert_eq!(table.len(), 3);
    assert_eq!(table.puprns().len(), 2);

    let r0 = &table.rows()[0];
    assert_eq!(r0.puprn, "P1");
    assert_eq!(r0.day_type, Some(DayType::Both));
    assert_eq!(r0.month, Some(1));
    assert_eq!(r0.days_in_month, Some(31));
    assert_relative_eq!(r0.total.unwrap(), 38.75);
    assert_relative_eq!(r0.hdd_weighted.unwrap(), 11.25);
    assert_eq!(r0.half_hour, None);

    let r1 = &table.rows()[1];
    assert_eq!(r1.elec, None);
    assert_eq!(r1.temp_elec, None);
    assert_eq!(r1.total, None);

    let r2 = &table.rows()[2];
    assert_eq!(r2.month, Some(2));
    assert_eq!(r2.gas, None);
}

#[test]
fn total_is_derived_when_column_is_absent() {
    let body = "\
PUPRN,Clean_elec_net_Wh_hh_mean,Clean_gas_Wh_hh_mean,weekday_weekend,Hh_local_time,temp_elec_C,temp_gas_C,temp_weighted_C
P1,100,250,both,1,3,3,3
P1,120,,weekday,48,3,,3
";
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = write_file(dir.path(), "annual_hh.csv", body);
    let kind = TableKind::new(Granularity::HalfHourly, Layout::Period);

    let table = read_energy_table(&path, kind).expect("read succeeds");
    assert_eq!(table.rows()[0].total, Some(350.0));
    assert_eq!(table.rows()[1].total, None);
    assert_eq!(table.rows()[1].half_hour, Some(48));
    assert_eq!(table.rows()[1].clock(), Some((0, 0)));
}

#[test]
fn banded_table_reads_band_labels() {
    let body = "\
PUPRN,Clean_elec_net_kWh_d_mean,Clean_gas_kWh_d_mean,temp_band,temp_elec_C,temp_gas_C,temp_weighted_C,hdd_elec,hdd_gas,hdd_weighted_C,Clean_total_kWh_d_mean
P1,9,40,0_to_5,2.5,2.5,2.5,13,13,13,49
P1,8,20,4.5_to_5.5,5,5,5,10,10,10,28
";
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = write_file(dir.path(), "banded.csv", body);
    let kind = TableKind::new(Granularity::Daily, Layout::TemperatureBanded);

    let table = read_energy_table(&path, kind).expect("read succeeds");
    assert_eq!(table.rows()[1].temp_band.as_deref(), Some("4.5_to_5.5"));
    assert_eq!(table.rows()[0].day_type, None);
}

#[test]
fn missing_file_is_file_not_found() {
    let kind = TableKind::new(Granularity::Daily, Layout::Period);
    let err = read_energy_table(Path::new("/tmp/meterstat_no_such_table.csv"), kind).unwrap_err();
    assert!(matches!(err, IoError::FileNotFound { .. }), "got {err:?}");
}

#[test]
fn missing_column_is_reported_by_name() {
    let body = "PUPRN,Clean_elec_net_kWh_d_mean,weekday_weekend\nP1,1,both\n";
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = write_file(dir.path(), "broken.csv", body);
    let kind = TableKind::new(Granularity::Daily, Layout::Period);

    match read_energy_table(&path, kind).unwrap_err() {
        IoError::MissingColumn { column, .. } => assert_eq!(column, "Clean_gas_kWh_d_mean"),
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn unparseable_cell_reports_line_and_column() {
    let body = "\
PUPRN,Clean_elec_net_kWh_d_mean,Clean_gas_kWh_d_mean,weekday_weekend,temp_elec_C,temp_gas_C,temp_weighted_C,hdd_elec,hdd_gas,hdd_weighted_C
P1,lots,1,both,1,1,1,1,1,1
";
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = write_file(dir.path(), "bad.csv", body);
    let kind = TableKind::new(Granularity::Daily, Layout::Period);

    match read_energy_table(&path, kind).unwrap_err() {
        IoError::InvalidValue { line, column, value, .. } => {
            assert_eq!(line, 2);
            assert_eq!(column, "Clean_elec_net_kWh_d_mean");
            assert_eq!(value, "lots");
        }
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}

#[test]
fn out_of_range_month_fails_validation() {
    let body = MONTHLY_DAILY.replace("weekend,2.0,8", "weekend,13,8");
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = write_file(dir.path(), "monthly.csv", &body);
    let kind = TableKind::new(Granularity::Daily, Layout::Monthly);

    let err = read_energy_table(&path, kind).unwrap_err();
    assert!(matches!(err, IoError::Validation { count: 1, .. }), "got {err:?}");
}
