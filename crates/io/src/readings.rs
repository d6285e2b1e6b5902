//! Cleaned per-household meter readings.

use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::csv_read::CsvSource;
use crate::error::IoError;
use crate::validate::ValidationCollector;

/// One household-day of cleaned daily readings.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyReading {
    /// Pseudonymised property reference.
    pub puprn: String,
    /// Local calendar date.
    pub date: NaiveDate,
    /// Net electricity import, kWh.
    pub elec: Option<f64>,
    /// Gas, kWh.
    pub gas: Option<f64>,
    /// Daily mean outdoor temperature, °C.
    pub mean_temp: Option<f64>,
    /// Heating degree days.
    pub hdd: Option<f64>,
}

/// One household half-hour of cleaned readings.
#[derive(Debug, Clone, PartialEq)]
pub struct HalfHourReading {
    /// Pseudonymised property reference.
    pub puprn: String,
    /// Local calendar date.
    pub date: NaiveDate,
    /// Half-hour index 1..=48 counted from local midnight.
    pub half_hour: u8,
    /// Net electricity import, Wh.
    pub elec: Option<f64>,
    /// Gas, Wh.
    pub gas: Option<f64>,
    /// Outdoor temperature, °C.
    pub temp: Option<f64>,
}

/// Reads daily readings (`PUPRN`, `Read_date_effective_local`,
/// `Clean_elec_net_d_kWh`, `Clean_gas_d_kWh`, `mean_temp_C`, `hdd`).
///
/// `hdd` may be absent; it then reads as missing.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`], [`IoError::MissingColumn`] or
/// [`IoError::InvalidValue`] as for any table read.
pub fn read_daily_readings(path: &Path) -> Result<Vec<DailyReading>, IoError> {
    let mut src = CsvSource::open(path)?;
    let puprn = src.column("PUPRN")?;
    let date = src.column("Read_date_effective_local")?;
    let elec = src.column("Clean_elec_net_d_kWh")?;
    let gas = src.column("Clean_gas_d_kWh")?;
    let temp = src.column("mean_temp_C")?;
    let hdd = src.optional_column("hdd");

    let mut out = Vec::new();
    src.for_each(|row| {
        out.push(DailyReading {
            puprn: row.required_text(&puprn)?.to_string(),
            date: row.date(&date)?,
            elec: row.f64(&elec)?,
            gas: row.f64(&gas)?,
            mean_temp: row.f64(&temp)?,
            hdd: row.f64_opt(hdd.as_ref())?,
        });
        Ok(())
    })?;

    info!(path = %path.display(), n_rows = out.len(), "read daily readings");
    Ok(out)
}

/// Reads half-hourly readings (`PUPRN`, `Read_date_effective_local`,
/// `Readings_from_midnight_local`, `Clean_elec_net_Wh`, `Clean_gas_Wh`,
/// `temp_C`).
///
/// # Errors
///
/// As [`read_daily_readings`], plus [`IoError::Validation`] when a
/// half-hour index lies outside 1..=48.
pub fn read_half_hour_readings(path: &Path) -> Result<Vec<HalfHourReading>, IoError> {
    let mut src = CsvSource::open(path)?;
    let puprn = src.column("PUPRN")?;
    let date = src.column("Read_date_effective_local")?;
    let hh = src.column("Readings_from_midnight_local")?;
    let elec = src.column("Clean_elec_net_Wh")?;
    let gas = src.column("Clean_gas_Wh")?;
    let temp = src.column("temp_C")?;

    let mut out = Vec::new();
    let mut checks = ValidationCollector::new();
    src.for_each(|row| {
        let half_hour = row.small(&hh)?.unwrap_or(0);
        if !(1..=48).contains(&half_hour) {
            checks.push(format!("half-hour index {half_hour} out of range"));
        }
        out.push(HalfHourReading {
            puprn: row.required_text(&puprn)?.to_string(),
            date: row.date(&date)?,
            half_hour,
            elec: row.f64(&elec)?,
            gas: row.f64(&gas)?,
            temp: row.f64(&temp)?,
        });
        Ok(())
    })?;
    checks.finish()?;

    debug!(path = %path.display(), "half-hour indices validated");
    info!(path = %path.display(), n_rows = out.len(), "read half-hourly readings");
    Ok(out)
}
