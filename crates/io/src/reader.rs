//! Energy summary table reading.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::csv_read::CsvSource;
use crate::energy::{self, EnergyRow, EnergyTable, Fuel, Layout, TableKind};
use crate::error::IoError;
use crate::validate::validate_energy_table;

/// Read a household energy summary table of the given kind.
///
/// Columns are located by name. The total column is optional: when it is
/// absent the total is derived as electricity plus gas, missing if either is
/// missing. Clock columns are never read; they follow from the half-hour
/// index.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `path` does not exist,
/// [`IoError::MissingColumn`] if a column the kind requires is absent,
/// [`IoError::InvalidValue`] for an unparseable cell, or
/// [`IoError::Validation`] if key columns are missing or out of range.
///
/// # Examples
///
/// ```ignore
/// use meterstat_io::{Granularity, Layout, TableKind, read_energy_table};
///
/// let kind = TableKind::new(Granularity::Daily, Layout::Monthly);
/// let table = read_energy_table(Path::new("monthly_2021.csv"), kind)?;
/// ```
pub fn read_energy_table(path: &Path, kind: TableKind) -> Result<EnergyTable, IoError> {
    let mut src = CsvSource::open(path)?;
    for name in kind.required_columns() {
        src.column(name)?;
    }

    let g = kind.granularity;
    let puprn = src.column(energy::PUPRN)?;
    let elec = src.column(Fuel::Electricity.column(g))?;
    let gas = src.column(Fuel::Gas.column(g))?;
    let total = src.optional_column(Fuel::Total.column(g));
    let day_type = src.optional_column(energy::DAY_TYPE);
    let month = src.optional_column(energy::MONTH);
    let half_hour = src.optional_column(energy::HALF_HOUR);
    let days = src.optional_column(energy::DAYS_IN_MONTH);
    let band = src.optional_column(energy::TEMP_BAND);
    let temp_elec = src.column(energy::TEMP_ELEC)?;
    let temp_gas = src.column(energy::TEMP_GAS)?;
    let temp_weighted = src.column(energy::TEMP_WEIGHTED)?;
    let hdd_elec = src.optional_column(energy::HDD_ELEC);
    let hdd_gas = src.optional_column(energy::HDD_GAS);
    let hdd_weighted = src.optional_column(energy::HDD_WEIGHTED);

    if total.is_none() {
        warn!(
            path = %src.path().display(),
            "no total column; deriving total as electricity plus gas"
        );
    }

    let uses_day_type = kind.layout != Layout::TemperatureBanded;
    let uses_month = kind.layout == Layout::Monthly;

    let mut rows = Vec::new();
    src.for_each(|row| {
        let e = row.f64(&elec)?;
        let g = row.f64(&gas)?;
        let t = match &total {
            Some(col) => row.f64(col)?,
            None => e.zip(g).map(|(e, g)| e + g),
        };
        rows.push(EnergyRow {
            puprn: row.required_text(&puprn)?.to_string(),
            elec: e,
            gas: g,
            total: t,
            day_type: match day_type.as_ref().filter(|_| uses_day_type) {
                Some(col) => row.day_type(col)?,
                None => None,
            },
            month: match month.as_ref().filter(|_| uses_month) {
                Some(col) => row.small(col)?,
                None => None,
            },
            half_hour: match half_hour.as_ref().filter(|_| kind.is_half_hourly()) {
                Some(col) => row.small(col)?,
                None => None,
            },
            days_in_month: row
                .int_opt(days.as_ref().filter(|_| uses_month))?
                .and_then(|d| u32::try_from(d).ok()),
            temp_band: row
                .text_opt(band.as_ref().filter(|_| !uses_day_type))
                .map(str::to_string),
            temp_elec: row.f64(&temp_elec)?,
            temp_gas: row.f64(&temp_gas)?,
            temp_weighted: row.f64(&temp_weighted)?,
            hdd_elec: row.f64_opt(hdd_elec.as_ref().filter(|_| kind.has_hdd()))?,
            hdd_gas: row.f64_opt(hdd_gas.as_ref().filter(|_| kind.has_hdd()))?,
            hdd_weighted: row.f64_opt(hdd_weighted.as_ref().filter(|_| kind.has_hdd()))?,
        });
        Ok(())
    })?;

    let table = EnergyTable::new(kind, rows);
    validate_energy_table(&table).finish()?;
    debug!(path = %path.display(), %kind, "energy table validated");

    info!(
        path = %path.display(),
        %kind,
        n_rows = table.len(),
        n_households = table.puprns().len(),
        "read energy table"
    );
    Ok(table)
}
