//! In-memory energy summary tables.
//!
//! An [`EnergyTable`] holds one row per household and slice of the year.
//! Its [`TableKind`] fixes which key columns are meaningful and which column
//! names the table carries on disk.

use std::collections::BTreeSet;
use std::fmt;

use meterstat_calendar::{DayType, half_hour_clock};

// ---------------------------------------------------------------------------
// Fuel
// ---------------------------------------------------------------------------

/// The three published consumption measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Fuel {
    /// Net electricity import.
    Electricity,
    /// Gas.
    Gas,
    /// Electricity plus gas, or electricity alone for homes without gas.
    Total,
}

impl Fuel {
    /// All fuels in publication order.
    pub const ALL: [Fuel; 3] = [Fuel::Electricity, Fuel::Gas, Fuel::Total];

    /// Label used in the `fuel` column of statistics tables.
    pub fn label(self) -> &'static str {
        match self {
            Fuel::Electricity => "Electricity",
            Fuel::Gas => "Gas",
            Fuel::Total => "Total",
        }
    }

    /// Column holding this fuel's mean consumption at `granularity`.
    pub fn column(self, granularity: Granularity) -> &'static str {
        use Granularity::{Daily, HalfHourly};
        match (self, granularity) {
            (Fuel::Electricity, Daily) => ELEC_DAILY,
            (Fuel::Gas, Daily) => GAS_DAILY,
            (Fuel::Total, Daily) => TOTAL_DAILY,
            (Fuel::Electricity, HalfHourly) => ELEC_HH,
            (Fuel::Gas, HalfHourly) => GAS_HH,
            (Fuel::Total, HalfHourly) => TOTAL_HH,
        }
    }
}

impl fmt::Display for Fuel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub(crate) const PUPRN: &str = "PUPRN";
pub(crate) const ELEC_DAILY: &str = "Clean_elec_net_kWh_d_mean";
pub(crate) const GAS_DAILY: &str = "Clean_gas_kWh_d_mean";
pub(crate) const TOTAL_DAILY: &str = "Clean_total_kWh_d_mean";
pub(crate) const ELEC_HH: &str = "Clean_elec_net_Wh_hh_mean";
pub(crate) const GAS_HH: &str = "Clean_gas_Wh_hh_mean";
pub(crate) const TOTAL_HH: &str = "Clean_total_Wh_hh_mean";
pub(crate) const DAY_TYPE: &str = "weekday_weekend";
pub(crate) const MONTH: &str = "month_local_time";
pub(crate) const HALF_HOUR: &str = "Hh_local_time";
pub(crate) const DAYS_IN_MONTH: &str = "days_in_month";
pub(crate) const TEMP_BAND: &str = "temp_band";
pub(crate) const TEMP_ELEC: &str = "temp_elec_C";
pub(crate) const TEMP_GAS: &str = "temp_gas_C";
pub(crate) const TEMP_WEIGHTED: &str = "temp_weighted_C";
pub(crate) const HDD_ELEC: &str = "hdd_elec";
pub(crate) const HDD_GAS: &str = "hdd_gas";
pub(crate) const HDD_WEIGHTED: &str = "hdd_weighted_C";
pub(crate) const HOUR: &str = "hour_local_time";
pub(crate) const MINUTE: &str = "minute_local_time";

// ---------------------------------------------------------------------------
// TableKind
// ---------------------------------------------------------------------------

/// Time resolution of a table's consumption values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// Mean kWh per day.
    Daily,
    /// Mean Wh per half-hour, one row per half-hour of the day.
    HalfHourly,
}

/// How a table slices the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// One row per calendar month and day type.
    Monthly,
    /// One row per day type over a whole rollup period.
    Period,
    /// One row per outdoor temperature band.
    TemperatureBanded,
}

/// Granularity and layout together determine a table's columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableKind {
    /// Time resolution.
    pub granularity: Granularity,
    /// Slicing of the year.
    pub layout: Layout,
}

impl TableKind {
    /// Creates a table kind.
    pub const fn new(granularity: Granularity, layout: Layout) -> Self {
        Self {
            granularity,
            layout,
        }
    }

    /// Whether rows carry a half-hour index.
    pub fn is_half_hourly(self) -> bool {
        self.granularity == Granularity::HalfHourly
    }

    /// Whether heating-degree-day columns are carried. Half-hourly tables
    /// have none.
    pub fn has_hdd(self) -> bool {
        self.granularity == Granularity::Daily
    }

    /// Column names in on-disk order.
    pub fn columns(self) -> Vec<&'static str> {
        let g = self.granularity;
        let mut cols = vec![PUPRN, Fuel::Electricity.column(g), Fuel::Gas.column(g)];
        match self.layout {
            Layout::Monthly => cols.extend([DAY_TYPE, MONTH]),
            Layout::Period => cols.push(DAY_TYPE),
            Layout::TemperatureBanded => cols.push(TEMP_BAND),
        }
        if self.is_half_hourly() {
            cols.push(HALF_HOUR);
        }
        if self.layout == Layout::Monthly {
            cols.push(DAYS_IN_MONTH);
        }
        cols.extend([TEMP_ELEC, TEMP_GAS, TEMP_WEIGHTED]);
        if self.has_hdd() {
            cols.extend([HDD_ELEC, HDD_GAS, HDD_WEIGHTED]);
        }
        if self.is_half_hourly() {
            cols.extend([HOUR, MINUTE]);
        }
        cols.push(Fuel::Total.column(g));
        cols
    }

    /// Columns a reader insists on. Clock columns are derived from the
    /// half-hour index and the total is derived when absent.
    pub(crate) fn required_columns(self) -> Vec<&'static str> {
        let total = Fuel::Total.column(self.granularity);
        self.columns()
            .into_iter()
            .filter(|c| !matches!(*c, HOUR | MINUTE) && *c != total)
            .collect()
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = match self.granularity {
            Granularity::Daily => "daily",
            Granularity::HalfHourly => "half-hourly",
        };
        let l = match self.layout {
            Layout::Monthly => "monthly",
            Layout::Period => "period",
            Layout::TemperatureBanded => "temperature-banded",
        };
        write!(f, "{g} {l}")
    }
}

// ---------------------------------------------------------------------------
// EnergyRow / EnergyTable
// ---------------------------------------------------------------------------

/// One household's mean consumption over one slice of the year.
///
/// Key fields that the table's [`TableKind`] does not use are `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnergyRow {
    /// Pseudonymised property reference.
    pub puprn: String,
    /// Mean net electricity.
    pub elec: Option<f64>,
    /// Mean gas.
    pub gas: Option<f64>,
    /// Mean total.
    pub total: Option<f64>,
    /// Day type, for monthly and period layouts.
    pub day_type: Option<DayType>,
    /// Month 1..=12, for the monthly layout.
    pub month: Option<u8>,
    /// Half-hour index 1..=48, for half-hourly tables.
    pub half_hour: Option<u8>,
    /// Days of `day_type` in the month, for the monthly layout.
    pub days_in_month: Option<u32>,
    /// Temperature band label such as `5_to_10`, for the banded layout.
    pub temp_band: Option<String>,
    /// Mean outdoor temperature on days with valid electricity.
    pub temp_elec: Option<f64>,
    /// Mean outdoor temperature on days with valid gas.
    pub temp_gas: Option<f64>,
    /// Reading-weighted mean of the two temperatures.
    pub temp_weighted: Option<f64>,
    /// Mean heating degree days on days with valid electricity.
    pub hdd_elec: Option<f64>,
    /// Mean heating degree days on days with valid gas.
    pub hdd_gas: Option<f64>,
    /// Reading-weighted mean of the two HDD figures.
    pub hdd_weighted: Option<f64>,
}

impl EnergyRow {
    /// Creates an empty row for `puprn`.
    pub fn new(puprn: impl Into<String>) -> Self {
        Self {
            puprn: puprn.into(),
            ..Self::default()
        }
    }

    /// Consumption value for `fuel`.
    pub fn fuel(&self, fuel: Fuel) -> Option<f64> {
        match fuel {
            Fuel::Electricity => self.elec,
            Fuel::Gas => self.gas,
            Fuel::Total => self.total,
        }
    }

    /// Mean temperature paired with `fuel`.
    pub fn temp_for(&self, fuel: Fuel) -> Option<f64> {
        match fuel {
            Fuel::Electricity => self.temp_elec,
            Fuel::Gas => self.temp_gas,
            Fuel::Total => self.temp_weighted,
        }
    }

    /// Mean heating degree days paired with `fuel`.
    pub fn hdd_for(&self, fuel: Fuel) -> Option<f64> {
        match fuel {
            Fuel::Electricity => self.hdd_elec,
            Fuel::Gas => self.hdd_gas,
            Fuel::Total => self.hdd_weighted,
        }
    }

    /// `(hour, minute)` of the half-hour's end, if the row has one.
    pub fn clock(&self) -> Option<(u8, u8)> {
        self.half_hour.and_then(|hh| half_hour_clock(hh).ok())
    }
}

/// A table of [`EnergyRow`]s sharing one [`TableKind`].
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyTable {
    kind: TableKind,
    rows: Vec<EnergyRow>,
}

impl EnergyTable {
    /// Creates a table from rows.
    pub fn new(kind: TableKind, rows: Vec<EnergyRow>) -> Self {
        Self { kind, rows }
    }

    /// Returns the table kind.
    pub fn kind(&self) -> TableKind {
        self.kind
    }

    /// Returns the rows.
    pub fn rows(&self) -> &[EnergyRow] {
        &self.rows
    }

    /// Returns the rows mutably.
    pub fn rows_mut(&mut self) -> &mut [EnergyRow] {
        &mut self.rows
    }

    /// Consumes the table, returning its rows.
    pub fn into_rows(self) -> Vec<EnergyRow> {
        self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct households in the table.
    pub fn puprns(&self) -> BTreeSet<&str> {
        self.rows.iter().map(|r| r.puprn.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_monthly_columns() {
        let kind = TableKind::new(Granularity::Daily, Layout::Monthly);
        assert_eq!(
            kind.columns(),
            vec![
                "PUPRN",
                "Clean_elec_net_kWh_d_mean",
                "Clean_gas_kWh_d_mean",
                "weekday_weekend",
                "month_local_time",
                "days_in_month",
                "temp_elec_C",
                "temp_gas_C",
                "temp_weighted_C",
                "hdd_elec",
                "hdd_gas",
                "hdd_weighted_C",
                "Clean_total_kWh_d_mean",
            ]
        );
    }

    #[test]
    fn half_hourly_banded_columns() {
        let kind = TableKind::new(Granularity::HalfHourly, Layout::TemperatureBanded);
        let cols = kind.columns();
        assert!(cols.contains(&"temp_band"));
        assert!(cols.contains(&"Hh_local_time"));
        assert!(cols.contains(&"hour_local_time"));
        assert!(!cols.contains(&"hdd_gas"));
        assert!(!cols.contains(&"weekday_weekend"));
        assert_eq!(cols.last(), Some(&"Clean_total_Wh_hh_mean"));
    }

    #[test]
    fn required_columns_skip_derived() {
        let kind = TableKind::new(Granularity::HalfHourly, Layout::Period);
        let req = kind.required_columns();
        assert!(!req.contains(&"hour_local_time"));
        assert!(!req.contains(&"Clean_total_Wh_hh_mean"));
        assert!(req.contains(&"Hh_local_time"));
    }

    #[test]
    fn row_accessors_by_fuel() {
        let row = EnergyRow {
            elec: Some(1.0),
            gas: Some(2.0),
            total: Some(3.0),
            temp_elec: Some(4.0),
            temp_weighted: Some(5.0),
            hdd_gas: Some(6.0),
            half_hour: Some(3),
            ..EnergyRow::new("P1")
        };
        assert_eq!(row.fuel(Fuel::Gas), Some(2.0));
        assert_eq!(row.fuel(Fuel::Total), Some(3.0));
        assert_eq!(row.temp_for(Fuel::Electricity), Some(4.0));
        assert_eq!(row.temp_for(Fuel::Total), Some(5.0));
        assert_eq!(row.hdd_for(Fuel::Gas), Some(6.0));
        assert_eq!(row.clock(), Some((1, 30)));
    }

    #[test]
    fn table_puprns_are_distinct() {
        let table = EnergyTable::new(
            TableKind::new(Granularity::Daily, Layout::Period),
            vec![EnergyRow::new("B"), EnergyRow::new("A"), EnergyRow::new("B")],
        );
        assert_eq!(table.puprns().into_iter().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn fuel_labels() {
        assert_eq!(Fuel::Electricity.to_string(), "Electricity");
        assert_eq!(Fuel::Total.column(Granularity::HalfHourly), "Clean_total_Wh_hh_mean");
    }
}
