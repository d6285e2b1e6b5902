//! The segmentation cascade for one year and resolution.
//!
//! ```text
//! 1. whole population          DayTypes::Each
//! 2. each segment value        DayTypes::Only(Both)
//! 3. each temperature band     DayTypes::Unsplit     (not monthly)
//! 4. weekday, weekend          DayTypes::Only(..)
//! 5. heating season            DayTypes::Each        (not monthly)
//! ```

use meterstat_calendar::{DayType, RollupPeriod};
use meterstat_context::Context;
use meterstat_io::{EnergyFile, EnergyRow, EnergyTable};
use tracing::{debug, info, info_span, warn};

use crate::aggregate::{DayTypes, PeriodAggregator};
use crate::config::{SdcConfig, SegmentationConfig};
use crate::error::SdcError;
use crate::record::{RecordSink, Resolution, Segment};

/// Subsample label of the main statistics.
pub const ALL_SUBSAMPLE: &str = "all";

/// Segmentation variable name of the temperature band passes.
pub const TEMPERATURE_BAND: &str = "temperature band";

/// Segmentation variable name of the weekday and weekend passes.
pub const WEEKDAY_WEEKEND: &str = "weekday_weekend";

/// Energy tables for one year and resolution.
///
/// `table` is the annual half-hourly table for diurnal runs, the monthly
/// daily table for monthly runs and the annual daily table for annual runs.
/// `heating_season` is the table for the season ending in `year`.
#[derive(Debug, Clone, Copy)]
pub struct EngineInput<'a> {
    pub year: i32,
    pub resolution: Resolution,
    pub table: Option<&'a EnergyTable>,
    pub banded: Option<&'a EnergyTable>,
    pub heating_season: Option<&'a EnergyTable>,
}

impl<'a> EngineInput<'a> {
    fn require(
        &self,
        table: Option<&'a EnergyTable>,
        file: EnergyFile,
    ) -> Result<&'a EnergyTable, SdcError> {
        table.ok_or_else(|| SdcError::MissingInputTable {
            table: file.describe(self.resolution.granularity()),
            year: self.year,
        })
    }
}

/// Drives [`PeriodAggregator`] over the whole population and every
/// configured segment.
#[derive(Debug, Clone)]
pub struct SegmentationEngine {
    segmentation: SegmentationConfig,
    sdc: SdcConfig,
}

impl SegmentationEngine {
    /// Creates an engine from validated configurations.
    ///
    /// # Errors
    ///
    /// Returns the first validation error of either configuration.
    pub fn new(segmentation: SegmentationConfig, sdc: SdcConfig) -> Result<Self, SdcError> {
        segmentation.validate()?;
        sdc.validate()?;
        Ok(Self { segmentation, sdc })
    }

    /// Returns the segmentation configuration.
    pub fn segmentation(&self) -> &SegmentationConfig {
        &self.segmentation
    }

    /// Returns the disclosure configuration.
    pub fn sdc(&self) -> &SdcConfig {
        &self.sdc
    }

    /// Appends every record for `input` to `sink` and returns how many
    /// were appended.
    ///
    /// Segment values come from `context` in first-appearance order;
    /// households with no value for a variable are left out of that
    /// variable's segments only.
    ///
    /// # Errors
    ///
    /// Returns [`SdcError::MissingInputTable`] when a pass needs a table
    /// that `input` lacks; nothing is appended in that case.
    pub fn run(
        &self,
        input: &EngineInput<'_>,
        context: &Context,
        sink: &mut RecordSink,
    ) -> Result<usize, SdcError> {
        let resolution = input.resolution;
        let _span = info_span!("segmentation", year = input.year, resolution = %resolution).entered();

        let main = input.require(input.table, main_file(resolution))?;
        let banded = if self.uses_bands(resolution) {
            Some(input.require(input.banded, EnergyFile::TemperatureBanded)?)
        } else {
            None
        };
        let heating = if self.uses_heating_season(resolution) {
            let table = input.require(input.heating_season, EnergyFile::HeatingSeason)?;
            let label = RollupPeriod::heating_season(input.year - 1)?.label().to_string();
            Some((label, table))
        } else {
            None
        };

        let aggregator = PeriodAggregator::new(&self.sdc);
        let time_period = input.year.to_string();
        let mut local = RecordSink::new();

        // 1. whole population
        let all_rows: Vec<&EnergyRow> = main.rows().iter().collect();
        aggregator.aggregate(
            &all_rows,
            resolution,
            ALL_SUBSAMPLE,
            &time_period,
            DayTypes::Each,
            None,
            &mut local,
        )?;

        // 2. segment variables
        for &variable in self.segmentation.variables() {
            let column = context.column(variable);
            if column.null_count() > 0 {
                debug!(
                    variable = variable.name(),
                    n_households = column.null_count(),
                    "households without a value left out of variable"
                );
            }
            for value in column.values() {
                let members = column.members(value);
                let rows: Vec<&EnergyRow> = main
                    .rows()
                    .iter()
                    .filter(|r| members.contains(r.puprn.as_str()))
                    .collect();
                let segment = Segment::new(variable.name(), value);
                aggregator.aggregate(
                    &rows,
                    resolution,
                    ALL_SUBSAMPLE,
                    &time_period,
                    DayTypes::Only(DayType::Both),
                    Some(&segment),
                    &mut local,
                )?;
            }
        }

        // 3. temperature bands
        if let Some(banded) = banded {
            for band in self.segmentation.bands() {
                let rows: Vec<&EnergyRow> = banded
                    .rows()
                    .iter()
                    .filter(|r| r.temp_band.as_deref() == Some(band.as_str()))
                    .collect();
                if rows.is_empty() {
                    warn!(band = %band, "no rows for temperature band");
                }
                let segment = Segment::new(TEMPERATURE_BAND, band.as_str());
                aggregator.aggregate(
                    &rows,
                    resolution,
                    ALL_SUBSAMPLE,
                    &time_period,
                    DayTypes::Unsplit,
                    Some(&segment),
                    &mut local,
                )?;
            }
        }

        // 4. weekday / weekend
        if self.segmentation.weekday_weekend() {
            for day_type in [DayType::Weekday, DayType::Weekend] {
                let segment = Segment::new(WEEKDAY_WEEKEND, day_type.as_str());
                aggregator.aggregate(
                    &all_rows,
                    resolution,
                    ALL_SUBSAMPLE,
                    &time_period,
                    DayTypes::Only(day_type),
                    Some(&segment),
                    &mut local,
                )?;
            }
        }

        // 5. heating season
        if let Some((label, table)) = heating {
            let rows: Vec<&EnergyRow> = table.rows().iter().collect();
            aggregator.aggregate(
                &rows,
                resolution,
                ALL_SUBSAMPLE,
                &label,
                DayTypes::Each,
                None,
                &mut local,
            )?;
        }

        let appended = local.len();
        sink.extend(local.into_records());
        info!(n_records = appended, "segmentation complete");
        Ok(appended)
    }

    fn uses_bands(&self, resolution: Resolution) -> bool {
        resolution != Resolution::Monthly && !self.segmentation.bands().is_empty()
    }

    fn uses_heating_season(&self, resolution: Resolution) -> bool {
        resolution != Resolution::Monthly && self.segmentation.heating_season()
    }
}

fn main_file(resolution: Resolution) -> EnergyFile {
    match resolution {
        Resolution::Monthly => EnergyFile::Monthly,
        Resolution::Diurnal | Resolution::Annual => EnergyFile::Annual,
    }
}

#[cfg(test)]
mod tests {
    use meterstat_context::{ContextTables, SegmentVariable};
    use meterstat_io::{Granularity, Layout, TableKind};

    use super::*;

    fn annual(rows: Vec<EnergyRow>) -> EnergyTable {
        EnergyTable::new(TableKind::new(Granularity::Daily, Layout::Period), rows)
    }

    fn no_extras() -> SegmentationConfig {
        SegmentationConfig::default()
            .with_variables(Vec::new())
            .with_bands(Vec::new())
            .with_heating_season(false)
    }

    #[test]
    fn missing_banded_table_is_fatal() {
        let engine = SegmentationEngine::new(
            SegmentationConfig::default().with_heating_season(false),
            SdcConfig::default(),
        )
        .unwrap();
        let table = annual(Vec::new());
        let input = EngineInput {
            year: 2021,
            resolution: Resolution::Annual,
            table: Some(&table),
            banded: None,
            heating_season: None,
        };
        let mut sink = RecordSink::new();
        let err = engine
            .run(&input, &Context::build(ContextTables::default()), &mut sink)
            .unwrap_err();
        match err {
            SdcError::MissingInputTable { table, year } => {
                assert_eq!(table, "temperature-banded daily");
                assert_eq!(year, 2021);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(sink.is_empty());
    }

    #[test]
    fn monthly_skips_bands_and_heating_season() {
        let engine = SegmentationEngine::new(
            SegmentationConfig::default().with_variables(vec![SegmentVariable::Region]),
            SdcConfig::default(),
        )
        .unwrap();
        let table = EnergyTable::new(TableKind::new(Granularity::Daily, Layout::Monthly), vec![]);
        let input = EngineInput {
            year: 2021,
            resolution: Resolution::Monthly,
            table: Some(&table),
            banded: None,
            heating_season: None,
        };
        let mut sink = RecordSink::new();
        let n = engine
            .run(&input, &Context::build(ContextTables::default()), &mut sink)
            .unwrap();
        // whole population (3 day types) plus weekday and weekend, no region values
        assert_eq!(n, (3 + 2) * 12 * 15);
    }

    #[test]
    fn heating_season_label_spans_two_years() {
        let engine = SegmentationEngine::new(
            no_extras().with_heating_season(true).with_weekday_weekend(false),
            SdcConfig::default(),
        )
        .unwrap();
        let table = annual(Vec::new());
        let season = annual(Vec::new());
        let input = EngineInput {
            year: 2021,
            resolution: Resolution::Annual,
            table: Some(&table),
            banded: None,
            heating_season: Some(&season),
        };
        let mut sink = RecordSink::new();
        let n = engine
            .run(&input, &Context::build(ContextTables::default()), &mut sink)
            .unwrap();
        assert_eq!(n, 2 * 45);
        let last = sink.records().last().unwrap();
        assert_eq!(last.time_period, "2020_2021");
        assert_eq!(last.summary_time, "2020_2021");
    }
}
