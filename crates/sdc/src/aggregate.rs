//! Statistics for every sub-period and day type of one set of rows.

use meterstat_calendar::{DayType, HALF_HOURS_PER_DAY, half_hour_label, month_label};
use meterstat_io::{EnergyRow, Fuel};
use tracing::{debug, warn};

use crate::config::SdcConfig;
use crate::error::SdcError;
use crate::fuel::{SliceLabels, fuel_stats};
use crate::record::{RecordSink, Resolution, Segment};

/// Which day types to publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayTypes {
    /// Both, weekday and weekend, in that order.
    Each,
    /// A single day type.
    Only(DayType),
    /// Rows carry no day type; records get none either.
    Unsplit,
}

impl DayTypes {
    fn selections(self) -> Vec<Option<DayType>> {
        match self {
            DayTypes::Each => DayType::ALL.into_iter().map(Some).collect(),
            DayTypes::Only(d) => vec![Some(d)],
            DayTypes::Unsplit => vec![None],
        }
    }
}

/// A sub-period: the key rows are matched on and its `summary_time` label.
struct Period {
    key: Option<u8>,
    label: String,
}

fn periods(resolution: Resolution, time_period: &str) -> Result<Vec<Period>, SdcError> {
    match resolution {
        Resolution::Diurnal => (1..=HALF_HOURS_PER_DAY)
            .map(|hh| -> Result<Period, SdcError> {
                Ok(Period {
                    key: Some(hh),
                    label: half_hour_label(hh)?,
                })
            })
            .collect(),
        Resolution::Monthly => {
            let year: i32 = time_period.parse().map_err(|_| SdcError::InvalidTimePeriod {
                value: time_period.to_string(),
            })?;
            (1..=12)
                .map(|m| -> Result<Period, SdcError> {
                    Ok(Period {
                        key: Some(m),
                        label: month_label(year, m)?,
                    })
                })
                .collect()
        }
        Resolution::Annual => Ok(vec![Period {
            key: None,
            label: time_period.to_string(),
        }]),
    }
}

fn period_key(row: &EnergyRow, resolution: Resolution) -> Option<u8> {
    match resolution {
        Resolution::Diurnal => row.half_hour,
        Resolution::Monthly => row.month,
        Resolution::Annual => None,
    }
}

/// Rows whose period key matches no sub-period of the grid.
fn outside_grid(rows: &[&EnergyRow], periods: &[Period], resolution: Resolution) -> usize {
    rows.iter()
        .filter(|row| {
            let key = period_key(row, resolution);
            !periods.iter().any(|p| p.key == key)
        })
        .count()
}

/// Runs [`fuel_stats`] over every sub-period, day type and fuel.
///
/// The full grid is always emitted: 48 half-hours, 12 months or one
/// annual period, times the selected day types, times electricity, gas and
/// total, times five statistics. Slices with no rows produce null records.
#[derive(Debug, Clone, Copy)]
pub struct PeriodAggregator<'a> {
    config: &'a SdcConfig,
}

impl<'a> PeriodAggregator<'a> {
    /// Creates an aggregator applying `config`.
    pub fn new(config: &'a SdcConfig) -> Self {
        Self { config }
    }

    /// Appends the records for `rows` to `sink` and returns how many were
    /// appended.
    ///
    /// Records are ordered by day type, then sub-period, then fuel. Monthly
    /// labels (`Jan-21`) take their year from `time_period`; annual records
    /// use `time_period` itself as the summary time. Rows whose half-hour or
    /// month is missing or off the grid are excluded with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`SdcError::InvalidTimePeriod`] when a monthly run's
    /// `time_period` is not a year, or a statistics error from the
    /// quantile estimator.
    #[allow(clippy::too_many_arguments)]
    pub fn aggregate(
        &self,
        rows: &[&EnergyRow],
        resolution: Resolution,
        subsample: &str,
        time_period: &str,
        day_types: DayTypes,
        segment: Option<&Segment>,
        sink: &mut RecordSink,
    ) -> Result<usize, SdcError> {
        let periods = periods(resolution, time_period)?;
        let before = sink.len();
        let n_outside = outside_grid(rows, &periods, resolution);
        if n_outside > 0 {
            warn!(
                resolution = %resolution,
                time_period,
                n_outside,
                "rows outside the period grid excluded"
            );
        }

        for day_type in day_types.selections() {
            let mut buckets: Vec<Vec<&EnergyRow>> = vec![Vec::new(); periods.len()];
            for &row in rows {
                if day_type.is_some() && row.day_type != day_type {
                    continue;
                }
                let key = period_key(row, resolution);
                if let Some(i) = periods.iter().position(|p| p.key == key) {
                    buckets[i].push(row);
                }
            }

            for (period, bucket) in periods.iter().zip(&buckets) {
                let labels = SliceLabels {
                    subsample,
                    summary_time: &period.label,
                    time_period,
                    segment,
                    day_type,
                };
                for fuel in Fuel::ALL {
                    sink.extend(fuel_stats(bucket, fuel, resolution, &labels, self.config)?);
                }
            }
        }

        let appended = sink.len() - before;
        debug!(
            resolution = %resolution,
            time_period,
            segment = segment.map(|s| s.value.as_str()).unwrap_or("none"),
            n_rows = rows.len(),
            n_records = appended,
            "aggregated slice"
        );
        Ok(appended)
    }
}
