//! The five published statistics for one fuel over one slice of rows.

use meterstat_calendar::DayType;
use meterstat_io::{EnergyRow, Fuel};
use meterstat_stats::{mean, present, round_dp, sd};

use crate::config::SdcConfig;
use crate::error::SdcError;
use crate::record::{Resolution, Segment, StatRecord, SummaryStat};

/// Labels stamped on every record of a slice.
#[derive(Debug, Clone, Copy)]
pub struct SliceLabels<'a> {
    pub subsample: &'a str,
    pub summary_time: &'a str,
    pub time_period: &'a str,
    pub segment: Option<&'a Segment>,
    /// `None` for tables without a day type.
    pub day_type: Option<DayType>,
}

/// Computes mean, standard deviation, median, 75th and 25th percentile of
/// `fuel` over `rows`, in that order.
///
/// Means and standard deviations are rounded to the configured precision
/// and counted over the present values. Quantiles go through the
/// nearest-neighbour estimator and are withheld, with no count or
/// precision, when the sample is too small. `mean_temp` averages the
/// fuel's matched temperature column; `mean_hdd` its matched HDD column,
/// except at diurnal resolution where there is none.
///
/// # Errors
///
/// Returns [`SdcError::Stats`] if the quantile estimator rejects its input.
pub fn fuel_stats(
    rows: &[&EnergyRow],
    fuel: Fuel,
    resolution: Resolution,
    labels: &SliceLabels<'_>,
    config: &SdcConfig,
) -> Result<Vec<StatRecord>, SdcError> {
    let dp = config.decimals();
    let sample: Vec<Option<f64>> = rows.iter().map(|r| r.fuel(fuel)).collect();
    let values = present(&sample);
    let n = values.len();

    let aux = |pick: &dyn Fn(&EnergyRow) -> Option<f64>| {
        let v: Vec<Option<f64>> = rows.iter().map(|r| pick(r)).collect();
        mean(&present(&v)).map(|m| round_dp(m, dp))
    };
    let mean_temp = aux(&|r: &EnergyRow| r.temp_for(fuel));
    let mean_hdd = if resolution.has_hdd() {
        aux(&|r: &EnergyRow| r.hdd_for(fuel))
    } else {
        None
    };

    let floored = config.floor_moments() && n <= config.quantile().min_count();
    let mut out = Vec::with_capacity(SummaryStat::ALL.len());
    for stat in SummaryStat::ALL {
        let (value, n_statistic, decimal_places) = match stat.quantile() {
            None => {
                let raw = match stat {
                    SummaryStat::Mean => mean(&values),
                    _ => sd(&values),
                };
                let value = raw.filter(|_| !floored).map(|v| round_dp(v, dp));
                (value, Some(n), Some(dp))
            }
            Some(q) => match config.quantile().estimate(&sample, q)? {
                Some(est) => (Some(est.value), Some(est.n), Some(est.decimals)),
                None => (None, None, None),
            },
        };
        let value = value.filter(|v| !(config.suppress_zero() && *v == 0.0));

        out.push(StatRecord {
            fuel: fuel.label().to_string(),
            unit: resolution.unit().to_string(),
            summary_stat: stat.label().to_string(),
            subsample: labels.subsample.to_string(),
            summary_time: labels.summary_time.to_string(),
            time_period: labels.time_period.to_string(),
            segmentation_variable_1: labels.segment.map(|s| s.variable.clone()),
            segment_1_value: labels.segment.map(|s| s.value.clone()),
            value,
            n_sample: n,
            n_statistic,
            decimal_places,
            mean_temp,
            mean_hdd,
            weekday_weekend: labels.day_type.map(|d| d.as_str().to_string()),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn labels() -> SliceLabels<'static> {
        SliceLabels {
            subsample: "all",
            summary_time: "2021",
            time_period: "2021",
            segment: None,
            day_type: Some(DayType::Both),
        }
    }

    fn rows(values: &[Option<f64>]) -> Vec<EnergyRow> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| EnergyRow {
                elec: v,
                temp_elec: Some(10.0),
                hdd_elec: Some(2.0),
                ..EnergyRow::new(format!("P{i}"))
            })
            .collect()
    }

    fn stats(values: &[Option<f64>], resolution: Resolution, config: &SdcConfig) -> Vec<StatRecord> {
        let owned = rows(values);
        let refs: Vec<&EnergyRow> = owned.iter().collect();
        fuel_stats(&refs, Fuel::Electricity, resolution, &labels(), config).unwrap()
    }

    #[test]
    fn small_sample_withholds_quantiles_only() {
        let values: Vec<Option<f64>> = (1..=10).map(|x| Some(x as f64)).chain([None]).collect();
        let out = stats(&values, Resolution::Annual, &SdcConfig::default());
        assert_eq!(out.len(), 5);

        assert_eq!(out[0].summary_stat, "mean");
        assert_relative_eq!(out[0].value.unwrap(), 5.5);
        assert_eq!(out[0].n_sample, 10);
        assert_eq!(out[0].n_statistic, Some(10));
        assert_eq!(out[0].decimal_places, Some(3));

        assert_eq!(out[1].summary_stat, "standard deviation");
        assert_relative_eq!(out[1].value.unwrap(), 3.028, epsilon = 1e-12);

        for q in &out[2..] {
            assert_eq!(q.value, None);
            assert_eq!(q.n_sample, 10);
            assert_eq!(q.n_statistic, None);
            assert_eq!(q.decimal_places, None);
        }
    }

    #[test]
    fn quantiles_average_ten_nearest() {
        let values: Vec<Option<f64>> = (1..=21).map(|x| Some(x as f64)).collect();
        let out = stats(&values, Resolution::Annual, &SdcConfig::default());
        assert_eq!(out[2].summary_stat, "median");
        assert_relative_eq!(out[2].value.unwrap(), 10.5);
        assert_eq!(out[2].n_statistic, Some(10));
        assert_eq!(out[3].summary_stat, "75th percentile");
        assert_eq!(out[4].summary_stat, "25th percentile");
        assert!(out[3].value.unwrap() > out[4].value.unwrap());
    }

    #[test]
    fn empty_slice_is_all_null() {
        let out = stats(&[], Resolution::Monthly, &SdcConfig::default());
        assert_eq!(out.len(), 5);
        assert_eq!(out[0].value, None);
        assert_eq!(out[0].n_sample, 0);
        assert_eq!(out[0].n_statistic, Some(0));
        assert_eq!(out[2].n_statistic, None);
        assert_eq!(out[0].mean_temp, None);
    }

    #[test]
    fn auxiliary_means_and_units() {
        let out = stats(&[Some(1.0), Some(2.0)], Resolution::Annual, &SdcConfig::default());
        assert_eq!(out[0].unit, "kWh");
        assert_eq!(out[0].mean_temp, Some(10.0));
        assert_eq!(out[0].mean_hdd, Some(2.0));
        assert_eq!(out[0].weekday_weekend.as_deref(), Some("both"));

        let out = stats(&[Some(1.0)], Resolution::Diurnal, &SdcConfig::default());
        assert_eq!(out[0].unit, "Wh");
        assert_eq!(out[0].mean_hdd, None);
    }

    #[test]
    fn floor_moments_and_zero_suppression() {
        let config = SdcConfig::default().with_floor_moments(true);
        let out = stats(&[Some(1.0), Some(3.0)], Resolution::Annual, &config);
        assert_eq!(out[0].value, None);
        assert_eq!(out[1].value, None);
        assert_eq!(out[0].n_sample, 2);

        let config = SdcConfig::default().with_suppress_zero(true);
        let out = stats(&[Some(0.0001), Some(-0.0001)], Resolution::Annual, &config);
        assert_eq!(out[0].value, None);
        assert!(out[1].value.is_none());
    }

    #[test]
    fn segment_labels_are_stamped() {
        let segment = Segment::new("tenure", "Owner occupied");
        let owned = rows(&[Some(1.0)]);
        let refs: Vec<&EnergyRow> = owned.iter().collect();
        let labels = SliceLabels {
            segment: Some(&segment),
            day_type: None,
            ..labels()
        };
        let out = fuel_stats(&refs, Fuel::Gas, Resolution::Annual, &labels, &SdcConfig::default())
            .unwrap();
        assert_eq!(out[0].fuel, "Gas");
        assert_eq!(out[0].segmentation_variable_1.as_deref(), Some("tenure"));
        assert_eq!(out[0].segment_1_value.as_deref(), Some("Owner occupied"));
        assert_eq!(out[0].weekday_weekend, None);
        assert_eq!(out[0].n_sample, 0);
    }
}
