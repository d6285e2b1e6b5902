//! Histograms of annual mean daily consumption.
//!
//! Two tables are produced: an equal-width histogram per fuel for one year,
//! and a fixed-bin comparison of two years restricted to the households
//! with data in both, with the statistics of that shared sample.

use std::collections::BTreeSet;

use meterstat_calendar::DayType;
use meterstat_io::{EnergyRow, EnergyTable, Fuel};
use meterstat_stats::{Histogram, stepped_edges};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::SdcConfig;
use crate::error::SdcError;
use crate::fuel::{SliceLabels, fuel_stats};
use crate::record::{Resolution, StatRecord};

/// Fuel label of electricity in the comparison tables.
pub const NET_ELECTRICITY: &str = "Net Electricity";

/// One histogram bin. Edges are text so open ends can read `<0` or `>40`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramRow {
    pub year: i32,
    pub fuel: String,
    pub bin_value: usize,
    pub bin_l_edge: String,
    pub bin_r_edge: String,
}

/// Fixed, evenly spaced bins whose end bins may be open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedBins {
    pub start: f64,
    pub step: f64,
    /// Number of edges, one more than the number of bins.
    pub n_edges: usize,
    /// The first bin also holds everything below `start`.
    pub open_low: bool,
    /// The last bin also holds everything above the last edge.
    pub open_high: bool,
}

impl FixedBins {
    /// Bin edges.
    pub fn edges(&self) -> Vec<f64> {
        stepped_edges(self.start, self.step, self.n_edges)
    }

    fn validate(&self, fuel: &str) -> Result<(), SdcError> {
        if self.n_edges < 3 || !(self.step.is_finite() && self.step > 0.0) {
            return Err(SdcError::InvalidConfig {
                reason: format!(
                    "{fuel} comparison bins need at least 3 edges and a positive step"
                ),
            });
        }
        Ok(())
    }
}

/// Histogram settings.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramConfig {
    annual_bins: usize,
    sparse_threshold: usize,
    electricity: FixedBins,
    gas: FixedBins,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            annual_bins: 30,
            sparse_threshold: 10,
            electricity: FixedBins {
                start: -5.0,
                step: 5.0,
                n_edges: 11,
                open_low: true,
                open_high: true,
            },
            gas: FixedBins {
                start: 0.0,
                step: 10.0,
                n_edges: 13,
                open_low: false,
                open_high: true,
            },
        }
    }
}

impl HistogramConfig {
    /// Sets the number of equal-width bins of the annual histogram.
    pub fn with_annual_bins(mut self, n: usize) -> Self {
        self.annual_bins = n;
        self
    }

    /// Sets the bin count below which a comparison bin is reported.
    pub fn with_sparse_threshold(mut self, n: usize) -> Self {
        self.sparse_threshold = n;
        self
    }

    /// Sets the electricity comparison bins.
    pub fn with_electricity_bins(mut self, bins: FixedBins) -> Self {
        self.electricity = bins;
        self
    }

    /// Sets the gas comparison bins.
    pub fn with_gas_bins(mut self, bins: FixedBins) -> Self {
        self.gas = bins;
        self
    }

    /// Returns the number of annual bins.
    pub fn annual_bins(&self) -> usize {
        self.annual_bins
    }

    /// Returns the sparse-bin threshold.
    pub fn sparse_threshold(&self) -> usize {
        self.sparse_threshold
    }

    /// Returns the electricity comparison bins.
    pub fn electricity(&self) -> &FixedBins {
        &self.electricity
    }

    /// Returns the gas comparison bins.
    pub fn gas(&self) -> &FixedBins {
        &self.gas
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SdcError::InvalidConfig`] for zero annual bins or
    /// comparison bins with fewer than three edges or a non-positive step.
    pub fn validate(&self) -> Result<(), SdcError> {
        if self.annual_bins == 0 {
            return Err(SdcError::InvalidConfig {
                reason: "annual histogram needs at least 1 bin".to_string(),
            });
        }
        self.electricity.validate("electricity")?;
        self.gas.validate("gas")
    }
}

fn both_rows(table: &EnergyTable) -> impl Iterator<Item = &EnergyRow> {
    table
        .rows()
        .iter()
        .filter(|r| r.day_type == Some(DayType::Both))
}

/// Equal-width histogram of each fuel's `both` annual means for `year`.
///
/// Bins span the minimum to the maximum of the non-null values; the last
/// bin is closed on the right.
///
/// # Errors
///
/// Returns [`SdcError::InvalidConfig`] for an invalid configuration, or
/// [`SdcError::Stats`] if a value is not finite.
pub fn annual_histogram(
    table: &EnergyTable,
    year: i32,
    config: &HistogramConfig,
) -> Result<Vec<HistogramRow>, SdcError> {
    config.validate()?;
    let mut out = Vec::with_capacity(Fuel::ALL.len() * config.annual_bins);
    for fuel in Fuel::ALL {
        let values: Vec<f64> = both_rows(table).filter_map(|r| r.fuel(fuel)).collect();
        let hist = Histogram::equal_width(&values, config.annual_bins)?;
        out.extend(hist.bins().map(|(l, r, c)| HistogramRow {
            year,
            fuel: fuel.label().to_string(),
            bin_value: c,
            bin_l_edge: l.to_string(),
            bin_r_edge: r.to_string(),
        }));
    }
    info!(year, n_rows = out.len(), "built annual histogram");
    Ok(out)
}

/// Histogram rows and statistics of a two-year comparison.
#[derive(Debug, Clone, Default)]
pub struct Comparison {
    pub histogram: Vec<HistogramRow>,
    pub stats: Vec<StatRecord>,
}

/// Compares two years over the households with a `both` annual mean for a
/// fuel in each.
///
/// Electricity and gas are binned into their fixed bins after clipping into
/// the bin range, and published with their five statistics per year.
/// Electricity is labelled `Net Electricity`. A warning is logged for every
/// fuel and year with a bin below the sparse threshold.
///
/// Only the two fuels are compared. Floor area, bedroom and occupant
/// statistics are not part of the comparison; they are published once per
/// year in the supplementary table of the context crate.
///
/// # Errors
///
/// Returns [`SdcError::InvalidConfig`] for an invalid configuration, or
/// [`SdcError::Stats`] from binning or the quantile estimator.
pub fn compare_years(
    first: (i32, &EnergyTable),
    second: (i32, &EnergyTable),
    histogram: &HistogramConfig,
    sdc: &SdcConfig,
) -> Result<Comparison, SdcError> {
    histogram.validate()?;
    let (y1, t1) = first;
    let (y2, t2) = second;
    let subsample = format!("participants with annual data for {y1} and {y2}");
    let mut out = Comparison::default();

    for (fuel, bins) in [
        (Fuel::Electricity, histogram.electricity),
        (Fuel::Gas, histogram.gas),
    ] {
        let with_fuel = |t: &EnergyTable| -> BTreeSet<String> {
            both_rows(t)
                .filter(|r| r.fuel(fuel).is_some())
                .map(|r| r.puprn.clone())
                .collect()
        };
        let shared: BTreeSet<String> = with_fuel(t1).intersection(&with_fuel(t2)).cloned().collect();
        let label = match fuel {
            Fuel::Electricity => NET_ELECTRICITY,
            _ => fuel.label(),
        };
        let edges = bins.edges();
        let (lo, hi) = (edges[0], edges[edges.len() - 1]);

        for (year, table) in [(y1, t1), (y2, t2)] {
            let rows: Vec<&EnergyRow> = both_rows(table)
                .filter(|r| shared.contains(&r.puprn))
                .collect();
            let values: Vec<f64> = rows
                .iter()
                .filter_map(|r| r.fuel(fuel))
                .map(|v| v.clamp(lo, hi))
                .collect();
            let hist = Histogram::with_edges(&values, &edges)?;
            if hist.has_sparse_bin(histogram.sparse_threshold) {
                warn!(
                    year,
                    fuel = label,
                    threshold = histogram.sparse_threshold,
                    "histogram bin below threshold"
                );
            }
            out.histogram
                .extend(hist.bins().map(|(l, r, c)| HistogramRow {
                    year,
                    fuel: label.to_string(),
                    bin_value: c,
                    bin_l_edge: edge_label(l, lo, bins.open_low, &edges, true),
                    bin_r_edge: edge_label(r, hi, bins.open_high, &edges, false),
                }));

            let time = year.to_string();
            let labels = SliceLabels {
                subsample: &subsample,
                summary_time: &time,
                time_period: &time,
                segment: None,
                day_type: Some(DayType::Both),
            };
            let mut stats = fuel_stats(&rows, fuel, Resolution::Annual, &labels, sdc)?;
            for record in &mut stats {
                record.fuel = label.to_string();
            }
            out.stats.extend(stats);
        }
        info!(fuel = label, n_households = shared.len(), "compared years");
    }
    Ok(out)
}

/// Text of a bin edge. An open outer edge names its inner neighbour:
/// `<0` for a low edge of -5 followed by 0, `>40` for a high edge of 45
/// preceded by 40.
fn edge_label(edge: f64, outer: f64, open: bool, edges: &[f64], low: bool) -> String {
    if !open || edge != outer {
        return edge.to_string();
    }
    if low {
        format!("<{}", edges[1])
    } else {
        format!(">{}", edges[edges.len() - 2])
    }
}

#[cfg(test)]
mod tests {
    use meterstat_io::{Granularity, Layout, TableKind};

    use super::*;

    fn table(values: &[(&str, Option<f64>, Option<f64>)]) -> EnergyTable {
        let rows = values
            .iter()
            .flat_map(|&(p, elec, gas)| {
                DayType::ALL.into_iter().map(move |dt| EnergyRow {
                    elec,
                    gas,
                    day_type: Some(dt),
                    ..EnergyRow::new(p)
                })
            })
            .collect();
        EnergyTable::new(TableKind::new(Granularity::Daily, Layout::Period), rows)
    }

    #[test]
    fn annual_histogram_counts_both_rows() {
        let t = table(&[("A", Some(1.0), None), ("B", Some(4.0), Some(2.0))]);
        let rows = annual_histogram(&t, 2021, &HistogramConfig::default()).unwrap();
        assert_eq!(rows.len(), 90);
        let elec: usize = rows
            .iter()
            .filter(|r| r.fuel == "Electricity")
            .map(|r| r.bin_value)
            .sum();
        assert_eq!(elec, 2);
        assert_eq!(rows[0].bin_l_edge, "1");
        assert_eq!(rows[29].bin_r_edge, "4");
        assert_eq!(rows[29].bin_value, 1);
    }

    #[test]
    fn comparison_uses_shared_households_and_open_labels() {
        let t1 = table(&[
            ("A", Some(-12.0), Some(5.0)),
            ("B", Some(7.0), None),
            ("C", Some(3.0), Some(200.0)),
        ]);
        let t2 = table(&[
            ("A", Some(60.0), Some(15.0)),
            ("B", None, Some(1.0)),
            ("C", Some(2.0), Some(300.0)),
        ]);
        let cmp = compare_years(
            (2021, &t1),
            (2022, &t2),
            &HistogramConfig::default(),
            &SdcConfig::default(),
        )
        .unwrap();

        // 10 electricity bins and 12 gas bins per year
        assert_eq!(cmp.histogram.len(), 2 * 10 + 2 * 12);
        let first = &cmp.histogram[0];
        assert_eq!(first.fuel, NET_ELECTRICITY);
        assert_eq!(first.year, 2021);
        assert_eq!(first.bin_l_edge, "<0");
        assert_eq!(first.bin_value, 1);
        assert_eq!(cmp.histogram[9].bin_r_edge, ">40");
        assert_eq!(cmp.histogram[10].bin_l_edge, "<0");
        assert_eq!(cmp.histogram[19].bin_value, 1);

        let gas: Vec<_> = cmp.histogram.iter().filter(|r| r.fuel == "Gas").collect();
        assert_eq!(gas[0].bin_l_edge, "0");
        assert_eq!(gas[11].bin_r_edge, ">110");
        assert_eq!(gas[11].bin_value, 1);

        // 2 fuels x 2 years x 5 statistics, no household characteristics
        assert_eq!(cmp.stats.len(), 20);
        assert!(
            cmp.stats
                .iter()
                .all(|r| r.fuel == NET_ELECTRICITY || r.fuel == "Gas")
        );
        let mean = &cmp.stats[0];
        assert_eq!(mean.fuel, NET_ELECTRICITY);
        assert_eq!(mean.subsample, "participants with annual data for 2021 and 2022");
        assert_eq!(mean.n_sample, 2);
        assert_eq!(mean.value, Some(-4.5));
        assert_eq!(mean.summary_time, "2021");
        assert_eq!(mean.weekday_weekend.as_deref(), Some("both"));
    }

    #[test]
    fn rejects_degenerate_bins() {
        let config = HistogramConfig::default().with_gas_bins(FixedBins {
            start: 0.0,
            step: 0.0,
            n_edges: 13,
            open_low: false,
            open_high: true,
        });
        assert!(config.validate().is_err());
        assert!(HistogramConfig::default().with_annual_bins(0).validate().is_err());
    }
}
