//! Published statistic records and the sink that collects them.

use std::fmt;
use std::str::FromStr;

use meterstat_io::Granularity;
use serde::Serialize;

use crate::error::SdcError;

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Time resolution of a statistics run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// One figure per half-hour of the day, from half-hourly tables in Wh.
    Diurnal,
    /// One figure per month, from monthly daily tables in kWh.
    Monthly,
    /// One figure for the whole period, from period daily tables in kWh.
    Annual,
}

impl Resolution {
    /// All resolutions in run order.
    pub const ALL: [Resolution; 3] = [Resolution::Diurnal, Resolution::Monthly, Resolution::Annual];

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::Diurnal => "diurnal",
            Resolution::Monthly => "monthly",
            Resolution::Annual => "annual",
        }
    }

    /// Unit of the consumption values.
    pub fn unit(self) -> &'static str {
        match self {
            Resolution::Diurnal => "Wh",
            Resolution::Monthly | Resolution::Annual => "kWh",
        }
    }

    /// Granularity of the tables this resolution reads.
    pub fn granularity(self) -> Granularity {
        match self {
            Resolution::Diurnal => Granularity::HalfHourly,
            Resolution::Monthly | Resolution::Annual => Granularity::Daily,
        }
    }

    /// Whether records carry a mean heating-degree-day figure.
    pub fn has_hdd(self) -> bool {
        self != Resolution::Diurnal
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = SdcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resolution::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| SdcError::InvalidConfig {
                reason: format!("unknown resolution '{s}' (expected diurnal, monthly or annual)"),
            })
    }
}

// ---------------------------------------------------------------------------
// SummaryStat
// ---------------------------------------------------------------------------

/// The five statistics published for each fuel and slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SummaryStat {
    Mean,
    StandardDeviation,
    Median,
    UpperQuartile,
    LowerQuartile,
}

impl SummaryStat {
    /// Publication order.
    pub const ALL: [SummaryStat; 5] = [
        SummaryStat::Mean,
        SummaryStat::StandardDeviation,
        SummaryStat::Median,
        SummaryStat::UpperQuartile,
        SummaryStat::LowerQuartile,
    ];

    /// Label used in the `summary_stat` column.
    pub fn label(self) -> &'static str {
        match self {
            SummaryStat::Mean => "mean",
            SummaryStat::StandardDeviation => "standard deviation",
            SummaryStat::Median => "median",
            SummaryStat::UpperQuartile => "75th percentile",
            SummaryStat::LowerQuartile => "25th percentile",
        }
    }

    /// Probability for quantile statistics.
    pub fn quantile(self) -> Option<f64> {
        match self {
            SummaryStat::Median => Some(0.5),
            SummaryStat::UpperQuartile => Some(0.75),
            SummaryStat::LowerQuartile => Some(0.25),
            SummaryStat::Mean | SummaryStat::StandardDeviation => None,
        }
    }
}

impl fmt::Display for SummaryStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Segment / StatRecord
// ---------------------------------------------------------------------------

/// A segmentation variable and one of its values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    /// Variable name, e.g. `num_occupants` or `temperature band`.
    pub variable: String,
    /// Value, e.g. `>=6` or `5_to_10`.
    pub value: String,
}

impl Segment {
    /// Creates a segment.
    pub fn new(variable: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            value: value.into(),
        }
    }
}

/// One published statistic. Field order is the output column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatRecord {
    pub fuel: String,
    pub unit: String,
    pub summary_stat: String,
    pub subsample: String,
    pub summary_time: String,
    pub time_period: String,
    pub segmentation_variable_1: Option<String>,
    pub segment_1_value: Option<String>,
    /// `None` when withheld.
    pub value: Option<f64>,
    /// Households with a value in the slice.
    pub n_sample: usize,
    /// Households the statistic was computed from; `None` for a withheld
    /// quantile.
    pub n_statistic: Option<usize>,
    pub decimal_places: Option<u32>,
    pub mean_temp: Option<f64>,
    pub mean_hdd: Option<f64>,
    pub weekday_weekend: Option<String>,
}

/// Column names of [`StatRecord`] output, in order.
pub const STAT_COLUMNS: [&str; 15] = [
    "fuel",
    "unit",
    "summary_stat",
    "subsample",
    "summary_time",
    "time_period",
    "segmentation_variable_1",
    "segment_1_value",
    "value",
    "n_sample",
    "n_statistic",
    "decimal_places",
    "mean_temp",
    "mean_hdd",
    "weekday_weekend",
];

// ---------------------------------------------------------------------------
// RecordSink
// ---------------------------------------------------------------------------

/// Append-only collection of the records of one run.
#[derive(Debug, Default)]
pub struct RecordSink {
    records: Vec<StatRecord>,
}

impl RecordSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one record.
    pub fn push(&mut self, record: StatRecord) {
        self.records.push(record);
    }

    /// Appends records in order.
    pub fn extend(&mut self, records: impl IntoIterator<Item = StatRecord>) {
        self.records.extend(records);
    }

    /// Number of records collected.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when no record has been collected.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The records collected so far.
    pub fn records(&self) -> &[StatRecord] {
        &self.records
    }

    /// Consumes the sink, returning its records.
    pub fn into_records(self) -> Vec<StatRecord> {
        self.records
    }
}
