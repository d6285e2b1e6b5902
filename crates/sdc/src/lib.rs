//! # meterstat-sdc
//!
//! Disclosure-controlled statistics of household energy tables: five
//! statistics per fuel for every sub-period, day type and segment, the
//! histogram tables, and their CSV and Parquet output.
//!
//! ## Pipeline
//!
//! ```text
//! EnergyTable(s) + Context ──SegmentationEngine::run()──► RecordSink ──write_stats_*()──► m3_outputs{year}
//!                                  │
//!                                  └─ PeriodAggregator ── fuel_stats() ── NearestQuantile
//!
//! annual EnergyTable(s) ──annual_histogram() / compare_years()──► HistogramRow, StatRecord
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `record` | `StatRecord`, `RecordSink`, resolutions and statistic labels |
//! | `fuel` | The five statistics of one fuel over one slice |
//! | `aggregate` | Dense grid over sub-periods and day types |
//! | `engine` | Whole population, segments, bands, weekday/weekend, heating season |
//! | `histogram` | Annual and two-year comparison histograms |
//! | `output` | CSV and Parquet writers |
//! | `config` | `SdcConfig`, `SegmentationConfig` |
//! | `error` | Error types |

mod aggregate;
mod config;
mod engine;
mod error;
mod fuel;
mod histogram;
mod output;
mod record;

pub use aggregate::{DayTypes, PeriodAggregator};
pub use config::{DEFAULT_BAND_LABELS, SdcConfig, SegmentationConfig};
pub use engine::{ALL_SUBSAMPLE, EngineInput, SegmentationEngine, TEMPERATURE_BAND, WEEKDAY_WEEKEND};
pub use error::SdcError;
pub use fuel::{SliceLabels, fuel_stats};
pub use histogram::{
    Comparison, FixedBins, HistogramConfig, HistogramRow, NET_ELECTRICITY, annual_histogram,
    compare_years,
};
pub use output::{
    SUPPLEMENTARY_COLUMNS, write_histogram_csv, write_stats_csv, write_stats_parquet,
    write_supplementary_csv,
};
pub use record::{RecordSink, Resolution, STAT_COLUMNS, Segment, StatRecord, SummaryStat};
