use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level meterstat configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct MeterstatConfig {
    /// I/O settings.
    #[serde(default)]
    pub io: IoConfig,

    /// Disclosure-control settings.
    #[serde(default)]
    pub sdc: SdcToml,

    /// What the statistics are broken down by.
    #[serde(default)]
    pub segmentation: SegmentationToml,

    /// Household profile settings.
    #[serde(default)]
    pub profile: ProfileToml,

    /// Histogram settings.
    #[serde(default)]
    pub histogram: HistogramToml,

    /// Report outputs.
    #[serde(default)]
    pub output: OutputToml,
}

impl MeterstatConfig {
    /// Reads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&text).context("failed to parse TOML config")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoConfig {
    #[serde(default = "default_dir")]
    pub input_dir: PathBuf,
    #[serde(default = "default_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub years: Vec<i32>,
    #[serde(default = "default_granularities")]
    pub granularities: Vec<String>,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
    /// File name template overrides.
    #[serde(default)]
    pub files: FilesToml,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            input_dir: default_dir(),
            output_dir: default_dir(),
            years: Vec::new(),
            granularities: default_granularities(),
            compression: default_compression(),
            row_group_size: default_row_group_size(),
            files: FilesToml::default(),
        }
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_granularities() -> Vec<String> {
    vec!["daily".to_string(), "half-hourly".to_string()]
}
fn default_compression() -> String {
    "snappy".to_string()
}
fn default_row_group_size() -> usize {
    1_000_000
}
fn default_true() -> bool {
    true
}

/// Optional overrides of the default file name templates.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FilesToml {
    pub monthly_daily: Option<String>,
    pub monthly_hh: Option<String>,
    pub annual_daily: Option<String>,
    pub annual_hh: Option<String>,
    pub heating_season_daily: Option<String>,
    pub heating_season_hh: Option<String>,
    pub banded_daily: Option<String>,
    pub banded_hh: Option<String>,
    pub daily_readings: Option<String>,
    pub hh_readings: Option<String>,
    pub exporters: Option<String>,
    pub survey: Option<String>,
    pub epc: Option<String>,
    pub participants: Option<String>,
    pub read_types: Option<String>,
    pub stats_output: Option<String>,
    pub histogram: Option<String>,
    pub histogram_same_participants: Option<String>,
    pub summary_same_participants: Option<String>,
    pub supplementary: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SdcToml {
    #[serde(default = "default_neighbours")]
    pub neighbours: usize,
    #[serde(default = "default_min_count")]
    pub min_count: usize,
    #[serde(default = "default_decimals")]
    pub decimals: u32,
    #[serde(default)]
    pub floor_moments: bool,
    #[serde(default)]
    pub suppress_zero: bool,
}

impl Default for SdcToml {
    fn default() -> Self {
        Self {
            neighbours: default_neighbours(),
            min_count: default_min_count(),
            decimals: default_decimals(),
            floor_moments: false,
            suppress_zero: false,
        }
    }
}

fn default_neighbours() -> usize {
    10
}
fn default_min_count() -> usize {
    10
}
fn default_decimals() -> u32 {
    3
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SegmentationToml {
    /// Variable names; all thirteen when absent.
    #[serde(default)]
    pub variables: Option<Vec<String>>,
    /// Temperature band labels; the published five when absent.
    #[serde(default)]
    pub bands: Option<Vec<String>>,
    #[serde(default = "default_true")]
    pub weekday_weekend: bool,
    #[serde(default = "default_true")]
    pub heating_season: bool,
    #[serde(default = "default_resolutions")]
    pub resolutions: Vec<String>,
}

impl Default for SegmentationToml {
    fn default() -> Self {
        Self {
            variables: None,
            bands: None,
            weekday_weekend: true,
            heating_season: true,
            resolutions: default_resolutions(),
        }
    }
}

fn default_resolutions() -> Vec<String> {
    vec![
        "diurnal".to_string(),
        "monthly".to_string(),
        "annual".to_string(),
    ]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileToml {
    #[serde(default = "default_missing_threshold")]
    pub missing_threshold: f64,
    /// `[low, high)` pairs; the published five when absent.
    #[serde(default)]
    pub bands: Option<Vec<[f64; 2]>>,
}

impl Default for ProfileToml {
    fn default() -> Self {
        Self {
            missing_threshold: default_missing_threshold(),
            bands: None,
        }
    }
}

fn default_missing_threshold() -> f64 {
    0.5
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistogramToml {
    #[serde(default = "default_annual_bins")]
    pub annual_bins: usize,
    #[serde(default = "default_sparse_threshold")]
    pub sparse_threshold: usize,
}

impl Default for HistogramToml {
    fn default() -> Self {
        Self {
            annual_bins: default_annual_bins(),
            sparse_threshold: default_sparse_threshold(),
        }
    }
}

fn default_annual_bins() -> usize {
    30
}
fn default_sparse_threshold() -> usize {
    10
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputToml {
    #[serde(default)]
    pub parquet: bool,
    #[serde(default = "default_true")]
    pub histograms: bool,
    #[serde(default = "default_true")]
    pub compare_previous_year: bool,
    /// Run summary JSON, relative to the output directory.
    #[serde(default)]
    pub summary: Option<PathBuf>,
}

impl Default for OutputToml {
    fn default() -> Self {
        Self {
            parquet: false,
            histograms: true,
            compare_previous_year: true,
            summary: None,
        }
    }
}
