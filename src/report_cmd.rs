//! Report command: disclosure-controlled statistics, histograms and the
//! same-participant comparison for each year.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{error, info, info_span, warn};

use meterstat_calendar::RollupPeriod;
use meterstat_context::UnmappedCounts;
use meterstat_io::{EnergyFile, FileNames, Granularity, WriterConfig};
use meterstat_sdc::{
    Comparison, EngineInput, HistogramConfig, HistogramRow, RecordSink, Resolution,
    SegmentationEngine, annual_histogram, compare_years, write_histogram_csv, write_stats_csv,
    write_stats_parquet,
};

use crate::cli::YearArgs;
use crate::config::{MeterstatConfig, OutputToml};
use crate::convert;
use crate::inputs::{load_context, read_corrected, read_optional};

/// Outcome of one year's report, as written to the run summary.
#[derive(Debug, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub status: &'static str,
    pub n_records: usize,
    pub n_no_gas: usize,
    pub unmapped: UnmappedCounts,
    pub outputs: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl YearSummary {
    fn failed(year: i32, err: &anyhow::Error) -> Self {
        Self {
            year,
            status: "failed",
            n_records: 0,
            n_no_gas: 0,
            unmapped: UnmappedCounts::default(),
            outputs: Vec::new(),
            error: Some(format!("{err:#}")),
        }
    }
}

/// Run the report for every configured year.
///
/// A failing year is logged and recorded in the summary; the remaining years
/// still run, and the command fails at the end.
pub fn run(args: YearArgs) -> Result<()> {
    let _cmd = info_span!("report").entered();
    let config = MeterstatConfig::load(&args.config)?;
    let years = convert::resolve_years(&args.years, &config.io)?;
    let report = Report::from_config(&config)?;

    std::fs::create_dir_all(&config.io.output_dir)
        .with_context(|| format!("failed to create {}", config.io.output_dir.display()))?;

    let mut summaries = Vec::with_capacity(years.len());
    let mut failed = Vec::new();
    for &year in &years {
        let _span = info_span!("year", year).entered();
        match report.run_year(year) {
            Ok(summary) => {
                info!(n_records = summary.n_records, n_outputs = summary.outputs.len(), "year done");
                summaries.push(summary);
            }
            Err(e) => {
                error!(error = %format!("{e:#}"), "year failed");
                summaries.push(YearSummary::failed(year, &e));
                failed.push(year);
            }
        }
    }

    if let Some(ref name) = config.output.summary {
        let path = config.io.output_dir.join(name);
        write_summary(&path, &summaries)?;
    }

    if !failed.is_empty() {
        bail!("{} of {} years failed: {failed:?}", failed.len(), years.len());
    }
    Ok(())
}

/// Everything a year's report needs, resolved once from the configuration.
struct Report<'a> {
    input_dir: &'a Path,
    output_dir: &'a Path,
    output: &'a OutputToml,
    names: FileNames,
    writer: WriterConfig,
    histogram: HistogramConfig,
    resolutions: Vec<Resolution>,
    engine: SegmentationEngine,
}

impl<'a> Report<'a> {
    fn from_config(config: &'a MeterstatConfig) -> Result<Self> {
        let engine = SegmentationEngine::new(
            convert::build_segmentation_config(&config.segmentation)?,
            convert::build_sdc_config(&config.sdc)?,
        )?;
        Ok(Self {
            input_dir: &config.io.input_dir,
            output_dir: &config.io.output_dir,
            output: &config.output,
            names: convert::build_file_names(&config.io.files),
            writer: convert::build_writer_config(&config.io)?,
            histogram: convert::build_histogram_config(&config.histogram)?,
            resolutions: convert::parse_resolutions(&config.segmentation)?,
            engine,
        })
    }

    fn run_year(&self, year: i32) -> Result<YearSummary> {
        let context = load_context(self.input_dir, &self.names, year)?;
        let no_gas = context.no_gas();
        let tag = year.to_string();
        let season = RollupPeriod::heating_season(year - 1)?;
        let seg = self.engine.segmentation();

        let mut sink = RecordSink::new();
        for &resolution in &self.resolutions {
            let g = resolution.granularity();
            let read = |file: EnergyFile, tag: &str| {
                read_corrected(self.input_dir, &self.names, file, g, tag, no_gas)
            };

            let (table, banded, heating_season) = if resolution == Resolution::Monthly {
                (read(EnergyFile::Monthly, &tag)?, None, None)
            } else {
                let banded = if seg.bands().is_empty() {
                    None
                } else {
                    read(EnergyFile::TemperatureBanded, &tag)?
                };
                let heating_season = if seg.heating_season() {
                    read(EnergyFile::HeatingSeason, season.label())?
                } else {
                    None
                };
                (read(EnergyFile::Annual, &tag)?, banded, heating_season)
            };

            let input = EngineInput {
                year,
                resolution,
                table: table.as_ref(),
                banded: banded.as_ref(),
                heating_season: heating_season.as_ref(),
            };
            let n = self
                .engine
                .run(&input, &context, &mut sink)
                .with_context(|| format!("{resolution} statistics for {year}"))?;
            info!(resolution = %resolution, n_records = n, "statistics computed");
        }

        let histograms = if self.output.histograms {
            self.histograms(year, no_gas)?
        } else {
            Histograms::default()
        };

        // Everything is computed; a failure past here removes what was written.
        let mut outputs = Vec::new();
        if let Err(e) = self.write_outputs(year, &sink, &histograms, &mut outputs) {
            remove_partial(&outputs);
            return Err(e);
        }

        Ok(YearSummary {
            year,
            status: "ok",
            n_records: sink.len(),
            n_no_gas: no_gas.len(),
            unmapped: context.unmapped().clone(),
            outputs,
            error: None,
        })
    }

    /// Builds the annual histogram and, when the previous year's annual
    /// table exists, the same-participant comparison.
    fn histograms(&self, year: i32, no_gas: &BTreeSet<String>) -> Result<Histograms> {
        let mut out = Histograms::default();
        let Some(current) = read_corrected(
            self.input_dir,
            &self.names,
            EnergyFile::Annual,
            Granularity::Daily,
            &year.to_string(),
            no_gas,
        )?
        else {
            warn!(year, "no annual daily table; histograms skipped");
            return Ok(out);
        };
        out.annual = Some(annual_histogram(&current, year, &self.histogram)?);

        if !self.output.compare_previous_year {
            return Ok(out);
        }
        let previous_year = year - 1;
        let Some(previous) = read_optional(
            self.input_dir,
            &self.names,
            EnergyFile::Annual,
            Granularity::Daily,
            &previous_year.to_string(),
        )?
        else {
            info!(previous_year, "no previous annual table; comparison skipped");
            return Ok(out);
        };

        let comparison = compare_years(
            (previous_year, &previous),
            (year, &current),
            &self.histogram,
            self.engine.sdc(),
        )
        .with_context(|| format!("comparison of {previous_year} and {year}"))?;
        out.comparison = Some((previous_year, comparison));
        Ok(out)
    }

    /// Writes a year's outputs, pushing each path once its file exists.
    fn write_outputs(
        &self,
        year: i32,
        sink: &RecordSink,
        histograms: &Histograms,
        outputs: &mut Vec<PathBuf>,
    ) -> Result<()> {
        let stem = self.names.stats_output(year);
        let csv = self.output_dir.join(format!("{stem}.csv"));
        outputs.push(csv.clone());
        write_stats_csv(&csv, sink.records())?;
        if self.output.parquet {
            let parquet = self.output_dir.join(format!("{stem}.parquet"));
            outputs.push(parquet.clone());
            write_stats_parquet(&parquet, sink.records(), &self.writer)?;
        }

        if let Some(ref rows) = histograms.annual {
            let path = self.output_dir.join(self.names.histogram(year));
            outputs.push(path.clone());
            write_histogram_csv(&path, rows)?;
        }
        if let Some((previous_year, ref comparison)) = histograms.comparison {
            let path = self
                .output_dir
                .join(self.names.histogram_same_participants(previous_year, year));
            outputs.push(path.clone());
            write_histogram_csv(&path, &comparison.histogram)?;
            let path = self
                .output_dir
                .join(self.names.summary_same_participants(previous_year, year));
            outputs.push(path.clone());
            write_stats_csv(&path, &comparison.stats)?;
        }
        Ok(())
    }
}

/// Histogram tables of one year, built before anything is written.
#[derive(Debug, Default)]
struct Histograms {
    annual: Option<Vec<HistogramRow>>,
    comparison: Option<(i32, Comparison)>,
}

fn remove_partial(paths: &[PathBuf]) {
    for path in paths {
        if path.exists() {
            if let Err(e) = std::fs::remove_file(path) {
                warn!(path = %path.display(), error = %e, "failed to remove partial output");
            }
        }
    }
}

fn write_summary(path: &Path, summaries: &[YearSummary]) -> Result<()> {
    let json = serde_json::to_string_pretty(summaries).context("failed to encode run summary")?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "run summary written");
    Ok(())
}
