//! Rollup command: annual, heating-season and custom-period household tables
//! from monthly profiles.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{info, info_span};

use meterstat_calendar::RollupPeriod;
use meterstat_household::rollup;
use meterstat_io::{EnergyFile, EnergyTable, FileNames, Granularity, write_energy_table};

use crate::cli::RollupArgs;
use crate::config::MeterstatConfig;
use crate::convert;
use crate::inputs::read_required;

/// Run the rollup for every configured year and granularity, or for one
/// custom period.
pub fn run(args: RollupArgs) -> Result<()> {
    let _cmd = info_span!("rollup").entered();
    let config = MeterstatConfig::load(&args.common.config)?;
    let names = convert::build_file_names(&config.io.files);

    if let (Some(from), Some(to), Some(output)) = (&args.from, &args.to, &args.output) {
        let granularity = convert::parse_granularity(&args.granularity)?;
        return run_custom(&config, &names, granularity, from, to, output);
    }

    let years = convert::resolve_years(&args.common.years, &config.io)?;
    let granularities = convert::parse_granularities(&config.io)?;
    let (input_dir, output_dir) = (&config.io.input_dir, &config.io.output_dir);
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    for &year in &years {
        let _span = info_span!("year", year).entered();
        for &g in &granularities {
            let current = read_required(input_dir, &names, EnergyFile::Monthly, g, &year.to_string())?;

            let period = RollupPeriod::annual(year)?;
            let annual = rollup(&[(year, &current)], &period)?;
            write(output_dir, &names.energy(EnergyFile::Annual, g, period.label()), &annual)?;

            if args.heating_season {
                let previous = read_required(
                    input_dir,
                    &names,
                    EnergyFile::Monthly,
                    g,
                    &(year - 1).to_string(),
                )
                .context("heating season needs the previous year's monthly table")?;
                let period = RollupPeriod::heating_season(year - 1)?;
                let season = rollup(&[(year - 1, &previous), (year, &current)], &period)?;
                write(
                    output_dir,
                    &names.energy(EnergyFile::HeatingSeason, g, period.label()),
                    &season,
                )?;
            }
        }
    }
    Ok(())
}

fn run_custom(
    config: &MeterstatConfig,
    names: &FileNames,
    granularity: Granularity,
    from: &str,
    to: &str,
    output: &Path,
) -> Result<()> {
    let start = parse_date(from)?;
    let end = parse_date(to)?;
    let period = RollupPeriod::custom(start, end)?;
    let _span = info_span!("custom", period = %period.label()).entered();

    let years: BTreeSet<i32> = period.months().iter().map(|ym| ym.year).collect();
    let mut tables = Vec::with_capacity(years.len());
    for &year in &years {
        let table = read_required(
            &config.io.input_dir,
            names,
            EnergyFile::Monthly,
            granularity,
            &year.to_string(),
        )?;
        tables.push((year, table));
    }
    let sources: Vec<(i32, &EnergyTable)> = tables.iter().map(|(y, t)| (*y, t)).collect();
    let table = rollup(&sources, &period)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    write_energy_table(output, &table)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(path = %output.display(), n_rows = table.rows().len(), "custom period written");
    Ok(())
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date {s:?}: expected YYYY-MM-DD"))
}

fn write(dir: &Path, name: &str, table: &EnergyTable) -> Result<()> {
    let path = dir.join(name);
    write_energy_table(&path, table).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), n_rows = table.rows().len(), "table written");
    Ok(())
}
