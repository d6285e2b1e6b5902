//! Profile command: household monthly and temperature-banded profiles from
//! cleaned readings.

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use meterstat_household::{
    banded_daily_profiles, banded_hh_profiles, monthly_daily_profiles, monthly_hh_profiles,
};
use meterstat_io::{
    EnergyFile, EnergyTable, Granularity, read_daily_readings, read_half_hour_readings,
    write_energy_table,
};

use crate::cli::YearArgs;
use crate::config::MeterstatConfig;
use crate::convert;

/// Run the profile builder for every configured year and granularity.
pub fn run(args: YearArgs) -> Result<()> {
    let _cmd = info_span!("profile").entered();
    let config = MeterstatConfig::load(&args.config)?;
    let years = convert::resolve_years(&args.years, &config.io)?;
    let granularities = convert::parse_granularities(&config.io)?;
    let profile_cfg = convert::build_profile_config(&config.profile)?;
    let names = convert::build_file_names(&config.io.files);
    let (input_dir, output_dir) = (&config.io.input_dir, &config.io.output_dir);

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let mut n_written = 0;
    for &year in &years {
        let _span = info_span!("year", year).entered();
        for &g in &granularities {
            let path = input_dir.join(names.readings(g, year));
            if !path.exists() {
                warn!(path = %path.display(), "readings not found; skipping");
                continue;
            }

            let (monthly, banded) = match g {
                Granularity::Daily => {
                    let readings = read_daily_readings(&path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    info!(n_readings = readings.len(), "daily readings loaded");
                    (
                        monthly_daily_profiles(&readings, year, &profile_cfg)?,
                        banded_daily_profiles(&readings, year, &profile_cfg)?,
                    )
                }
                Granularity::HalfHourly => {
                    let readings = read_half_hour_readings(&path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    info!(n_readings = readings.len(), "half-hourly readings loaded");
                    (
                        monthly_hh_profiles(&readings, year, &profile_cfg)?,
                        banded_hh_profiles(&readings, year, &profile_cfg)?,
                    )
                }
            };

            let tag = year.to_string();
            for (file, table) in [
                (EnergyFile::Monthly, &monthly),
                (EnergyFile::TemperatureBanded, &banded),
            ] {
                write(output_dir, &names.energy(file, g, &tag), table)?;
                n_written += 1;
            }
        }
    }

    if n_written == 0 {
        bail!("no readings found for years {years:?}");
    }
    info!(n_tables = n_written, "profiles written");
    Ok(())
}

fn write(dir: &std::path::Path, name: &str, table: &EnergyTable) -> Result<()> {
    let path = dir.join(name);
    write_energy_table(&path, table).with_context(|| format!("failed to write {}", path.display()))
}
