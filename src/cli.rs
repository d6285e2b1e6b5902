use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Disclosure-controlled statistics for household smart-meter data.
#[derive(Parser)]
#[command(
    name = "meterstat",
    version,
    about = "Disclosure-controlled summary statistics for household smart-meter data"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Build monthly and temperature-banded household profiles from readings.
    Profile(YearArgs),
    /// Roll monthly household profiles up into annual or heating-season tables.
    Rollup(RollupArgs),
    /// Produce the statistics, histogram and comparison tables.
    Report(YearArgs),
    /// Produce the supplementary segment information table.
    Supplementary(SupplementaryArgs),
}

/// Arguments shared by commands that run once per year.
#[derive(clap::Args)]
pub struct YearArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "meterstat.toml")]
    pub config: PathBuf,

    /// Years to process; overrides `[io].years` from config.
    #[arg(short, long = "year")]
    pub years: Vec<i32>,
}

/// Arguments for the `rollup` subcommand.
#[derive(clap::Args)]
pub struct RollupArgs {
    #[command(flatten)]
    pub common: YearArgs,

    /// Also build the heating season ending in each year.
    #[arg(long)]
    pub heating_season: bool,

    /// First day of a custom period (YYYY-MM-01); requires --to and --output.
    #[arg(long, requires_all = ["to", "output"])]
    pub from: Option<String>,

    /// Day after the last day of a custom period (YYYY-MM-01).
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// Output path of the custom period table.
    #[arg(short, long, requires = "from")]
    pub output: Option<PathBuf>,

    /// Granularity of the custom period table (`daily` or `half-hourly`).
    #[arg(long, default_value = "daily", requires = "from")]
    pub granularity: String,
}

/// Arguments for the `supplementary` subcommand.
#[derive(clap::Args)]
pub struct SupplementaryArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "meterstat.toml")]
    pub config: PathBuf,

    /// Year whose exporter list decides solar PV membership.
    #[arg(short, long)]
    pub year: i32,
}
