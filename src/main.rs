mod cli;
mod config;
mod convert;
mod inputs;
mod logging;
mod profile_cmd;
mod report_cmd;
mod rollup_cmd;
mod supplementary_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Profile(args) => profile_cmd::run(args),
        Command::Rollup(args) => rollup_cmd::run(args),
        Command::Report(args) => report_cmd::run(args),
        Command::Supplementary(args) => supplementary_cmd::run(args),
    }
}
