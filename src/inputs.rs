//! Locating and reading the energy and contextual tables of one year.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context as _, Result};
use tracing::{info, warn};

use meterstat_context::{Context, ContextTables};
use meterstat_household::apply_no_gas_total;
use meterstat_io::{EnergyFile, EnergyTable, FileNames, Granularity, read_energy_table};

/// Reads an energy table, or returns `None` when its file does not exist.
///
/// A file that exists but cannot be read is an error.
pub fn read_optional(
    dir: &Path,
    names: &FileNames,
    file: EnergyFile,
    granularity: Granularity,
    tag: &str,
) -> Result<Option<EnergyTable>> {
    let path = dir.join(names.energy(file, granularity, tag));
    if !path.exists() {
        warn!(
            path = %path.display(),
            table = %file.describe(granularity),
            "energy table not found"
        );
        return Ok(None);
    }
    let table = read_energy_table(&path, file.kind(granularity))
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(Some(table))
}

/// Reads an energy table that must exist.
pub fn read_required(
    dir: &Path,
    names: &FileNames,
    file: EnergyFile,
    granularity: Granularity,
    tag: &str,
) -> Result<EnergyTable> {
    let path = dir.join(names.energy(file, granularity, tag));
    read_energy_table(&path, file.kind(granularity))
        .with_context(|| format!("failed to read {}", path.display()))
}

/// Reads an energy table if present and sets totals of no-gas households
/// to their electricity.
pub fn read_corrected(
    dir: &Path,
    names: &FileNames,
    file: EnergyFile,
    granularity: Granularity,
    tag: &str,
    no_gas: &BTreeSet<String>,
) -> Result<Option<EnergyTable>> {
    let mut table = read_optional(dir, names, file, granularity, tag)?;
    if let Some(ref mut t) = table {
        apply_no_gas_total(t, no_gas);
    }
    Ok(table)
}

/// Loads and recodes the contextual tables for `year`.
pub fn load_context(dir: &Path, names: &FileNames, year: i32) -> Result<Context> {
    let tables = ContextTables::load(dir, names, year)
        .with_context(|| format!("failed to load contextual tables for {year}"))?;
    let context = Context::build(tables);
    info!(
        year,
        n_no_gas = context.no_gas().len(),
        n_unmapped = context.unmapped().total(),
        "context ready"
    );
    Ok(context)
}
