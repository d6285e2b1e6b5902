//! CSV and Parquet writing.

use std::path::Path;

use arrow::array::RecordBatch;
use arrow::datatypes::Schema;
use parquet::file::properties::WriterProperties;
use tracing::info;

use crate::energy::{self, EnergyRow, EnergyTable, Fuel};
use crate::error::IoError;
use crate::parquet_write;

/// Compression algorithm for Parquet output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// No compression.
    None,
    /// Snappy compression (fast, moderate ratio).
    #[default]
    Snappy,
    /// Zstd compression (slower, better ratio).
    Zstd,
}

impl Compression {
    /// Converts to the corresponding `parquet::basic::Compression` variant.
    fn to_parquet(self) -> Result<parquet::basic::Compression, IoError> {
        Ok(match self {
            Self::None => parquet::basic::Compression::UNCOMPRESSED,
            Self::Snappy => parquet::basic::Compression::SNAPPY,
            Self::Zstd => {
                let level =
                    parquet::basic::ZstdLevel::try_new(3).map_err(|e| IoError::Parquet {
                        reason: e.to_string(),
                    })?;
                parquet::basic::Compression::ZSTD(level)
            }
        })
    }
}

/// Configuration for Parquet output.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Compression algorithm to use.
    compression: Compression,
    /// Maximum number of rows per row group.
    row_group_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
            row_group_size: 1_000_000,
        }
    }
}

impl WriterConfig {
    /// Sets the compression algorithm.
    pub fn with_compression(mut self, comp: Compression) -> Self {
        self.compression = comp;
        self
    }

    /// Sets the maximum number of rows per row group.
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Returns the compression algorithm.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Returns the maximum number of rows per row group.
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if `row_group_size` is zero.
    fn validate(&self) -> Result<(), IoError> {
        if self.row_group_size == 0 {
            return Err(IoError::Validation {
                count: 1,
                details: "row_group_size must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Write Arrow record batches sharing `schema` to a Parquet file.
///
/// # Errors
///
/// Returns [`IoError::Validation`] if the configuration is invalid, or
/// [`IoError::Parquet`] if a batch does not match the schema or file I/O
/// fails.
pub fn write_parquet(
    path: &Path,
    schema: &Schema,
    batches: &[RecordBatch],
    config: &WriterConfig,
) -> Result<(), IoError> {
    config.validate()?;

    let compression = config.compression.to_parquet()?;
    let props = WriterProperties::builder()
        .set_compression(compression)
        .set_max_row_group_size(config.row_group_size)
        .build();

    parquet_write::write_batches(path, batches, schema, props)?;

    let n_rows: usize = batches.iter().map(RecordBatch::num_rows).sum();
    info!(path = %path.display(), n_rows, "wrote parquet");
    Ok(())
}

/// Formats a nullable number as a CSV cell; missing values are empty.
pub fn format_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn energy_cell(row: &EnergyRow, column: &str) -> String {
    let clock = row.clock();
    match column {
        energy::PUPRN => row.puprn.clone(),
        energy::DAY_TYPE => row.day_type.map(|d| d.to_string()).unwrap_or_default(),
        energy::MONTH => row.month.map(|m| m.to_string()).unwrap_or_default(),
        energy::HALF_HOUR => row.half_hour.map(|h| h.to_string()).unwrap_or_default(),
        energy::DAYS_IN_MONTH => row.days_in_month.map(|d| d.to_string()).unwrap_or_default(),
        energy::TEMP_BAND => row.temp_band.clone().unwrap_or_default(),
        energy::TEMP_ELEC => format_cell(row.temp_elec),
        energy::TEMP_GAS => format_cell(row.temp_gas),
        energy::TEMP_WEIGHTED => format_cell(row.temp_weighted),
        energy::HDD_ELEC => format_cell(row.hdd_elec),
        energy::HDD_GAS => format_cell(row.hdd_gas),
        energy::HDD_WEIGHTED => format_cell(row.hdd_weighted),
        energy::HOUR => clock.map(|(h, _)| h.to_string()).unwrap_or_default(),
        energy::MINUTE => clock.map(|(_, m)| m.to_string()).unwrap_or_default(),
        energy::ELEC_DAILY | energy::ELEC_HH => format_cell(row.fuel(Fuel::Electricity)),
        energy::GAS_DAILY | energy::GAS_HH => format_cell(row.fuel(Fuel::Gas)),
        energy::TOTAL_DAILY | energy::TOTAL_HH => format_cell(row.fuel(Fuel::Total)),
        _ => String::new(),
    }
}

/// Write an energy table to CSV with the column layout of its kind.
///
/// Missing values are written as empty cells. The file reads back with
/// [`read_energy_table`](crate::read_energy_table) under the same kind.
///
/// # Errors
///
/// Returns [`IoError::Csv`] if the file cannot be created or written.
pub fn write_energy_table(path: &Path, table: &EnergyTable) -> Result<(), IoError> {
    let columns = table.kind().columns();
    let mut writer = csv::Writer::from_path(path).map_err(|e| IoError::csv(path, e))?;
    writer
        .write_record(&columns)
        .map_err(|e| IoError::csv(path, e))?;
    for row in table.rows() {
        writer
            .write_record(columns.iter().map(|c| energy_cell(row, c)))
            .map_err(|e| IoError::csv(path, e))?;
    }
    writer.flush().map_err(|e| IoError::Csv {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    info!(
        path = %path.display(),
        kind = %table.kind(),
        n_rows = table.len(),
        "wrote energy table"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = WriterConfig::default();
        assert_eq!(config.compression(), Compression::Snappy);
        assert_eq!(config.row_group_size(), 1_000_000);
    }

    #[test]
    fn builder_methods() {
        let config = WriterConfig::default()
            .with_compression(Compression::Zstd)
            .with_row_group_size(500);
        assert_eq!(config.compression(), Compression::Zstd);
        assert_eq!(config.row_group_size(), 500);
    }

    #[test]
    fn validate_zero_row_group_size() {
        let config = WriterConfig::default().with_row_group_size(0);
        let err = config.validate().unwrap_err();
        match err {
            IoError::Validation { count, details } => {
                assert_eq!(count, 1);
                assert!(details.contains("row_group_size"));
            }
            _ => panic!("expected Validation error"),
        }
    }

    #[test]
    fn cells_for_missing_values_are_empty() {
        assert_eq!(format_cell(None), "");
        assert_eq!(format_cell(Some(1.5)), "1.5");
        assert_eq!(format_cell(Some(2.0)), "2");
    }

    #[test]
    fn clock_cells_follow_half_hour() {
        let row = EnergyRow {
            half_hour: Some(48),
            ..EnergyRow::new("P1")
        };
        assert_eq!(energy_cell(&row, "hour_local_time"), "0");
        assert_eq!(energy_cell(&row, "minute_local_time"), "0");
        assert_eq!(energy_cell(&row, "Hh_local_time"), "48");
    }
}
