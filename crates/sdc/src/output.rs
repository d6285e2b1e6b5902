//! CSV and Parquet output of statistic, histogram and supplementary tables.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, RecordBatch, StringArray, UInt32Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use meterstat_context::SupplementaryRow;
use meterstat_io::{WriterConfig, format_cell, write_parquet};
use serde::Serialize;
use tracing::info;

use crate::error::SdcError;
use crate::histogram::HistogramRow;
use crate::record::{STAT_COLUMNS, StatRecord};

/// Column names of the supplementary table, in order.
pub const SUPPLEMENTARY_COLUMNS: [&str; 8] = [
    "segmentation_variable",
    "segment_value",
    "mean_floor_area",
    "n_mean_floor_area",
    "mean_bedrooms",
    "n_mean_bedrooms",
    "mean_occupants",
    "n_mean_occupants",
];

const HISTOGRAM_COLUMNS: [&str; 5] = ["year", "fuel", "bin_value", "bin_l_edge", "bin_r_edge"];

/// Writes serializable rows under an explicit header, so an empty table
/// still has its columns.
fn write_rows<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<(), SdcError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| SdcError::output(path, e))?;
    writer
        .write_record(header)
        .map_err(|e| SdcError::output(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| SdcError::output(path, e))?;
    }
    writer.flush().map_err(|e| SdcError::output(path, e))?;
    Ok(())
}

/// Writes statistic records to CSV. Withheld values are empty cells.
///
/// # Errors
///
/// Returns [`SdcError::Output`] if the file cannot be created or written.
pub fn write_stats_csv(path: &Path, records: &[StatRecord]) -> Result<(), SdcError> {
    write_rows(path, &STAT_COLUMNS, records)?;
    info!(path = %path.display(), n_rows = records.len(), "wrote statistics");
    Ok(())
}

fn stats_schema() -> Schema {
    let fields = STAT_COLUMNS
        .iter()
        .map(|&name| {
            let (data_type, nullable) = match name {
                "value" | "mean_temp" | "mean_hdd" => (DataType::Float64, true),
                "n_sample" => (DataType::UInt64, false),
                "n_statistic" => (DataType::UInt64, true),
                "decimal_places" => (DataType::UInt32, true),
                "segmentation_variable_1" | "segment_1_value" | "weekday_weekend" => {
                    (DataType::Utf8, true)
                }
                _ => (DataType::Utf8, false),
            };
            Field::new(name, data_type, nullable)
        })
        .collect::<Vec<_>>();
    Schema::new(fields)
}

fn strings<'a>(records: &'a [StatRecord], f: impl Fn(&'a StatRecord) -> Option<&'a str>) -> ArrayRef {
    Arc::new(records.iter().map(f).collect::<StringArray>())
}

fn floats(records: &[StatRecord], f: impl Fn(&StatRecord) -> Option<f64>) -> ArrayRef {
    Arc::new(records.iter().map(f).collect::<Float64Array>())
}

/// Writes statistic records to Parquet with the CSV column order.
///
/// # Errors
///
/// Returns [`SdcError::Output`] if the batch cannot be built or the file
/// cannot be written.
pub fn write_stats_parquet(
    path: &Path,
    records: &[StatRecord],
    config: &WriterConfig,
) -> Result<(), SdcError> {
    let schema = stats_schema();
    let columns: Vec<ArrayRef> = vec![
        strings(records, |r| Some(r.fuel.as_str())),
        strings(records, |r| Some(r.unit.as_str())),
        strings(records, |r| Some(r.summary_stat.as_str())),
        strings(records, |r| Some(r.subsample.as_str())),
        strings(records, |r| Some(r.summary_time.as_str())),
        strings(records, |r| Some(r.time_period.as_str())),
        strings(records, |r| r.segmentation_variable_1.as_deref()),
        strings(records, |r| r.segment_1_value.as_deref()),
        floats(records, |r| r.value),
        Arc::new(
            records
                .iter()
                .map(|r| Some(r.n_sample as u64))
                .collect::<UInt64Array>(),
        ),
        Arc::new(
            records
                .iter()
                .map(|r| r.n_statistic.map(|n| n as u64))
                .collect::<UInt64Array>(),
        ),
        Arc::new(
            records
                .iter()
                .map(|r| r.decimal_places)
                .collect::<UInt32Array>(),
        ),
        floats(records, |r| r.mean_temp),
        floats(records, |r| r.mean_hdd),
        strings(records, |r| r.weekday_weekend.as_deref()),
    ];
    let batch = RecordBatch::try_new(Arc::new(schema.clone()), columns)
        .map_err(|e| SdcError::output(path, e))?;
    write_parquet(path, &schema, &[batch], config).map_err(|e| SdcError::io(path, e))
}

/// Writes histogram rows to CSV.
///
/// # Errors
///
/// Returns [`SdcError::Output`] if the file cannot be created or written.
pub fn write_histogram_csv(path: &Path, rows: &[HistogramRow]) -> Result<(), SdcError> {
    write_rows(path, &HISTOGRAM_COLUMNS, rows)?;
    info!(path = %path.display(), n_rows = rows.len(), "wrote histogram");
    Ok(())
}

/// Writes the supplementary segment table to CSV.
///
/// # Errors
///
/// Returns [`SdcError::Output`] if the file cannot be created or written.
pub fn write_supplementary_csv(path: &Path, rows: &[SupplementaryRow]) -> Result<(), SdcError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| SdcError::output(path, e))?;
    writer
        .write_record(SUPPLEMENTARY_COLUMNS)
        .map_err(|e| SdcError::output(path, e))?;
    for row in rows {
        writer
            .write_record([
                row.segmentation_variable.clone(),
                row.segment_value.clone(),
                format_cell(row.mean_floor_area),
                row.n_mean_floor_area.to_string(),
                format_cell(row.mean_bedrooms),
                row.n_mean_bedrooms.to_string(),
                format_cell(row.mean_occupants),
                row.n_mean_occupants.to_string(),
            ])
            .map_err(|e| SdcError::output(path, e))?;
    }
    writer.flush().map_err(|e| SdcError::output(path, e))?;
    info!(path = %path.display(), n_rows = rows.len(), "wrote supplementary information");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(value: Option<f64>) -> StatRecord {
        StatRecord {
            fuel: "Electricity".to_string(),
            unit: "kWh".to_string(),
            summary_stat: "median".to_string(),
            subsample: "all".to_string(),
            summary_time: "2021".to_string(),
            time_period: "2021".to_string(),
            segmentation_variable_1: Some("tenure".to_string()),
            segment_1_value: Some("Owner occupied".to_string()),
            value,
            n_sample: 4,
            n_statistic: None,
            decimal_places: None,
            mean_temp: Some(9.5),
            mean_hdd: None,
            weekday_weekend: Some("both".to_string()),
        }
    }

    #[test]
    fn stats_csv_has_header_and_empty_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m3_outputs2021.csv");
        write_stats_csv(&path, &[record(None)]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), STAT_COLUMNS.join(","));
        assert_eq!(
            lines.next().unwrap(),
            "Electricity,kWh,median,all,2021,2021,tenure,Owner occupied,,4,,,9.5,,both"
        );
    }

    #[test]
    fn empty_stats_csv_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_stats_csv(&path, &[]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_end(), STAT_COLUMNS.join(","));
    }

    #[test]
    fn stats_parquet_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m3_outputs2021.parquet");
        write_stats_parquet(&path, &[record(Some(1.5)), record(None)], &WriterConfig::default())
            .unwrap();
        assert!(path.exists());
        assert_eq!(stats_schema().fields().len(), 15);
    }

    #[test]
    fn histogram_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist.csv");
        let rows = vec![HistogramRow {
            year: 2022,
            fuel: "Gas".to_string(),
            bin_value: 3,
            bin_l_edge: "110".to_string(),
            bin_r_edge: ">110".to_string(),
        }];
        write_histogram_csv(&path, &rows).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "year,fuel,bin_value,bin_l_edge,bin_r_edge\n2022,Gas,3,110,>110\n"
        );
    }

    #[test]
    fn unwritable_path_is_output_error() {
        let err = write_stats_csv(Path::new("/nonexistent_dir_for_meterstat/out.csv"), &[])
            .unwrap_err();
        assert!(matches!(err, SdcError::Output { .. }));
    }
}
