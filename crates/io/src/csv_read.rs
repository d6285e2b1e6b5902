//! Low-level CSV access: header lookup and nullable cell parsing.
//!
//! Columns are located by name, so input files may order or extend their
//! columns freely. Empty cells and the markers `NA`, `nan` and `None` read as
//! missing.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::StringRecord;
use meterstat_calendar::DayType;

use crate::error::IoError;

/// Cell markers that read as a missing value.
const NULL_MARKERS: [&str; 5] = ["", "NA", "nan", "NaN", "None"];

/// An open CSV file with its header row.
pub(crate) struct CsvSource {
    path: PathBuf,
    headers: StringRecord,
    reader: csv::Reader<File>,
}

impl CsvSource {
    /// Opens `path` and reads its header row.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::FileNotFound`] if the file does not exist, or
    /// [`IoError::Csv`] if it cannot be opened or the header is malformed.
    pub(crate) fn open(path: &Path) -> Result<Self, IoError> {
        if !path.exists() {
            return Err(IoError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| IoError::csv(path, e))?;
        let headers = reader.headers().map_err(|e| IoError::csv(path, e))?.clone();
        Ok(Self {
            path: path.to_path_buf(),
            headers,
            reader,
        })
    }

    /// Returns the path this source was opened from.
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the index of a required column.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::MissingColumn`] if the header has no such column.
    pub(crate) fn column(&self, name: &str) -> Result<Column, IoError> {
        self.optional_column(name)
            .ok_or_else(|| IoError::MissingColumn {
                column: name.to_string(),
                path: self.path.clone(),
            })
    }

    /// Returns the index of a column if the header has it.
    pub(crate) fn optional_column(&self, name: &str) -> Option<Column> {
        self.headers
            .iter()
            .position(|h| h == name)
            .map(|index| Column { index, name: name.to_string() })
    }

    /// Visits every data record in file order.
    ///
    /// # Errors
    ///
    /// Stops at the first malformed record or the first error returned by
    /// `visit`.
    pub(crate) fn for_each<F>(&mut self, mut visit: F) -> Result<(), IoError>
    where
        F: FnMut(&Row<'_>) -> Result<(), IoError>,
    {
        let mut record = StringRecord::new();
        loop {
            let more = self
                .reader
                .read_record(&mut record)
                .map_err(|e| IoError::csv(&self.path, e))?;
            if !more {
                return Ok(());
            }
            let line = record.position().map_or(0, |p| p.line());
            visit(&Row {
                path: &self.path,
                line,
                record: &record,
            })?;
        }
    }
}

/// A named column position within a [`CsvSource`].
#[derive(Debug, Clone)]
pub(crate) struct Column {
    index: usize,
    name: String,
}

/// One data record, borrowed for the duration of a visit.
pub(crate) struct Row<'a> {
    path: &'a Path,
    line: u64,
    record: &'a StringRecord,
}

impl Column {
    pub(crate) fn name(&self) -> &str {
        &self.name
    }
}

impl Row<'_> {
    fn raw(&self, col: &Column) -> &str {
        self.record.get(col.index).unwrap_or("")
    }

    fn invalid(&self, col: &Column) -> IoError {
        IoError::InvalidValue {
            path: self.path.to_path_buf(),
            line: self.line,
            column: col.name.clone(),
            value: self.raw(col).to_string(),
        }
    }

    /// Cell text, `None` when the cell is a null marker.
    pub(crate) fn text(&self, col: &Column) -> Option<&str> {
        let raw = self.raw(col);
        (!is_null(raw)).then_some(raw)
    }

    /// Cell text for an optional column, `None` when the column is absent.
    pub(crate) fn text_opt(&self, col: Option<&Column>) -> Option<&str> {
        col.and_then(|c| self.text(c))
    }

    /// Cell text that must be present.
    pub(crate) fn required_text(&self, col: &Column) -> Result<&str, IoError> {
        self.text(col).ok_or_else(|| self.invalid(col))
    }

    /// Nullable floating-point cell. NaN reads as missing; infinities are
    /// rejected.
    pub(crate) fn f64(&self, col: &Column) -> Result<Option<f64>, IoError> {
        let Some(s) = self.text(col) else {
            return Ok(None);
        };
        match s.trim().parse::<f64>() {
            Ok(v) if v.is_nan() => Ok(None),
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(self.invalid(col)),
        }
    }

    /// Nullable floating-point cell from an optional column.
    pub(crate) fn f64_opt(&self, col: Option<&Column>) -> Result<Option<f64>, IoError> {
        col.map_or(Ok(None), |c| self.f64(c))
    }

    /// Nullable integer cell. Integral floats such as `3.0` are accepted.
    pub(crate) fn int(&self, col: &Column) -> Result<Option<i64>, IoError> {
        match self.text(col) {
            None => Ok(None),
            Some(s) => parse_int(s).map(Some).ok_or_else(|| self.invalid(col)),
        }
    }

    /// Nullable integer cell from an optional column.
    pub(crate) fn int_opt(&self, col: Option<&Column>) -> Result<Option<i64>, IoError> {
        col.map_or(Ok(None), |c| self.int(c))
    }

    /// Nullable integer cell that must fit in `u8`.
    pub(crate) fn small(&self, col: &Column) -> Result<Option<u8>, IoError> {
        match self.int(col)? {
            None => Ok(None),
            Some(v) => u8::try_from(v).map(Some).map_err(|_| self.invalid(col)),
        }
    }

    /// Nullable `weekday_weekend` cell.
    pub(crate) fn day_type(&self, col: &Column) -> Result<Option<DayType>, IoError> {
        match self.text(col) {
            None => Ok(None),
            Some(s) => s.parse().map(Some).map_err(|_| self.invalid(col)),
        }
    }

    /// Required date cell. A trailing time-of-day is ignored.
    pub(crate) fn date(&self, col: &Column) -> Result<NaiveDate, IoError> {
        let s = self.required_text(col)?;
        let day = s.get(..10).unwrap_or(s);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| self.invalid(col))
    }
}

/// Returns `true` for cells that read as missing.
pub(crate) fn is_null(s: &str) -> bool {
    NULL_MARKERS.contains(&s.trim())
}

/// Parses an integer written either plainly or as an integral float.
pub(crate) fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let f = s.parse::<f64>().ok()?;
    (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
}

/// Normalises a categorical cell: integral floats lose their `.0`.
///
/// Numeric codes stored by spreadsheet tools as `3.0` compare equal to `3`
/// once normalised. Other text is returned trimmed.
pub(crate) fn normalise_category(s: &str) -> String {
    let s = s.trim();
    match parse_int(s) {
        Some(v) if s.contains('.') => v.to_string(),
        _ => s.to_string(),
    }
}
