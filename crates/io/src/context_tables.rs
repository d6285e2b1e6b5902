//! Contextual tables: survey, EPC, participant summary, meter read types
//! and the exporter list.
//!
//! Values are kept as coded in the source files. Turning codes into named
//! categories is the job of the context crate.

use std::path::Path;

use tracing::{info, warn};

use crate::csv_read::{Column, CsvSource, Row, normalise_category, parse_int};
use crate::error::IoError;

/// Survey answers used for segmentation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SurveyRecord {
    /// Pseudonymised property reference.
    pub puprn: String,
    /// Number of occupants (C1_new).
    pub c1_new: Option<i64>,
    /// Number of bedrooms (B6).
    pub b6: Option<i64>,
    /// Number of heating systems ticked (A3_sum).
    pub a3_sum: Option<i64>,
    /// Heating system ticks A301..=A310, index 0 holding A301.
    pub a3: [Option<i64>; 10],
    /// Building type code (B1).
    pub b1: Option<i64>,
    /// Tenure code (B4).
    pub b4: Option<i64>,
    /// Building age code (B9).
    pub b9: Option<i64>,
    /// Electric vehicle code (C5).
    pub c5: Option<i64>,
    /// Columns whose cell held non-numeric text, read as null.
    pub unreadable: Vec<String>,
}

impl SurveyRecord {
    /// Tick for heating option `A3nn`, `option` in 1..=10.
    pub fn a3_option(&self, option: usize) -> Option<i64> {
        option
            .checked_sub(1)
            .and_then(|i| self.a3.get(i).copied().flatten())
    }

    /// Whether `column` held text that is not a code.
    pub fn is_unreadable(&self, column: &str) -> bool {
        self.unreadable.iter().any(|c| c == column)
    }
}

/// Energy Performance Certificate fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EpcRecord {
    /// Pseudonymised property reference.
    pub puprn: String,
    /// Total floor area, m².
    pub total_floor_area: Option<f64>,
    /// Energy rating letter A..=G.
    pub current_energy_rating: Option<String>,
    /// Raw `photoSupply`; numeric in England and Wales, free text in Scotland.
    pub photo_supply: Option<String>,
    /// Certificate regime, e.g. `England and Wales` or `Scotland`.
    pub epc_version: Option<String>,
    /// Main heating fuel description.
    pub main_fuel: Option<String>,
}

/// Participant summary fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParticipantRecord {
    /// Pseudonymised property reference.
    pub puprn: String,
    /// Index of Multiple Deprivation quintile, normalised text.
    pub imd_quintile: Option<String>,
    /// Region name.
    pub region: Option<String>,
}

/// Smart meter read-type summary.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReadTypeRecord {
    /// Pseudonymised property reference.
    pub puprn: String,
    /// Device type code, e.g. `GPF` for a gas proxy function.
    pub device_type: Option<String>,
}

/// Reads the survey table.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `path` is absent,
/// [`IoError::MissingColumn`] for a missing survey column, or
/// [`IoError::InvalidValue`] for a missing `PUPRN`. Non-numeric codes read as
/// null and are listed in [`SurveyRecord::unreadable`].
pub fn read_survey(path: &Path) -> Result<Vec<SurveyRecord>, IoError> {
    let mut src = CsvSource::open(path)?;
    let puprn = src.column("PUPRN")?;
    let c1 = src.column("C1_new")?;
    let b6 = src.column("B6")?;
    let a3_sum = src.column("A3_sum")?;
    let a3 = (1..=10)
        .map(|i| src.column(&format!("A3{i:02}")))
        .collect::<Result<Vec<_>, _>>()?;
    let b1 = src.column("B1")?;
    let b4 = src.column("B4")?;
    let b9 = src.column("B9")?;
    let c5 = src.column("C5")?;

    let mut out = Vec::new();
    let mut n_unreadable = 0;
    src.for_each(|row| {
        let mut unreadable = Vec::new();
        let mut code = |col: &Column| survey_code(row, col, &mut unreadable);
        let mut ticks = [None; 10];
        for (slot, col) in ticks.iter_mut().zip(&a3) {
            *slot = code(col);
        }
        let record = SurveyRecord {
            puprn: row.required_text(&puprn)?.to_string(),
            c1_new: code(&c1),
            b6: code(&b6),
            a3_sum: code(&a3_sum),
            a3: ticks,
            b1: code(&b1),
            b4: code(&b4),
            b9: code(&b9),
            c5: code(&c5),
            unreadable,
        };
        n_unreadable += record.unreadable.len();
        out.push(record);
        Ok(())
    })?;
    if n_unreadable > 0 {
        warn!(path = %path.display(), n_unreadable, "non-numeric survey codes read as null");
    }
    info!(path = %path.display(), n_rows = out.len(), "read survey");
    Ok(out)
}

fn survey_code(row: &Row<'_>, col: &Column, unreadable: &mut Vec<String>) -> Option<i64> {
    let text = row.text(col)?;
    let code = parse_int(text);
    if code.is_none() {
        unreadable.push(col.name().to_string());
    }
    code
}

/// Reads the EPC table.
///
/// # Errors
///
/// As [`read_survey`].
pub fn read_epc(path: &Path) -> Result<Vec<EpcRecord>, IoError> {
    let mut src = CsvSource::open(path)?;
    let puprn = src.column("PUPRN")?;
    let area = src.column("totalFloorArea")?;
    let rating = src.column("currentEnergyRating")?;
    let photo = src.column("photoSupply")?;
    let version = src.column("epcVersion")?;
    let fuel = src.column("mainFuel")?;

    let mut out = Vec::new();
    src.for_each(|row| {
        out.push(EpcRecord {
            puprn: row.required_text(&puprn)?.to_string(),
            total_floor_area: row.f64(&area)?,
            current_energy_rating: row.text(&rating).map(str::to_string),
            photo_supply: row.text(&photo).map(str::to_string),
            epc_version: row.text(&version).map(str::to_string),
            main_fuel: row.text(&fuel).map(str::to_string),
        });
        Ok(())
    })?;
    info!(path = %path.display(), n_rows = out.len(), "read EPC");
    Ok(out)
}

/// Reads the participant summary table.
///
/// # Errors
///
/// As [`read_survey`].
pub fn read_participants(path: &Path) -> Result<Vec<ParticipantRecord>, IoError> {
    let mut src = CsvSource::open(path)?;
    let puprn = src.column("PUPRN")?;
    let imd = src.column("IMD_quintile")?;
    let region = src.column("Region")?;

    let mut out = Vec::new();
    src.for_each(|row| {
        out.push(ParticipantRecord {
            puprn: row.required_text(&puprn)?.to_string(),
            imd_quintile: row.text(&imd).map(normalise_category),
            region: row.text(&region).map(str::to_string),
        });
        Ok(())
    })?;
    info!(path = %path.display(), n_rows = out.len(), "read participant summary");
    Ok(out)
}

/// Reads the smart meter read-type summary.
///
/// # Errors
///
/// As [`read_survey`].
pub fn read_read_types(path: &Path) -> Result<Vec<ReadTypeRecord>, IoError> {
    let mut src = CsvSource::open(path)?;
    let puprn = src.column("PUPRN")?;
    let device = src.column("deviceType")?;

    let mut out = Vec::new();
    src.for_each(|row| {
        out.push(ReadTypeRecord {
            puprn: row.required_text(&puprn)?.to_string(),
            device_type: row.text(&device).map(str::to_string),
        });
        Ok(())
    })?;
    info!(path = %path.display(), n_rows = out.len(), "read meter read types");
    Ok(out)
}

/// Reads a headerless single-column list of exporting households.
///
/// Blank lines are skipped.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `path` is absent or [`IoError::Csv`]
/// if it cannot be parsed.
pub fn read_exporters(path: &Path) -> Result<Vec<String>, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| IoError::csv(path, e))?;

    let mut out = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IoError::csv(path, e))?;
        if let Some(puprn) = record.get(0).filter(|s| !s.is_empty()) {
            out.push(puprn.to_string());
        }
    }
    info!(path = %path.display(), n_rows = out.len(), "read exporter list");
    Ok(out)
}
