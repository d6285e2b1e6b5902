//! Segmentation variables and the per-household category tables built from
//! the contextual inputs.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use meterstat_io::{
    EpcRecord, FileNames, ParticipantRecord, ReadTypeRecord, SurveyRecord, read_epc,
    read_exporters, read_participants, read_read_types, read_survey,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ContextError;
use crate::gas::no_gas_households;
use crate::pv::{pv_households, pv_label};
use crate::recode;

// ---------------------------------------------------------------------------
// SegmentVariable
// ---------------------------------------------------------------------------

/// Table a segmentation variable is drawn from. A household's membership
/// is decided by its row in that table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceTable {
    Survey,
    Epc,
    Participant,
    Solar,
}

/// A categorical household attribute statistics are broken down by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SegmentVariable {
    NumOccupants,
    ImdQuintile,
    EnergyRating,
    NumBedrooms,
    BuildingType,
    BuildingAge,
    FloorArea,
    Tenure,
    BoilerTypeElec,
    BoilerTypeGas,
    HasPv,
    HasEv,
    Region,
}

impl SegmentVariable {
    /// The published segmentation, in output order.
    pub const ALL: [SegmentVariable; 13] = [
        SegmentVariable::NumOccupants,
        SegmentVariable::ImdQuintile,
        SegmentVariable::EnergyRating,
        SegmentVariable::NumBedrooms,
        SegmentVariable::BuildingType,
        SegmentVariable::BuildingAge,
        SegmentVariable::FloorArea,
        SegmentVariable::Tenure,
        SegmentVariable::BoilerTypeElec,
        SegmentVariable::BoilerTypeGas,
        SegmentVariable::HasPv,
        SegmentVariable::HasEv,
        SegmentVariable::Region,
    ];

    /// Name used in the `segmentation_variable_1` column.
    pub fn name(self) -> &'static str {
        match self {
            SegmentVariable::NumOccupants => "num_occupants",
            SegmentVariable::ImdQuintile => "IMD_quintile",
            SegmentVariable::EnergyRating => "currentEnergyRating_merge",
            SegmentVariable::NumBedrooms => "num_bedrooms",
            SegmentVariable::BuildingType => "building_type_merge",
            SegmentVariable::BuildingAge => "building_age_merge",
            SegmentVariable::FloorArea => "floor_area_banded",
            SegmentVariable::Tenure => "tenure",
            SegmentVariable::BoilerTypeElec => "boiler_type_merge_for_elec_consumption",
            SegmentVariable::BoilerTypeGas => "boiler_type_merge_for_gas_consumption",
            SegmentVariable::HasPv => "has_pv",
            SegmentVariable::HasEv => "has_ev_merge",
            SegmentVariable::Region => "Region",
        }
    }

    /// Table the variable is drawn from.
    pub fn source(self) -> SourceTable {
        match self {
            SegmentVariable::ImdQuintile | SegmentVariable::Region => SourceTable::Participant,
            SegmentVariable::EnergyRating | SegmentVariable::FloorArea => SourceTable::Epc,
            SegmentVariable::HasPv => SourceTable::Solar,
            _ => SourceTable::Survey,
        }
    }
}

impl fmt::Display for SegmentVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SegmentVariable {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.name() == s.trim())
            .ok_or_else(|| ContextError::UnknownVariable {
                name: s.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// ContextTables
// ---------------------------------------------------------------------------

/// The raw contextual tables for one reporting year.
#[derive(Debug, Clone, Default)]
pub struct ContextTables {
    pub survey: Vec<SurveyRecord>,
    pub epc: Vec<EpcRecord>,
    pub participants: Vec<ParticipantRecord>,
    pub read_types: Vec<ReadTypeRecord>,
    pub exporters: Vec<String>,
}

impl ContextTables {
    /// Reads every contextual table from `dir`, using the exporter list of
    /// `year`.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Io`] naming the first table that cannot be
    /// read.
    pub fn load(dir: &Path, names: &FileNames, year: i32) -> Result<Self, ContextError> {
        let tables = Self {
            survey: read_survey(&dir.join(&names.survey))
                .map_err(|e| ContextError::io("survey", e))?,
            epc: read_epc(&dir.join(&names.epc)).map_err(|e| ContextError::io("EPC", e))?,
            participants: read_participants(&dir.join(&names.participants))
                .map_err(|e| ContextError::io("participant", e))?,
            read_types: read_read_types(&dir.join(&names.read_types))
                .map_err(|e| ContextError::io("read type", e))?,
            exporters: read_exporters(&dir.join(names.exporters(year)))
                .map_err(|e| ContextError::io("exporter", e))?,
        };
        info!(
            year,
            n_participants = tables.participants.len(),
            n_survey = tables.survey.len(),
            n_epc = tables.epc.len(),
            "loaded contextual tables"
        );
        Ok(tables)
    }
}

// ---------------------------------------------------------------------------
// SegmentColumn
// ---------------------------------------------------------------------------

/// One variable's value per household, in source-table row order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SegmentColumn {
    rows: Vec<(String, Option<String>)>,
}

impl SegmentColumn {
    /// Builds a column from `(PUPRN, value)` rows.
    pub fn new(rows: Vec<(String, Option<String>)>) -> Self {
        Self { rows }
    }

    /// Distinct non-null values in order of first appearance.
    pub fn values(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter_map(|(_, v)| v.as_deref())
            .filter(|v| seen.insert(*v))
            .collect()
    }

    /// Households whose value is `value`.
    pub fn members(&self, value: &str) -> BTreeSet<&str> {
        self.rows
            .iter()
            .filter(|(_, v)| v.as_deref() == Some(value))
            .map(|(p, _)| p.as_str())
            .collect()
    }

    /// Number of rows with a null value.
    pub fn null_count(&self) -> usize {
        self.rows.iter().filter(|(_, v)| v.is_none()).count()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Unmapped codes
// ---------------------------------------------------------------------------

/// Per-variable count of households whose code fell outside the mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct UnmappedCounts(BTreeMap<String, usize>);

impl UnmappedCounts {
    fn record(&mut self, variable: &str, n: usize) {
        if n > 0 {
            *self.0.entry(variable.to_string()).or_default() += n;
        }
    }

    /// Count for one variable.
    pub fn get(&self, variable: &str) -> usize {
        self.0.get(variable).copied().unwrap_or(0)
    }

    /// Total across all variables.
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// `(variable, count)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// A survey answer is present when it holds a code or text that is not one.
fn answered(survey: &SurveyRecord, code: Option<i64>, column: &str) -> bool {
    code.is_some() || survey.is_unreadable(column)
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Contextual tables recoded into segmentation columns.
#[derive(Debug, Clone)]
pub struct Context {
    tables: ContextTables,
    columns: BTreeMap<SegmentVariable, SegmentColumn>,
    no_gas: BTreeSet<String>,
    unmapped: UnmappedCounts,
}

impl Context {
    /// Recodes every segmentation variable and derives the no-gas set.
    ///
    /// Codes outside a variable's mapping become null values for that
    /// variable only; they are logged and counted in
    /// [`unmapped`](Self::unmapped).
    pub fn build(tables: ContextTables) -> Self {
        let mut columns = BTreeMap::new();
        let mut unmapped = UnmappedCounts::default();

        let survey_column = |f: &dyn Fn(&SurveyRecord) -> (bool, Option<String>)| {
            let mut n_unmapped = 0;
            let rows = tables
                .survey
                .iter()
                .map(|s| {
                    let (answered, value) = f(s);
                    if answered && value.is_none() {
                        n_unmapped += 1;
                    }
                    (s.puprn.clone(), value)
                })
                .collect();
            (SegmentColumn::new(rows), n_unmapped)
        };

        type Recode<'f> = &'f dyn Fn(&SurveyRecord) -> (bool, Option<String>);
        let survey_vars: [(SegmentVariable, Recode<'_>); 8] = [
            (SegmentVariable::NumOccupants, &|s| {
                (answered(s, s.c1_new, "C1_new"), s.c1_new.map(recode::num_occupants))
            }),
            (SegmentVariable::NumBedrooms, &|s| {
                (answered(s, s.b6, "B6"), s.b6.map(recode::num_bedrooms))
            }),
            (SegmentVariable::BuildingType, &|s| {
                let v = s.b1.and_then(recode::building_type);
                (answered(s, s.b1, "B1"), v.map(|t| recode::building_type_merge(t).to_string()))
            }),
            (SegmentVariable::BuildingAge, &|s| {
                let v = s.b9.and_then(recode::building_age);
                (answered(s, s.b9, "B9"), v.map(|a| recode::building_age_merge(a).to_string()))
            }),
            (SegmentVariable::Tenure, &|s| {
                (answered(s, s.b4, "B4"), s.b4.and_then(recode::tenure).map(str::to_string))
            }),
            (SegmentVariable::BoilerTypeElec, &|s| {
                let v = recode::boiler_type(s);
                (
                    answered(s, s.a3_sum, "A3_sum"),
                    v.map(|b| recode::boiler_type_merge_for_elec(b).to_string()),
                )
            }),
            // null heating answers fall into "Not gas", so nothing is unmapped
            (SegmentVariable::BoilerTypeGas, &|s| {
                let v = recode::boiler_type(s);
                (false, Some(recode::boiler_type_merge_for_gas(v).to_string()))
            }),
            (SegmentVariable::HasEv, &|s| {
                let v = s.c5.and_then(recode::has_ev);
                (answered(s, s.c5, "C5"), v.map(|e| recode::has_ev_merge(e).to_string()))
            }),
        ];
        for (var, f) in survey_vars {
            let (col, n) = survey_column(f);
            unmapped.record(var.name(), n);
            columns.insert(var, col);
        }

        let epc_rows = |f: fn(&EpcRecord) -> Option<String>| {
            SegmentColumn::new(tables.epc.iter().map(|e| (e.puprn.clone(), f(e))).collect())
        };
        columns.insert(
            SegmentVariable::EnergyRating,
            epc_rows(|e| {
                e.current_energy_rating
                    .as_deref()
                    .map(|r| recode::energy_rating_merge(r).to_string())
            }),
        );
        columns.insert(
            SegmentVariable::FloorArea,
            epc_rows(|e| {
                e.total_floor_area
                    .and_then(recode::floor_area_band)
                    .map(str::to_string)
            }),
        );

        columns.insert(
            SegmentVariable::ImdQuintile,
            SegmentColumn::new(
                tables
                    .participants
                    .iter()
                    .map(|p| (p.puprn.clone(), p.imd_quintile.clone()))
                    .collect(),
            ),
        );
        columns.insert(
            SegmentVariable::Region,
            SegmentColumn::new(
                tables
                    .participants
                    .iter()
                    .map(|p| (p.puprn.clone(), p.region.clone()))
                    .collect(),
            ),
        );

        let pv = pv_households(&tables.epc, &tables.exporters);
        let mut seen = HashSet::new();
        let solar_rows = tables
            .participants
            .iter()
            .filter(|p| seen.insert(p.puprn.as_str()))
            .map(|p| {
                let label = pv_label(pv.contains(p.puprn.as_str()));
                (p.puprn.clone(), Some(label.to_string()))
            })
            .collect();
        columns.insert(SegmentVariable::HasPv, SegmentColumn::new(solar_rows));

        for (variable, count) in unmapped.iter() {
            warn!(variable, count, "codes outside the recoding table; excluded from segment");
        }

        let no_gas = no_gas_households(
            &tables.participants,
            &tables.survey,
            &tables.epc,
            &tables.read_types,
        );
        info!(
            n_no_gas = no_gas.len(),
            n_pv = pv.len(),
            n_unmapped = unmapped.total(),
            "built segmentation context"
        );

        Self {
            tables,
            columns,
            no_gas,
            unmapped,
        }
    }

    /// The recoded column for `variable`.
    pub fn column(&self, variable: SegmentVariable) -> &SegmentColumn {
        static EMPTY: SegmentColumn = SegmentColumn { rows: Vec::new() };
        self.columns.get(&variable).unwrap_or(&EMPTY)
    }

    /// Households confirmed to have no gas supply.
    pub fn no_gas(&self) -> &BTreeSet<String> {
        &self.no_gas
    }

    /// Unmapped code counts per variable.
    pub fn unmapped(&self) -> &UnmappedCounts {
        &self.unmapped
    }

    /// The raw tables the context was built from.
    pub fn tables(&self) -> &ContextTables {
        &self.tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_names_round_trip() {
        for var in SegmentVariable::ALL {
            assert_eq!(var.name().parse::<SegmentVariable>().unwrap(), var);
        }
        assert!("pets".parse::<SegmentVariable>().is_err());
    }

    #[test]
    fn sources() {
        assert_eq!(SegmentVariable::Region.source(), SourceTable::Participant);
        assert_eq!(SegmentVariable::FloorArea.source(), SourceTable::Epc);
        assert_eq!(SegmentVariable::HasPv.source(), SourceTable::Solar);
        assert_eq!(SegmentVariable::Tenure.source(), SourceTable::Survey);
    }

    #[test]
    fn column_values_in_first_appearance_order() {
        let col = SegmentColumn::new(vec![
            ("A".into(), Some("3".into())),
            ("B".into(), None),
            ("C".into(), Some("1".into())),
            ("D".into(), Some("3".into())),
        ]);
        assert_eq!(col.values(), vec!["3", "1"]);
        assert_eq!(col.members("3").into_iter().collect::<Vec<_>>(), vec!["A", "D"]);
        assert_eq!(col.null_count(), 1);
        assert_eq!(col.len(), 4);
    }

    #[test]
    fn unmapped_counts_skip_zero() {
        let mut counts = UnmappedCounts::default();
        counts.record("tenure", 0);
        counts.record("tenure", 2);
        counts.record("has_ev_merge", 1);
        assert_eq!(counts.get("tenure"), 2);
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.iter().count(), 2);
    }
}
