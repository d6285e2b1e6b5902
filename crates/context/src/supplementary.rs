//! Mean floor area, bedroom and occupant counts per published segment.
//!
//! Figures describe every household in the contextual tables, not only those
//! with enough meter data to enter the energy statistics.

use std::collections::BTreeSet;

use meterstat_stats::mean;
use tracing::{info, warn};

use crate::recode::NO_DATA;
use crate::segments::{Context, SegmentVariable};

/// Counts at or below this are flagged for review.
const REVIEW_COUNT: usize = 10;

/// One row of the supplementary table.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplementaryRow {
    /// Segmentation variable, or `None` for whole-sample rows.
    pub segmentation_variable: String,
    /// Segment value, or `None` for whole-sample rows.
    pub segment_value: String,
    pub mean_floor_area: Option<f64>,
    /// EPC rows for the segment, including those without a floor area.
    pub n_mean_floor_area: usize,
    pub mean_bedrooms: Option<f64>,
    pub n_mean_bedrooms: usize,
    pub mean_occupants: Option<f64>,
    pub n_mean_occupants: usize,
}

impl SupplementaryRow {
    /// Whether any count is small enough to need review before release.
    pub fn needs_review(&self) -> bool {
        [self.n_mean_floor_area, self.n_mean_bedrooms, self.n_mean_occupants]
            .iter()
            .any(|&n| n <= REVIEW_COUNT)
    }
}

struct Figures {
    mean_floor_area: Option<f64>,
    n_floor_area: usize,
    mean_bedrooms: Option<f64>,
    n_bedrooms: usize,
    mean_occupants: Option<f64>,
    n_occupants: usize,
}

/// Figures over the households selected by `members`; `None` selects all.
fn figures(context: &Context, members: Option<&BTreeSet<&str>>) -> Figures {
    let tables = context.tables();
    let selected = |puprn: &str| members.is_none_or(|m| m.contains(puprn));

    let epc: Vec<_> = tables.epc.iter().filter(|e| selected(e.puprn.as_str())).collect();
    let areas: Vec<f64> = epc.iter().filter_map(|e| e.total_floor_area).collect();

    let survey: Vec<_> = tables.survey.iter().filter(|s| selected(s.puprn.as_str())).collect();
    let positive = |codes: Vec<Option<i64>>| -> Vec<f64> {
        codes
            .into_iter()
            .flatten()
            .filter(|&c| c > 0)
            .map(|c| c as f64)
            .collect()
    };
    let bedrooms = positive(survey.iter().map(|s| s.b6).collect());
    let occupants = positive(survey.iter().map(|s| s.c1_new).collect());

    Figures {
        mean_floor_area: mean(&areas),
        n_floor_area: epc.len(),
        mean_bedrooms: mean(&bedrooms),
        n_bedrooms: bedrooms.len(),
        mean_occupants: mean(&occupants),
        n_occupants: occupants.len(),
    }
}

fn row(variable: &str, value: &str, f: &Figures) -> SupplementaryRow {
    SupplementaryRow {
        segmentation_variable: variable.to_string(),
        segment_value: value.to_string(),
        mean_floor_area: f.mean_floor_area,
        n_mean_floor_area: f.n_floor_area,
        mean_bedrooms: f.mean_bedrooms,
        n_mean_bedrooms: f.n_bedrooms,
        mean_occupants: f.mean_occupants,
        n_mean_occupants: f.n_occupants,
    }
}

/// Builds the supplementary table.
///
/// Rows come in this order: the whole sample (`None`/`None`), one
/// whole-sample row per temperature band and per weekday/weekend value, then
/// one row per value of each variable in `variables`. For the `No data`
/// values of `num_occupants` and `num_bedrooms` the count is of negative
/// codes, since those households have no positive answer to average.
pub fn supplementary_rows(
    context: &Context,
    variables: &[SegmentVariable],
    temperature_bands: &[String],
) -> Vec<SupplementaryRow> {
    let whole = figures(context, None);
    let mut rows = vec![row("None", "None", &whole)];
    rows.extend(
        temperature_bands
            .iter()
            .map(|band| row("temperature band", band, &whole)),
    );
    rows.extend(
        ["weekday", "weekend"]
            .into_iter()
            .map(|d| row("weekday_weekend", d, &whole)),
    );

    let survey = &context.tables().survey;
    for &variable in variables {
        let column = context.column(variable);
        for value in column.values() {
            let members = column.members(value);
            let mut r = row(variable.name(), value, &figures(context, Some(&members)));

            if value == NO_DATA {
                let negatives = |code: fn(&meterstat_io::SurveyRecord) -> Option<i64>| {
                    survey
                        .iter()
                        .filter(|s| members.contains(s.puprn.as_str()))
                        .filter(|s| code(s).is_some_and(|c| c < 0))
                        .count()
                };
                match variable {
                    SegmentVariable::NumOccupants => r.n_mean_occupants = negatives(|s| s.c1_new),
                    SegmentVariable::NumBedrooms => r.n_mean_bedrooms = negatives(|s| s.b6),
                    _ => {}
                }
            }
            rows.push(r);
        }
    }

    let n_review = rows.iter().filter(|r| r.needs_review()).count();
    if n_review > 0 {
        warn!(n_review, "supplementary rows with counts of 10 or fewer; check before release");
    }
    info!(n_rows = rows.len(), "built supplementary segment information");
    rows
}
