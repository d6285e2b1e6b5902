//! Survey and EPC codes to named categories, and the merges applied so that
//! each published segment is large enough.
//!
//! Every function maps one coded value. `None` means the code lies outside
//! the variable's domain; callers count those as unmapped.

use meterstat_io::SurveyRecord;

/// Label for a missing or refused answer.
pub const NO_DATA: &str = "No data";

// ---------------------------------------------------------------------------
// Survey
// ---------------------------------------------------------------------------

/// Occupant count from `C1_new`: 1..=5 literal, 6 or more `>=6`, zero or
/// negative `No data`.
pub fn num_occupants(c1_new: i64) -> String {
    match c1_new {
        1..=5 => c1_new.to_string(),
        6.. => ">=6".to_string(),
        _ => NO_DATA.to_string(),
    }
}

/// Bedroom count from `B6`: 1..=4 literal, 5 or more `>=5`, zero or negative
/// `No data`.
pub fn num_bedrooms(b6: i64) -> String {
    match b6 {
        1..=4 => b6.to_string(),
        5.. => ">=5".to_string(),
        _ => NO_DATA.to_string(),
    }
}

/// Heating system names for `A302..=A310`.
const HEATING_OPTIONS: [(usize, &str); 9] = [
    (2, "Gas boiler"),
    (3, "Electric storage radiators"),
    (4, "Electric radiators"),
    (5, "Other electric"),
    (6, "Oil"),
    (7, "Solid fuel"),
    (8, "Biomass"),
    (9, "District or community"),
    (10, "Other"),
];

/// Main heating system from `A3_sum` and the `A301..=A310` ticks.
///
/// A single tick names its system; several ticks give `Gas boiler plus
/// other` or `Other mix` depending on `A302`; no tick, or a lone `A301`,
/// gives `None`. Rules apply in that order and later rules win.
pub fn boiler_type(survey: &SurveyRecord) -> Option<&'static str> {
    let sum = survey.a3_sum?;
    let ticked = |option: usize| survey.a3_option(option) == Some(1);

    let mut label = None;
    if sum == 1 {
        for (option, name) in HEATING_OPTIONS {
            if ticked(option) {
                label = Some(name);
            }
        }
    }
    if sum > 1 {
        match survey.a3_option(2) {
            Some(1) => label = Some("Gas boiler plus other"),
            Some(0) => label = Some("Other mix"),
            _ => {}
        }
    }
    if sum == 0 || (sum == 1 && ticked(1)) {
        label = Some("None");
    }
    label
}

/// Building type from `B1`.
pub fn building_type(b1: i64) -> Option<&'static str> {
    Some(match b1 {
        1 => "Detached",
        2 => "Semi-detached",
        3 => "Terraced",
        4 => "Purpose-built flat",
        5 => "Converted flat or shared house",
        6 => "Commercial building",
        -2 => "No answer",
        _ => return None,
    })
}

/// Tenure from `B4`.
pub fn tenure(b4: i64) -> Option<&'static str> {
    Some(match b4 {
        1 => "Own outright or mortgage",
        2 => "Part-own part-rent",
        3 => "Private rent",
        4 => "Social rent",
        5 => "Rent free",
        -2 => "No answer",
        _ => return None,
    })
}

/// Building age band from `B9`.
pub fn building_age(b9: i64) -> Option<&'static str> {
    Some(match b9 {
        1 => "Before 1900",
        2 => "1900 - 1929",
        3 => "1930 - 1949",
        4 => "1950 - 1975",
        5 => "1976 - 1990",
        6 => "1990 - 2002",
        7 => "2003 onwards",
        -1 => "Unknown",
        -2 => "No answer",
        _ => return None,
    })
}

/// Electric vehicle ownership from `C5`.
pub fn has_ev(c5: i64) -> Option<&'static str> {
    Some(match c5 {
        1 => "Yes",
        2 => "No",
        -1 => "Unknown",
        -2 => "No answer",
        _ => return None,
    })
}

// ---------------------------------------------------------------------------
// EPC
// ---------------------------------------------------------------------------

/// Floor area band from `totalFloorArea` in m².
pub fn floor_area_band(area: f64) -> Option<&'static str> {
    if area.is_nan() {
        return None;
    }
    Some(if area <= 50.0 {
        "50 or less"
    } else if area <= 100.0 {
        "50 to 100"
    } else if area <= 150.0 {
        "101 to 150"
    } else if area <= 200.0 {
        "151 to 200"
    } else {
        "Over 200"
    })
}

// ---------------------------------------------------------------------------
// Merges
// ---------------------------------------------------------------------------

/// Commercial buildings and unanswered building types form one segment.
pub fn building_type_merge(building_type: &str) -> &str {
    match building_type {
        "No answer" | "Commercial building" => "Commercial building or no answer",
        other => other,
    }
}

/// Heating groups for electricity statistics.
pub fn boiler_type_merge_for_elec(boiler_type: &str) -> &str {
    match boiler_type {
        "Oil" | "Solid fuel" | "Biomass" => "Oil, solid fuel or biomass",
        "Other mix" | "Other" => "Other or other mix",
        other => other,
    }
}

/// Heating groups for gas statistics: every non-gas system is one group,
/// including households with no recorded heating system.
pub fn boiler_type_merge_for_gas(boiler_type: Option<&str>) -> &str {
    match boiler_type {
        Some(gas @ ("Gas boiler" | "Gas boiler plus other")) => gas,
        _ => "Not gas",
    }
}

/// Unknown and unanswered building ages form one segment.
pub fn building_age_merge(building_age: &str) -> &str {
    match building_age {
        "Unknown" | "No answer" => NO_DATA,
        other => other,
    }
}

/// Unknown and unanswered EV ownership form one segment.
pub fn has_ev_merge(has_ev: &str) -> &str {
    match has_ev {
        "Unknown" | "No answer" => NO_DATA,
        other => other,
    }
}

/// EPC ratings A with B and F with G.
pub fn energy_rating_merge(rating: &str) -> &str {
    match rating.trim() {
        "A" | "B" => "A and B",
        "F" | "G" => "F and G",
        other => other,
    }
}
