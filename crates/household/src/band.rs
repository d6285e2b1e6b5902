//! Outdoor temperature bands.

use std::fmt;
use std::str::FromStr;

use crate::error::HouseholdError;

/// Bounds of the bands published by default, in publication order.
pub const DEFAULT_BAND_BOUNDS: [(f64, f64); 5] = [
    (0.0, 5.0),
    (5.0, 10.0),
    (10.0, 15.0),
    (15.0, 20.0),
    (4.5, 5.5),
];

/// A half-open temperature range `[low, high)` in degrees Celsius, labelled
/// `"{low}_to_{high}"`.
///
/// Bands may overlap; a day counts towards every band containing its mean
/// temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureBand {
    low: f64,
    high: f64,
    label: String,
}

impl TemperatureBand {
    /// Creates a band.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdError::InvalidBand`] unless both bounds are finite
    /// and `low < high`.
    pub fn new(low: f64, high: f64) -> Result<Self, HouseholdError> {
        let label = format!("{low}_to_{high}");
        if !low.is_finite() || !high.is_finite() {
            return Err(HouseholdError::InvalidBand {
                label,
                reason: "bounds must be finite".to_string(),
            });
        }
        if low >= high {
            return Err(HouseholdError::InvalidBand {
                label,
                reason: "lower bound must be below upper bound".to_string(),
            });
        }
        Ok(Self { low, high, label })
    }

    /// The default bands: `0_to_5`, `5_to_10`, `10_to_15`, `15_to_20` and
    /// `4.5_to_5.5`.
    pub fn defaults() -> Vec<Self> {
        DEFAULT_BAND_BOUNDS
            .iter()
            .map(|&(low, high)| Self {
                low,
                high,
                label: format!("{low}_to_{high}"),
            })
            .collect()
    }

    /// Inclusive lower bound.
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Exclusive upper bound.
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Label written to the `temp_band` column.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether `temp` falls in `[low, high)`.
    pub fn contains(&self, temp: f64) -> bool {
        temp >= self.low && temp < self.high
    }
}

impl fmt::Display for TemperatureBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl FromStr for TemperatureBand {
    type Err = HouseholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| HouseholdError::InvalidBand {
            label: s.to_string(),
            reason: reason.to_string(),
        };
        let (low, high) = s
            .split_once("_to_")
            .ok_or_else(|| invalid("expected '<low>_to_<high>'"))?;
        let low: f64 = low
            .trim()
            .parse()
            .map_err(|_| invalid("lower bound is not a number"))?;
        let high: f64 = high
            .trim()
            .parse()
            .map_err(|_| invalid("upper bound is not a number"))?;
        Self::new(low, high)
    }
}
