//! Disclosure rules and segmentation plans.

use meterstat_context::SegmentVariable;
use meterstat_stats::NearestQuantile;

use crate::error::SdcError;

/// Temperature band labels published by default.
pub const DEFAULT_BAND_LABELS: [&str; 5] =
    ["0_to_5", "5_to_10", "10_to_15", "15_to_20", "4.5_to_5.5"];

/// Disclosure-control settings applied to every published statistic.
///
/// # Example
///
/// ```
/// use meterstat_sdc::SdcConfig;
///
/// let config = SdcConfig::default()
///     .with_floor_moments(true)
///     .with_suppress_zero(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SdcConfig {
    quantile: NearestQuantile,
    decimals: u32,
    floor_moments: bool,
    suppress_zero: bool,
}

impl Default for SdcConfig {
    fn default() -> Self {
        Self {
            quantile: NearestQuantile::default(),
            decimals: 3,
            floor_moments: false,
            suppress_zero: false,
        }
    }
}

impl SdcConfig {
    /// Sets the quantile estimator.
    pub fn with_quantile(mut self, quantile: NearestQuantile) -> Self {
        self.quantile = quantile;
        self
    }

    /// Sets the rounding precision of means, standard deviations and
    /// auxiliary temperature and HDD means.
    pub fn with_decimals(mut self, dp: u32) -> Self {
        self.decimals = dp;
        self
    }

    /// Withholds means and standard deviations of samples at or below the
    /// quantile estimator's minimum count.
    pub fn with_floor_moments(mut self, on: bool) -> Self {
        self.floor_moments = on;
        self
    }

    /// Withholds any value that rounds to exactly zero.
    pub fn with_suppress_zero(mut self, on: bool) -> Self {
        self.suppress_zero = on;
        self
    }

    /// Returns the quantile estimator.
    pub fn quantile(&self) -> &NearestQuantile {
        &self.quantile
    }

    /// Returns the rounding precision.
    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Returns whether means and standard deviations are floored.
    pub fn floor_moments(&self) -> bool {
        self.floor_moments
    }

    /// Returns whether zero values are withheld.
    pub fn suppress_zero(&self) -> bool {
        self.suppress_zero
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SdcError::Stats`] for an inconsistent quantile estimator,
    /// or [`SdcError::InvalidConfig`] for a precision above 12 places.
    pub fn validate(&self) -> Result<(), SdcError> {
        self.quantile.validate()?;
        if self.decimals > 12 {
            return Err(SdcError::InvalidConfig {
                reason: format!("decimals must be at most 12, got {}", self.decimals),
            });
        }
        Ok(())
    }
}

/// What the segmentation engine publishes besides the whole population.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationConfig {
    variables: Vec<SegmentVariable>,
    bands: Vec<String>,
    weekday_weekend: bool,
    heating_season: bool,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            variables: SegmentVariable::ALL.to_vec(),
            bands: DEFAULT_BAND_LABELS.iter().map(|s| s.to_string()).collect(),
            weekday_weekend: true,
            heating_season: true,
        }
    }
}

impl SegmentationConfig {
    /// Sets the segmentation variables, in publication order.
    pub fn with_variables(mut self, variables: Vec<SegmentVariable>) -> Self {
        self.variables = variables;
        self
    }

    /// Sets the temperature band labels to publish.
    pub fn with_bands(mut self, bands: Vec<String>) -> Self {
        self.bands = bands;
        self
    }

    /// Enables or disables the weekday and weekend passes.
    pub fn with_weekday_weekend(mut self, on: bool) -> Self {
        self.weekday_weekend = on;
        self
    }

    /// Enables or disables the heating-season pass.
    pub fn with_heating_season(mut self, on: bool) -> Self {
        self.heating_season = on;
        self
    }

    /// Returns the segmentation variables.
    pub fn variables(&self) -> &[SegmentVariable] {
        &self.variables
    }

    /// Returns the temperature band labels.
    pub fn bands(&self) -> &[String] {
        &self.bands
    }

    /// Returns whether the weekday and weekend passes run.
    pub fn weekday_weekend(&self) -> bool {
        self.weekday_weekend
    }

    /// Returns whether the heating-season pass runs.
    pub fn heating_season(&self) -> bool {
        self.heating_season
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SdcError::InvalidConfig`] if a variable or band is listed
    /// twice.
    pub fn validate(&self) -> Result<(), SdcError> {
        for (i, v) in self.variables.iter().enumerate() {
            if self.variables[..i].contains(v) {
                return Err(SdcError::InvalidConfig {
                    reason: format!("segmentation variable '{v}' listed twice"),
                });
            }
        }
        for (i, b) in self.bands.iter().enumerate() {
            if self.bands[..i].contains(b) {
                return Err(SdcError::InvalidConfig {
                    reason: format!("temperature band '{b}' listed twice"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sdc_defaults() {
        let config = SdcConfig::default();
        assert_eq!(config.decimals(), 3);
        assert_eq!(config.quantile().neighbours(), 10);
        assert_eq!(config.quantile().min_count(), 10);
        assert!(!config.floor_moments());
        assert!(!config.suppress_zero());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn sdc_rejects_bad_estimator() {
        let config =
            SdcConfig::default().with_quantile(NearestQuantile::default().with_neighbours(0));
        assert!(matches!(config.validate(), Err(SdcError::Stats { .. })));
    }

    #[test]
    fn segmentation_defaults() {
        let config = SegmentationConfig::default();
        assert_eq!(config.variables().len(), 13);
        assert_eq!(config.bands().len(), 5);
        assert!(config.weekday_weekend());
        assert!(config.heating_season());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn segmentation_rejects_duplicates() {
        let config = SegmentationConfig::default()
            .with_variables(vec![SegmentVariable::Tenure, SegmentVariable::Tenure]);
        assert!(config.validate().is_err());

        let config = SegmentationConfig::default()
            .with_bands(vec!["0_to_5".to_string(), "0_to_5".to_string()]);
        assert!(config.validate().is_err());
    }
}
