//! Configuration for profile building.

use crate::band::TemperatureBand;
use crate::error::HouseholdError;

/// Configuration for [`crate::monthly_daily_profiles`] and the other
/// profile builders.
///
/// # Example
///
/// ```
/// use meterstat_household::ProfileConfig;
///
/// let config = ProfileConfig::new().with_missing_threshold(0.75);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct ProfileConfig {
    missing_threshold: f64,
    bands: Vec<TemperatureBand>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileConfig {
    /// Creates a configuration with defaults.
    ///
    /// Defaults: `missing_threshold = 0.5`, the five default temperature
    /// bands.
    pub fn new() -> Self {
        Self {
            missing_threshold: 0.5,
            bands: TemperatureBand::defaults(),
        }
    }

    /// Sets the minimum share of non-missing readings a slice needs before a
    /// fuel mean is reported.
    pub fn with_missing_threshold(mut self, threshold: f64) -> Self {
        self.missing_threshold = threshold;
        self
    }

    /// Sets the temperature bands.
    pub fn with_bands(mut self, bands: Vec<TemperatureBand>) -> Self {
        self.bands = bands;
        self
    }

    /// Returns the missing-data threshold.
    pub fn missing_threshold(&self) -> f64 {
        self.missing_threshold
    }

    /// Returns the temperature bands.
    pub fn bands(&self) -> &[TemperatureBand] {
        &self.bands
    }

    /// Validates this configuration.
    ///
    /// The threshold must lie in `(0, 1]` and at least one band is needed.
    pub fn validate(&self) -> Result<(), HouseholdError> {
        let t = self.missing_threshold;
        if !t.is_finite() || t <= 0.0 || t > 1.0 {
            return Err(HouseholdError::InvalidConfig {
                reason: format!("missing_threshold must be in (0, 1], got {t}"),
            });
        }
        if self.bands.is_empty() {
            return Err(HouseholdError::InvalidConfig {
                reason: "at least one temperature band is required".to_string(),
            });
        }
        Ok(())
    }
}
