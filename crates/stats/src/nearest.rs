//! Disclosure-safe quantile: the mean of the values nearest the raw quantile.
//!
//! A raw quantile can coincide with a single household's value. Averaging the
//! `neighbours` values closest to it (10 by default) means no published figure
//! describes fewer than that many households, and samples at or below
//! `min_count` present values (10 by default) yield no figure at all.

use crate::error::StatsError;
use crate::moments::round_dp;
use crate::quantile::{quantile_type7, sorted};

/// A published quantile with its disclosure metadata.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantileEstimate {
    /// Rounded mean of the nearest values.
    pub value: f64,
    /// How many values were averaged.
    pub n: usize,
    /// Decimal places `value` was rounded to.
    pub decimals: u32,
}

/// Settings for the nearest-neighbour quantile estimator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearestQuantile {
    neighbours: usize,
    min_count: usize,
    decimals: u32,
}

impl Default for NearestQuantile {
    fn default() -> Self {
        Self {
            neighbours: 10,
            min_count: 10,
            decimals: 3,
        }
    }
}

impl NearestQuantile {
    /// Set the number of values averaged around the raw quantile.
    pub fn with_neighbours(mut self, n: usize) -> Self {
        self.neighbours = n;
        self
    }

    /// Set the count at or below which no quantile is published.
    pub fn with_min_count(mut self, n: usize) -> Self {
        self.min_count = n;
        self
    }

    /// Set the rounding precision.
    pub fn with_decimals(mut self, dp: u32) -> Self {
        self.decimals = dp;
        self
    }

    /// Returns the number of averaged neighbours.
    pub fn neighbours(&self) -> usize {
        self.neighbours
    }

    /// Returns the suppression floor.
    pub fn min_count(&self) -> usize {
        self.min_count
    }

    /// Returns the rounding precision.
    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Checks that every published figure averages exactly `neighbours`
    /// values.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidConfig`] if `neighbours` is zero or exceeds
    /// `min_count + 1`, the smallest sample that is ever published.
    pub fn validate(&self) -> Result<(), StatsError> {
        if self.neighbours == 0 {
            return Err(StatsError::InvalidConfig {
                reason: "neighbours must be at least 1".to_string(),
            });
        }
        if self.neighbours > self.min_count + 1 {
            return Err(StatsError::InvalidConfig {
                reason: format!(
                    "neighbours ({}) exceeds the smallest published sample ({})",
                    self.neighbours,
                    self.min_count + 1
                ),
            });
        }
        Ok(())
    }

    /// Estimates quantile `q` of a nullable sample.
    ///
    /// Returns `Ok(None)` when the sample has `min_count` or fewer present
    /// values. Otherwise the raw type-7 quantile is located, the `neighbours`
    /// present values with the smallest absolute distance to it are taken
    /// (ties resolved by position in `sample`, earliest first), and their mean
    /// is rounded to `decimals` places.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidProbability`] if `q` is outside `[0, 1]`.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let sample: Vec<Option<f64>> = (1..=21).map(|x| Some(x as f64)).collect();
    /// let est = NearestQuantile::default().estimate(&sample, 0.5).unwrap().unwrap();
    /// assert_eq!(est.value, 10.5); // mean of 6..=15
    /// ```
    pub fn estimate(
        &self,
        sample: &[Option<f64>],
        q: f64,
    ) -> Result<Option<QuantileEstimate>, StatsError> {
        if !(0.0..=1.0).contains(&q) {
            return Err(StatsError::InvalidProbability { p: q });
        }

        let values: Vec<f64> = sample
            .iter()
            .filter_map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        if values.len() <= self.min_count {
            return Ok(None);
        }

        let Some(raw) = quantile_type7(&sorted(&values), q) else {
            return Ok(None);
        };

        // `values` keeps sample order, so a stable sort on distance breaks ties
        // by original position.
        let mut by_distance: Vec<f64> = values;
        by_distance.sort_by(|a, b| (a - raw).abs().total_cmp(&(b - raw).abs()));
        let nearest = &by_distance[..self.neighbours.min(by_distance.len())];

        let mean = nearest.iter().sum::<f64>() / nearest.len() as f64;
        Ok(Some(QuantileEstimate {
            value: round_dp(mean, self.decimals),
            n: nearest.len(),
            decimals: self.decimals,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(values: impl IntoIterator<Item = f64>) -> Vec<Option<f64>> {
        values.into_iter().map(Some).collect()
    }

    #[test]
    fn median_of_one_to_twenty_one() {
        let s = sample((1..=21).map(f64::from));
        let est = NearestQuantile::default().estimate(&s, 0.5).unwrap().unwrap();
        assert_eq!(est.value, 10.5);
        assert_eq!(est.n, 10);
        assert_eq!(est.decimals, 3);
    }

    #[test]
    fn ties_prefer_earlier_positions() {
        // Same values in reverse order: the tie at distance 5 is now won by 16.
        let s = sample((1..=21).rev().map(f64::from));
        let est = NearestQuantile::default().estimate(&s, 0.5).unwrap().unwrap();
        assert_eq!(est.value, 11.5);
    }

    #[test]
    fn ten_values_is_suppressed() {
        let s = sample((1..=10).map(f64::from));
        assert_eq!(NearestQuantile::default().estimate(&s, 0.5).unwrap(), None);
    }

    #[test]
    fn eleven_values_is_published() {
        let s = sample((1..=11).map(f64::from));
        let est = NearestQuantile::default().estimate(&s, 0.5).unwrap().unwrap();
        assert_eq!(est.n, 10);
    }

    #[test]
    fn nulls_do_not_count_towards_floor() {
        let mut s = sample((1..=10).map(f64::from));
        s.extend([None, None, Some(f64::NAN)]);
        assert_eq!(NearestQuantile::default().estimate(&s, 0.25).unwrap(), None);
    }

    #[test]
    fn constant_sample() {
        let s = sample(std::iter::repeat_n(4.2, 15));
        let est = NearestQuantile::default().estimate(&s, 0.75).unwrap().unwrap();
        assert_eq!(est.value, 4.2);
    }

    #[test]
    fn result_is_rounded() {
        let s = sample((1..=20).map(|x| f64::from(x) / 3.0));
        let est = NearestQuantile::default().estimate(&s, 0.5).unwrap().unwrap();
        assert_eq!(est.value, round_dp(est.value, 3));
    }

    #[test]
    fn probability_out_of_range() {
        let s = sample((1..=20).map(f64::from));
        assert_eq!(
            NearestQuantile::default().estimate(&s, 1.5).unwrap_err(),
            StatsError::InvalidProbability { p: 1.5 }
        );
    }

    #[test]
    fn custom_settings() {
        let est = NearestQuantile::default()
            .with_neighbours(3)
            .with_min_count(4)
            .with_decimals(1);
        assert!(est.validate().is_ok());
        let s = sample([1.0, 2.0, 3.0, 4.0, 100.0]);
        let q = est.estimate(&s, 0.5).unwrap().unwrap();
        // raw median 3, nearest three are 3, 2, 4
        assert_eq!(q.value, 3.0);
        assert_eq!(q.n, 3);
    }

    #[test]
    fn validate_rejects_zero_neighbours() {
        let est = NearestQuantile::default().with_neighbours(0);
        assert!(matches!(est.validate(), Err(StatsError::InvalidConfig { .. })));
    }

    #[test]
    fn validate_rejects_neighbours_above_floor() {
        let est = NearestQuantile::default().with_neighbours(12);
        assert!(matches!(est.validate(), Err(StatsError::InvalidConfig { .. })));
    }
}
