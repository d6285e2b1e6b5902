//! Histogram binning with numpy-compatible edge handling.

use crate::error::StatsError;

/// Bin edges and counts. `edges.len() == counts.len() + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<usize>,
}

impl Histogram {
    /// Bins `values` into `n_bins` equal-width bins spanning their range.
    ///
    /// Every bin is half-open `[left, right)` except the last, which also
    /// includes its right edge. An empty input spans `[0, 1]`; a constant
    /// input spans `[x - 0.5, x + 0.5]`.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidBins`] if `n_bins` is zero or any value is
    /// not finite.
    pub fn equal_width(values: &[f64], n_bins: usize) -> Result<Self, StatsError> {
        if n_bins == 0 {
            return Err(StatsError::InvalidBins {
                reason: "bin count must be at least 1".to_string(),
            });
        }
        if let Some(bad) = values.iter().find(|x| !x.is_finite()) {
            return Err(StatsError::InvalidBins {
                reason: format!("cannot bin non-finite value {bad}"),
            });
        }

        let (mut lo, mut hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            });
        if values.is_empty() {
            (lo, hi) = (0.0, 1.0);
        } else if lo == hi {
            (lo, hi) = (lo - 0.5, hi + 0.5);
        }

        let width = (hi - lo) / n_bins as f64;
        let mut edges: Vec<f64> = (0..=n_bins).map(|i| lo + width * i as f64).collect();
        edges[n_bins] = hi;

        let mut counts = vec![0; n_bins];
        for &x in values {
            let mut idx = (((x - lo) / width).floor() as usize).min(n_bins - 1);
            if x < edges[idx] && idx > 0 {
                idx -= 1;
            } else if idx + 1 < n_bins && x >= edges[idx + 1] {
                idx += 1;
            }
            counts[idx] += 1;
        }
        Ok(Self { edges, counts })
    }

    /// Bins `values` into the bins defined by explicit `edges`.
    ///
    /// Values outside `[edges[0], edges[last]]` are not counted; clamp them
    /// first to fold outliers into the end bins.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidBins`] if fewer than two edges are given
    /// or the edges are not strictly increasing.
    pub fn with_edges(values: &[f64], edges: &[f64]) -> Result<Self, StatsError> {
        if edges.len() < 2 {
            return Err(StatsError::InvalidBins {
                reason: format!("need at least 2 edges, got {}", edges.len()),
            });
        }
        if edges.windows(2).any(|w| w[1] <= w[0]) {
            return Err(StatsError::InvalidBins {
                reason: "edges must be strictly increasing".to_string(),
            });
        }

        let n_bins = edges.len() - 1;
        let first = edges[0];
        let last = edges[n_bins];
        let mut counts = vec![0; n_bins];
        for &x in values {
            if !(first..=last).contains(&x) {
                continue;
            }
            let idx = if x == last {
                n_bins - 1
            } else {
                edges.partition_point(|&e| e <= x) - 1
            };
            counts[idx] += 1;
        }
        Ok(Self {
            edges: edges.to_vec(),
            counts,
        })
    }

    /// Bin edges, one more than the number of bins.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Count per bin.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// `(left edge, right edge, count)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, &c)| (w[0], w[1], c))
    }

    /// Returns `true` if any bin holds fewer than `threshold` values.
    pub fn has_sparse_bin(&self, threshold: usize) -> bool {
        self.counts.iter().any(|&c| c < threshold)
    }
}

/// `count` evenly spaced edges starting at `start`, `step` apart.
pub fn stepped_edges(start: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + step * i as f64).collect()
}
