//! Statistical helpers for household energy summaries.
//!
//! Moments and sums operate on present values only; nullable columns are
//! `&[Option<f64>]` and NaN is treated as missing. The disclosure-safe
//! quantile estimator lives in [`NearestQuantile`].

mod error;
mod histogram;
mod moments;
mod nearest;
mod quantile;

pub use error::StatsError;
pub use histogram::{Histogram, stepped_edges};
pub use moments::{count_present, mean, present, round_dp, sd, strict_sum, variance};
pub use nearest::{NearestQuantile, QuantileEstimate};
pub use quantile::{quantile_type7, sorted};
