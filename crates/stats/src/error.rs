//! Error types for meterstat-stats.

/// Error type for fallible statistical operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    /// Returned when a quantile probability is outside `[0, 1]`.
    #[error("quantile probability must be in [0, 1], got {p}")]
    InvalidProbability {
        /// The rejected probability.
        p: f64,
    },

    /// Returned when estimator settings are inconsistent.
    #[error("invalid estimator configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// Returned when histogram bins cannot be built.
    #[error("invalid histogram bins: {reason}")]
    InvalidBins {
        /// What is wrong with the requested bins.
        reason: String,
    },
}
