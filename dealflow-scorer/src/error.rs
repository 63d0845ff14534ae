//! Error types raised while configuring the keyword scorer.

use thiserror::Error;

/// Errors returned by [`ScoreWeights::validate`](crate::ScoreWeights::validate).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreWeightsError {
    /// A weight was NaN or infinite.
    #[error("{dimension} weight must be finite")]
    NonFinite {
        /// Dimension carrying the bad weight.
        dimension: &'static str,
    },
    /// A weight was below zero.
    #[error("{dimension} weight must not be negative (got {value})")]
    Negative {
        /// Dimension carrying the bad weight.
        dimension: &'static str,
        /// Offending value.
        value: f32,
    },
    /// The weights did not sum to one.
    #[error("weights must sum to 1.0 (got {total})")]
    InvalidTotal {
        /// Observed sum of the weights.
        total: f32,
    },
}
