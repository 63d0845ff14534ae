//! Per-kind weights for combining match dimensions.

use dealflow_core::CandidateKind;

use crate::ScoreWeightsError;

const TOTAL_TOLERANCE: f32 = 1e-3;

/// Relative weighting of the four match dimensions.
///
/// Valid weights are finite, non-negative and sum to one (within `1e-3`), so
/// the weighted sum of sub-scores in `0.0..=1.0` stays in that range.
///
/// # Examples
/// ```
/// use dealflow_scorer::ScoreWeights;
///
/// let weights = ScoreWeights::angels().validate().expect("preset is valid");
/// assert_eq!(weights.category, 0.45);
/// assert!(ScoreWeights { category: 2.0, ..ScoreWeights::funds() }.validate().is_err());
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScoreWeights {
    /// Multiplier applied to the category ratio.
    pub category: f32,
    /// Multiplier applied to the stage ratio.
    pub stage: f32,
    /// Multiplier applied to the binary location match.
    pub location: f32,
    /// Multiplier applied to the rescaled reputation.
    pub reputation: f32,
}

impl ScoreWeights {
    /// Weights for individual investors.
    #[must_use]
    pub const fn angels() -> Self {
        Self {
            category: 0.45_f32,
            stage: 0.20_f32,
            location: 0.10_f32,
            reputation: 0.25_f32,
        }
    }

    /// Weights for institutional investors; reputation does not contribute.
    #[must_use]
    pub const fn funds() -> Self {
        Self {
            category: 0.5_f32,
            stage: 0.3_f32,
            location: 0.2_f32,
            reputation: 0.0_f32,
        }
    }

    /// Default weights for a candidate kind.
    #[must_use]
    pub const fn for_kind(kind: CandidateKind) -> Self {
        match kind {
            CandidateKind::Angel => Self::angels(),
            CandidateKind::Fund => Self::funds(),
        }
    }

    /// Validate the weights and return a copy.
    ///
    /// # Errors
    /// Returns [`ScoreWeightsError::NonFinite`] or
    /// [`ScoreWeightsError::Negative`] for an unusable component and
    /// [`ScoreWeightsError::InvalidTotal`] when the components do not sum
    /// to one.
    pub fn validate(self) -> Result<Self, ScoreWeightsError> {
        for (dimension, value) in self.components() {
            if !value.is_finite() {
                return Err(ScoreWeightsError::NonFinite { dimension });
            }
            if value < 0.0_f32 {
                return Err(ScoreWeightsError::Negative { dimension, value });
            }
        }
        let total = self.total();
        if !within_tolerance(total) {
            return Err(ScoreWeightsError::InvalidTotal { total });
        }
        Ok(self)
    }

    const fn components(self) -> [(&'static str, f32); 4] {
        [
            ("category", self.category),
            ("stage", self.stage),
            ("location", self.location),
            ("reputation", self.reputation),
        ]
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "validation sums weights to check they are normalised"
    )]
    const fn total(self) -> f32 {
        self.category + self.stage + self.location + self.reputation
    }

    /// Weighted sum of sub-scores.
    #[expect(
        clippy::float_arithmetic,
        reason = "the overall score is a weighted sum of dimensions"
    )]
    pub(crate) const fn combine(
        self,
        category: f32,
        stage: f32,
        location: f32,
        reputation: f32,
    ) -> f32 {
        category * self.category
            + stage * self.stage
            + location * self.location
            + reputation * self.reputation
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "tolerance check compares the total against one"
)]
const fn within_tolerance(total: f32) -> bool {
    (total - 1.0_f32).abs() <= TOTAL_TOLERANCE
}
