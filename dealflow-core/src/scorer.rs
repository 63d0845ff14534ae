//! Score candidates against a query's keyword sets.
//!
//! The `Scorer` trait assigns a [`MatchBreakdown`] to a
//! [`Candidate`](crate::Candidate) given a [`QueryExpansion`].

use serde::{Deserialize, Serialize};

use crate::{Candidate, QueryExpansion};

/// Per-dimension components behind an overall match score.
///
/// Every numeric field lies in `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    /// Share of category keywords found in the candidate's tags and bio.
    pub category: f32,
    /// Share of stage keywords found in the candidate's stage tags.
    pub stage: f32,
    /// `1.0` when any location keyword matched, else `0.0`.
    pub location: f32,
    /// Stored reputation rescaled to `0.0..=1.0`.
    pub reputation: f32,
    /// Weighted sum of the components above.
    pub overall: f32,
    /// Human-readable explanation of the match.
    pub reason: String,
}

impl MatchBreakdown {
    /// A breakdown with every component at zero.
    pub fn zero() -> Self {
        Self {
            category: 0.0,
            stage: 0.0,
            location: 0.0,
            reputation: 0.0,
            overall: 0.0,
            reason: String::new(),
        }
    }
}

/// Calculate how well a candidate matches a query.
///
/// Implementations must be thread-safe (`Send` + `Sync`) and deterministic:
/// the breakdown depends only on the candidate and the keywords, never on
/// the order candidates were fetched in. Scores must be finite and within
/// `0.0..=1.0`; use [`Scorer::sanitise`] to apply these guards.
///
/// # Examples
///
/// ```rust
/// use dealflow_core::{
///     Candidate, CandidateId, CandidateKind, MatchBreakdown, QueryExpansion, Scorer,
/// };
///
/// struct FlatScorer;
///
/// impl Scorer for FlatScorer {
///     fn score(&self, _candidate: &Candidate, _keywords: &QueryExpansion) -> MatchBreakdown {
///         MatchBreakdown { overall: 0.5, ..MatchBreakdown::zero() }
///     }
/// }
///
/// let candidate = Candidate::new(CandidateId::new("a1")?, CandidateKind::Angel, "Ada");
/// let breakdown = FlatScorer.score(&candidate, &QueryExpansion::default());
/// assert_eq!(breakdown.overall, 0.5);
/// # Ok::<(), dealflow_core::CandidateError>(())
/// ```
pub trait Scorer: Send + Sync {
    /// Return the breakdown for `candidate` against `keywords`.
    fn score(&self, candidate: &Candidate, keywords: &QueryExpansion) -> MatchBreakdown;

    /// Clamp and validate a raw score.
    ///
    /// Returns `0.0` for non-finite values and clamps to `0.0..=1.0`.
    fn sanitise(score: f32) -> f32
    where
        Self: Sized,
    {
        if !score.is_finite() {
            return 0.0;
        }
        score.clamp(0.0, 1.0)
    }
}
