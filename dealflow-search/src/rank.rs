//! Ordering and truncation of scored candidates.

use std::cmp::Ordering;

use dealflow_core::SearchResult;

/// Order two results: higher overall score first, then ascending identifier.
///
/// `f32::total_cmp` keeps the ordering total even for values the scorer
/// failed to sanitise.
#[must_use]
pub fn compare_results(lhs: &SearchResult, rhs: &SearchResult) -> Ordering {
    rhs.breakdown
        .overall
        .total_cmp(&lhs.breakdown.overall)
        .then_with(|| lhs.candidate.id.cmp(&rhs.candidate.id))
}

/// Sort `results` with [`compare_results`] and keep the first `limit`.
///
/// # Examples
/// ```
/// use dealflow_core::{Candidate, CandidateId, CandidateKind, MatchBreakdown, SearchResult};
/// use dealflow_search::rank_results;
///
/// let result = |id: &str, overall: f32| SearchResult {
///     candidate: Candidate::new(CandidateId::new(id).expect("id"), CandidateKind::Fund, id),
///     breakdown: MatchBreakdown { overall, ..MatchBreakdown::zero() },
/// };
/// let ranked = rank_results(vec![result("b", 0.5), result("c", 0.9), result("a", 0.5)], 2);
/// let ids: Vec<&str> = ranked.iter().map(|r| r.candidate.id.as_str()).collect();
/// assert_eq!(ids, ["c", "a"]);
/// ```
#[must_use]
pub fn rank_results(mut results: Vec<SearchResult>, limit: usize) -> Vec<SearchResult> {
    results.sort_by(compare_results);
    results.truncate(limit);
    results
}
