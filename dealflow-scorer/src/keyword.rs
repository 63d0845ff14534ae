//! Keyword scoring of candidates against an expanded query.
//!
//! Category and stage sub-scores are hit ratios: the share of keywords found
//! as substrings of the candidate's lowercase text. Location is binary. The
//! stored reputation is rescaled from `0..=100` to `0.0..=1.0`. The overall
//! score is the kind-specific weighted sum of the four.

use dealflow_core::{Candidate, CandidateKind, MatchBreakdown, QueryExpansion, Scorer};

use crate::{ScoreWeights, ScoreWeightsError};

const REPUTATION_SCALE: f32 = 100.0_f32;

/// Keywords from one dimension that matched a candidate.
struct DimensionMatch<'a> {
    score: f32,
    hits: Vec<&'a str>,
}

/// Weighted keyword scorer implementing [`Scorer`].
///
/// # Examples
/// ```
/// use dealflow_core::{Candidate, CandidateId, CandidateKind, QueryExpansion, Scorer};
/// use dealflow_scorer::KeywordScorer;
///
/// let mut candidate = Candidate::new(CandidateId::new("a1")?, CandidateKind::Angel, "Ada");
/// candidate.categories = "fintech, payments".into();
/// candidate.stages = "seed".into();
/// candidate.location = "London, UK".into();
/// candidate.reputation = Some(60.0);
///
/// let keywords = QueryExpansion::new(["fintech"], ["seed"], ["london"]);
/// let breakdown = KeywordScorer::new().score(&candidate, &keywords);
/// assert!((breakdown.overall - 0.90).abs() < 1e-6);
/// # Ok::<(), dealflow_core::CandidateError>(())
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct KeywordScorer {
    angels: ScoreWeights,
    funds: ScoreWeights,
}

impl KeywordScorer {
    /// Create a scorer using the preset weights for each kind.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            angels: ScoreWeights::angels(),
            funds: ScoreWeights::funds(),
        }
    }

    /// Replace the weights used for `kind`.
    ///
    /// # Errors
    /// Returns [`ScoreWeightsError`] when `weights` fail validation.
    pub fn with_weights(
        mut self,
        kind: CandidateKind,
        weights: ScoreWeights,
    ) -> Result<Self, ScoreWeightsError> {
        let validated = weights.validate()?;
        match kind {
            CandidateKind::Angel => self.angels = validated,
            CandidateKind::Fund => self.funds = validated,
        }
        Ok(self)
    }

    /// Weights applied to candidates of `kind`.
    #[must_use]
    pub const fn weights(&self, kind: CandidateKind) -> ScoreWeights {
        match kind {
            CandidateKind::Angel => self.angels,
            CandidateKind::Fund => self.funds,
        }
    }
}

impl Default for KeywordScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl Scorer for KeywordScorer {
    fn score(&self, candidate: &Candidate, keywords: &QueryExpansion) -> MatchBreakdown {
        let category_text = format!("{} {}", candidate.categories, candidate.bio).to_lowercase();
        let stage_text = candidate.stages.to_lowercase();
        let location_text = candidate.location.to_lowercase();

        let category = ratio_match(keywords.categories(), &category_text);
        let stage = ratio_match(keywords.stages(), &stage_text);
        let location = binary_match(keywords.locations(), &location_text);
        let reputation = reputation_score(candidate.reputation);

        let weights = self.weights(candidate.kind);
        let overall = Self::sanitise(weights.combine(
            category.score,
            stage.score,
            location.score,
            reputation,
        ));
        log::debug!(
            "scored {} {}: overall {overall:.3}",
            candidate.kind,
            candidate.id
        );

        MatchBreakdown {
            category: category.score,
            stage: stage.score,
            location: location.score,
            reputation,
            overall,
            reason: describe(&category, &stage, &location, candidate.reputation),
        }
    }
}

fn matching<'a>(keywords: &'a [String], text: &str) -> Vec<&'a str> {
    keywords
        .iter()
        .map(String::as_str)
        .filter(|keyword| text.contains(keyword))
        .collect()
}

#[expect(
    clippy::float_arithmetic,
    reason = "sub-scores are ratios of matched keywords"
)]
#[expect(
    clippy::cast_precision_loss,
    reason = "keyword lists are far shorter than f32's exact integer range"
)]
fn ratio_match<'a>(keywords: &'a [String], text: &str) -> DimensionMatch<'a> {
    let hits = matching(keywords, text);
    let total = keywords.len().max(1);
    let score = (hits.len() as f32 / total as f32).min(1.0_f32);
    DimensionMatch { score, hits }
}

fn binary_match<'a>(keywords: &'a [String], text: &str) -> DimensionMatch<'a> {
    let hits = matching(keywords, text);
    let score = if hits.is_empty() { 0.0_f32 } else { 1.0_f32 };
    DimensionMatch { score, hits }
}

#[expect(
    clippy::float_arithmetic,
    reason = "reputation is rescaled from a 0-100 range"
)]
fn reputation_score(raw: Option<f32>) -> f32 {
    raw.filter(|value| value.is_finite())
        .map_or(0.0_f32, |value| (value / REPUTATION_SCALE).clamp(0.0_f32, 1.0_f32))
}

fn describe(
    category: &DimensionMatch<'_>,
    stage: &DimensionMatch<'_>,
    location: &DimensionMatch<'_>,
    reputation: Option<f32>,
) -> String {
    let mut parts: Vec<String> = [
        ("category", category),
        ("stage", stage),
        ("location", location),
    ]
    .into_iter()
    .filter(|(_, dimension)| !dimension.hits.is_empty())
    .map(|(label, dimension)| format!("{label} match: {}", dimension.hits.join(", ")))
    .collect();
    if parts.is_empty() {
        parts.push("no keyword matches".to_owned());
    }
    if let Some(score) = reputation.filter(|value| value.is_finite()) {
        parts.push(format!("reputation {score:.0}/100"));
    }
    parts.join("; ")
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare scores within a tolerance"
)]
mod tests {
    use super::*;
    use dealflow_core::CandidateId;
    use rstest::{fixture, rstest};

    fn approx(actual: f32, expected: f32) -> bool {
        (actual - expected).abs() <= 1e-6
    }

    #[fixture]
    fn london_angel() -> Candidate {
        let id = CandidateId::new("a1").unwrap_or_else(|err| panic!("valid id: {err}"));
        let mut candidate = Candidate::new(id, CandidateKind::Angel, "Ada");
        candidate.categories = "fintech, payments".into();
        candidate.stages = "seed".into();
        candidate.location = "London, UK".into();
        candidate.reputation = Some(60.0_f32);
        candidate
    }

    #[rstest]
    fn full_match_scores_point_nine(london_angel: Candidate) {
        let keywords = QueryExpansion::new(["fintech"], ["seed"], ["london"]);
        let breakdown = KeywordScorer::new().score(&london_angel, &keywords);
        assert!(approx(breakdown.category, 1.0));
        assert!(approx(breakdown.stage, 1.0));
        assert!(approx(breakdown.location, 1.0));
        assert!(approx(breakdown.reputation, 0.6));
        assert!(approx(breakdown.overall, 0.90), "got {}", breakdown.overall);
        assert_eq!(
            breakdown.reason,
            "category match: fintech; stage match: seed; location match: london; reputation 60/100"
        );
    }

    #[rstest]
    fn empty_keywords_leave_only_reputation(mut london_angel: Candidate) {
        london_angel.reputation = Some(40.0_f32);
        let breakdown = KeywordScorer::new().score(&london_angel, &QueryExpansion::default());
        assert!(approx(breakdown.category, 0.0));
        assert!(approx(breakdown.stage, 0.0));
        assert!(approx(breakdown.location, 0.0));
        assert!(approx(breakdown.overall, 0.10), "got {}", breakdown.overall);
        assert_eq!(breakdown.reason, "no keyword matches; reputation 40/100");
    }

    #[rstest]
    fn category_ratio_counts_bio(mut london_angel: Candidate) {
        london_angel.bio = "Angel in climate and energy".into();
        let keywords = QueryExpansion::new(
            ["fintech", "climate", "robotics", "biotech"],
            [""; 0],
            [""; 0],
        );
        let breakdown = KeywordScorer::new().score(&london_angel, &keywords);
        assert!(approx(breakdown.category, 0.5));
    }

    #[rstest]
    fn location_is_binary(london_angel: Candidate) {
        let keywords = QueryExpansion::new([""; 0], [""; 0], ["london", "paris", "berlin"]);
        let breakdown = KeywordScorer::new().score(&london_angel, &keywords);
        assert!(approx(breakdown.location, 1.0));
    }

    #[rstest]
    #[case(None, 0.0)]
    #[case(Some(f32::NAN), 0.0)]
    #[case(Some(150.0), 1.0)]
    #[case(Some(-20.0), 0.0)]
    #[case(Some(85.0), 0.85)]
    fn reputation_is_guarded(#[case] raw: Option<f32>, #[case] expected: f32) {
        assert!(approx(reputation_score(raw), expected));
    }

    #[rstest]
    fn funds_ignore_reputation(mut london_angel: Candidate) {
        london_angel.kind = CandidateKind::Fund;
        london_angel.reputation = Some(100.0_f32);
        let breakdown = KeywordScorer::new().score(&london_angel, &QueryExpansion::default());
        assert!(approx(breakdown.overall, 0.0));
    }

    #[rstest]
    fn custom_weights_are_validated() {
        let bad = ScoreWeights {
            category: 1.0,
            ..ScoreWeights::angels()
        };
        assert!(KeywordScorer::new().with_weights(CandidateKind::Angel, bad).is_err());

        let category_only = ScoreWeights {
            category: 1.0,
            stage: 0.0,
            location: 0.0,
            reputation: 0.0,
        };
        let scorer = KeywordScorer::new()
            .with_weights(CandidateKind::Fund, category_only)
            .unwrap_or_else(|err| panic!("valid weights: {err}"));
        assert_eq!(scorer.weights(CandidateKind::Fund), category_only);
        assert_eq!(scorer.weights(CandidateKind::Angel), ScoreWeights::angels());
    }
}
