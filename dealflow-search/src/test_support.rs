//! Test-only record builders for `dealflow-search`.
//!
//! The helpers in this module are available to unit tests and behavioural
//! tests. They are gated behind the `test-support` feature (and `cfg(test)`).

use dealflow_core::{AngelRecord, CandidateRecord, FundRecord};
use serde_json::json;

/// Construct a stored angel row.
///
/// # Examples
/// ```rust
/// use dealflow_search::test_support::angel;
///
/// let record = angel("a1", "fintech, payments", "seed", "London, UK", Some(60.0));
/// assert_eq!(record.normalise().expect("valid").id.as_str(), "a1");
/// ```
#[must_use]
pub fn angel(
    id: &str,
    categories: &str,
    stages: &str,
    location: &str,
    reputation: Option<f32>,
) -> CandidateRecord {
    CandidateRecord::Angel(AngelRecord {
        id: Some(json!(id)),
        name: Some(format!("Angel {id}")),
        categories: Some(categories.to_owned()),
        stages: Some(stages.to_owned()),
        location: Some(location.to_owned()),
        reputation: reputation.map(|score| json!(score)),
        ..AngelRecord::default()
    })
}

/// Construct a stored fund row.
#[must_use]
pub fn fund(id: &str, categories: &str, stages: &str, location: &str) -> CandidateRecord {
    CandidateRecord::Fund(FundRecord {
        id: Some(json!(id)),
        name: Some(format!("Fund {id}")),
        categories: Some(categories.to_owned()),
        stages: Some(stages.to_owned()),
        location: Some(location.to_owned()),
        ..FundRecord::default()
    })
}

/// Construct an angel row with no identifier.
#[must_use]
pub fn anonymous_angel(name: &str, profile_url: &str) -> CandidateRecord {
    CandidateRecord::Angel(AngelRecord {
        name: Some(name.to_owned()),
        profile_url: Some(profile_url.to_owned()),
        ..AngelRecord::default()
    })
}
