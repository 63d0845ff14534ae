//! Keyword scoring for dealflow candidates.
//!
//! [`KeywordScorer`] implements the [`Scorer`](dealflow_core::Scorer) trait:
//! each candidate receives category, stage, location and reputation
//! sub-scores that are combined with kind-specific [`ScoreWeights`]. Angels
//! weight category 0.45, reputation 0.25, stage 0.20 and location 0.10; funds
//! weight category 0.5, stage 0.3 and location 0.2 and ignore reputation.
//!
//! # Examples
//!
//! ```
//! use dealflow_core::{Candidate, CandidateId, CandidateKind, QueryExpansion, Scorer};
//! use dealflow_scorer::KeywordScorer;
//!
//! let mut candidate = Candidate::new(CandidateId::new("f1")?, CandidateKind::Fund, "Northwind");
//! candidate.categories = "saas".into();
//!
//! let keywords = QueryExpansion::new(["saas"], [""; 0], [""; 0]);
//! let breakdown = KeywordScorer::default().score(&candidate, &keywords);
//! assert_eq!(breakdown.category, 1.0);
//! # Ok::<(), dealflow_core::CandidateError>(())
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod keyword;
mod weights;

pub use error::ScoreWeightsError;
pub use keyword::KeywordScorer;
pub use weights::ScoreWeights;
