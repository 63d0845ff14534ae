//! Founder/investor search pipeline for dealflow.
//!
//! This crate provides [`MatchSearcher`], the default implementation of the
//! [`Searcher`](dealflow_core::Searcher) trait. A search runs in a fixed,
//! request-scoped sequence:
//!
//! 1. expand the query into category, stage and location keywords with a
//!    [`TextGenerator`](dealflow_core::TextGenerator), falling back to the raw
//!    query;
//! 2. fetch every candidate of the requested kind from a
//!    [`CandidateStore`](dealflow_core::CandidateStore) and normalise it,
//!    skipping rows without a stable identifier;
//! 3. score, rank (score descending, identifier ascending) and truncate;
//! 4. summarise the top results;
//! 5. record the results through an optional
//!    [`ResultSink`](dealflow_core::ResultSink).
//!
//! Collaborator failures are logged and replaced with fallbacks; only a
//! malformed request is reported as an error.
//!
//! [`MessageComposer`] drafts outreach messages with the same generator
//! boundary.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod expansion;
mod messages;
mod rank;
mod searcher;
mod summary;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use expansion::{expand_query, expansion_request};
pub use messages::{ComposedMessage, MessageComposer, fallback_message, message_request};
pub use rank::{compare_results, rank_results};
pub use searcher::{MatchSearcher, MatchSearcherConfig};
pub use summary::{summarise_results, summary_request};
