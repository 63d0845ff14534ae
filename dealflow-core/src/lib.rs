//! Core domain types for the dealflow matching engine.
//!
//! Candidates, keyword expansions, score breakdowns and the traits that
//! connect the search pipeline to its collaborators (candidate storage, text
//! generation, result persistence and draft storage) live here. Constructors
//! return `Result` to surface invalid input early.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod candidate;
pub mod keywords;
pub mod layout;
pub mod message;
pub mod scorer;
pub mod search;
pub mod sink;
pub mod store;
pub mod text;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use candidate::{
    AngelRecord, Candidate, CandidateError, CandidateId, CandidateKind, CandidateRecord,
    FundRecord,
};
pub use keywords::QueryExpansion;
pub use layout::{CardLayout, CardTier};
pub use message::{
    DraftStore, DraftStoreError, MessageDraft, MessageKind, MessageRequest, StoredDraft,
};
pub use scorer::{MatchBreakdown, Scorer};
pub use search::{
    SearchError, SearchLimits, SearchMode, SearchRequest, SearchResponse, SearchResult, Searcher,
};
pub use sink::{ResultSink, ResultSinkError, SearchRecord};
pub use store::{CandidateStore, CandidateStoreError};
pub use text::{CompletionRequest, TextGenerationError, TextGenerator};

#[cfg(any(test, feature = "test-support"))]
pub use test_support::{
    FailingStore, MemoryDraftStore, MemoryStore, RecordingSink, ScriptedGenerator,
};
