//! Facade crate for the dealflow founder/investor matching engine.
//!
//! This crate re-exports the core domain types, the keyword scorer and the
//! search pipeline, and exposes the SQLite and HTTP adapters behind feature
//! flags.
//!
//! # Examples
//!
//! ```
//! use dealflow::{
//!     AngelRecord, CandidateKind, CandidateRecord, CandidateStore, CandidateStoreError,
//!     CompletionRequest, KeywordScorer, MatchSearcher, SearchMode, SearchRequest, Searcher,
//!     TextGenerationError, TextGenerator,
//! };
//!
//! struct OneAngel;
//!
//! impl CandidateStore for OneAngel {
//!     fn fetch_candidates(
//!         &self,
//!         kind: CandidateKind,
//!     ) -> Result<Vec<CandidateRecord>, CandidateStoreError> {
//!         let angel = CandidateRecord::Angel(AngelRecord {
//!             id: Some("a1".into()),
//!             name: Some("Ada".into()),
//!             categories: Some("fintech".into()),
//!             ..AngelRecord::default()
//!         });
//!         Ok(if kind == CandidateKind::Angel { vec![angel] } else { Vec::new() })
//!     }
//! }
//!
//! struct Offline;
//!
//! impl TextGenerator for Offline {
//!     fn complete(&self, _: &CompletionRequest) -> Result<String, TextGenerationError> {
//!         Err(TextGenerationError::EmptyCompletion)
//!     }
//! }
//!
//! let searcher = MatchSearcher::new(OneAngel, Offline, KeywordScorer::new());
//! let request = SearchRequest::new("fintech", SearchMode::Angels, "user-1");
//!
//! let response = searcher.search(&request)?;
//! assert_eq!(response.results[0].candidate.id.as_str(), "a1");
//! assert!(response.summary.is_empty());
//! # Ok::<(), dealflow::SearchError>(())
//! ```

#![forbid(unsafe_code)]

pub use dealflow_core::{
    AngelRecord, Candidate, CandidateError, CandidateId, CandidateKind, CandidateRecord,
    CandidateStore, CandidateStoreError, CardLayout, CardTier, CompletionRequest, DraftStore,
    DraftStoreError, FundRecord, MatchBreakdown, MessageDraft, MessageKind, MessageRequest,
    QueryExpansion, ResultSink, ResultSinkError, Scorer, SearchError, SearchLimits, SearchMode,
    SearchRecord, SearchRequest, SearchResponse, SearchResult, Searcher, StoredDraft,
    TextGenerationError, TextGenerator,
};
pub use dealflow_scorer::{KeywordScorer, ScoreWeights, ScoreWeightsError};
pub use dealflow_search::{ComposedMessage, MatchSearcher, MatchSearcherConfig, MessageComposer};

#[cfg(feature = "store-sqlite")]
pub use dealflow_data::{
    ImportSummary, SqliteCandidateStore, SqliteDraftStore, SqliteResultSink,
    persist_candidate_batches_to_sqlite, persist_candidates_to_sqlite,
};

#[cfg(feature = "llm-http")]
pub use dealflow_data::{HttpTextGenerator, HttpTextGeneratorConfig, ProviderBuildError};
