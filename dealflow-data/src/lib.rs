//! Storage and provider adapters for the dealflow engine.
//!
//! Responsibilities:
//! - Implement the `dealflow-core` storage traits on SQLite: candidate
//!   reads, best-effort result logging and message drafts.
//! - Import raw candidate records into the `angels` and `funds` tables.
//! - Provide an OpenAI-compatible HTTP implementation of `TextGenerator`.
//!
//! Boundaries:
//! - Do not encode matching rules (live in `dealflow-core`,
//!   `dealflow-scorer` and `dealflow-search`).
//! - Keep the synchronous trait surface; async HTTP is bridged internally.
//!
//! Invariants:
//! - Adapters are `Send + Sync`; SQLite connections sit behind a `Mutex`.
//! - No global mutable state.
#![forbid(unsafe_code)]

pub mod llm;
pub mod sqlite;

pub use llm::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_USER_AGENT, HttpTextGenerator,
    HttpTextGeneratorConfig, ProviderBuildError,
};
pub use sqlite::{
    ImportSummary, LoadCandidatesError, OpenDatabaseError, PersistCandidatesError, SCHEMA_VERSION,
    SchemaError, SqliteCandidateStore, SqliteDraftStore, SqliteResultSink, initialise_schema,
    load_candidate_file, open_database, parse_candidate_records, persist_candidate_batches,
    persist_candidate_batches_to_sqlite, persist_candidates, persist_candidates_to_sqlite,
};
