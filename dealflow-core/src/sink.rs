//! Best-effort persistence of search results.
//!
//! Searches record their ranked results through a [`ResultSink`] when one is
//! configured. Sinks are advisory: callers log failures and carry on.

use thiserror::Error;

use crate::{SearchMode, SearchResult};

/// One completed search, borrowed for the duration of a [`ResultSink::record`]
/// call.
#[derive(Debug, Clone, Copy)]
pub struct SearchRecord<'a> {
    /// User who ran the search.
    pub user_id: &'a str,
    /// Raw query text.
    pub query: &'a str,
    /// Population searched.
    pub mode: SearchMode,
    /// Generated summary; may be empty.
    pub summary: &'a str,
    /// Ranked, truncated results.
    pub results: &'a [SearchResult],
}

/// Errors raised by [`ResultSink::record`].
#[derive(Debug, Error)]
pub enum ResultSinkError {
    /// Writing the results failed; nothing was committed.
    #[error("failed to record {count} results for user {user_id}")]
    Write {
        /// User the results belonged to.
        user_id: String,
        /// Number of results in the batch.
        count: usize,
        /// Underlying storage error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// A previous panic poisoned the sink's connection lock.
    #[error("result sink connection lock was poisoned")]
    LockPoisoned,
}

/// Destination for ranked search results.
///
/// Implementations should write a batch atomically: either every row of the
/// results log and the saved-items table is written, or none is.
pub trait ResultSink: Send + Sync {
    /// Persist the results of one search.
    fn record(&self, record: &SearchRecord<'_>) -> Result<(), ResultSinkError>;
}
