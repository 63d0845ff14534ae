//! Data access traits for candidate investors.
//!
//! The `CandidateStore` trait defines a read-only interface for retrieving
//! every stored [`CandidateRecord`] of a given kind. Records come back raw;
//! callers normalise them before scoring.

use thiserror::Error;

use crate::{CandidateKind, CandidateRecord};

/// Errors raised when reading candidates.
#[derive(Debug, Error)]
pub enum CandidateStoreError {
    /// Reading the candidate table failed.
    #[error("failed to read {kind} candidates")]
    Read {
        /// Kind of candidate being fetched.
        kind: CandidateKind,
        /// Underlying storage error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// A previous panic poisoned the store's connection lock.
    #[error("candidate store connection lock was poisoned")]
    LockPoisoned,
}

/// Read-only access to persisted candidates.
///
/// The whole table is returned on every call; there is no pagination.
///
/// # Examples
///
/// ```rust
/// use dealflow_core::{
///     AngelRecord, CandidateKind, CandidateRecord, CandidateStore, CandidateStoreError,
/// };
///
/// struct OneAngel;
///
/// impl CandidateStore for OneAngel {
///     fn fetch_candidates(
///         &self,
///         kind: CandidateKind,
///     ) -> Result<Vec<CandidateRecord>, CandidateStoreError> {
///         Ok(match kind {
///             CandidateKind::Angel => vec![CandidateRecord::Angel(AngelRecord::default())],
///             CandidateKind::Fund => Vec::new(),
///         })
///     }
/// }
///
/// assert_eq!(OneAngel.fetch_candidates(CandidateKind::Angel)?.len(), 1);
/// # Ok::<(), CandidateStoreError>(())
/// ```
pub trait CandidateStore: Send + Sync {
    /// Return every stored record of `kind`.
    fn fetch_candidates(
        &self,
        kind: CandidateKind,
    ) -> Result<Vec<CandidateRecord>, CandidateStoreError>;
}
