//! SQLite adapters for candidate storage, result logging and drafts.
//!
//! The module is split into focused submodules:
//! - [`schema`] materialises the tables every adapter relies on.
//! - [`candidates`] reads stored angels and funds for the search pipeline.
//! - [`import`] loads raw candidate records into those tables.
//! - [`results`] records ranked search results.
//! - [`drafts`] persists outreach message drafts.

mod candidates;
mod drafts;
mod import;
mod results;
mod schema;

use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::{Connection, Error as SqliteError};
use thiserror::Error;

pub use candidates::SqliteCandidateStore;
pub use drafts::SqliteDraftStore;
pub use import::{
    ImportSummary, LoadCandidatesError, PersistCandidatesError, load_candidate_file,
    parse_candidate_records, persist_candidate_batches, persist_candidate_batches_to_sqlite,
    persist_candidates, persist_candidates_to_sqlite,
};
pub use results::SqliteResultSink;
pub use schema::{SCHEMA_VERSION, SchemaError, initialise_schema};

/// Errors raised when opening a dealflow database on disk.
#[derive(Debug, Error)]
pub enum OpenDatabaseError {
    /// Failed to create the parent directory for the database file.
    #[error("failed to create parent directory for {path}")]
    CreateDirectory {
        /// Database path whose parent could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}")]
    Open {
        /// Database path.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// The schema could not be initialised.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Open (or create) the database at `path` and initialise its schema.
///
/// Parent directories are created as needed.
///
/// # Examples
/// ```
/// use camino::Utf8PathBuf;
/// use dealflow_data::open_database;
///
/// let dir = tempfile::tempdir().expect("temp dir");
/// let path = Utf8PathBuf::from_path_buf(dir.path().join("db/dealflow.db")).expect("utf-8");
/// let connection = open_database(&path).expect("open database");
/// let tables: i64 = connection
///     .query_row(
///         "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'angels'",
///         [],
///         |row| row.get(0),
///     )
///     .expect("query tables");
/// assert_eq!(tables, 1);
/// ```
pub fn open_database(path: &Utf8Path) -> Result<Connection, OpenDatabaseError> {
    dealflow_fs::ensure_parent_dir(path).map_err(|source| OpenDatabaseError::CreateDirectory {
        path: path.to_path_buf(),
        source,
    })?;
    let mut connection =
        Connection::open(path.as_std_path()).map_err(|source| OpenDatabaseError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    initialise_schema(&mut connection)?;
    Ok(connection)
}

#[cfg(test)]
mod tests;
