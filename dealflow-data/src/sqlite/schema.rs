//! Tables backing the dealflow SQLite database.

use rusqlite::{Connection, Error as SqliteError, OptionalExtension, Transaction};
use thiserror::Error;

/// Version recorded in `dealflow_schema_version` by this binary.
pub const SCHEMA_VERSION: i64 = 1;

/// Create the dealflow tables inside `connection` if they are missing.
///
/// Candidate tables hold an identifier column and the raw record as a JSON
/// bag. An existing database must already be at [`SCHEMA_VERSION`];
/// mismatches are rejected so migrations can be applied explicitly.
///
/// # Examples
/// ```
/// use rusqlite::Connection;
/// use dealflow_data::{SCHEMA_VERSION, initialise_schema};
///
/// let mut conn = Connection::open_in_memory().expect("in-memory database");
/// initialise_schema(&mut conn).expect("create schema");
/// initialise_schema(&mut conn).expect("initialising twice is harmless");
///
/// let version: i64 = conn
///     .query_row("SELECT version FROM dealflow_schema_version", [], |row| row.get(0))
///     .expect("read version");
/// assert_eq!(version, SCHEMA_VERSION);
/// ```
pub fn initialise_schema(connection: &mut Connection) -> Result<(), SchemaError> {
    let transaction = connection
        .transaction()
        .map_err(|source| SchemaError::Migration {
            step: "begin schema transaction",
            source,
        })?;

    create_candidate_tables(&transaction)?;
    create_activity_tables(&transaction)?;
    ensure_schema_version(&transaction)?;

    transaction
        .commit()
        .map_err(|source| SchemaError::Migration {
            step: "commit schema transaction",
            source,
        })
}

fn create_candidate_tables(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_step(
        transaction,
        "create angels",
        "CREATE TABLE IF NOT EXISTS angels (
            id TEXT PRIMARY KEY CHECK (length(trim(id)) > 0),
            fields TEXT NOT NULL
        )",
    )?;
    run_step(
        transaction,
        "create funds",
        "CREATE TABLE IF NOT EXISTS funds (
            id TEXT PRIMARY KEY CHECK (length(trim(id)) > 0),
            fields TEXT NOT NULL
        )",
    )
}

fn create_activity_tables(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_step(
        transaction,
        "create match_results",
        "CREATE TABLE IF NOT EXISTS match_results (
            id INTEGER PRIMARY KEY,
            query TEXT NOT NULL,
            user_id TEXT NOT NULL,
            candidate_id TEXT NOT NULL,
            candidate_kind TEXT NOT NULL CHECK (candidate_kind IN ('angel', 'fund')),
            score REAL NOT NULL,
            summary TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT 'new',
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    )?;
    run_step(
        transaction,
        "index match_results",
        "CREATE INDEX IF NOT EXISTS idx_match_results_user
            ON match_results(user_id, created_at)",
    )?;
    run_step(
        transaction,
        "create saved_items",
        "CREATE TABLE IF NOT EXISTS saved_items (
            id INTEGER PRIMARY KEY,
            user_id TEXT NOT NULL,
            item_id TEXT NOT NULL,
            item_type TEXT NOT NULL,
            notes TEXT NOT NULL DEFAULT '',
            score REAL NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (user_id, item_id)
        )",
    )?;
    run_step(
        transaction,
        "create message_drafts",
        "CREATE TABLE IF NOT EXISTS message_drafts (
            id INTEGER PRIMARY KEY,
            recipient_id TEXT NOT NULL,
            recipient_type TEXT NOT NULL,
            recipient_name TEXT NOT NULL,
            company_context TEXT NOT NULL,
            content TEXT NOT NULL CHECK (length(trim(content)) > 0),
            user_id TEXT NOT NULL CHECK (length(trim(user_id)) > 0),
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    )
}

fn ensure_schema_version(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_step(
        transaction,
        "create schema version table",
        "CREATE TABLE IF NOT EXISTS dealflow_schema_version (
            version INTEGER PRIMARY KEY CHECK (version > 0),
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    )?;

    let existing: Option<i64> = transaction
        .query_row(
            "SELECT version FROM dealflow_schema_version LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|source| SchemaError::Migration {
            step: "read schema version",
            source,
        })?;

    match existing {
        Some(SCHEMA_VERSION) => Ok(()),
        Some(found) => Err(SchemaError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found,
        }),
        None => transaction
            .execute(
                "INSERT INTO dealflow_schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )
            .map(|_| ())
            .map_err(|source| SchemaError::Migration {
                step: "record schema version",
                source,
            }),
    }
}

fn run_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), SchemaError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| SchemaError::Migration { step, source })
}

/// Errors raised when initialising the dealflow schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A migration statement failed.
    #[error("failed to execute migration step '{step}'")]
    Migration {
        /// Human-readable name of the failing step.
        step: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// The database was created by a different schema version.
    #[error(
        "expected dealflow schema version {expected} but found {found}; apply migrations before retrying"
    )]
    VersionMismatch {
        /// Version this binary understands.
        expected: i64,
        /// Version recorded in the database.
        found: i64,
    },
}
