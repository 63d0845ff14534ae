//! Read-only candidate access over the `angels` and `funds` tables.

use std::sync::Mutex;

use camino::Utf8Path;
use dealflow_core::{CandidateKind, CandidateRecord, CandidateStore, CandidateStoreError};
use rusqlite::Connection;
use serde_json::Value;

use super::{OpenDatabaseError, SchemaError, initialise_schema, open_database};

/// `CandidateStore` reading raw records from SQLite.
///
/// Rows whose JSON bag cannot be decoded are logged and skipped so one bad
/// row never hides the rest of the table. Rows come back ordered by
/// identifier.
///
/// # Examples
/// ```
/// use dealflow_core::{CandidateKind, CandidateStore};
/// use dealflow_data::SqliteCandidateStore;
/// use rusqlite::Connection;
///
/// let store = SqliteCandidateStore::from_connection(
///     Connection::open_in_memory().expect("in-memory database"),
/// )
/// .expect("initialise schema");
/// assert!(store.fetch_candidates(CandidateKind::Fund).expect("read").is_empty());
/// ```
#[derive(Debug)]
pub struct SqliteCandidateStore {
    connection: Mutex<Connection>,
}

impl SqliteCandidateStore {
    /// Open the database at `path`, creating it if needed.
    pub fn open(path: &Utf8Path) -> Result<Self, OpenDatabaseError> {
        Ok(Self {
            connection: Mutex::new(open_database(path)?),
        })
    }

    /// Wrap an existing connection, initialising the schema.
    pub fn from_connection(mut connection: Connection) -> Result<Self, SchemaError> {
        initialise_schema(&mut connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }
}

impl CandidateStore for SqliteCandidateStore {
    fn fetch_candidates(
        &self,
        kind: CandidateKind,
    ) -> Result<Vec<CandidateRecord>, CandidateStoreError> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| CandidateStoreError::LockPoisoned)?;
        let read_error = |err: rusqlite::Error| CandidateStoreError::Read {
            kind,
            source: Box::new(err),
        };

        let query = format!("SELECT id, fields FROM {} ORDER BY id", kind.table());
        let mut statement = connection.prepare(&query).map_err(read_error)?;
        let mut rows = statement.query([]).map_err(read_error)?;
        let mut records = Vec::new();

        while let Some(row) = rows.next().map_err(read_error)? {
            let id: String = row.get(0).map_err(read_error)?;
            let fields: String = row.get(1).map_err(read_error)?;
            match decode_row(kind, id.clone(), &fields) {
                Ok(record) => records.push(record),
                Err(err) => log::warn!("skipping {kind} row {id}: {err}"),
            }
        }

        log::debug!("fetched {} {kind} records", records.len());
        Ok(records)
    }
}

fn decode_row(
    kind: CandidateKind,
    id: String,
    fields: &str,
) -> Result<CandidateRecord, serde_json::Error> {
    let bag: Value = serde_json::from_str(fields)?;
    CandidateRecord::from_json(kind, Some(id), bag)
}
