//! Import of raw candidate records into SQLite.

use camino::{Utf8Path, Utf8PathBuf};
use dealflow_core::{CandidateKind, CandidateRecord};
use rusqlite::{Connection, Error as SqliteError, Transaction};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::{OpenDatabaseError, SchemaError, initialise_schema, open_database};

/// Outcome of an import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ImportSummary {
    /// Rows inserted or replaced.
    pub imported: usize,
    /// Records skipped because they carry no usable identifier.
    pub skipped: usize,
}

/// Errors raised when reading a candidate import file.
#[derive(Debug, Error)]
pub enum LoadCandidatesError {
    /// The file could not be read.
    #[error("failed to read candidate file {path}")]
    Read {
        /// Path of the import file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not a JSON array.
    #[error("candidate file {path} is not a JSON array of records")]
    NotAnArray {
        /// Path of the import file.
        path: Utf8PathBuf,
        /// Decoder error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// One element of the array is not a valid record.
    #[error("record {index} in {path} is not a valid {kind} record")]
    InvalidRecord {
        /// Path of the import file.
        path: Utf8PathBuf,
        /// Zero-based position of the offending record.
        index: usize,
        /// Kind being imported.
        kind: CandidateKind,
        /// Decoder error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised when persisting candidate records.
#[derive(Debug, Error)]
pub enum PersistCandidatesError {
    /// Opening the destination database failed.
    #[error(transparent)]
    Open(#[from] OpenDatabaseError),
    /// The schema could not be initialised.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// Serialising a record's field bag failed.
    #[error("failed to serialise {kind} {id}")]
    Serialise {
        /// Kind being imported.
        kind: CandidateKind,
        /// Identifier of the record.
        id: String,
        /// Source error produced by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// A SQLite statement failed.
    #[error("failed to {operation}")]
    Sqlite {
        /// Operation that failed.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}

/// Decode a JSON array of raw `kind` records.
///
/// Elements may carry any of the field aliases accepted by
/// [`AngelRecord`](dealflow_core::AngelRecord) and
/// [`FundRecord`](dealflow_core::FundRecord).
///
/// # Examples
/// ```
/// use camino::Utf8Path;
/// use dealflow_core::CandidateKind;
/// use dealflow_data::parse_candidate_records;
///
/// let records = parse_candidate_records(
///     Utf8Path::new("funds.json"),
///     CandidateKind::Fund,
///     r#"[{"id": 1, "fund_name": "Northwind", "focus_areas": ["fintech"]}]"#,
/// )
/// .expect("valid records");
/// assert_eq!(records.len(), 1);
/// ```
pub fn parse_candidate_records(
    path: &Utf8Path,
    kind: CandidateKind,
    contents: &str,
) -> Result<Vec<CandidateRecord>, LoadCandidatesError> {
    let rows: Vec<Value> =
        serde_json::from_str(contents).map_err(|source| LoadCandidatesError::NotAnArray {
            path: path.to_path_buf(),
            source,
        })?;
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            CandidateRecord::from_json(kind, None, row).map_err(|source| {
                LoadCandidatesError::InvalidRecord {
                    path: path.to_path_buf(),
                    index,
                    kind,
                    source,
                }
            })
        })
        .collect()
}

/// Read and decode the candidate file at `path`.
pub fn load_candidate_file(
    path: &Utf8Path,
    kind: CandidateKind,
) -> Result<Vec<CandidateRecord>, LoadCandidatesError> {
    let contents =
        dealflow_fs::read_utf8_to_string(path).map_err(|source| LoadCandidatesError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    parse_candidate_records(path, kind, &contents)
}

/// Persist candidate records to a database on disk.
///
/// Parent directories and the schema are created as needed. See
/// [`persist_candidates`] for the write semantics.
pub fn persist_candidates_to_sqlite(
    path: &Utf8Path,
    records: &[CandidateRecord],
) -> Result<ImportSummary, PersistCandidatesError> {
    let mut connection = open_database(path)?;
    persist_candidates(&mut connection, records)
}

/// Persist candidate records into an open connection.
///
/// Every record lands in the table of its own kind, keyed by its resolved
/// identifier. The import is idempotent: re-importing a record replaces the
/// stored row. Records without an identifier are logged and skipped. All
/// writes happen in one transaction.
///
/// # Examples
/// ```
/// use dealflow_core::{AngelRecord, CandidateRecord};
/// use dealflow_data::persist_candidates;
/// use rusqlite::Connection;
/// use serde_json::json;
///
/// let mut conn = Connection::open_in_memory().expect("in-memory database");
/// let record = CandidateRecord::Angel(AngelRecord {
///     id: Some(json!("a1")),
///     name: Some("Ada".into()),
///     ..AngelRecord::default()
/// });
///
/// let summary = persist_candidates(&mut conn, &[record.clone(), record]).expect("persist");
/// assert_eq!(summary.imported, 2);
/// let rows: i64 = conn
///     .query_row("SELECT COUNT(*) FROM angels", [], |row| row.get(0))
///     .expect("count rows");
/// assert_eq!(rows, 1);
/// ```
pub fn persist_candidates(
    connection: &mut Connection,
    records: &[CandidateRecord],
) -> Result<ImportSummary, PersistCandidatesError> {
    let summary = in_import_transaction(connection, |transaction| {
        persist_rows(transaction, records)
    })?;
    log::info!(
        "imported {} candidates, skipped {}",
        summary.imported,
        summary.skipped
    );
    Ok(summary)
}

/// Persist several record batches, typically one per source file, into the
/// database at `path` as a single unit.
///
/// See [`persist_candidate_batches`].
pub fn persist_candidate_batches_to_sqlite(
    path: &Utf8Path,
    batches: &[&[CandidateRecord]],
) -> Result<Vec<ImportSummary>, PersistCandidatesError> {
    let mut connection = open_database(path)?;
    persist_candidate_batches(&mut connection, batches)
}

/// Persist several record batches in one transaction.
///
/// One [`ImportSummary`] is returned per batch, in input order. When any
/// batch fails, nothing from any batch is committed.
///
/// # Examples
/// ```
/// use dealflow_core::{AngelRecord, CandidateRecord, FundRecord};
/// use dealflow_data::persist_candidate_batches;
/// use rusqlite::Connection;
/// use serde_json::json;
///
/// let mut conn = Connection::open_in_memory().expect("in-memory database");
/// let angels = [CandidateRecord::Angel(AngelRecord {
///     id: Some(json!("a1")),
///     ..AngelRecord::default()
/// })];
/// let funds = [CandidateRecord::Fund(FundRecord::default())];
///
/// let summaries = persist_candidate_batches(&mut conn, &[&angels, &funds]).expect("persist");
/// assert_eq!(summaries[0].imported, 1);
/// assert_eq!(summaries[1].skipped, 1);
/// ```
pub fn persist_candidate_batches(
    connection: &mut Connection,
    batches: &[&[CandidateRecord]],
) -> Result<Vec<ImportSummary>, PersistCandidatesError> {
    in_import_transaction(connection, |transaction| {
        batches
            .iter()
            .map(|records| persist_rows(transaction, records))
            .collect()
    })
}

fn in_import_transaction<T>(
    connection: &mut Connection,
    write: impl FnOnce(&Transaction<'_>) -> Result<T, PersistCandidatesError>,
) -> Result<T, PersistCandidatesError> {
    initialise_schema(connection)?;
    let transaction = connection
        .transaction()
        .map_err(|source| PersistCandidatesError::Sqlite {
            operation: "begin import transaction",
            source,
        })?;

    let written = write(&transaction)?;

    transaction
        .commit()
        .map_err(|source| PersistCandidatesError::Sqlite {
            operation: "commit import transaction",
            source,
        })?;
    Ok(written)
}

fn persist_rows(
    transaction: &Transaction<'_>,
    records: &[CandidateRecord],
) -> Result<ImportSummary, PersistCandidatesError> {
    let mut summary = ImportSummary::default();
    for record in records {
        let kind = record.kind();
        let id = match record.clone().normalise() {
            Ok(candidate) => candidate.id,
            Err(err) => {
                log::warn!("skipping import record: {err}");
                summary.skipped = summary.skipped.saturating_add(1);
                continue;
            }
        };
        let fields = field_bag(record).map_err(|source| PersistCandidatesError::Serialise {
            kind,
            id: id.to_string(),
            source,
        })?;
        let sql = format!(
            "INSERT OR REPLACE INTO {} (id, fields) VALUES (?1, ?2)",
            kind.table()
        );
        let mut statement =
            transaction
                .prepare_cached(&sql)
                .map_err(|source| PersistCandidatesError::Sqlite {
                    operation: "prepare candidate insert",
                    source,
                })?;
        statement
            .execute((id.as_str(), fields))
            .map_err(|source| PersistCandidatesError::Sqlite {
                operation: "insert candidate row",
                source,
            })?;
        summary.imported = summary.imported.saturating_add(1);
    }
    Ok(summary)
}

fn field_bag(record: &CandidateRecord) -> Result<String, serde_json::Error> {
    match record {
        CandidateRecord::Angel(angel) => serde_json::to_string(angel),
        CandidateRecord::Fund(fund) => serde_json::to_string(fund),
    }
}
