//! Best-effort logging of ranked search results.

use std::sync::Mutex;

use camino::Utf8Path;
use dealflow_core::{ResultSink, ResultSinkError, SearchRecord};
use rusqlite::{Connection, Transaction};

use super::{OpenDatabaseError, SchemaError, initialise_schema, open_database};

/// `ResultSink` writing to the `match_results` and `saved_items` tables.
///
/// Each recorded search appends one `match_results` row per result (status
/// `new`) and upserts the matching `saved_items` row keyed by
/// `(user_id, item_id)`, refreshing its score and notes. Both writes share
/// one transaction, so a failure leaves neither table changed.
#[derive(Debug)]
pub struct SqliteResultSink {
    connection: Mutex<Connection>,
}

impl SqliteResultSink {
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

impl ResultSink for SqliteResultSink {
    fn record(&self, record: &SearchRecord<'_>) -> Result<(), ResultSinkError> {
        if record.results.is_empty() {
            return Ok(());
        }
        let mut connection = self
            .connection
            .lock()
            .map_err(|_| ResultSinkError::LockPoisoned)?;
        let write_error = |err: rusqlite::Error| ResultSinkError::Write {
            user_id: record.user_id.to_owned(),
            count: record.results.len(),
            source: Box::new(err),
        };

        let transaction = connection.transaction().map_err(write_error)?;
        write_rows(&transaction, record).map_err(write_error)?;
        transaction.commit().map_err(write_error)?;
        log::debug!(
            "recorded {} results for user {}",
            record.results.len(),
            record.user_id
        );
        Ok(())
    }
}

fn write_rows(transaction: &Transaction<'_>, record: &SearchRecord<'_>) -> rusqlite::Result<()> {
    let mut insert_result = transaction.prepare_cached(
        "INSERT INTO match_results (
            query, user_id, candidate_id, candidate_kind, score, summary, status
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'new')",
    )?;
    let mut upsert_saved = transaction.prepare_cached(
        "INSERT INTO saved_items (user_id, item_id, item_type, notes, score)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (user_id, item_id)
            DO UPDATE SET score = excluded.score, notes = excluded.notes",
    )?;

    for result in record.results {
        let candidate = &result.candidate;
        let score = f64::from(result.breakdown.overall);
        insert_result.execute((
            record.query,
            record.user_id,
            candidate.id.as_str(),
            candidate.kind.as_str(),
            score,
            record.summary,
        ))?;
        upsert_saved.execute((
            record.user_id,
            candidate.id.as_str(),
            candidate.kind.as_str(),
            result.breakdown.reason.as_str(),
            score,
        ))?;
    }
    Ok(())
}
