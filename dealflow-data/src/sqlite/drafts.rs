//! Persistence of outreach message drafts.

use std::sync::Mutex;

use camino::Utf8Path;
use dealflow_core::{DraftStore, DraftStoreError, MessageDraft, StoredDraft};
use rusqlite::Connection;

use super::{OpenDatabaseError, SchemaError, initialise_schema, open_database};

/// `DraftStore` writing to the `message_drafts` table.
///
/// # Examples
/// ```
/// use dealflow_core::{CandidateKind, DraftStore, MessageDraft};
/// use dealflow_data::SqliteDraftStore;
/// use rusqlite::Connection;
///
/// let store = SqliteDraftStore::from_connection(
///     Connection::open_in_memory().expect("in-memory database"),
/// )
/// .expect("initialise schema");
/// let draft = MessageDraft {
///     recipient_id: "f1".into(),
///     recipient_kind: CandidateKind::Fund,
///     recipient_name: "Northwind Capital".into(),
///     company_context: "Invoicing for freelancers".into(),
///     content: "Hi Northwind,".into(),
///     user_id: "founder-1".into(),
/// };
///
/// let stored = store.save_draft(&draft).expect("save draft");
/// assert_eq!(stored.id, 1);
/// assert_eq!(stored.draft, draft);
/// ```
#[derive(Debug)]
pub struct SqliteDraftStore {
    connection: Mutex<Connection>,
}

impl SqliteDraftStore {
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

impl DraftStore for SqliteDraftStore {
    fn save_draft(&self, draft: &MessageDraft) -> Result<StoredDraft, DraftStoreError> {
        draft.validate()?;
        let connection = self
            .connection
            .lock()
            .map_err(|_| DraftStoreError::LockPoisoned)?;

        let (id, created_at) = connection
            .query_row(
                "INSERT INTO message_drafts (
                    recipient_id, recipient_type, recipient_name,
                    company_context, content, user_id
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                RETURNING id, created_at",
                (
                    draft.recipient_id.as_str(),
                    draft.recipient_kind.as_str(),
                    draft.recipient_name.as_str(),
                    draft.company_context.as_str(),
                    draft.content.as_str(),
                    draft.user_id.as_str(),
                ),
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
            )
            .map_err(|err| DraftStoreError::Write {
                source: Box::new(err),
            })?;

        log::debug!("saved draft {id} for user {}", draft.user_id);
        Ok(StoredDraft {
            id,
            created_at,
            draft: draft.clone(),
        })
    }
}
