//! In-memory collaborators used by unit and behaviour tests.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::{
    CandidateKind, CandidateRecord, CandidateStore, CandidateStoreError, CompletionRequest,
    DraftStore, DraftStoreError, MessageDraft, ResultSink, ResultSinkError, SearchMode,
    SearchRecord, StoredDraft, TextGenerationError, TextGenerator,
};

/// In-memory `CandidateStore` returning records filtered by kind.
#[derive(Default, Debug)]
pub struct MemoryStore {
    records: Vec<CandidateRecord>,
}

impl MemoryStore {
    /// Create a store from a collection of records.
    pub fn with_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = CandidateRecord>,
    {
        Self {
            records: records.into_iter().collect(),
        }
    }
}

impl CandidateStore for MemoryStore {
    fn fetch_candidates(
        &self,
        kind: CandidateKind,
    ) -> Result<Vec<CandidateRecord>, CandidateStoreError> {
        Ok(self
            .records
            .iter()
            .filter(|record| record.kind() == kind)
            .cloned()
            .collect())
    }
}

/// `CandidateStore` whose reads always fail.
#[derive(Default, Debug, Copy, Clone)]
pub struct FailingStore;

impl CandidateStore for FailingStore {
    fn fetch_candidates(
        &self,
        kind: CandidateKind,
    ) -> Result<Vec<CandidateRecord>, CandidateStoreError> {
        Err(CandidateStoreError::Read {
            kind,
            source: "store offline".into(),
        })
    }
}

/// `TextGenerator` replaying scripted replies in order.
///
/// Every request is recorded. Once the script is exhausted the generator
/// answers with [`TextGenerationError::ServiceError`].
#[derive(Default, Debug)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, TextGenerationError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedGenerator {
    /// Create a generator replaying `replies`.
    pub fn new<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = Result<String, TextGenerationError>>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a generator answering every prompt successfully, in order.
    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(replies.into_iter().map(|reply| Ok(reply.into())))
    }

    /// Create a generator that always fails.
    pub fn failing() -> Self {
        Self::default()
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn complete(&self, request: &CompletionRequest) -> Result<String, TextGenerationError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        if request.prompt.trim().is_empty() {
            return Err(TextGenerationError::EmptyPrompt);
        }
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| {
                Err(TextGenerationError::ServiceError {
                    message: "script exhausted".into(),
                })
            })
    }
}

/// A search captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSearch {
    /// User who ran the search.
    pub user_id: String,
    /// Raw query.
    pub query: String,
    /// Population searched.
    pub mode: SearchMode,
    /// Identifiers of the recorded results, in rank order.
    pub candidate_ids: Vec<String>,
}

/// `ResultSink` that keeps recorded searches in memory.
#[derive(Default, Debug)]
pub struct RecordingSink {
    fail: bool,
    recorded: Mutex<Vec<RecordedSearch>>,
}

impl RecordingSink {
    /// Create a sink whose writes always fail.
    pub fn failing() -> Self {
        Self {
            fail: true,
            recorded: Mutex::new(Vec::new()),
        }
    }

    /// Searches recorded so far.
    pub fn recorded(&self) -> Vec<RecordedSearch> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ResultSink for RecordingSink {
    fn record(&self, record: &SearchRecord<'_>) -> Result<(), ResultSinkError> {
        if self.fail {
            return Err(ResultSinkError::Write {
                user_id: record.user_id.to_owned(),
                count: record.results.len(),
                source: "sink offline".into(),
            });
        }
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedSearch {
                user_id: record.user_id.to_owned(),
                query: record.query.to_owned(),
                mode: record.mode,
                candidate_ids: record
                    .results
                    .iter()
                    .map(|result| result.candidate.id.to_string())
                    .collect(),
            });
        Ok(())
    }
}

/// `DraftStore` assigning sequential identifiers in memory.
#[derive(Default, Debug)]
pub struct MemoryDraftStore {
    drafts: Mutex<Vec<StoredDraft>>,
}

impl MemoryDraftStore {
    /// Drafts stored so far.
    pub fn drafts(&self) -> Vec<StoredDraft> {
        self.drafts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DraftStore for MemoryDraftStore {
    fn save_draft(&self, draft: &MessageDraft) -> Result<StoredDraft, DraftStoreError> {
        draft.validate()?;
        let mut drafts = self.drafts.lock().map_err(|_| DraftStoreError::LockPoisoned)?;
        let id = i64::try_from(drafts.len())
            .map_err(|err| DraftStoreError::Write {
                source: Box::new(err),
            })?
            .saturating_add(1);
        let stored = StoredDraft {
            id,
            created_at: "1970-01-01 00:00:00".into(),
            draft: draft.clone(),
        };
        drafts.push(stored.clone());
        Ok(stored)
    }
}
