//! Outreach message requests, drafts and their storage boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::{Candidate, CandidateKind};

/// The purpose of an outreach message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// First contact with an investor.
    #[default]
    Introduction,
    /// Follow-up after an earlier exchange.
    FollowUp,
    /// Request for a meeting.
    MeetingRequest,
}

impl MessageKind {
    /// Return the kind as a `snake_case` `&str`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Introduction => "introduction",
            Self::FollowUp => "follow_up",
            Self::MeetingRequest => "meeting_request",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "introduction" | "intro" => Ok(Self::Introduction),
            "follow_up" | "followup" => Ok(Self::FollowUp),
            "meeting_request" | "meeting" => Ok(Self::MeetingRequest),
            _ => Err(format!("unknown message kind '{s}'")),
        }
    }
}

/// Input for composing an outreach message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    /// Investor the message is addressed to.
    #[serde(alias = "investorData")]
    pub investor: Candidate,
    /// Free text describing the founder's company.
    pub company_context: String,
    /// Purpose of the message.
    #[serde(default, alias = "messageType")]
    pub kind: MessageKind,
}

/// A composed message ready to be stored.
///
/// # Examples
/// ```
/// use dealflow_core::{CandidateKind, MessageDraft};
///
/// let draft = MessageDraft {
///     recipient_id: "a1".into(),
///     recipient_kind: CandidateKind::Angel,
///     recipient_name: "Ada".into(),
///     company_context: "Payments API".into(),
///     content: "Hello Ada".into(),
///     user_id: "user-1".into(),
/// };
/// assert!(draft.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDraft {
    /// Identifier of the recipient candidate.
    pub recipient_id: String,
    /// Whether the recipient is an angel or a fund.
    #[serde(alias = "recipientType")]
    pub recipient_kind: CandidateKind,
    /// Display name of the recipient.
    pub recipient_name: String,
    /// Company description the message was based on.
    pub company_context: String,
    /// Message body.
    pub content: String,
    /// Owner of the draft.
    pub user_id: String,
}

impl MessageDraft {
    /// Reject drafts with a blank body or owner.
    pub fn validate(&self) -> Result<(), DraftStoreError> {
        if self.content.trim().is_empty() {
            return Err(DraftStoreError::BlankField { field: "content" });
        }
        if self.user_id.trim().is_empty() {
            return Err(DraftStoreError::BlankField { field: "user_id" });
        }
        Ok(())
    }
}

/// A persisted draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDraft {
    /// Row identifier assigned by the store.
    pub id: i64,
    /// Creation timestamp as recorded by the store.
    pub created_at: String,
    /// The stored draft.
    #[serde(flatten)]
    pub draft: MessageDraft,
}

/// Errors raised by [`DraftStore::save_draft`].
#[derive(Debug, Error)]
pub enum DraftStoreError {
    /// A required field was blank.
    #[error("draft field '{field}' must not be blank")]
    BlankField {
        /// Name of the offending field.
        field: &'static str,
    },
    /// Writing the draft failed.
    #[error("failed to store draft")]
    Write {
        /// Underlying storage error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// A previous panic poisoned the store's connection lock.
    #[error("draft store connection lock was poisoned")]
    LockPoisoned,
}

/// Persistence for outreach drafts.
pub trait DraftStore: Send + Sync {
    /// Validate and store `draft`, returning the stored row.
    fn save_draft(&self, draft: &MessageDraft) -> Result<StoredDraft, DraftStoreError>;
}
