use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::{Candidate, CandidateKind, MatchBreakdown, QueryExpansion};

/// Which investor population a search targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Search individual investors.
    Angels,
    /// Search institutional investors.
    Funds,
}

impl SearchMode {
    /// Candidate kind searched in this mode.
    ///
    /// # Examples
    /// ```
    /// use dealflow_core::{CandidateKind, SearchMode};
    ///
    /// assert_eq!(SearchMode::Funds.kind(), CandidateKind::Fund);
    /// ```
    pub const fn kind(self) -> CandidateKind {
        match self {
            Self::Angels => CandidateKind::Angel,
            Self::Funds => CandidateKind::Fund,
        }
    }

    /// Return the mode as a lowercase `&str`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Angels => "angels",
            Self::Funds => "funds",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CandidateKind::from_str(s)
            .map(|kind| match kind {
                CandidateKind::Angel => Self::Angels,
                CandidateKind::Fund => Self::Funds,
            })
            .map_err(|_| format!("unknown search mode '{s}'"))
    }
}

/// Parameters for a search request.
///
/// # Examples
/// ```rust
/// use dealflow_core::{SearchMode, SearchRequest};
///
/// let request = SearchRequest::new("fintech seed London", SearchMode::Angels, "user-1");
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Free-text founder query.
    pub query: String,
    /// Investor population to search.
    pub mode: SearchMode,
    /// Identifier of the requesting user.
    pub user_id: String,
}

impl SearchRequest {
    /// Construct a request.
    pub fn new(query: impl Into<String>, mode: SearchMode, user_id: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            mode,
            user_id: user_id.into(),
        }
    }

    /// Check the request is well-formed.
    ///
    /// An empty query is allowed and scores on reputation alone; the user
    /// identifier must not be blank.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.user_id.trim().is_empty() {
            return Err(SearchError::InvalidRequest {
                reason: "user id must not be blank",
            });
        }
        Ok(())
    }
}

/// A candidate paired with its point-in-time match breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The matched investor.
    pub candidate: Candidate,
    /// How the match score was computed.
    pub breakdown: MatchBreakdown,
}

/// Response from a successful search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Ranked, truncated results.
    pub results: Vec<SearchResult>,
    /// Keywords the query expanded into.
    pub keywords: QueryExpansion,
    /// Generated summary of the results; empty when unavailable.
    pub summary: String,
}

/// Maximum number of results returned per search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimits {
    /// Limit applied to angel searches.
    pub angels: usize,
    /// Limit applied to fund searches.
    pub funds: usize,
}

impl SearchLimits {
    /// Limit for the given mode.
    ///
    /// # Examples
    /// ```
    /// use dealflow_core::{SearchLimits, SearchMode};
    ///
    /// let limits = SearchLimits::default();
    /// assert_eq!(limits.for_mode(SearchMode::Angels), 15);
    /// assert_eq!(limits.for_mode(SearchMode::Funds), 20);
    /// ```
    pub const fn for_mode(self, mode: SearchMode) -> usize {
        match mode {
            SearchMode::Angels => self.angels,
            SearchMode::Funds => self.funds,
        }
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            angels: 15,
            funds: 20,
        }
    }
}

/// Errors returned by [`Searcher::search`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Request parameters were invalid.
    #[error("invalid request: {reason}")]
    InvalidRequest {
        /// Why the request was rejected.
        reason: &'static str,
    },
}

/// Run a search end to end: expand, fetch, score, rank and report.
///
/// Collaborator failures (keyword expansion, summaries, storage reads,
/// persistence) are absorbed by implementations; only malformed requests
/// surface as errors. Searchers must be `Send + Sync`.
pub trait Searcher: Send + Sync {
    /// Search for candidates matching `request`.
    fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_user_is_rejected(#[case] user: &str) {
        let request = SearchRequest::new("fintech", SearchMode::Angels, user);
        let err = request.validate().expect_err("blank user");
        assert!(matches!(err, SearchError::InvalidRequest { .. }));
    }

    #[rstest]
    fn empty_query_is_allowed() {
        let request = SearchRequest::new("", SearchMode::Funds, "user-1");
        assert!(request.validate().is_ok());
    }

    #[rstest]
    fn request_uses_camel_case_on_the_wire() {
        let json = r#"{"query":"ai","mode":"funds","userId":"u1"}"#;
        let request: SearchRequest = serde_json::from_str(json).expect("valid request");
        assert_eq!(request.mode, SearchMode::Funds);
        assert_eq!(request.user_id, "u1");
    }

    #[rstest]
    #[case("angels", SearchMode::Angels)]
    #[case("FUNDS", SearchMode::Funds)]
    #[case("fund", SearchMode::Funds)]
    fn mode_parses(#[case] raw: &str, #[case] expected: SearchMode) {
        assert_eq!(SearchMode::from_str(raw), Ok(expected));
    }
}
