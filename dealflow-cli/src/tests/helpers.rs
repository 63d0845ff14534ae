//! Test helpers for composing CLI workspaces and stub collaborators.

use super::*;
use crate::llm::GeneratorBuilder;
use crate::search::{SearchConfig, SearcherBuilder};
use dealflow_core::test_support::{MemoryStore, ScriptedGenerator};
use dealflow_core::{CandidateRecord, Searcher, TextGenerator};
use dealflow_data::HttpTextGeneratorConfig;
use dealflow_scorer::KeywordScorer;
use dealflow_search::MatchSearcher;
use std::cell::RefCell;
use tempfile::TempDir;

/// Base URL with nothing listening; generator calls fail fast and every
/// command falls back to its template output.
pub(super) const UNREACHABLE_LLM: &str = "http://127.0.0.1:9";

/// Temporary directory holding input files and the database.
pub(super) struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub(super) fn new() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
        }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.dir.path().join(name)).expect("utf-8 temp path")
    }

    pub(super) fn database(&self) -> Utf8PathBuf {
        self.path("data/dealflow.db")
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.path(name);
        std::fs::write(&path, contents).expect("write input file");
        path
    }

    /// Create an empty database file so source validation passes.
    pub(super) fn touch_database(&self) -> Utf8PathBuf {
        let path = self.database();
        dealflow_fs::ensure_parent_dir(&path).expect("create database dir");
        std::fs::write(&path, b"").expect("create database file");
        path
    }

    pub(super) fn count(&self, table: &str) -> i64 {
        rusqlite::Connection::open(self.database().as_std_path())
            .expect("open database")
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })
            .expect("count rows")
    }
}

pub(super) const ANGELS_JSON: &str = r#"[
    {"id": "a1", "full_name": "Ada Lovelace", "investment_categories": "fintech, payments",
     "investment_stages": "seed", "location": "London, UK", "score": 60},
    {"id": "a2", "full_name": "Grace Hopper", "investment_categories": "devtools",
     "investment_stages": "series a", "location": "Berlin"},
    {"full_name": "Nameless", "linkedin_url": "https://linkedin.example/nameless"}
]"#;

pub(super) const FUNDS_JSON: &str = r#"[
    {"id": "f1", "fund_name": "Northwind Capital", "thesis": "B2B fintech",
     "focus_areas": "fintech", "stages": "seed", "location": "London"}
]"#;

/// Parse captured stdout as JSON.
pub(super) fn stdout_json(buffer: &[u8]) -> serde_json::Value {
    serde_json::from_slice(buffer).expect("command output is JSON")
}

/// Searcher builder serving in-memory records and scripted generator replies.
pub(super) struct StubSearcherBuilder {
    records: Vec<CandidateRecord>,
    replies: Vec<String>,
    seen: RefCell<Option<SearchConfig>>,
}

impl StubSearcherBuilder {
    pub(super) fn new(records: Vec<CandidateRecord>, replies: &[&str]) -> Self {
        Self {
            records,
            replies: replies.iter().map(|reply| (*reply).to_owned()).collect(),
            seen: RefCell::new(None),
        }
    }

    pub(super) fn seen(&self) -> SearchConfig {
        self.seen.borrow().clone().expect("builder was invoked")
    }
}

impl SearcherBuilder for StubSearcherBuilder {
    fn build(&self, config: &SearchConfig) -> Result<Box<dyn Searcher>, CliError> {
        self.seen.replace(Some(config.clone()));
        Ok(Box::new(MatchSearcher::with_config(
            MemoryStore::with_records(self.records.clone()),
            ScriptedGenerator::replying(self.replies.clone()),
            KeywordScorer::new(),
            config.searcher,
        )))
    }
}

/// Generator builder replaying scripted replies; an empty script fails.
pub(super) struct StubGeneratorBuilder {
    replies: Vec<String>,
}

impl StubGeneratorBuilder {
    pub(super) fn replying(replies: &[&str]) -> Self {
        Self {
            replies: replies.iter().map(|reply| (*reply).to_owned()).collect(),
        }
    }
}

impl GeneratorBuilder for StubGeneratorBuilder {
    fn build(
        &self,
        _config: &HttpTextGeneratorConfig,
    ) -> Result<Box<dyn TextGenerator>, CliError> {
        Ok(Box::new(ScriptedGenerator::replying(self.replies.clone())))
    }
}
