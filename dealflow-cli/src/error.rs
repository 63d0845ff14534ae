//! Error types emitted by the dealflow CLI.
//!
//! Keep this error type reasonably small, as every CLI helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use dealflow_core::{DraftStoreError, SearchError};
use dealflow_data::{
    LoadCandidatesError, OpenDatabaseError, PersistCandidatesError, ProviderBuildError,
};
use thiserror::Error;

/// Errors emitted by the dealflow CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// An option value could not be interpreted.
    #[error("invalid {field}: {message}")]
    InvalidArgument {
        field: &'static str,
        message: String,
    },
    /// A referenced input path does not exist on disk or is not a file.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Reading a candidate import file failed.
    #[error(transparent)]
    LoadCandidates(#[from] LoadCandidatesError),
    /// Writing imported candidates to SQLite failed.
    #[error("failed to import candidates into {path:?}: {source}")]
    PersistCandidates {
        path: Utf8PathBuf,
        #[source]
        source: PersistCandidatesError,
    },
    /// Opening the candidate database failed.
    #[error("failed to open database {path:?}: {source}")]
    OpenDatabase {
        path: Utf8PathBuf,
        #[source]
        source: OpenDatabaseError,
    },
    /// Building the HTTP text generator failed.
    #[error("failed to build text generator for {base_url}: {source}")]
    BuildTextGenerator {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The search request was rejected.
    #[error("search failed: {source}")]
    Search {
        #[source]
        source: SearchError,
    },
    /// Opening a JSON input file failed.
    #[error("failed to read {field} file {path:?}: {source}")]
    ReadInput {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A JSON input file did not match the expected shape.
    #[error("failed to parse {field} file {path:?}: {source}")]
    ParseInput {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Storing a message draft failed.
    #[error("failed to save draft: {source}")]
    SaveDraft {
        #[source]
        source: DraftStoreError,
    },
    /// Serialising command output failed.
    #[error("failed to serialise command output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write command output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
