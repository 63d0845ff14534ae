//! Command-line interface for the dealflow matching engine.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use clap::{Parser, Subcommand};

mod error;
mod import;
mod llm;
mod logging;
mod message;
mod output;
mod search;

pub use error::CliError;
pub use logging::init_logging;

use import::ImportArgs;
use message::{DraftArgs, SaveDraftArgs};
use search::SearchArgs;

const ARG_DATABASE: &str = "database";
const ARG_IMPORT_ANGELS: &str = "angels";
const ARG_IMPORT_FUNDS: &str = "funds";
const ARG_SEARCH_MODE: &str = "mode";
const ARG_SEARCH_USER_ID: &str = "user-id";
const ARG_SEARCH_PERSIST: &str = "persist";
const ARG_SEARCH_SKIP_SUMMARY: &str = "skip-summary";
const ARG_SEARCH_ANGEL_LIMIT: &str = "angel-limit";
const ARG_SEARCH_FUND_LIMIT: &str = "fund-limit";
const ARG_LLM_BASE_URL: &str = "llm-base-url";
const ARG_LLM_MODEL: &str = "llm-model";
const ARG_LLM_API_KEY: &str = "llm-api-key";
const ARG_LLM_TIMEOUT_SECS: &str = "llm-timeout-secs";
const ARG_DRAFT_REQUEST: &str = "request";
const ARG_DRAFT_SAVE: &str = "save";
const ARG_DRAFT_USER_ID: &str = "user-id";
const ARG_SAVE_DRAFT_PATH: &str = "draft";
const ENV_SEARCH_USER_ID: &str = "DEALFLOW_CMDS_SEARCH_USER_ID";
const ENV_SEARCH_MODE: &str = "DEALFLOW_CMDS_SEARCH_MODE";
const ENV_DRAFT_REQUEST: &str = "DEALFLOW_CMDS_DRAFT_REQUEST";
const ENV_DRAFT_USER_ID: &str = "DEALFLOW_CMDS_DRAFT_USER_ID";
const ENV_SAVE_DRAFT_PATH: &str = "DEALFLOW_CMDS_SAVE_DRAFT_DRAFT";
const ENV_IMPORT_SOURCES: &str = "DEALFLOW_CMDS_IMPORT_ANGELS or DEALFLOW_CMDS_IMPORT_FUNDS";

/// Database file used when no `--database` is configured.
const DEFAULT_DATABASE: &str = "dealflow.db";

/// Run the dealflow CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Import(args) => import::run_import(args),
        Command::Search(args) => search::run_search(args),
        Command::Draft(args) => message::run_draft(args),
        Command::SaveDraft(args) => message::run_save_draft(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "dealflow",
    about = "Match founders with angel investors and venture funds",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load angel and fund records into the candidate database.
    Import(ImportArgs),
    /// Rank investors against a free-text query.
    Search(SearchArgs),
    /// Compose an outreach message to an investor.
    Draft(DraftArgs),
    /// Store a previously composed message draft.
    SaveDraft(SaveDraftArgs),
}

/// Reject configured input paths that do not name a readable file.
fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match dealflow_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests;
