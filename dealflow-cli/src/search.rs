//! Search command implementation for the dealflow CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use dealflow_core::{SearchLimits, SearchMode, SearchRequest, SearchResponse, Searcher};
use dealflow_data::{
    HttpTextGeneratorConfig, OpenDatabaseError, SqliteCandidateStore, SqliteResultSink,
};
use dealflow_scorer::KeywordScorer;
use dealflow_search::{MatchSearcher, MatchSearcherConfig};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::llm::{LlmSettings, build_http_generator};
use crate::output::write_json;
use crate::{
    ARG_DATABASE, ARG_LLM_API_KEY, ARG_LLM_BASE_URL, ARG_LLM_MODEL, ARG_LLM_TIMEOUT_SECS,
    ARG_SEARCH_ANGEL_LIMIT, ARG_SEARCH_FUND_LIMIT, ARG_SEARCH_MODE, ARG_SEARCH_PERSIST,
    ARG_SEARCH_SKIP_SUMMARY, ARG_SEARCH_USER_ID, CliError, DEFAULT_DATABASE, ENV_SEARCH_MODE,
    ENV_SEARCH_USER_ID, require_existing,
};

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Expand a free-text query into category, stage and location \
                 keywords, score every stored investor of the requested kind \
                 and print the ranked matches as JSON. Results are recorded \
                 against the user only when --persist is given.",
    about = "Rank investors against a query"
)]
#[ortho_config(prefix = "DEALFLOW")]
pub(crate) struct SearchArgs {
    /// Free-text description of the company or round.
    #[arg(value_name = "query")]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Investor population to search: `angels` or `funds`.
    #[arg(long = ARG_SEARCH_MODE, value_name = "mode")]
    #[serde(default)]
    pub(crate) mode: Option<String>,
    /// Identifier of the founder running the search.
    #[arg(long = ARG_SEARCH_USER_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) user_id: Option<String>,
    /// SQLite database holding imported candidates.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Record the ranked results and saved items for the user.
    #[arg(long = ARG_SEARCH_PERSIST)]
    #[serde(default)]
    pub(crate) persist: bool,
    /// Do not ask the text generator for a summary of the results.
    #[arg(long = ARG_SEARCH_SKIP_SUMMARY)]
    #[serde(default)]
    pub(crate) skip_summary: bool,
    /// Maximum number of angels returned.
    #[arg(long = ARG_SEARCH_ANGEL_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) angel_limit: Option<usize>,
    /// Maximum number of funds returned.
    #[arg(long = ARG_SEARCH_FUND_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) fund_limit: Option<usize>,
    /// Base URL of the OpenAI-compatible completion service.
    #[arg(long = ARG_LLM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) llm_base_url: Option<String>,
    /// Model requested from the completion service.
    #[arg(long = ARG_LLM_MODEL, value_name = "name")]
    #[serde(default)]
    pub(crate) llm_model: Option<String>,
    /// Bearer token for the completion service.
    #[arg(long = ARG_LLM_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) llm_api_key: Option<String>,
    /// Completion request timeout in seconds.
    #[arg(long = ARG_LLM_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) llm_timeout_secs: Option<u64>,
}

impl SearchArgs {
    pub(crate) fn into_config(self) -> Result<SearchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SearchConfig::try_from(merged)
    }
}

/// Resolved `search` command configuration.
#[derive(Debug, Clone)]
pub(crate) struct SearchConfig {
    /// The request handed to the searcher.
    pub(crate) request: SearchRequest,
    /// Path to the candidate database.
    pub(crate) database: Utf8PathBuf,
    /// Whether results are written back to the database.
    pub(crate) persist: bool,
    /// Limits and summary toggle for the pipeline.
    pub(crate) searcher: MatchSearcherConfig,
    /// Text generator settings.
    pub(crate) llm: HttpTextGeneratorConfig,
}

impl SearchConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.database, ARG_DATABASE)
    }
}

impl TryFrom<SearchArgs> for SearchConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let mode = args
            .mode
            .ok_or(CliError::MissingArgument {
                field: ARG_SEARCH_MODE,
                env: ENV_SEARCH_MODE,
            })?
            .parse::<SearchMode>()
            .map_err(|message| CliError::InvalidArgument {
                field: ARG_SEARCH_MODE,
                message,
            })?;
        let user_id = args
            .user_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_SEARCH_USER_ID,
                env: ENV_SEARCH_USER_ID,
            })?;

        let defaults = SearchLimits::default();
        let limits = SearchLimits {
            angels: args.angel_limit.unwrap_or(defaults.angels),
            funds: args.fund_limit.unwrap_or(defaults.funds),
        };
        let llm = LlmSettings {
            base_url: args.llm_base_url,
            model: args.llm_model,
            api_key: args.llm_api_key,
            timeout_secs: args.llm_timeout_secs,
        }
        .into_config()?;

        Ok(Self {
            request: SearchRequest::new(args.query.unwrap_or_default(), mode, user_id),
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
            persist: args.persist,
            searcher: MatchSearcherConfig {
                limits,
                summarise: !args.skip_summary,
            },
            llm,
        })
    }
}

/// Builds a searcher for the current search invocation.
pub(crate) trait SearcherBuilder {
    fn build(&self, config: &SearchConfig) -> Result<Box<dyn Searcher>, CliError>;
}

pub(crate) struct DefaultSearcherBuilder;

impl SearcherBuilder for DefaultSearcherBuilder {
    fn build(&self, config: &SearchConfig) -> Result<Box<dyn Searcher>, CliError> {
        let open_error = |source: OpenDatabaseError| CliError::OpenDatabase {
            path: config.database.clone(),
            source,
        };
        let store = SqliteCandidateStore::open(&config.database).map_err(open_error)?;
        let generator = build_http_generator(&config.llm)?;
        let searcher =
            MatchSearcher::with_config(store, generator, KeywordScorer::new(), config.searcher);
        if !config.persist {
            return Ok(Box::new(searcher));
        }
        let sink = SqliteResultSink::open(&config.database).map_err(open_error)?;
        Ok(Box::new(searcher.with_sink(Box::new(sink))))
    }
}

pub(crate) fn run_search(args: SearchArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_search_with(args, &DefaultSearcherBuilder, &mut stdout)
}

pub(crate) fn run_search_with(
    args: SearchArgs,
    builder: &dyn SearcherBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let response = execute_search(args, builder)?;
    write_json(writer, &response)
}

fn execute_search(
    args: SearchArgs,
    builder: &dyn SearcherBuilder,
) -> Result<SearchResponse, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let searcher = builder.build(&config)?;
    log::debug!(
        "searching {} for user {} (persist: {})",
        config.request.mode,
        config.request.user_id,
        config.persist
    );
    searcher
        .search(&config.request)
        .map_err(|source| CliError::Search { source })
}
