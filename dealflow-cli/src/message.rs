//! `draft` and `save-draft` command implementations for the dealflow CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use dealflow_core::{DraftStore, MessageDraft, MessageRequest, StoredDraft};
use dealflow_data::{HttpTextGeneratorConfig, SqliteDraftStore};
use dealflow_search::{ComposedMessage, MessageComposer};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::llm::{GeneratorBuilder, HttpGeneratorBuilder, LlmSettings};
use crate::output::write_json;
use crate::{
    ARG_DATABASE, ARG_DRAFT_REQUEST, ARG_DRAFT_SAVE, ARG_DRAFT_USER_ID, ARG_LLM_API_KEY,
    ARG_LLM_BASE_URL, ARG_LLM_MODEL, ARG_LLM_TIMEOUT_SECS, ARG_SAVE_DRAFT_PATH, CliError,
    DEFAULT_DATABASE, ENV_DRAFT_REQUEST, ENV_DRAFT_USER_ID, ENV_SAVE_DRAFT_PATH,
    require_existing,
};

/// CLI arguments for the `draft` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Compose an outreach message from a JSON-encoded message \
                 request naming the investor, the company context and the \
                 kind of message. A template is used when the completion \
                 service is unavailable.",
    about = "Compose an outreach message"
)]
#[ortho_config(prefix = "DEALFLOW")]
pub(crate) struct DraftArgs {
    /// Path to a JSON file containing a message request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request: Option<Utf8PathBuf>,
    /// Store the composed message as a draft owned by `--user-id`.
    #[arg(long = ARG_DRAFT_SAVE)]
    #[serde(default)]
    pub(crate) save: bool,
    /// Owner of the stored draft.
    #[arg(long = ARG_DRAFT_USER_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) user_id: Option<String>,
    /// SQLite database receiving stored drafts.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
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

impl DraftArgs {
    pub(crate) fn into_config(self) -> Result<DraftConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        DraftConfig::try_from(merged)
    }
}

/// Resolved `draft` command configuration.
#[derive(Debug, Clone)]
pub(crate) struct DraftConfig {
    /// Path to the JSON message request.
    pub(crate) request_path: Utf8PathBuf,
    /// Owner of the draft when it should be stored.
    pub(crate) save_for: Option<String>,
    /// Database receiving stored drafts.
    pub(crate) database: Utf8PathBuf,
    /// Text generator settings.
    pub(crate) llm: HttpTextGeneratorConfig,
}

impl TryFrom<DraftArgs> for DraftConfig {
    type Error = CliError;

    fn try_from(args: DraftArgs) -> Result<Self, Self::Error> {
        let request_path = args.request.ok_or(CliError::MissingArgument {
            field: ARG_DRAFT_REQUEST,
            env: ENV_DRAFT_REQUEST,
        })?;
        let save_for = if args.save {
            let user_id = args
                .user_id
                .filter(|id| !id.trim().is_empty())
                .ok_or(CliError::MissingArgument {
                    field: ARG_DRAFT_USER_ID,
                    env: ENV_DRAFT_USER_ID,
                })?;
            Some(user_id)
        } else {
            None
        };
        let llm = LlmSettings {
            base_url: args.llm_base_url,
            model: args.llm_model,
            api_key: args.llm_api_key,
            timeout_secs: args.llm_timeout_secs,
        }
        .into_config()?;

        Ok(Self {
            request_path,
            save_for,
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
            llm,
        })
    }
}

/// Output of the `draft` command: the stored row when saved.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum DraftOutput {
    Composed(ComposedMessage),
    Stored {
        #[serde(flatten)]
        stored: StoredDraft,
        generated: bool,
    },
}

pub(crate) fn run_draft(args: DraftArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_draft_with(args, &HttpGeneratorBuilder, &mut stdout)
}

pub(crate) fn run_draft_with(
    args: DraftArgs,
    builder: &dyn GeneratorBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.request_path, ARG_DRAFT_REQUEST)?;
    let request: MessageRequest = read_json(&config.request_path, ARG_DRAFT_REQUEST)?;

    let composer = MessageComposer::new(builder.build(&config.llm)?);
    let composed = composer.compose(&request);

    let Some(user_id) = config.save_for else {
        return write_json(writer, &DraftOutput::Composed(composed));
    };
    let draft = MessageDraft {
        recipient_id: request.investor.id.as_str().to_owned(),
        recipient_kind: request.investor.kind,
        recipient_name: request.investor.name,
        company_context: request.company_context,
        content: composed.message,
        user_id,
    };
    let stored = save_draft(&config.database, &draft)?;
    write_json(
        writer,
        &DraftOutput::Stored {
            stored,
            generated: composed.generated,
        },
    )
}

/// CLI arguments for the `save-draft` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Store a JSON-encoded message draft, for example one edited \
                 after running `draft`. The stored row, including its \
                 identifier and creation time, is printed as JSON.",
    about = "Store a message draft"
)]
#[ortho_config(prefix = "DEALFLOW")]
pub(crate) struct SaveDraftArgs {
    /// Path to a JSON file containing a message draft.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) draft: Option<Utf8PathBuf>,
    /// SQLite database receiving the draft.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

/// Resolved `save-draft` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SaveDraftConfig {
    pub(crate) draft_path: Utf8PathBuf,
    pub(crate) database: Utf8PathBuf,
}

impl TryFrom<SaveDraftArgs> for SaveDraftConfig {
    type Error = CliError;

    fn try_from(args: SaveDraftArgs) -> Result<Self, Self::Error> {
        let draft_path = args.draft.ok_or(CliError::MissingArgument {
            field: ARG_SAVE_DRAFT_PATH,
            env: ENV_SAVE_DRAFT_PATH,
        })?;
        Ok(Self {
            draft_path,
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
        })
    }
}

pub(crate) fn run_save_draft(args: SaveDraftArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_save_draft_with(args, &mut stdout)
}

pub(crate) fn run_save_draft_with(
    args: SaveDraftArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = SaveDraftConfig::try_from(merged)?;
    require_existing(&config.draft_path, ARG_SAVE_DRAFT_PATH)?;
    let draft: MessageDraft = read_json(&config.draft_path, ARG_SAVE_DRAFT_PATH)?;
    let stored = save_draft(&config.database, &draft)?;
    write_json(writer, &stored)
}

fn save_draft(
    database: &Utf8Path,
    draft: &MessageDraft,
) -> Result<StoredDraft, CliError> {
    let store = SqliteDraftStore::open(database).map_err(|source| CliError::OpenDatabase {
        path: database.to_path_buf(),
        source,
    })?;
    store
        .save_draft(draft)
        .map_err(|source| CliError::SaveDraft { source })
}

/// Read and decode a JSON input file.
pub(crate) fn read_json<T>(path: &Utf8Path, field: &'static str) -> Result<T, CliError>
where
    T: DeserializeOwned,
{
    let contents =
        dealflow_fs::read_utf8_to_string(path).map_err(|source| CliError::ReadInput {
            field,
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&contents).map_err(|source| CliError::ParseInput {
        field,
        path: path.to_path_buf(),
        source,
    })
}
