//! Import command implementation for the dealflow CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use dealflow_core::{CandidateKind, CandidateRecord};
use dealflow_data::{ImportSummary, load_candidate_file, persist_candidate_batches_to_sqlite};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::output::write_json;
use crate::{
    ARG_DATABASE, ARG_IMPORT_ANGELS, ARG_IMPORT_FUNDS, CliError, DEFAULT_DATABASE,
    ENV_IMPORT_SOURCES, require_existing,
};

/// CLI arguments for the `import` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load angel and fund records from JSON arrays into the \
                 candidate database. Records are keyed by their identifier, \
                 so re-importing a file replaces earlier rows. All files \
                 are written in one transaction.",
    about = "Import investor records into SQLite"
)]
#[ortho_config(prefix = "DEALFLOW")]
pub(crate) struct ImportArgs {
    /// Path to a JSON array of angel records.
    #[arg(long = ARG_IMPORT_ANGELS, value_name = "path")]
    #[serde(default)]
    pub(crate) angels: Option<Utf8PathBuf>,
    /// Path to a JSON array of fund records.
    #[arg(long = ARG_IMPORT_FUNDS, value_name = "path")]
    #[serde(default)]
    pub(crate) funds: Option<Utf8PathBuf>,
    /// SQLite database to write (created when missing).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

impl ImportArgs {
    pub(crate) fn into_config(self) -> Result<ImportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ImportConfig::try_from(merged)
    }
}

/// Resolved `import` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportConfig {
    /// Candidate files paired with the kind of record they hold.
    pub(crate) sources: Vec<(CandidateKind, Utf8PathBuf)>,
    /// Destination database.
    pub(crate) database: Utf8PathBuf,
}

impl ImportConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        for (kind, path) in &self.sources {
            require_existing(path, source_field(*kind))?;
        }
        Ok(())
    }
}

impl TryFrom<ImportArgs> for ImportConfig {
    type Error = CliError;

    fn try_from(args: ImportArgs) -> Result<Self, Self::Error> {
        let sources: Vec<_> = [
            (CandidateKind::Angel, args.angels),
            (CandidateKind::Fund, args.funds),
        ]
        .into_iter()
        .filter_map(|(kind, path)| path.map(|path| (kind, path)))
        .collect();
        if sources.is_empty() {
            return Err(CliError::MissingArgument {
                field: ARG_IMPORT_ANGELS,
                env: ENV_IMPORT_SOURCES,
            });
        }
        let database = args
            .database
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE));
        Ok(Self { sources, database })
    }
}

const fn source_field(kind: CandidateKind) -> &'static str {
    match kind {
        CandidateKind::Angel => ARG_IMPORT_ANGELS,
        CandidateKind::Fund => ARG_IMPORT_FUNDS,
    }
}

/// Per-file outcome reported on stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ImportReport {
    pub(crate) kind: CandidateKind,
    pub(crate) path: Utf8PathBuf,
    #[serde(flatten)]
    pub(crate) summary: ImportSummary,
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_import_with(args, &mut stdout)
}

pub(crate) fn run_import_with(args: ImportArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let reports = import_candidates(&config)?;
    write_json(writer, &reports)
}

/// Load every configured file and persist it into the database.
///
/// All files are parsed before anything is written, and every file is
/// written in one transaction, so a failure leaves the database untouched.
pub(crate) fn import_candidates(config: &ImportConfig) -> Result<Vec<ImportReport>, CliError> {
    let loaded = config
        .sources
        .iter()
        .map(|(kind, path)| load_candidate_file(path, *kind).map(|records| (*kind, path, records)))
        .collect::<Result<Vec<_>, _>>()?;

    let batches: Vec<&[CandidateRecord]> =
        loaded.iter().map(|(_, _, records)| records.as_slice()).collect();
    let summaries = persist_candidate_batches_to_sqlite(&config.database, &batches).map_err(
        |source| CliError::PersistCandidates {
            path: config.database.clone(),
            source,
        },
    )?;

    let mut reports = Vec::with_capacity(loaded.len());
    for ((kind, path, _), summary) in loaded.into_iter().zip(summaries) {
        log::info!(
            "imported {} {kind} records from {path} ({} skipped)",
            summary.imported,
            summary.skipped
        );
        reports.push(ImportReport {
            kind,
            path: path.clone(),
            summary,
        });
    }
    Ok(reports)
}
