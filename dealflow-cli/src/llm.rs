//! Text generator settings shared by the `search` and `draft` subcommands.

use std::time::Duration;

use dealflow_core::TextGenerator;
use dealflow_data::{HttpTextGenerator, HttpTextGeneratorConfig};

use crate::{ARG_LLM_TIMEOUT_SECS, CliError};

/// Optional generator overrides collected from a subcommand's arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct LlmSettings {
    pub(crate) base_url: Option<String>,
    pub(crate) model: Option<String>,
    pub(crate) api_key: Option<String>,
    pub(crate) timeout_secs: Option<u64>,
}

impl LlmSettings {
    /// Apply the overrides on top of the provider defaults.
    pub(crate) fn into_config(self) -> Result<HttpTextGeneratorConfig, CliError> {
        let mut config = HttpTextGeneratorConfig::default();
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(model) = self.model {
            config = config.with_model(model);
        }
        if let Some(api_key) = self.api_key.filter(|key| !key.trim().is_empty()) {
            config = config.with_api_key(api_key);
        }
        match self.timeout_secs {
            Some(0) => {
                return Err(CliError::InvalidArgument {
                    field: ARG_LLM_TIMEOUT_SECS,
                    message: "timeout must be at least one second".to_owned(),
                });
            }
            Some(secs) => config = config.with_timeout(Duration::from_secs(secs)),
            None => {}
        }
        Ok(config)
    }
}

/// Builds the text generator for the current invocation.
pub(crate) trait GeneratorBuilder {
    fn build(&self, config: &HttpTextGeneratorConfig) -> Result<Box<dyn TextGenerator>, CliError>;
}

pub(crate) struct HttpGeneratorBuilder;

impl GeneratorBuilder for HttpGeneratorBuilder {
    fn build(&self, config: &HttpTextGeneratorConfig) -> Result<Box<dyn TextGenerator>, CliError> {
        let generator = build_http_generator(config)?;
        Ok(Box::new(generator))
    }
}

pub(crate) fn build_http_generator(
    config: &HttpTextGeneratorConfig,
) -> Result<HttpTextGenerator, CliError> {
    HttpTextGenerator::with_config(config.clone()).map_err(|source| {
        CliError::BuildTextGenerator {
            base_url: config.base_url.clone(),
            source,
        }
    })
}
