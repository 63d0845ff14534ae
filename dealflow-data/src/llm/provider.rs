//! OpenAI-compatible `TextGenerator` over HTTP.
//!
//! The [`TextGenerator`] trait is synchronous so the search pipeline stays
//! embeddable in synchronous contexts. This provider bridges the async HTTP
//! call to the sync interface by blocking on a Tokio runtime internally.

use std::fmt;
use std::time::Duration;

use dealflow_core::{CompletionRequest, TextGenerationError, TextGenerator};
use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::openai::{ChatRequest, ChatResponse};

/// Error type for [`HttpTextGenerator`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime")]
    Runtime(#[source] std::io::Error),
}

/// Default endpoint for chat completions.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default model name.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default user agent for provider requests.
pub const DEFAULT_USER_AGENT: &str = "dealflow/0.1";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Longest error body echoed back in [`TextGenerationError::HttpError`].
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Configuration for [`HttpTextGenerator`].
#[derive(Clone)]
pub struct HttpTextGeneratorConfig {
    /// Base URL of the provider, without the `/v1` path.
    pub base_url: String,
    /// Model requested for every completion.
    pub model: String,
    /// Bearer token; omitted for local providers that need none.
    pub api_key: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl fmt::Debug for HttpTextGeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTextGeneratorConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for HttpTextGeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpTextGeneratorConfig {
    /// Create a configuration for the provider at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the bearer token.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Text generator backed by an OpenAI-compatible chat completions API.
///
/// The generator owns a current-thread Tokio runtime reused across calls.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the stored runtime drives the request. Inside a
/// multi-threaded runtime (detected via [`Handle::try_current()`] and
/// [`RuntimeFlavor::MultiThread`]) the caller's handle is used with
/// [`tokio::task::block_in_place`] to avoid nested runtime panics. Inside a
/// `current_thread` runtime the stored runtime is used, which blocks the
/// caller's runtime for the duration of the request.
///
/// The owned runtime means the generator must not be dropped from within an
/// async context; Tokio panics when a runtime is dropped there.
pub struct HttpTextGenerator {
    client: Client,
    config: HttpTextGeneratorConfig,
    runtime: Runtime,
}

impl fmt::Debug for HttpTextGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTextGenerator")
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish_non_exhaustive()
    }
}

impl HttpTextGenerator {
    /// Create a generator for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpTextGeneratorConfig::new(base_url))
    }

    /// Create a generator with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpTextGeneratorConfig) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpTextGeneratorConfig {
        &self.config
    }

    fn chat_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn complete_async(
        &self,
        request: &CompletionRequest,
    ) -> Result<String, TextGenerationError> {
        let url = self.chat_url();
        let body = ChatRequest::from_completion(&self.config.model, request);

        let mut builder = self.client.post(&url).json(&body);
        if let Some(api_key) = self.config.api_key.as_deref() {
            builder = builder.bearer_auth(api_key);
        }
        let response = builder
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TextGenerationError::HttpError {
                url,
                status: status.as_u16(),
                message: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let chat: ChatResponse =
            response
                .json()
                .await
                .map_err(|err| TextGenerationError::ParseError {
                    message: err.to_string(),
                })?;
        convert_response(chat)
    }

    /// Convert a reqwest error to a `TextGenerationError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> TextGenerationError {
        if error.is_timeout() {
            return TextGenerationError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return TextGenerationError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        TextGenerationError::NetworkError {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Extract the completion text from a successful response.
fn convert_response(response: ChatResponse) -> Result<String, TextGenerationError> {
    if let Some(error) = response.error {
        return Err(TextGenerationError::ServiceError {
            message: error.message,
        });
    }
    response
        .first_content()
        .map(|content| content.trim().to_owned())
        .filter(|content| !content.is_empty())
        .ok_or(TextGenerationError::EmptyCompletion)
}

impl TextGenerator for HttpTextGenerator {
    fn complete(&self, request: &CompletionRequest) -> Result<String, TextGenerationError> {
        if request.prompt.trim().is_empty() {
            return Err(TextGenerationError::EmptyPrompt);
        }

        let future = self.complete_async(request);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}
