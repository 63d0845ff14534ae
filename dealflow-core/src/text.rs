//! Opaque text-completion boundary.
//!
//! Query expansion, result summaries and outreach drafts all go through the
//! [`TextGenerator`] trait: a prompt goes in, text comes out. Callers treat
//! every failure as recoverable and substitute a static fallback.

use thiserror::Error;

const DEFAULT_MAX_TOKENS: u32 = 512;
const DEFAULT_TEMPERATURE: f32 = 0.3;

/// A single prompt sent to a [`TextGenerator`].
///
/// # Examples
/// ```
/// use dealflow_core::CompletionRequest;
///
/// let request = CompletionRequest::new("Summarise these investors")
///     .with_system("You are concise.")
///     .with_max_tokens(200);
/// assert_eq!(request.max_tokens, 200);
/// assert_eq!(request.system.as_deref(), Some("You are concise."));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Optional system instruction.
    pub system: Option<String>,
    /// User prompt.
    pub prompt: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl CompletionRequest {
    /// Create a request with default sampling settings.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Set the system instruction.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the token limit.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Errors from [`TextGenerator::complete`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextGenerationError {
    /// The prompt was blank.
    #[error("prompt must not be empty")]
    EmptyPrompt,
    /// The service did not answer in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Endpoint that timed out.
        url: String,
        /// Configured timeout.
        timeout_secs: u64,
    },
    /// The service answered with a non-success status.
    #[error("request to {url} failed with HTTP {status}: {message}")]
    HttpError {
        /// Endpoint that failed.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error detail.
        message: String,
    },
    /// The request never reached the service.
    #[error("network error calling {url}: {message}")]
    NetworkError {
        /// Endpoint being called.
        url: String,
        /// Error detail.
        message: String,
    },
    /// The service reported an error in its payload.
    #[error("text generation service error: {message}")]
    ServiceError {
        /// Error detail reported by the service.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse completion response: {message}")]
    ParseError {
        /// Decoder error detail.
        message: String,
    },
    /// The service returned no text.
    #[error("completion was empty")]
    EmptyCompletion,
}

/// Produce text for a prompt.
///
/// Implementations must return `Err(TextGenerationError::EmptyPrompt)` for a
/// blank prompt and must never return an empty string on success.
///
/// # Examples
///
/// ```rust
/// use dealflow_core::{CompletionRequest, TextGenerationError, TextGenerator};
///
/// struct Echo;
///
/// impl TextGenerator for Echo {
///     fn complete(&self, request: &CompletionRequest) -> Result<String, TextGenerationError> {
///         if request.prompt.trim().is_empty() {
///             return Err(TextGenerationError::EmptyPrompt);
///         }
///         Ok(request.prompt.clone())
///     }
/// }
///
/// let text = Echo.complete(&CompletionRequest::new("hello"))?;
/// assert_eq!(text, "hello");
/// # Ok::<(), TextGenerationError>(())
/// ```
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `request`.
    fn complete(&self, request: &CompletionRequest) -> Result<String, TextGenerationError>;
}

impl<T> TextGenerator for Box<T>
where
    T: TextGenerator + ?Sized,
{
    fn complete(&self, request: &CompletionRequest) -> Result<String, TextGenerationError> {
        (**self).complete(request)
    }
}
