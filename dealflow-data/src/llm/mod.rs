//! HTTP text generation for keyword expansion, summaries and messages.
//!
//! This module provides [`HttpTextGenerator`], an implementation of
//! [`dealflow_core::TextGenerator`] that calls an OpenAI-compatible chat
//! completions endpoint.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use dealflow_core::{CompletionRequest, TextGenerator};
//! use dealflow_data::llm::{HttpTextGenerator, HttpTextGeneratorConfig};
//!
//! let config = HttpTextGeneratorConfig::new("http://localhost:11434")
//!     .with_model("llama3.1")
//!     .with_timeout(Duration::from_secs(60));
//! let generator = HttpTextGenerator::with_config(config)?;
//!
//! let reply = generator.complete(&CompletionRequest::new("Say hello"))?;
//! println!("{reply}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod openai;
mod provider;

pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_USER_AGENT, HttpTextGenerator,
    HttpTextGeneratorConfig, ProviderBuildError,
};
