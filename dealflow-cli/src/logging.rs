//! Diagnostic output for the CLI.
//!
//! Library crates log through the `log` facade; the subscriber installed here
//! forwards those records to stderr so stdout stays reserved for JSON output.

use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber.
///
/// When a subscriber is already installed, for example by an embedding test
/// harness, it is kept and the refusal is logged through it at debug level.
pub fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        log::debug!("keeping existing log subscriber: {err}");
    }
}
