//! Subscriber installation plus the span and event helpers the engine emits.

pub mod events;
pub mod spans;

use tracing_subscriber::EnvFilter;

use tribunal_core::config::ObservabilityConfig;

/// Initialize the global tracing subscriber.
///
/// Respects the `TRIBUNAL_LOG` environment variable for filtering and falls
/// back to `config.log_level`. Returns `false` if a subscriber was already
/// installed.
pub fn init_tracing(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_env("TRIBUNAL_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    if config.json_logs {
        builder
            .with_file(true)
            .with_line_number(true)
            .json()
            .try_init()
            .is_ok()
    } else {
        builder.try_init().is_ok()
    }
}

/// Initialize tracing with a custom filter string (for tests or embedding).
pub fn init_tracing_with_filter(filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(true)
        .json()
        .try_init()
        .is_ok()
}
