//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

use crate::config::{LOG_FORMAT_ENV, LogFormat, ObservabilityConfig};

/// Initialize tracing/logging for the process from the environment.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    init_with(&ObservabilityConfig::from_env());
}

/// Install the subscriber described by `config`. Filtering comes from
/// `RUST_LOG`, falling back to `config.default_filter`.
pub fn init_with(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    if installed.is_ok() {
        if let Some(err) = &config.rejected_format {
            ::tracing::warn!("{LOG_FORMAT_ENV}: {err}; using json");
        }
    }
}
