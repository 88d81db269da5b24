//! Tracing subscriber setup.
//!
//! The subscriber is installed once by the process entry point; components
//! only use the `tracing` macros.

use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Fallback when the configured level is not a valid filter directive
const FALLBACK_LEVEL: &str = "info";

/// Build the event filter.
///
/// `--verbose` forces `debug`; otherwise `RUST_LOG` wins over the configured
/// level.
pub fn env_filter(config: &LoggingConfig, verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL))
    })
}

/// Install the global subscriber in the configured output format.
pub fn init_tracing(config: &LoggingConfig, verbose: bool) {
    let filter = env_filter(config, verbose);
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
            .try_init(),
        LogFormat::Console => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// Run `f` under a temporary stderr subscriber.
///
/// Used while the configuration that decides the real subscriber is still
/// being loaded, so warnings raised during loading are not lost.
pub fn with_bootstrap_logging<T>(f: impl FnOnce() -> T) -> T {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .finish();
    tracing::subscriber::with_default(subscriber, f)
}
