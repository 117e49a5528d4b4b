// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Used when `RUST_LOG` is unset: our own progress at info, dependencies at warn.
pub const DEFAULT_LOG_FILTER: &str = "warn,catalog_normalizer=info";

/// Installs the global subscriber. Filters come from `RUST_LOG`, else
/// [`DEFAULT_LOG_FILTER`]. Output goes to stderr so the CSV path printed
/// by callers on stdout stays clean.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Logging setup complete.");
}
