//! # Structured Logging
//!
//! Environment-aware `tracing` initialization. Safe to call more than once and
//! tolerant of a global subscriber that was already installed by the host
//! process.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging for the engine.
///
/// Respects `RUST_LOG`; defaults to `info` for the crate when unset.
pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("taskflow_core=info"));

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true));

        // A pre-existing global subscriber (e.g. from the embedding process)
        // is not an error.
        if subscriber.try_init().is_err() {
            tracing::debug!("global tracing subscriber already initialized");
        }
    });
}
