//! Structured logging setup
//!
//! One `tracing-subscriber` for the whole process. The configured level
//! applies to the crate and its dependencies alike; a `RUST_LOG` value in
//! the environment wins over the configured level. Debug builds log
//! pretty terminal output, release builds log JSON for the hosting
//! platform's collector.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber at `log_level`.
///
/// Safe to call more than once; later calls are ignored, which keeps
/// integration tests from fighting over the global default.
pub fn init(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},parrot={level}", level = log_level)));

    #[cfg(debug_assertions)]
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().pretty().with_target(false))
        .try_init()
        .ok();

    #[cfg(not(debug_assertions))]
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_current_span(true))
        .try_init()
        .ok();
}
