//! Structured logging setup using tracing-subscriber.

use crate::config::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level when set.
pub fn init_logging(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.json_output {
        registry
            .with(fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).compact())
            .init();
    }
}
