//! Logging utilities

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Log level used when neither `RUST_LOG` nor `NAVIGATOR_LOG_LEVEL` is set
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Filter directive from `NAVIGATOR_LOG_LEVEL`, falling back to the default
fn level_directive() -> String {
    std::env::var("NAVIGATOR_LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
}

/// Initialize the global logging system
///
/// `RUST_LOG` wins over `NAVIGATOR_LOG_LEVEL`. Output goes to stderr so that
/// stdout carries only search results. Calling this more than once is a no-op.
pub fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level_directive()));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
