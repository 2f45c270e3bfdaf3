//! Logging utilities

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Level used when neither `RUST_LOG` nor `NOTEBOOK_LOG_LEVEL` is set
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Resolve the filter directive: `RUST_LOG` wins, then the explicit override,
/// then `NOTEBOOK_LOG_LEVEL`, then [`DEFAULT_LOG_LEVEL`].
pub fn log_directive(level_override: Option<&str>) -> String {
    if let Ok(directive) = std::env::var("RUST_LOG") {
        if !directive.trim().is_empty() {
            return directive;
        }
    }
    level_override
        .map(str::to_string)
        .or_else(|| std::env::var("NOTEBOOK_LOG_LEVEL").ok())
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

/// Initialize the global logging system
///
/// Logs go to stderr so stdout stays clean for chat output. Calling this more
/// than once is harmless; later calls are ignored.
pub fn init_logging(level_override: Option<&str>) {
    let directive = log_directive(level_override);
    let env_filter = tracing_subscriber::EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_LEVEL));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
