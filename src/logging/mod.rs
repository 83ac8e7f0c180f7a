//! Request logging: per-request entry, middleware, context accessors, and
//! tracing-subscriber setup.

pub mod context;
pub mod entry;
pub mod middleware;

#[cfg(test)]
pub(crate) mod capture;

pub use entry::{Level, LogEntry, RequestLog};
pub use middleware::request_logger;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global tracing subscriber: `RUST_LOG` when set, the
/// configured level otherwise, plain or JSON formatting per the config.
///
/// Never fails: if a subscriber is already installed the call is a no-op,
/// so library consumers and tests can both run through this path.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = if config.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed, keeping it");
    }
}
