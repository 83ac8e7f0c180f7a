//! Configuration module
//!
//! Plain structs for the two middleware families. Applications embed these
//! in their own configuration files; this crate does no file loading itself.

use serde::{Deserialize, Serialize};

/// Metrics middleware configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Listen address for the Prometheus exporter, e.g. `"127.0.0.1:9091"`.
    /// An empty string mutes the client entirely, so the middleware can be
    /// wired unconditionally in environments without a metrics backend.
    pub exporter_addr: String,
    /// Prefix prepended to every metric name, e.g. `"myapp."`.
    pub prefix: String,
    /// Application name, attached to every metric as the `app` label.
    pub app_name: String,
    /// Extra labels attached to every metric.
    pub tags: Vec<(String, String)>,
}

impl StatsConfig {
    pub fn new(
        exporter_addr: impl Into<String>,
        prefix: impl Into<String>,
        app_name: impl Into<String>,
    ) -> Self {
        Self {
            exporter_addr: exporter_addr.into(),
            prefix: prefix.into(),
            app_name: app_name.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push((key.into(), value.into()));
        self
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            exporter_addr: String::new(),
            prefix: String::new(),
            app_name: "app".to_string(),
            tags: Vec::new(),
        }
    }
}

/// Subscriber configuration for [`crate::logging::init`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of the human-readable format.
    pub json: bool,
}

impl LoggingConfig {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            json: false,
        }
    }

    pub fn with_json(mut self) -> Self {
        self.json = true;
        self
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
