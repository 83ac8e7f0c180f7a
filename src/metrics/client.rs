//! Stats client: a prefix + label-set handle over the `metrics` facade,
//! with a muted mode so the middleware can be wired unconditionally.

use std::net::SocketAddr;
use std::sync::Arc;

use metrics::Label;
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::config::StatsConfig;

/// Marker extension: when present on a request, [`crate::resolve_stats`]
/// hands out the no-op client instead of the configured one.
#[derive(Clone, Copy, Debug)]
pub struct SuppressStats;

/// Process-wide muted client backing every "no client" case.
static NOOP_STATS: StatsClient = StatsClient { inner: None };

/// Handle to the metrics backend.
///
/// Cheap to clone and safe to share across in-flight requests. A muted
/// client accepts every operation and discards it.
#[derive(Clone, Debug)]
pub struct StatsClient {
    inner: Option<Arc<Inner>>,
}

#[derive(Debug)]
struct Inner {
    prefix: String,
    labels: Vec<Label>,
}

impl Inner {
    fn scoped(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }
}

impl StatsClient {
    /// Live client that forwards to whatever recorder is installed. Does
    /// not touch the exporter; use [`StatsClient::build`] for that.
    pub fn new(
        prefix: impl Into<String>,
        app_name: impl Into<String>,
        tags: &[(String, String)],
    ) -> Self {
        let mut labels = vec![Label::new("app", app_name.into())];
        labels.extend(
            tags.iter()
                .map(|(key, value)| Label::new(key.clone(), value.clone())),
        );
        Self {
            inner: Some(Arc::new(Inner {
                prefix: prefix.into(),
                labels,
            })),
        }
    }

    /// Client per the config. An empty exporter address yields a muted
    /// client; an unparseable one is reported and likewise degrades to
    /// muted; an exporter that fails to start is reported and skipped while
    /// the client stays live. No failure here ever reaches a request.
    pub fn build(config: &StatsConfig) -> Self {
        if config.exporter_addr.is_empty() {
            return Self::noop();
        }

        let addr: SocketAddr = match config.exporter_addr.parse() {
            Ok(addr) => addr,
            Err(e) => {
                tracing::warn!(
                    addr = %config.exporter_addr,
                    error = %e,
                    "invalid metrics exporter address, metrics muted"
                );
                return Self::noop();
            }
        };

        if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
            tracing::warn!(error = %e, "failed to install metrics exporter, continuing without one");
        }

        Self::new(&config.prefix, &config.app_name, &config.tags)
    }

    /// The shared no-op client.
    pub fn noop() -> Self {
        NOOP_STATS.clone()
    }

    pub fn is_muted(&self) -> bool {
        self.inner.is_none()
    }

    /// Add `value` to the named counter.
    pub fn count(&self, name: &str, value: u64) {
        if let Some(inner) = &self.inner {
            metrics::counter!(inner.scoped(name), inner.labels.clone()).increment(value);
        }
    }

    /// Increment the named counter by one.
    pub fn incr(&self, name: &str) {
        self.count(name, 1);
    }

    /// Record a timing observation in fractional milliseconds.
    pub fn timing_ms(&self, name: &str, ms: f64) {
        if let Some(inner) = &self.inner {
            metrics::histogram!(inner.scoped(name), inner.labels.clone()).record(ms);
        }
    }
}

/// Mark the request so [`crate::resolve_stats`] returns the no-op client.
pub fn suppress_stats<B>(request: &mut axum::http::Request<B>) {
    request.extensions_mut().insert(SuppressStats);
}
