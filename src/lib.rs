//! # http-telemetry
//!
//! Request-scoped structured logging and metrics middleware for axum services.
//!
//! Every request gets a [`RequestLog`] entry and a [`StatsClient`] handle in
//! its extensions. Handlers anywhere in the chain may add fields or change
//! the severity of the eventual log line, or record their own counters; when
//! the request finishes (normal return or panic) the middleware emits exactly
//! one completion line and a fixed set of counters and timers.
//!
//! ## Architecture
//!
//! - **logging**: per-request log entry, completion/panic emission, context
//!   accessors, and tracing-subscriber setup
//! - **metrics**: stats client (live or muted), status/byte recorder, and the
//!   request counter/latency/status-bucket middleware
//! - **request_id**: `x-request-id` propagation (reuse upstream or mint a UUID)
//! - **config**: plain config structs for embedding in application config
//!
//! ## Wiring
//!
//! Layer order matters: the last `.layer()` call is the outermost. The stats
//! client must be attached outside the recorder, and the request id outside
//! the logger, so each can see what the other stored.
//!
//! ```rust,no_run
//! use axum::{middleware, routing::get, Router};
//! use http_telemetry::{
//!     attach_stats_client, record_request_stats, request_id_middleware,
//!     request_logger, StatsClient, StatsConfig,
//! };
//!
//! let stats = StatsClient::build(&StatsConfig::new("127.0.0.1:9091", "myapp.", "myapp"));
//!
//! let app: Router = Router::new()
//!     .route("/health", get(|| async { "ok" }))
//!     .layer(middleware::from_fn(request_logger))
//!     .layer(middleware::from_fn(record_request_stats))
//!     .layer(middleware::from_fn_with_state(stats, attach_stats_client))
//!     .layer(middleware::from_fn(request_id_middleware));
//! ```
//!
//! Downstream handlers enrich the log line through the accessors in
//! [`logging::context`]; all of them are no-ops when the middleware is not
//! installed, so shared handler code never has to care.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod request_id;

pub use config::{LoggingConfig, StatsConfig};
pub use logging::{request_logger, Level, LogEntry, RequestLog};
pub use metrics::{
    attach_stats_client, record_request_stats, resolve_stats, StatsClient, StatusRecorder,
    SuppressStats,
};
pub use request_id::{request_id_middleware, RequestId};
