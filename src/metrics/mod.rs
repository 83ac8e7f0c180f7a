//! Request metrics: stats client, status recorder, and the per-request
//! counter/latency middleware.

pub mod client;
pub mod middleware;
pub mod recorder;

#[cfg(test)]
pub(crate) mod test_recorder;

pub use client::{suppress_stats, StatsClient, SuppressStats};
pub use middleware::{attach_stats_client, record_request_stats, resolve_stats};
pub use recorder::StatusRecorder;
