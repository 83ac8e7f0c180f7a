//! HTTP request metrics middleware
//!
//! Two layers: one that stores the configured [`StatsClient`] in request
//! extensions, and one that records `http.requests`, `http.latency` and one
//! of the coarse status-bucket counters per request.

use std::panic::AssertUnwindSafe;
use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use futures_util::FutureExt;

use super::client::{StatsClient, SuppressStats};
use super::recorder::StatusRecorder;

/// Middleware that makes the configured client reachable per request.
/// Wire with `middleware::from_fn_with_state(client, attach_stats_client)`,
/// outside [`record_request_stats`].
pub async fn attach_stats_client(
    State(client): State<StatsClient>,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(client);
    next.run(request).await
}

/// The request's stats client: the no-op client when stats are suppressed
/// for this request or no client was attached, the attached one otherwise.
pub fn resolve_stats<B>(request: &axum::http::Request<B>) -> StatsClient {
    if request.extensions().get::<SuppressStats>().is_some() {
        return StatsClient::noop();
    }
    request
        .extensions()
        .get::<StatsClient>()
        .cloned()
        .unwrap_or_else(StatsClient::noop)
}

/// Middleware that records per-request metrics:
///
/// - **`http.requests`** — counter, incremented on entry
/// - **`http.latency`** — timer, fractional milliseconds
/// - **`http.status_200` / `http.status_400` / `http.status_500`** — exactly
///   one per request, by status class; 1xx and 3xx responses hit none
///
/// A panic in the rest of the chain counts as a 500: latency and the 500
/// bucket are recorded before the unwind resumes toward the outer recovery
/// layer.
pub async fn record_request_stats(request: Request, next: Next) -> Response {
    let client = resolve_stats(&request);
    client.incr("http.requests");

    let mut recorder = StatusRecorder::new(&request);
    let start = Instant::now();

    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => {
            recorder.record(&response);
            client.timing_ms("http.latency", start.elapsed().as_secs_f64() * 1000.0);
            if let Some(bucket) = status_bucket(recorder.status()) {
                client.incr(bucket);
            }
            response
        }
        Err(payload) => {
            client.timing_ms("http.latency", start.elapsed().as_secs_f64() * 1000.0);
            client.incr("http.status_500");
            std::panic::resume_unwind(payload);
        }
    }
}

fn status_bucket(status: StatusCode) -> Option<&'static str> {
    match status.as_u16() {
        200..=299 => Some("http.status_200"),
        400..=499 => Some("http.status_400"),
        code if code >= 500 => Some("http.status_500"),
        _ => None,
    }
}
