//! Request logging middleware
//!
//! Attaches a [`RequestLog`] entry to every request and emits one completion
//! line when the rest of the chain returns or panics. Panics are recorded
//! into the entry (and on stderr) and then resumed, so an outer recovery
//! layer such as `tower-http`'s `CatchPanicLayer` decides the response.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use futures_util::FutureExt;

use super::entry::RequestLog;
use crate::metrics::StatusRecorder;

/// Middleware that owns the per-request log entry lifecycle.
///
/// Wire outside the application routes with `middleware::from_fn`; anything
/// layered inside (and every handler) can reach the entry through
/// [`crate::logging::context`].
pub async fn request_logger(mut request: Request, next: Next) -> Response {
    let entry = RequestLog::from_request(&request);
    request.extensions_mut().insert(entry.clone());

    let mut recorder = StatusRecorder::new(&request);
    let start = Instant::now();

    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => {
            recorder.record(&response);
            entry.complete(recorder.status(), recorder.bytes_written(), start.elapsed());
            response
        }
        Err(payload) => {
            let stack = std::backtrace::Backtrace::force_capture().to_string();
            entry.record_panic(&panic_message(payload.as_ref()), &stack);
            entry.complete(StatusCode::INTERNAL_SERVER_ERROR, 0, start.elapsed());
            std::panic::resume_unwind(payload);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
