//! Request-scoped log entry.
//!
//! One [`LogEntry`] per request, shared through request extensions as a
//! [`RequestLog`] handle. Handlers merge fields and adjust the severity as
//! the request moves through the chain; the logging middleware emits a
//! single completion line when the handler returns or panics.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::extract::ConnectInfo;
use axum::http::{header, Request, StatusCode};
use serde_json::{Map, Value};

use crate::request_id::{RequestId, REQUEST_ID_HEADER};

/// Severity of the completion line.
///
/// `Fatal` and `Panic` have no counterpart in the `tracing` facade and emit
/// at error level, with the declared level preserved as a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
            Level::Panic => "panic",
        }
    }
}

/// One request's accumulated log record: a field bag plus a severity.
///
/// Fields only ever grow; the completion emission snapshots whatever has
/// been merged at that instant.
#[derive(Debug)]
pub struct LogEntry {
    fields: Map<String, Value>,
    level: Level,
    emitted: bool,
}

impl LogEntry {
    fn new(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            level: Level::Info,
            emitted: false,
        }
    }

    fn emit(&self, level: Level, message: &str) {
        let fields = Value::Object(self.fields.clone());
        match level {
            Level::Trace => tracing::trace!(fields = %fields, "{}", message),
            Level::Debug => tracing::debug!(fields = %fields, "{}", message),
            Level::Info => tracing::info!(fields = %fields, "{}", message),
            Level::Warn => tracing::warn!(fields = %fields, "{}", message),
            Level::Error => tracing::error!(fields = %fields, "{}", message),
            Level::Fatal | Level::Panic => {
                tracing::error!(level = level.as_str(), fields = %fields, "{}", message)
            }
        }
    }
}

/// Cloneable handle to a request's [`LogEntry`], stored in request
/// extensions by [`crate::logging::request_logger`].
///
/// Concurrency within a single request (spawned tasks holding a clone) is
/// serialized by the inner mutex; distinct requests never share an entry.
#[derive(Clone, Debug)]
pub struct RequestLog(Arc<Mutex<LogEntry>>);

impl RequestLog {
    /// Create an entry with the base field set derived from the request:
    /// `req_id` (when an upstream id is present), `scheme`, `proto`,
    /// `method`, `remote_addr` (when known) and the reconstructed absolute
    /// `uri`. Initial level is `Info`.
    pub fn from_request<B>(request: &Request<B>) -> Self {
        let mut fields = Map::new();

        let req_id = request
            .extensions()
            .get::<RequestId>()
            .map(|id| id.0.clone())
            .or_else(|| {
                request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .map(String::from)
            });
        if let Some(req_id) = req_id {
            fields.insert("req_id".to_string(), req_id.into());
        }

        let scheme = request.uri().scheme_str().unwrap_or("http").to_string();
        fields.insert("scheme".to_string(), scheme.clone().into());
        fields.insert(
            "proto".to_string(),
            format!("{:?}", request.version()).into(),
        );
        fields.insert("method".to_string(), request.method().as_str().into());

        if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
            fields.insert("remote_addr".to_string(), addr.to_string().into());
        }

        let host = request
            .uri()
            .authority()
            .map(|a| a.as_str().to_string())
            .or_else(|| {
                request
                    .headers()
                    .get(header::HOST)
                    .and_then(|v| v.to_str().ok())
                    .map(String::from)
            })
            .unwrap_or_default();
        let path_and_query = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        fields.insert(
            "uri".to_string(),
            format!("{scheme}://{host}{path_and_query}").into(),
        );

        Self(Arc::new(Mutex::new(LogEntry::new(fields))))
    }

    /// Entry with no base fields. Mostly useful for code that wants the
    /// field/level mechanics outside an HTTP request.
    pub fn empty() -> Self {
        Self(Arc::new(Mutex::new(LogEntry::new(Map::new()))))
    }

    // A poisoned mutex only means some holder panicked mid-request; the
    // field bag is still the best record we have, so keep using it.
    fn lock(&self) -> MutexGuard<'_, LogEntry> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Merge a single field. Additive: existing keys are overwritten, never
    /// removed.
    pub fn set_field(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.lock().fields.insert(key.into(), value.into());
    }

    /// Merge a map of fields.
    pub fn set_fields(&self, fields: Map<String, Value>) {
        self.lock().fields.extend(fields);
    }

    /// Set the severity the completion line will use (unless the response
    /// status forces error severity).
    pub fn set_level(&self, level: Level) {
        self.lock().level = level;
    }

    pub fn level(&self) -> Level {
        self.lock().level
    }

    /// Snapshot of the fields merged so far.
    pub fn fields(&self) -> Map<String, Value> {
        self.lock().fields.clone()
    }

    /// Emit an intermediate line at `level` carrying the fields merged so
    /// far. Does not touch the entry's own level or consume the completion.
    pub fn log(&self, level: Level, message: &str) {
        self.lock().emit(level, message);
    }

    /// Merge `status`, `length` and `elapsed_ms` and emit the completion
    /// line exactly once. A status of 500 or above always emits at error
    /// severity; otherwise the entry's current level decides. Calls after
    /// the first are ignored.
    pub fn complete(&self, status: StatusCode, bytes: u64, elapsed: Duration) {
        let mut entry = self.lock();
        if entry.emitted {
            return;
        }
        entry
            .fields
            .insert("status".to_string(), status.as_u16().into());
        entry.fields.insert("length".to_string(), bytes.into());
        entry.fields.insert(
            "elapsed_ms".to_string(),
            (elapsed.as_secs_f64() * 1000.0).into(),
        );
        entry.emitted = true;

        if status.as_u16() >= 500 {
            entry.emit(Level::Error, "request completed with error");
        } else {
            entry.emit(entry.level, "request completed");
        }
    }

    /// Merge the panic payload and stack trace into the entry and write
    /// both to stderr, so the panic stays visible even if log shipping
    /// fails. Does not emit the completion line and does not re-panic; the
    /// caller decides how the unwind proceeds.
    pub fn record_panic(&self, payload: &str, stack: &str) {
        let mut entry = self.lock();
        entry.fields.insert("panic".to_string(), payload.into());
        entry.fields.insert("stack".to_string(), stack.into());
        drop(entry);

        eprintln!("panic while serving request: {payload}");
        eprintln!("{stack}");
    }
}
