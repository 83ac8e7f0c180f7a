//! Context accessors for the active log entry.
//!
//! Free functions over the request, usable by any downstream handler or
//! middleware. Every accessor is a silent no-op when the logging middleware
//! is not installed, so shared handler code never fails just because it ran
//! outside of it.

use axum::http::Request;
use serde_json::{Map, Value};

use super::entry::{Level, RequestLog};

/// The current request's log handle, if the logging middleware is installed.
pub fn entry<B>(request: &Request<B>) -> Option<RequestLog> {
    request.extensions().get::<RequestLog>().cloned()
}

/// Set the severity of the eventual completion line.
pub fn set_level<B>(request: &Request<B>, level: Level) {
    if let Some(entry) = entry(request) {
        entry.set_level(level);
    }
}

/// Merge one field into the completion line.
pub fn set_field<B>(request: &Request<B>, key: impl Into<String>, value: impl Into<Value>) {
    if let Some(entry) = entry(request) {
        entry.set_field(key, value);
    }
}

/// Merge a map of fields into the completion line.
pub fn set_fields<B>(request: &Request<B>, fields: Map<String, Value>) {
    if let Some(entry) = entry(request) {
        entry.set_fields(fields);
    }
}
