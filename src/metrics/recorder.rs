//! Status recorder: captures what the response chain produced.
//!
//! Responses are values in the tower model, so "wrapping the writer" becomes
//! observing the response on its way back out. The recorder never rebuilds
//! the request or response and never touches extensions, which is what keeps
//! hyper's upgrade mechanism (the connection-hijack path) working through
//! the middleware stack.

use axum::body::HttpBody;
use axum::http::{header, Method, Request, StatusCode, Uri};
use axum::response::Response;

/// Captures the final status code and byte count of a response, keeping the
/// request method and URI around for middleware layered on top.
#[derive(Debug)]
pub struct StatusRecorder {
    method: Method,
    uri: Uri,
    status: StatusCode,
    bytes_written: u64,
    recorded: bool,
}

impl StatusRecorder {
    /// Recorder for one request. The status defaults to 200, matching the
    /// implicit code of a handler that writes a body without setting one.
    pub fn new<B>(request: &Request<B>) -> Self {
        Self {
            method: request.method().clone(),
            uri: request.uri().clone(),
            status: StatusCode::OK,
            bytes_written: 0,
            recorded: false,
        }
    }

    /// Record status and size from the response. The first call wins;
    /// subsequent calls do not change the recorded code.
    pub fn record(&mut self, response: &Response) {
        if self.recorded {
            return;
        }
        self.recorded = true;
        self.status = response.status();
        self.bytes_written = response
            .body()
            .size_hint()
            .exact()
            .or_else(|| {
                response
                    .headers()
                    .get(header::CONTENT_LENGTH)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
            })
            .unwrap_or(0);
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }
}
