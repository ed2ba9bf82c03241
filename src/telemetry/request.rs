use std::time::Instant;

use reqwest::{Method, StatusCode};
use tracing::{Level, event};
use uuid::Uuid;

/// Correlates the log events of one dispatched request.
#[derive(Clone, Debug)]
pub struct RequestTelemetry {
    request_id: Uuid,
    method: Method,
    url: String,
    started: Instant,
}

impl RequestTelemetry {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            method,
            url: url.into(),
            started: Instant::now(),
        }
    }

    pub fn emit_start(&self, authenticated: bool) {
        event!(
            Level::DEBUG,
            request_id = %self.request_id,
            method = %self.method,
            url = %self.url,
            authenticated,
            "request.start"
        );
    }

    pub fn emit_response(&self, status: StatusCode) {
        event!(
            Level::DEBUG,
            request_id = %self.request_id,
            method = %self.method,
            url = %self.url,
            status = status.as_u16(),
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "request.response"
        );
    }

    pub fn emit_envelope(&self, code: i32) {
        event!(
            Level::DEBUG,
            request_id = %self.request_id,
            url = %self.url,
            code,
            "request.envelope"
        );
    }
}
