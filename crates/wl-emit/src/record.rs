//! Canonical record assembly.
//!
//! One flat structured record per request: business-data keys sit at the
//! top level next to the identity and response fields, never nested under
//! a sub-object. Identity and response fields are written after the
//! business data, so a business key can never spoof `request_id`,
//! `status_code`, and friends.

use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Map, Value};
use wl_event::WideEvent;

use crate::severity::Severity;

/// Response-side facts supplied by the transport once handling finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseInfo {
    /// Numeric status code.
    pub status: u16,

    /// Bytes written to the client.
    pub bytes_out: u64,

    /// Elapsed handling duration, when the transport measured it. The
    /// emission falls back to its own clock otherwise.
    pub elapsed: Option<Duration>,
}

impl ResponseInfo {
    pub fn new(status: u16, bytes_out: u64) -> Self {
        ResponseInfo {
            status,
            bytes_out,
            elapsed: None,
        }
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = Some(elapsed);
        self
    }
}

/// Computed request outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Error,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Error => "error",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The flat per-request record handed to a sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CanonicalRecord {
    fields: Map<String, Value>,
}

impl CanonicalRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialize as a single JSON line (no trailing newline).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.fields)
    }
}

/// Assemble the canonical record from the drained accumulator state.
pub(crate) fn build_record(
    event: &WideEvent,
    response: &ResponseInfo,
    elapsed: Duration,
    severity: Severity,
    outcome: Outcome,
) -> CanonicalRecord {
    let business = event.business_data();
    let mut fields = Map::with_capacity(business.len() + 14);

    // Business data first; core fields below win any collision.
    for (key, value) in business {
        fields.insert(key, value);
    }

    fields.insert("timestamp".into(), json!(Utc::now().to_rfc3339()));
    fields.insert("request_id".into(), json!(event.request_id()));
    if let Some(trace_id) = event.trace_id() {
        fields.insert("trace_id".into(), json!(trace_id));
    }
    fields.insert("method".into(), json!(event.method()));
    fields.insert("path".into(), json!(event.path()));
    fields.insert("remote_addr".into(), json!(event.remote_addr()));
    fields.insert("user_agent".into(), json!(event.user_agent()));
    fields.insert("status_code".into(), json!(response.status));
    fields.insert("bytes_out".into(), json!(response.bytes_out));
    fields.insert("duration_ms".into(), json!(elapsed.as_millis() as u64));
    fields.insert("outcome".into(), json!(outcome.as_str()));
    fields.insert("severity".into(), json!(severity.as_str()));

    if let Some(user) = event.user() {
        if let Ok(value) = serde_json::to_value(&user) {
            fields.insert("user".into(), value);
        }
    }
    if let Some(error) = event.error() {
        if let Ok(value) = serde_json::to_value(&error) {
            fields.insert("error".into(), value);
        }
    }

    CanonicalRecord { fields }
}
