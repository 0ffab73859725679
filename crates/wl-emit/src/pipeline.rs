//! The per-request emission state machine.
//!
//! One cycle per request: `Collecting` while the handler runs,
//! `Finalizing` once the response status is known, `Emitted` after the
//! record reached (or was offered to) the sink. `Emitted` is terminal and
//! repeat completions are no-ops, so the record can never be produced
//! twice for one request.

use std::sync::Arc;
use std::time::{Duration, Instant};

use wl_event::{ErrorInfo, ErrorKind, WideEvent};

use crate::record::{build_record, Outcome, ResponseInfo};
use crate::severity::Severity;
use crate::sink::Sink;

/// Factory for per-request emissions, sharing one sink.
pub struct EmissionPipeline {
    sink: Arc<dyn Sink>,
}

impl EmissionPipeline {
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        EmissionPipeline { sink }
    }

    /// Start the cycle for one request. Call at request start so the
    /// fallback clock covers the whole handler.
    pub fn begin(&self, event: Arc<WideEvent>) -> Emission {
        Emission {
            event,
            sink: Arc::clone(&self.sink),
            started: Instant::now(),
            state: EmissionState::Collecting,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmissionState {
    Collecting,
    Finalizing,
    Emitted,
}

/// One request's trip through the emission state machine.
pub struct Emission {
    event: Arc<WideEvent>,
    sink: Arc<dyn Sink>,
    started: Instant,
    state: EmissionState,
}

impl Emission {
    /// The accumulator this emission will drain.
    pub fn event(&self) -> &Arc<WideEvent> {
        &self.event
    }

    /// Time since `begin`.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whether the record has been produced.
    pub fn is_emitted(&self) -> bool {
        self.state == EmissionState::Emitted
    }

    /// Finalize and emit the canonical record. Exactly once: repeat calls
    /// are silent no-ops.
    ///
    /// `fault` carries the message of an unhandled failure (panic payload,
    /// handler error) when the transport caught one. If the accumulator
    /// holds no error descriptor but the request still failed — a fault
    /// was caught, or the status is ≥500 — a descriptor is synthesized so
    /// the record never loses the fact that something went wrong.
    ///
    /// Works with whatever state accumulated so far; a cancelled or
    /// timed-out request emits its partial enrichment normally. A sink
    /// failure is reported through `tracing` and swallowed; the request
    /// path is never blocked or failed by emission.
    pub fn complete(&mut self, response: ResponseInfo, fault: Option<&str>) {
        if self.state != EmissionState::Collecting {
            return;
        }
        self.state = EmissionState::Finalizing;

        let elapsed = response.elapsed.unwrap_or_else(|| self.started.elapsed());
        let severity = Severity::from_status(response.status);

        if self.event.error().is_none() {
            if let Some(message) = fault {
                self.event.set_error(ErrorInfo::fault(message));
            } else if response.status >= 500 {
                self.event.set_error(ErrorInfo::new(
                    ErrorKind::Internal,
                    format!("request failed with status {}", response.status),
                ));
            }
        }

        let outcome = if self.event.error().is_some() || response.status >= 500 {
            Outcome::Error
        } else {
            Outcome::Success
        };

        let record = build_record(&self.event, &response, elapsed, severity, outcome);
        if let Err(err) = self.sink.emit(&record, severity) {
            // Fallback channel: best effort, never retried, never fatal.
            let line = record.to_json().unwrap_or_default();
            tracing::warn!(
                target: "widelog",
                error = %err,
                request_id = %self.event.request_id(),
                record = %line,
                "wide event sink rejected record"
            );
        }

        self.state = EmissionState::Emitted;
    }
}

impl Drop for Emission {
    fn drop(&mut self) {
        if self.state != EmissionState::Emitted {
            tracing::debug!(
                target: "widelog",
                request_id = %self.event.request_id(),
                "emission dropped before completion"
            );
        }
    }
}
