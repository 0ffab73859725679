//! Record sinks.
//!
//! A sink is any append-only consumer of canonical records. The pipeline's
//! only contract with it is "accept one record, return success/failure";
//! retries, buffering, and transport concerns live behind the trait.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use crate::record::CanonicalRecord;
use crate::severity::Severity;

/// Errors from sink operations.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("sink closed: {0}")]
    Closed(String),
}

/// An append-only consumer of canonical records.
pub trait Sink: Send + Sync {
    /// Accept one record. Failures are reported to the caller's fallback
    /// channel, never retried here.
    fn emit(&self, record: &CanonicalRecord, severity: Severity) -> Result<(), SinkError>;
}

/// Line-oriented JSON writer sink.
///
/// Serializes each record to a single JSON line and flushes it. The writer
/// sits behind a mutex so one sink can serve every request thread.
pub struct JsonLineSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLineSink<W> {
    pub fn new(writer: W) -> Self {
        JsonLineSink {
            writer: Mutex::new(writer),
        }
    }

    /// Consume the sink and hand back the writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> Sink for JsonLineSink<W> {
    fn emit(&self, record: &CanonicalRecord, _severity: Severity) -> Result<(), SinkError> {
        let line = record.to_json()?;
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }
}

/// Sink that forwards records through `tracing` at the mapped level.
///
/// Useful when the host application already routes `tracing` output; the
/// whole record travels as a single field on the log event.
pub struct TracingSink;

impl Sink for TracingSink {
    fn emit(&self, record: &CanonicalRecord, severity: Severity) -> Result<(), SinkError> {
        let line = record.to_json()?;
        match severity {
            Severity::Error => tracing::error!(target: "widelog", record = %line, "request completed"),
            Severity::Warning => tracing::warn!(target: "widelog", record = %line, "request completed"),
            Severity::Info => tracing::info!(target: "widelog", record = %line, "request completed"),
        }
        Ok(())
    }
}
