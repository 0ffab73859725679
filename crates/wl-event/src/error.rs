//! Error descriptor attached to a wide event.
//!
//! The descriptor and the error a function returns are two independent
//! channels: service code attaches an `ErrorInfo` to the current
//! accumulator for the canonical record, and still propagates its own
//! error normally through the call chain. At most one descriptor exists
//! per request; the last write wins.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category of a request-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Database/query failures.
    Database,
    /// Input validation failures.
    Validation,
    /// Downstream/upstream dependency failures.
    Upstream,
    /// Panics and other unhandled faults caught at the outermost boundary.
    Fault,
    /// Anything else, including synthesized descriptors for 5xx statuses.
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::Database => "database",
            ErrorKind::Validation => "validation",
            ErrorKind::Upstream => "upstream",
            ErrorKind::Fault => "fault",
            ErrorKind::Internal => "internal",
        };
        write!(f, "{}", s)
    }
}

/// Structured description of the failure that shaped this request.
///
/// Immutable once constructed; the accumulator replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error category.
    pub kind: ErrorKind,

    /// Machine-readable error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Human-readable message.
    pub message: String,

    /// Whether the failed operation can be retried.
    pub retriable: bool,

    /// Additional structured details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,

    /// Stack text, when captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorInfo {
    /// Create a descriptor with a category and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ErrorInfo {
            kind,
            code: None,
            message: message.into(),
            retriable: false,
            details: None,
            stack: None,
        }
    }

    /// Descriptor for a panic or other unhandled fault.
    pub fn fault(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Fault, message)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn retriable(mut self, retriable: bool) -> Self {
        self.retriable = retriable;
        self
    }

    pub fn with_details(mut self, details: impl Into<Value>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}
