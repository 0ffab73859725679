//! Sensitive-key registry and recursive value redaction.
//!
//! This crate provides the redaction half of the wide-event core: a
//! process-wide (or per-test, dependency-injected) registry of sensitive
//! field-name patterns, and a `Redactor` that walks arbitrary nested
//! `serde_json::Value` data and masks any value stored under a sensitive key.
//!
//! # Key Features
//!
//! - **Substring matching**: a field is sensitive if its lowercased name
//!   exactly matches, or contains, any registered pattern, so composite
//!   names like `user_password` are caught.
//! - **Bounded recursion**: masking is capped by depth and by an estimated
//!   input size, so pathological payloads cannot blow the stack or the heap.
//! - **Partial masking**: long strings keep a four-character prefix for
//!   debuggability; short strings and non-strings are masked wholesale.
//! - **Serde-schema walk**: structs are redacted through their serde
//!   serialization, so rename attributes and private fields behave exactly
//!   as they do in emitted JSON.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use wl_redact::Redactor;
//!
//! let redactor = Redactor::default();
//! let masked = redactor.redact(&json!({"user": "ann", "password": "hunter22"}));
//! assert_eq!(masked["user"], "ann");
//! assert_eq!(masked["password"], "hunt...***MASKED***");
//! ```

pub mod mask;
pub mod registry;

pub use mask::{default_redactor, MaskLimits, Redactor, MASK_MARKER, OVERSIZE_PLACEHOLDER};
pub use registry::{default_registry, SensitiveKeyRegistry, BUILTIN_PATTERNS};
