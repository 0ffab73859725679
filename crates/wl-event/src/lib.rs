//! Per-request wide-event accumulation.
//!
//! One request gets one [`WideEvent`]: a concurrency-safe accumulator of
//! heterogeneous key/value facts, an optional user descriptor, and an
//! optional error descriptor, all drained exactly once at request end into
//! a single canonical record (see the `wl-emit` crate).
//!
//! The pieces:
//!
//! - [`WideEvent`] — the accumulator itself. Capacity-bounded; inserts past
//!   the distinct-key limit are silently dropped, updates always succeed.
//! - [`RequestScope`] — the explicit carrier that associates an accumulator
//!   with the in-flight request and travels through call signatures,
//!   including into spawned sub-tasks.
//! - [`enrich`] — the façade: plain, redacting ("safe"), flexible, and
//!   header-specific enrichment functions that are silent no-ops when no
//!   event is installed.
//! - [`UserInfo`] / [`ErrorInfo`] — immutable descriptors, replaced
//!   wholesale.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use wl_event::{enrich, RequestMeta, RequestScope, WideEvent};
//!
//! let event = Arc::new(WideEvent::new(RequestMeta::new(
//!     "req-1", "POST", "/v1/orders", "10.0.0.9", "curl/8.0",
//! )));
//! let scope = RequestScope::empty().install(Arc::clone(&event));
//!
//! enrich::add(&scope, "order_id", json!(42));
//! enrich::add_safe(&scope, "payload", json!({"password": "hunter22"}));
//!
//! let data = event.business_data();
//! assert_eq!(data["order_id"], json!(42));
//! assert_eq!(data["payload"]["password"], "hunt...***MASKED***");
//! ```

pub mod enrich;
pub mod error;
pub mod event;
pub mod scope;
pub mod user;

pub use enrich::Enrichable;
pub use error::{ErrorInfo, ErrorKind};
pub use event::{generated_request_id, RequestMeta, WideEvent, DEFAULT_MAX_ENTRIES};
pub use scope::RequestScope;
pub use user::UserInfo;
