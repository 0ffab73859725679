//! End-of-request emission pipeline.
//!
//! Runs once per request after the response status and size are known:
//! reads the final accumulator state, maps the status class to a severity,
//! flattens business data into one canonical record, and hands the record
//! to a sink. Sink failures are reported on a fallback channel and never
//! block or fail the request path.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use wl_emit::{EmissionPipeline, ResponseInfo, TracingSink};
//! use wl_event::{RequestMeta, WideEvent};
//!
//! let pipeline = EmissionPipeline::new(Arc::new(TracingSink));
//! let event = Arc::new(WideEvent::new(RequestMeta::new(
//!     "req-1", "GET", "/v1/health", "127.0.0.1", "curl/8.0",
//! )));
//!
//! let mut emission = pipeline.begin(Arc::clone(&event));
//! // ... request runs, event gets enriched ...
//! emission.complete(
//!     ResponseInfo::new(200, 17).with_elapsed(Duration::from_millis(3)),
//!     None,
//! );
//! assert!(emission.is_emitted());
//! ```

pub mod pipeline;
pub mod record;
pub mod severity;
pub mod sink;

pub use pipeline::{Emission, EmissionPipeline};
pub use record::{CanonicalRecord, Outcome, ResponseInfo};
pub use severity::Severity;
pub use sink::{JsonLineSink, Sink, SinkError, TracingSink};
