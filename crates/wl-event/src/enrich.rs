//! Enrichment façade.
//!
//! Free functions that enrich whatever accumulator the given
//! [`RequestScope`] carries. Every function is a silent no-op when the
//! scope is empty, so library code can enrich unconditionally without
//! caring whether it runs inside a request.
//!
//! Shapes:
//!
//! - [`add`] / [`add_map`] / [`add_pairs`] — one pair, a map, or a flat
//!   key/value list.
//! - [`enrich`] — flexible entry point accepting any [`Enrichable`] shape;
//!   the argument type fixes exactly one interpretation per call, so a map
//!   can never be misread as a key/value pair.
//! - `*_safe` variants — values pass through the scope's redactor before
//!   they are written. Use these for anything that might carry
//!   credentials.
//! - [`add_headers`] — protocol headers with sensitive names masked.

use std::collections::HashMap;

use serde_json::{Map, Value};
use wl_redact::Redactor;

use crate::error::ErrorInfo;
use crate::event::WideEvent;
use crate::scope::RequestScope;
use crate::user::UserInfo;

/// A shape of enrichment data the façade can apply to an event.
///
/// Implemented for single pairs, maps, entry lists, and flat key/value
/// pair lists. Map-shaped inputs are redacted as a whole (their own keys
/// are checked), pair-shaped inputs have each value redacted
/// independently.
pub trait Enrichable {
    /// Write the data as-is.
    fn apply(self, event: &WideEvent);

    /// Redact, then write.
    fn apply_redacted(self, event: &WideEvent, redactor: &Redactor);
}

impl<K: Into<String>, V: Into<Value>> Enrichable for (K, V) {
    fn apply(self, event: &WideEvent) {
        event.add(self.0, self.1);
    }

    fn apply_redacted(self, event: &WideEvent, redactor: &Redactor) {
        event.add(self.0, redactor.redact(&self.1.into()));
    }
}

impl Enrichable for HashMap<String, Value> {
    fn apply(self, event: &WideEvent) {
        event.add_map(self);
    }

    fn apply_redacted(self, event: &WideEvent, redactor: &Redactor) {
        apply_object_redacted(event, redactor, self.into_iter().collect());
    }
}

impl Enrichable for Map<String, Value> {
    fn apply(self, event: &WideEvent) {
        event.add_map(self);
    }

    fn apply_redacted(self, event: &WideEvent, redactor: &Redactor) {
        apply_object_redacted(event, redactor, self);
    }
}

impl Enrichable for Vec<(String, Value)> {
    fn apply(self, event: &WideEvent) {
        event.add_map(self);
    }

    fn apply_redacted(self, event: &WideEvent, redactor: &Redactor) {
        event.add_map(
            self.into_iter()
                .map(|(key, value)| (key, redactor.redact(&value))),
        );
    }
}

impl Enrichable for Vec<Value> {
    fn apply(self, event: &WideEvent) {
        event.add_pairs(&self);
    }

    fn apply_redacted(self, event: &WideEvent, redactor: &Redactor) {
        self.as_slice().apply_redacted(event, redactor);
    }
}

impl Enrichable for &[Value] {
    fn apply(self, event: &WideEvent) {
        event.add_pairs(self);
    }

    fn apply_redacted(self, event: &WideEvent, redactor: &Redactor) {
        let masked: Vec<Value> = self
            .iter()
            .enumerate()
            .map(|(i, value)| {
                // Odd positions are values, even positions are keys.
                if i % 2 == 1 {
                    redactor.redact(value)
                } else {
                    value.clone()
                }
            })
            .collect();
        event.add_pairs(&masked);
    }
}

/// Redact a whole object, then merge its entries.
///
/// If the redactor collapses the object (the oversize placeholder), there
/// are no entries to merge and nothing is written.
fn apply_object_redacted(event: &WideEvent, redactor: &Redactor, object: Map<String, Value>) {
    if let Value::Object(masked) = redactor.redact(&Value::Object(object)) {
        event.add_map(masked);
    }
}

/// Flexible enrichment: accepts any [`Enrichable`] shape.
pub fn enrich<E: Enrichable>(scope: &RequestScope, data: E) {
    if let Some(event) = scope.event() {
        data.apply(&event);
    }
}

/// Flexible enrichment with redaction.
pub fn enrich_safe<E: Enrichable>(scope: &RequestScope, data: E) {
    if let Some(event) = scope.event() {
        data.apply_redacted(&event, &scope.redactor());
    }
}

/// Add a single key/value pair.
pub fn add(scope: &RequestScope, key: impl Into<String>, value: impl Into<Value>) {
    enrich(scope, (key, value));
}

/// Add a single pair, redacting the value first.
pub fn add_safe(scope: &RequestScope, key: impl Into<String>, value: impl Into<Value>) {
    enrich_safe(scope, (key, value));
}

/// Add a batch of entries.
pub fn add_map(scope: &RequestScope, entries: HashMap<String, Value>) {
    enrich(scope, entries);
}

/// Add a batch of entries, redacting the batch as a whole first.
pub fn add_map_safe(scope: &RequestScope, entries: HashMap<String, Value>) {
    enrich_safe(scope, entries);
}

/// Add entries from a flat key/value pair list.
pub fn add_pairs(scope: &RequestScope, flat: &[Value]) {
    enrich(scope, flat);
}

/// Add entries from a flat pair list, redacting each value.
pub fn add_pairs_safe(scope: &RequestScope, flat: &[Value]) {
    enrich_safe(scope, flat);
}

/// Add a protocol header map under `key`, masking sensitive header names.
pub fn add_headers(scope: &RequestScope, key: impl Into<String>, headers: &HashMap<String, String>) {
    if let Some(event) = scope.event() {
        let masked = scope.redactor().redact_headers(headers);
        let object: Map<String, Value> = masked
            .into_iter()
            .map(|(name, value)| (name, Value::String(value)))
            .collect();
        event.add(key, Value::Object(object));
    }
}

/// Set the trace id on the current event.
pub fn set_trace_id(scope: &RequestScope, trace_id: impl Into<String>) {
    if let Some(event) = scope.event() {
        event.set_trace_id(trace_id);
    }
}

/// Set the user descriptor on the current event.
pub fn set_user(scope: &RequestScope, user: UserInfo) {
    if let Some(event) = scope.event() {
        event.set_user(user);
    }
}

/// Attach an error descriptor to the current event.
///
/// This records the failure for the canonical record; callers still
/// propagate their own error through the normal return path.
pub fn attach_error(scope: &RequestScope, error: ErrorInfo) {
    if let Some(event) = scope.event() {
        event.set_error(error);
    }
}

/// The error descriptor currently attached, if any.
pub fn current_error(scope: &RequestScope) -> Option<ErrorInfo> {
    scope.event().and_then(|event| event.error())
}
