//! The per-request accumulator.
//!
//! A `WideEvent` is created at request start, enriched from anywhere in the
//! request (including concurrently spawned sub-tasks holding a clone of the
//! same `Arc`), read once by the emission pipeline at request end, and then
//! discarded. It is never reused across requests.
//!
//! All mutable state sits behind a single reader-writer lock; no operation
//! performs I/O or blocks while holding it, and none of them can fail.
//! Capacity overflow is a silent-drop policy, not an error.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use uuid::Uuid;

use crate::error::ErrorInfo;
use crate::user::UserInfo;

/// Default cap on distinct business-data keys per event.
///
/// A backstop against unbounded memory growth in long-running requests:
/// new keys past the cap are silently dropped, updates to existing keys
/// always succeed.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Generate a fresh request id.
///
/// Transports that did not receive an `X-Request-ID` style header use this
/// to mint one before constructing the event.
pub fn generated_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Immutable request metadata fixed at event construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMeta {
    pub request_id: String,
    pub method: String,
    pub path: String,
    pub remote_addr: String,
    pub user_agent: String,
}

impl RequestMeta {
    pub fn new(
        request_id: impl Into<String>,
        method: impl Into<String>,
        path: impl Into<String>,
        remote_addr: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        RequestMeta {
            request_id: request_id.into(),
            method: method.into(),
            path: path.into(),
            remote_addr: remote_addr.into(),
            user_agent: user_agent.into(),
        }
    }
}

/// Mutable event state, only ever touched under the lock.
#[derive(Debug, Default)]
struct EventState {
    trace_id: Option<String>,
    business: HashMap<String, Value>,
    user: Option<UserInfo>,
    error: Option<ErrorInfo>,
    dropped: u64,
}

/// One request's accumulated facts.
///
/// Clone-free sharing: wrap in an `Arc` and hand clones of the `Arc` to any
/// sub-task that should enrich the same event. Concurrent writes to
/// distinct keys are independent; same-key races resolve last-write-wins
/// in whatever order the lock serializes them.
#[derive(Debug)]
pub struct WideEvent {
    meta: RequestMeta,
    max_entries: usize,
    state: RwLock<EventState>,
}

impl WideEvent {
    /// Create an event for one request.
    pub fn new(meta: RequestMeta) -> Self {
        WideEvent {
            meta,
            max_entries: DEFAULT_MAX_ENTRIES,
            state: RwLock::new(EventState::default()),
        }
    }

    /// Override the distinct-key cap.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn request_id(&self) -> &str {
        &self.meta.request_id
    }

    pub fn method(&self) -> &str {
        &self.meta.method
    }

    pub fn path(&self) -> &str {
        &self.meta.path
    }

    pub fn remote_addr(&self) -> &str {
        &self.meta.remote_addr
    }

    pub fn user_agent(&self) -> &str {
        &self.meta.user_agent
    }

    /// Set the trace id once discovered. Last write wins.
    pub fn set_trace_id(&self, trace_id: impl Into<String>) {
        self.write().trace_id = Some(trace_id.into());
    }

    pub fn trace_id(&self) -> Option<String> {
        self.read().trace_id.clone()
    }

    /// Add one business-data entry.
    ///
    /// Overwrites are always allowed. A new key is inserted only while the
    /// distinct-key count is below the cap; past that it is dropped
    /// silently and the internal drop counter advances.
    pub fn add(&self, key: impl Into<String>, value: impl Into<Value>) {
        let mut state = self.write();
        insert_bounded(&mut state, self.max_entries, key.into(), value.into());
    }

    /// Add a batch of entries with per-entry `add` semantics.
    ///
    /// Once capacity is reached the batch stops admitting new keys but
    /// keeps applying updates to existing ones.
    pub fn add_map<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut state = self.write();
        for (key, value) in entries {
            insert_bounded(&mut state, self.max_entries, key, value);
        }
    }

    /// Add entries from a flat key/value pair list.
    ///
    /// A trailing unpaired value is dropped; pair positions whose key is
    /// not a string are skipped. Otherwise identical to [`add_map`].
    ///
    /// [`add_map`]: WideEvent::add_map
    pub fn add_pairs(&self, flat: &[Value]) {
        if flat.len() < 2 {
            return;
        }
        let mut state = self.write();
        for pair in flat.chunks_exact(2) {
            if let Value::String(key) = &pair[0] {
                insert_bounded(&mut state, self.max_entries, key.clone(), pair[1].clone());
            }
        }
    }

    /// Replace the user descriptor wholesale.
    pub fn set_user(&self, user: UserInfo) {
        self.write().user = Some(user);
    }

    /// Replace the error descriptor wholesale. Last write wins.
    pub fn set_error(&self, error: ErrorInfo) {
        self.write().error = Some(error);
    }

    /// Point-in-time shallow copy of the business data.
    ///
    /// Never hands out the live map, so callers can mutate the copy
    /// freely. The copy is the only allocation on this read path.
    pub fn business_data(&self) -> HashMap<String, Value> {
        self.read().business.clone()
    }

    pub fn user(&self) -> Option<UserInfo> {
        self.read().user.clone()
    }

    pub fn error(&self) -> Option<ErrorInfo> {
        self.read().error.clone()
    }

    /// Number of distinct business-data keys currently held.
    pub fn len(&self) -> usize {
        self.read().business.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().business.is_empty()
    }

    /// Entries silently dropped at the capacity backstop.
    ///
    /// Operability counter only; it is not part of the emitted record and
    /// drops are never surfaced as failures.
    pub fn dropped_entries(&self) -> u64 {
        self.read().dropped
    }

    fn read(&self) -> RwLockReadGuard<'_, EventState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, EventState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Insert with the capacity policy: updates always land, new keys only
/// below the cap.
fn insert_bounded(state: &mut EventState, max_entries: usize, key: String, value: Value) {
    if let Some(slot) = state.business.get_mut(&key) {
        *slot = value;
        return;
    }
    if state.business.len() >= max_entries {
        state.dropped += 1;
        return;
    }
    state.business.insert(key, value);
}
