//! Explicit request-scoped carrier.
//!
//! The scope associates the in-flight request with its accumulator and is
//! threaded through call signatures rather than hiding in ambient state.
//! Cloning is cheap (two `Arc` clones at most), so handlers hand a clone to
//! every spawned sub-task that should enrich the same event. The scope does
//! not spawn tasks or manage their lifetime.

use std::sync::Arc;

use wl_redact::{default_redactor, Redactor};

use crate::event::WideEvent;

/// Carrier context for one request.
///
/// An empty scope is valid everywhere: lookups return `None` and every
/// enrichment call against it is a silent no-op.
#[derive(Debug, Clone, Default)]
pub struct RequestScope {
    event: Option<Arc<WideEvent>>,
    redactor: Option<Arc<Redactor>>,
}

impl RequestScope {
    /// A scope with no accumulator installed.
    pub fn empty() -> Self {
        RequestScope::default()
    }

    /// Derive a scope carrying `event`. The input scope is not mutated.
    pub fn install(&self, event: Arc<WideEvent>) -> RequestScope {
        RequestScope {
            event: Some(event),
            redactor: self.redactor.clone(),
        }
    }

    /// Derive a scope whose "safe" enrichment variants use `redactor`
    /// instead of the shared default.
    pub fn with_redactor(&self, redactor: Arc<Redactor>) -> RequestScope {
        RequestScope {
            event: self.event.clone(),
            redactor: Some(redactor),
        }
    }

    /// The installed accumulator, if any. O(1).
    pub fn event(&self) -> Option<Arc<WideEvent>> {
        self.event.clone()
    }

    /// Whether an accumulator is installed.
    pub fn is_active(&self) -> bool {
        self.event.is_some()
    }

    /// The redactor backing "safe" enrichment in this scope.
    pub fn redactor(&self) -> Arc<Redactor> {
        self.redactor.clone().unwrap_or_else(default_redactor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RequestMeta;
    use wl_redact::SensitiveKeyRegistry;

    fn test_event() -> Arc<WideEvent> {
        Arc::new(WideEvent::new(RequestMeta::new(
            "req-1", "GET", "/", "127.0.0.1", "test",
        )))
    }

    #[test]
    fn test_empty_scope_has_no_event() {
        let scope = RequestScope::empty();
        assert!(scope.event().is_none());
        assert!(!scope.is_active());
    }

    #[test]
    fn test_install_derives_without_mutating_input() {
        let base = RequestScope::empty();
        let installed = base.install(test_event());

        assert!(!base.is_active());
        assert!(installed.is_active());
        assert_eq!(
            installed.event().map(|e| e.request_id().to_string()),
            Some("req-1".to_string())
        );
    }

    #[test]
    fn test_clones_share_the_same_event() {
        let scope = RequestScope::empty().install(test_event());
        let clone = scope.clone();

        clone
            .event()
            .expect("event installed")
            .add("from_clone", serde_json::json!(true));

        let data = scope.event().expect("event installed").business_data();
        assert_eq!(data["from_clone"], serde_json::json!(true));
    }

    #[test]
    fn test_redactor_override_survives_install() {
        let custom = Arc::new(Redactor::new(Arc::new(SensitiveKeyRegistry::with_patterns(
            ["tenant_pin"],
        ))));
        let scope = RequestScope::empty()
            .with_redactor(Arc::clone(&custom))
            .install(test_event());

        assert!(scope.redactor().registry().is_sensitive("tenant_pin"));
    }

    #[test]
    fn test_default_redactor_used_when_not_overridden() {
        let scope = RequestScope::empty();
        assert!(scope.redactor().registry().is_sensitive("password"));
    }
}
