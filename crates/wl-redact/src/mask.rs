//! Recursive, bounded masking of sensitive values.
//!
//! The `Redactor` walks arbitrary nested JSON data and replaces any value
//! stored under a sensitive key with a masked representation. Recursion is
//! bounded by depth and by an estimated input size; both overflows are
//! defined policy outcomes, never errors.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::registry::{default_registry, SensitiveKeyRegistry};

/// Replacement marker for masked values.
pub const MASK_MARKER: &str = "***MASKED***";

/// Placeholder substituted for inputs whose estimated size exceeds the
/// masking ceiling.
pub const OVERSIZE_PLACEHOLDER: &str = "[DATA_TOO_LARGE_TO_MASK]";

/// Characters of a long string kept visible in front of the mask marker.
const PARTIAL_PREFIX_CHARS: usize = 4;

/// Bounds on the masking walk.
#[derive(Debug, Clone, Copy)]
pub struct MaskLimits {
    /// Maximum recursion depth. Substructure below the cap is returned
    /// unredacted rather than recursed into; the bound is deliberate
    /// (it keeps worst-case cost fixed) but means deeply nested
    /// attacker-controlled payloads past the cap are emitted as-is.
    pub max_depth: usize,

    /// Estimated-size ceiling in bytes. Inputs estimated above this are
    /// replaced wholesale by [`OVERSIZE_PLACEHOLDER`].
    pub max_bytes: usize,
}

impl MaskLimits {
    /// Set a custom depth cap.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set a custom size ceiling.
    pub fn with_max_bytes(mut self, bytes: usize) -> Self {
        self.max_bytes = bytes;
        self
    }
}

impl Default for MaskLimits {
    fn default() -> Self {
        MaskLimits {
            max_depth: 10,
            max_bytes: 1024 * 1024, // 1MiB
        }
    }
}

/// Shared default redactor over the process-wide registry.
static DEFAULT_REDACTOR: Lazy<Arc<Redactor>> = Lazy::new(|| Arc::new(Redactor::default()));

/// Returns the shared default redactor.
pub fn default_redactor() -> Arc<Redactor> {
    Arc::clone(&DEFAULT_REDACTOR)
}

/// Recursive masking engine over `serde_json::Value`.
///
/// Redaction never fails: oversized inputs become a placeholder, depth
/// overflow returns the remainder unchanged, and everything else is a
/// structural copy with sensitive values masked.
#[derive(Debug)]
pub struct Redactor {
    registry: Arc<SensitiveKeyRegistry>,
    limits: MaskLimits,
}

impl Redactor {
    /// Create a redactor over an explicit registry.
    pub fn new(registry: Arc<SensitiveKeyRegistry>) -> Self {
        Redactor {
            registry,
            limits: MaskLimits::default(),
        }
    }

    /// Override the default limits.
    pub fn with_limits(mut self, limits: MaskLimits) -> Self {
        self.limits = limits;
        self
    }

    /// The registry this redactor consults.
    pub fn registry(&self) -> &Arc<SensitiveKeyRegistry> {
        &self.registry
    }

    /// Recursively mask sensitive values in `value`.
    ///
    /// Object keys are checked against the registry; matches get a masked
    /// representation of their value, everything else is recursed into.
    /// Array membership itself is never sensitive. Scalars pass through
    /// unchanged.
    pub fn redact(&self, value: &Value) -> Value {
        if estimate_size(value) > self.limits.max_bytes {
            return Value::String(OVERSIZE_PLACEHOLDER.to_string());
        }
        self.redact_at(value, 0)
    }

    /// Serialize `value` through serde, then mask the result.
    ///
    /// Field names are the serde serialization names, so `#[serde(rename)]`
    /// is honored and non-serialized fields never appear. A serialization
    /// failure yields the bare mask marker; raw data is never passed
    /// through on an error path.
    pub fn redact_serializable<T: Serialize>(&self, value: &T) -> Value {
        match serde_json::to_value(value) {
            Ok(v) => self.redact(&v),
            Err(_) => Value::String(MASK_MARKER.to_string()),
        }
    }

    /// Mask sensitive entries in a string-to-string header map.
    ///
    /// Header values under sensitive names are replaced wholesale by the
    /// mask marker; no partial prefix is kept.
    pub fn redact_headers(&self, headers: &HashMap<String, String>) -> HashMap<String, String> {
        headers
            .iter()
            .map(|(name, value)| {
                if self.registry.is_sensitive(name) {
                    (name.clone(), MASK_MARKER.to_string())
                } else {
                    (name.clone(), value.clone())
                }
            })
            .collect()
    }

    fn redact_at(&self, value: &Value, depth: usize) -> Value {
        if depth > self.limits.max_depth {
            return value.clone();
        }

        match value {
            Value::Object(map) => {
                let mut masked = Map::with_capacity(map.len());
                for (key, inner) in map {
                    if self.registry.is_sensitive(key) {
                        masked.insert(key.clone(), mask_value(inner));
                    } else {
                        masked.insert(key.clone(), self.redact_at(inner, depth + 1));
                    }
                }
                Value::Object(masked)
            }
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.redact_at(item, depth + 1))
                    .collect(),
            ),
            _ => value.clone(),
        }
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Redactor::new(default_registry())
    }
}

/// Masked representation of a single sensitive value.
///
/// Strings longer than four characters keep a four-character prefix; short
/// strings and all non-string values become the bare marker so no partial
/// value can leak.
fn mask_value(value: &Value) -> Value {
    if let Value::String(s) = value {
        if s.chars().count() > PARTIAL_PREFIX_CHARS {
            let prefix: String = s.chars().take(PARTIAL_PREFIX_CHARS).collect();
            return Value::String(format!("{prefix}...{MASK_MARKER}"));
        }
    }
    Value::String(MASK_MARKER.to_string())
}

/// Rough byte-size estimate used to gate the masking walk.
///
/// Deliberately shallow and cheap: containers are costed per entry, not
/// deep-measured.
fn estimate_size(value: &Value) -> usize {
    match value {
        Value::Null => 0,
        Value::String(s) => s.len(),
        Value::Array(items) => items.len() * 50,
        Value::Object(map) => map.len() * 100,
        Value::Bool(_) | Value::Number(_) => 8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_redactor() -> Redactor {
        Redactor::new(Arc::new(SensitiveKeyRegistry::new()))
    }

    #[test]
    fn test_long_string_keeps_prefix() {
        let redactor = test_redactor();
        let masked = redactor.redact(&json!({"password": "abcdefgh"}));
        assert_eq!(masked["password"], "abcd...***MASKED***");
    }

    #[test]
    fn test_short_string_fully_masked() {
        let redactor = test_redactor();
        let masked = redactor.redact(&json!({"password": "ab"}));
        assert_eq!(masked["password"], MASK_MARKER);
    }

    #[test]
    fn test_non_string_fully_masked() {
        let redactor = test_redactor();
        let masked = redactor.redact(&json!({"token": 1234567890}));
        assert_eq!(masked["token"], MASK_MARKER);

        let masked = redactor.redact(&json!({"secret": {"inner": "value"}}));
        assert_eq!(masked["secret"], MASK_MARKER);
    }

    #[test]
    fn test_non_sensitive_unchanged() {
        let redactor = test_redactor();
        let masked = redactor.redact(&json!({"email": "a@b.com"}));
        assert_eq!(masked["email"], "a@b.com");
    }

    #[test]
    fn test_nested_masking_leaves_siblings() {
        let redactor = test_redactor();
        let input = json!({
            "order": {
                "id": 42,
                "payment": {
                    "card_number": "4111111111111111",
                    "amount_cents": 1599
                }
            },
            "status": "pending"
        });
        let masked = redactor.redact(&input);

        assert_eq!(masked["order"]["payment"]["card_number"], "4111...***MASKED***");
        assert_eq!(masked["order"]["payment"]["amount_cents"], 1599);
        assert_eq!(masked["order"]["id"], 42);
        assert_eq!(masked["status"], "pending");
    }

    #[test]
    fn test_arrays_recursed_not_masked() {
        let redactor = test_redactor();
        let input = json!([{"api_key": "sk_live_1234"}, {"name": "ok"}]);
        let masked = redactor.redact(&input);

        assert_eq!(masked[0]["api_key"], "sk_l...***MASKED***");
        assert_eq!(masked[1]["name"], "ok");
    }

    #[test]
    fn test_scalar_leaf_unchanged() {
        let redactor = test_redactor();
        assert_eq!(redactor.redact(&json!("plain")), json!("plain"));
        assert_eq!(redactor.redact(&json!(7)), json!(7));
        assert_eq!(redactor.redact(&Value::Null), Value::Null);
    }

    #[test]
    fn test_oversize_replaced_wholesale() {
        let redactor = Redactor::new(Arc::new(SensitiveKeyRegistry::new()))
            .with_limits(MaskLimits::default().with_max_bytes(100));
        let big = json!({"a": 1, "b": 2}); // 2 entries * 100 bytes estimate
        assert_eq!(redactor.redact(&big), json!(OVERSIZE_PLACEHOLDER));
    }

    #[test]
    fn test_depth_cap_returns_remainder_unredacted() {
        let redactor = Redactor::new(Arc::new(SensitiveKeyRegistry::new()))
            .with_limits(MaskLimits::default().with_max_depth(1));
        let input = json!({"a": {"b": {"password": "deep_secret"}}});
        let masked = redactor.redact(&input);

        // Depth 0 = outer object, depth 1 = {"b": ...}; below that the
        // walk stops and the substructure comes back as-is.
        assert_eq!(masked["a"]["b"]["password"], "deep_secret");
    }

    #[test]
    fn test_depth_within_cap_still_masked() {
        let redactor = test_redactor();
        let input = json!({"a": {"b": {"c": {"password": "deep_secret"}}}});
        let masked = redactor.redact(&input);
        assert_eq!(masked["a"]["b"]["c"]["password"], "deep...***MASKED***");
    }

    #[test]
    fn test_headers_masked_wholesale() {
        let redactor = test_redactor();
        let headers: HashMap<String, String> = [
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Authorization".to_string(), "Bearer abc123".to_string()),
            ("X-Api-Key".to_string(), "sk_live_456".to_string()),
        ]
        .into();

        let masked = redactor.redact_headers(&headers);
        assert_eq!(masked["Content-Type"], "application/json");
        assert_eq!(masked["Authorization"], MASK_MARKER);
        assert_eq!(masked["X-Api-Key"], MASK_MARKER);
    }

    #[test]
    fn test_serializable_honors_serde_names() {
        #[derive(Serialize)]
        struct Login {
            username: String,
            #[serde(rename = "password")]
            pass_phrase: String,
            #[serde(skip)]
            _internal: u32,
        }

        let redactor = test_redactor();
        let masked = redactor.redact_serializable(&Login {
            username: "ann".to_string(),
            pass_phrase: "correcthorse".to_string(),
            _internal: 7,
        });

        assert_eq!(masked["username"], "ann");
        assert_eq!(masked["password"], "corr...***MASKED***");
        assert!(masked.get("_internal").is_none());
    }

    #[test]
    fn test_custom_registry_pattern() {
        let registry = Arc::new(SensitiveKeyRegistry::with_patterns(["tenant_pin"]));
        let redactor = Redactor::new(registry);
        let masked = redactor.redact(&json!({"tenant_pin": "99881"}));
        assert_eq!(masked["tenant_pin"], "9988...***MASKED***");
    }

    #[test]
    fn test_estimate_size_heuristics() {
        assert_eq!(estimate_size(&Value::Null), 0);
        assert_eq!(estimate_size(&json!("abcd")), 4);
        assert_eq!(estimate_size(&json!([1, 2, 3])), 150);
        assert_eq!(estimate_size(&json!({"a": 1})), 100);
        assert_eq!(estimate_size(&json!(true)), 8);
    }
}
