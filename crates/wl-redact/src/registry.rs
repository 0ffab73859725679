//! Registry of sensitive field-name patterns.
//!
//! The registry is an explicitly constructed component rather than a hidden
//! package-level singleton, so tests can run against isolated pattern sets.
//! A shared process-wide default is still available through
//! [`default_registry`] for callers that do not need isolation.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::Lazy;

/// Built-in sensitive field-name patterns, checked case-insensitively as
/// exact matches and substrings.
pub const BUILTIN_PATTERNS: &[&str] = &[
    // Authentication & authorization
    "password",
    "passwd",
    "pwd",
    "secret",
    "token",
    "auth",
    "authorization",
    "bearer",
    "api_key",
    "apikey",
    "api-key",
    "access_token",
    "refresh_token",
    "id_token",
    "session",
    "session_id",
    "sessionid",
    "cookie",
    // Credentials
    "credentials",
    "credential",
    "private_key",
    "privatekey",
    "public_key",
    "publickey",
    "cert",
    "certificate",
    // Payment & PII
    "credit_card",
    "creditcard",
    "card_number",
    "cvv",
    "cvc",
    "ssn",
    "social_security",
    // Cloud provider keys
    "aws_secret_access_key",
    "aws_access_key_id",
    "aws_session_token",
    // Database
    "db_password",
    "database_password",
    "connection_string",
    "connectionstring",
    // Custom headers
    "x-api-key",
    "x-auth-token",
    "x-access-token",
    "x-session-id",
];

/// Process-wide default registry, seeded with [`BUILTIN_PATTERNS`].
static DEFAULT_REGISTRY: Lazy<Arc<SensitiveKeyRegistry>> =
    Lazy::new(|| Arc::new(SensitiveKeyRegistry::new()));

/// Returns the shared process-wide registry.
///
/// Patterns registered here affect every component that did not get an
/// explicit registry of its own. The registry only ever grows.
pub fn default_registry() -> Arc<SensitiveKeyRegistry> {
    Arc::clone(&DEFAULT_REGISTRY)
}

/// A monotonically growing set of lowercase field-name patterns.
///
/// Reads take a shared lock and writes an exclusive one, so concurrent
/// `is_sensitive` checks never observe a partially updated set. There is no
/// removal API: once a pattern is considered sensitive it stays sensitive
/// for the lifetime of the registry.
#[derive(Debug)]
pub struct SensitiveKeyRegistry {
    patterns: RwLock<HashSet<String>>,
}

impl SensitiveKeyRegistry {
    /// Create a registry seeded with the built-in pattern list.
    pub fn new() -> Self {
        Self::with_patterns(std::iter::empty::<&str>())
    }

    /// Create a registry with no patterns at all.
    ///
    /// Mainly useful for tests that need full control over what is masked.
    pub fn empty() -> Self {
        SensitiveKeyRegistry {
            patterns: RwLock::new(HashSet::new()),
        }
    }

    /// Create a registry with the built-in list plus extra patterns.
    pub fn with_patterns<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut patterns: HashSet<String> = BUILTIN_PATTERNS
            .iter()
            .map(|p| p.to_ascii_lowercase())
            .collect();
        patterns.extend(extra.into_iter().map(|p| p.as_ref().to_lowercase()));
        SensitiveKeyRegistry {
            patterns: RwLock::new(patterns),
        }
    }

    /// Register an additional pattern at runtime.
    ///
    /// The pattern is lowercased before insertion. Safe to call concurrently
    /// with `is_sensitive` checks.
    pub fn register(&self, pattern: impl AsRef<str>) {
        self.write().insert(pattern.as_ref().to_lowercase());
    }

    /// Register several patterns at once.
    pub fn register_all<I, S>(&self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut guard = self.write();
        for pattern in patterns {
            guard.insert(pattern.as_ref().to_lowercase());
        }
    }

    /// Check whether a field name is sensitive.
    ///
    /// Exact matches hit the set in O(1); composite names like
    /// `user_password` fall back to a linear substring scan over the
    /// (small) pattern set.
    pub fn is_sensitive(&self, field_name: &str) -> bool {
        let lower = field_name.to_lowercase();
        let patterns = self.read();

        if patterns.contains(&lower) {
            return true;
        }

        patterns.iter().any(|p| lower.contains(p.as_str()))
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the registry holds no patterns.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashSet<String>> {
        self.patterns.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashSet<String>> {
        self.patterns
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SensitiveKeyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
