//! User descriptor attached to a wide event.

use serde::{Deserialize, Serialize};

/// User information carried in the canonical record.
///
/// Immutable once constructed; the accumulator replaces it wholesale,
/// never field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Stable user identifier.
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Subscription tier, e.g. "free" or "pro".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,
}

impl UserInfo {
    /// Create a descriptor with just an id.
    pub fn new(id: impl Into<String>) -> Self {
        UserInfo {
            id: id.into(),
            email: None,
            subscription: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_subscription(mut self, tier: impl Into<String>) -> Self {
        self.subscription = Some(tier.into());
        self
    }
}
