//! Severity derived from the response status class.

use serde::{Deserialize, Serialize};

/// Log severity of a canonical record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Map a numeric status to a severity.
    ///
    /// ≥500 is an error, 4xx a warning, everything below 400 (including
    /// redirects) is informational.
    pub fn from_status(status: u16) -> Self {
        match status {
            500.. => Severity::Error,
            400..=499 => Severity::Warning,
            _ => Severity::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classes() {
        assert_eq!(Severity::from_status(200), Severity::Info);
        assert_eq!(Severity::from_status(201), Severity::Info);
        assert_eq!(Severity::from_status(301), Severity::Info);
        assert_eq!(Severity::from_status(400), Severity::Warning);
        assert_eq!(Severity::from_status(404), Severity::Warning);
        assert_eq!(Severity::from_status(499), Severity::Warning);
        assert_eq!(Severity::from_status(500), Severity::Error);
        assert_eq!(Severity::from_status(503), Severity::Error);
    }

    #[test]
    fn test_display() {
        assert_eq!(Severity::Info.to_string(), "INFO");
        assert_eq!(Severity::Warning.to_string(), "WARNING");
        assert_eq!(Severity::Error.to_string(), "ERROR");
    }

    #[test]
    fn test_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&Severity::Error).expect("serializes"),
            r#""ERROR""#
        );
    }
}
