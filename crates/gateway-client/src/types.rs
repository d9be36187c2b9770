//! Result types for gateway deliveries.

use serde::{Deserialize, Serialize};

/// Outcome of a delivery attempt to a single number.
///
/// A batch send never fails as a whole; each number gets one of these,
/// carrying either the gateway's textual acknowledgement or the error
/// rendered as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetOutcome {
    /// The number the delivery was addressed to.
    pub number: String,

    /// Whether the gateway acknowledged the delivery.
    pub success: bool,

    /// Raw acknowledgement text, when successful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,

    /// Error description, when failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TargetOutcome {
    /// Build a successful outcome.
    pub fn delivered(number: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            success: true,
            response: Some(response.into()),
            error: None,
        }
    }

    /// Build a failed outcome.
    pub fn failed(number: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            success: false,
            response: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivered_outcome() {
        let outcome = TargetOutcome::delivered("5548999998888", "queued");
        assert!(outcome.success);
        assert_eq!(outcome.response.as_deref(), Some("queued"));
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_failed_outcome() {
        let outcome = TargetOutcome::failed("5548999998888", "HTTP 503");
        assert!(!outcome.success);
        assert!(outcome.response.is_none());
        assert_eq!(outcome.error.as_deref(), Some("HTTP 503"));
    }
}
