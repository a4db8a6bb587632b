//! Status condition as recorded on DR resources
//!
//! Timestamps are kept as raw strings: upstream controllers occasionally
//! publish empty or non-RFC3339 values, and the aggregator must order those
//! as oldest rather than reject the whole resource.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Condition status value meaning "satisfied"
pub const CONDITION_TRUE: &str = "True";

/// Single status condition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DRCondition {
    /// Type of condition (Available, PeerReady, Protected, DataReady, ...)
    pub r#type: String,
    /// Status: True, False, Unknown
    pub status: String,
    /// Machine readable reason
    #[serde(default)]
    pub reason: Option<String>,
    /// Human readable message
    #[serde(default)]
    pub message: Option<String>,
    /// RFC3339 transition time
    #[serde(default)]
    pub last_transition_time: Option<String>,
}

impl DRCondition {
    /// Create a condition with the given type, status and reason
    pub fn new(r#type: &str, status: &str, reason: &str) -> Self {
        Self {
            r#type: r#type.to_string(),
            status: status.to_string(),
            reason: Some(reason.to_string()),
            ..Default::default()
        }
    }

    /// Set the message
    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    /// Set the transition time
    pub fn with_transition_time(mut self, time: &str) -> Self {
        self.last_transition_time = Some(time.to_string());
        self
    }

    /// Check if status is True
    pub fn is_true(&self) -> bool {
        self.status == CONDITION_TRUE
    }

    /// Reason, or empty string
    pub fn reason(&self) -> &str {
        self.reason.as_deref().unwrap_or_default()
    }

    /// Parsed transition time; `None` when missing or unparsable
    pub fn transition_time(&self) -> Option<DateTime<Utc>> {
        self.last_transition_time.as_deref().and_then(parse_timestamp)
    }
}

/// Parse an RFC3339 timestamp, ignoring empty strings
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Find a condition by type
pub fn find_condition<'a>(conditions: &'a [DRCondition], r#type: &str) -> Option<&'a DRCondition> {
    conditions.iter().find(|c| c.r#type == r#type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("2024-05-01T10:00:00Z").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-05-01T10:00:00+00:00");

        let offset = parse_timestamp("2024-05-01T12:00:00+02:00").unwrap();
        assert_eq!(offset, ts);

        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_condition_helpers() {
        let cond = DRCondition::new("PeerReady", "False", "Cleaning")
            .with_message("cleaning up")
            .with_transition_time("not-a-time");

        assert!(!cond.is_true());
        assert_eq!(cond.reason(), "Cleaning");
        assert!(cond.transition_time().is_none());

        let conditions = vec![DRCondition::new("Available", "True", "Deployed"), cond];
        assert_eq!(
            find_condition(&conditions, "PeerReady").map(|c| c.reason()),
            Some("Cleaning")
        );
        assert!(find_condition(&conditions, "Protected").is_none());
    }

    #[test]
    fn test_condition_deserialize() {
        let cond: DRCondition = serde_json::from_str(
            r#"{"type":"Available","status":"True","lastTransitionTime":"2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert!(cond.is_true());
        assert!(cond.reason.is_none());
        assert!(cond.transition_time().is_some());
    }
}
