//! Replication Health Classifier
//!
//! Grades how stale a replication stream is relative to its expected
//! interval. Called once for volume data and once for object metadata; the
//! two results are never combined here.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::debug;

use super::types::{ReplicationHealth, ReplicationMode};
use crate::error::{Error, Result};

// =============================================================================
// Classifier Configuration
// =============================================================================

/// Staleness thresholds, as multiples of the expected interval
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Elapsed <= interval * this is Healthy
    pub healthy_multiplier: u32,
    /// Elapsed <= interval * this is Warning, beyond is Critical
    pub warning_multiplier: u32,
    /// Reference interval for synchronous replication
    pub sync_interval: Duration,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            healthy_multiplier: 1,
            warning_multiplier: 2,
            sync_interval: Duration::from_secs(5 * 60),
        }
    }
}

impl ClassifierConfig {
    /// Check threshold consistency
    pub fn validate(&self) -> Result<()> {
        if self.healthy_multiplier == 0 {
            return Err(Error::Configuration(
                "healthy multiplier must be at least 1".into(),
            ));
        }
        if self.warning_multiplier < self.healthy_multiplier {
            return Err(Error::Configuration(format!(
                "warning multiplier {} is below healthy multiplier {}",
                self.warning_multiplier, self.healthy_multiplier
            )));
        }
        if self.sync_interval.is_zero() {
            return Err(Error::Configuration("sync interval must be non-zero".into()));
        }
        Ok(())
    }
}

// =============================================================================
// Classifier
// =============================================================================

/// Classifies replication staleness into health grades
#[derive(Debug, Clone, Default)]
pub struct ReplicationHealthClassifier {
    config: ClassifierConfig,
}

impl ReplicationHealthClassifier {
    /// Create a classifier with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier with custom thresholds
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classifier thresholds
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Grade a replication stream.
    ///
    /// A missing `last_sync_time` is infinitely stale. An unparsable
    /// interval grades `Critical`.
    pub fn classify(
        &self,
        last_sync_time: Option<DateTime<Utc>>,
        scheduling_interval: &str,
        mode: ReplicationMode,
        now: DateTime<Utc>,
    ) -> ReplicationHealth {
        let interval = match mode {
            ReplicationMode::Sync => self.config.sync_interval,
            ReplicationMode::Async => match parse_sync_interval(scheduling_interval) {
                Ok(interval) => interval,
                Err(e) => {
                    debug!("Failing safe to CRITICAL: {}", e);
                    return ReplicationHealth::Critical;
                }
            },
        };

        let Some(last_sync_time) = last_sync_time else {
            return ReplicationHealth::Critical;
        };

        // Future timestamps (clock skew) count as just synced
        let elapsed = (now - last_sync_time).to_std().unwrap_or(Duration::ZERO);
        self.grade(elapsed, interval)
    }

    /// Grade an elapsed time against an interval
    fn grade(&self, elapsed: Duration, interval: Duration) -> ReplicationHealth {
        let healthy_limit = interval.saturating_mul(self.config.healthy_multiplier);
        let warning_limit = interval.saturating_mul(self.config.warning_multiplier);

        if elapsed <= healthy_limit {
            ReplicationHealth::Healthy
        } else if elapsed <= warning_limit {
            ReplicationHealth::Warning
        } else {
            ReplicationHealth::Critical
        }
    }
}

/// Parse a scheduling interval such as "30s", "5m", "1h" or "2d"
pub fn parse_sync_interval(s: &str) -> Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::DurationParse("empty interval".into()));
    }

    let num_end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    let (num_str, unit_str) = s.split_at(num_end);

    let num: u64 = num_str
        .parse()
        .map_err(|_| Error::DurationParse(format!("invalid number in interval: {}", s)))?;
    if num == 0 {
        return Err(Error::DurationParse(format!("zero interval: {}", s)));
    }

    let unit_secs: u64 = match unit_str {
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        _ => {
            return Err(Error::DurationParse(format!(
                "unknown interval unit: {}",
                unit_str
            )))
        }
    };

    num.checked_mul(unit_secs)
        .map(Duration::from_secs)
        .ok_or_else(|| Error::DurationParse(format!("interval overflow: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn minutes_ago(m: i64) -> Option<DateTime<Utc>> {
        Some(now() - chrono::Duration::minutes(m))
    }

    fn classify(last: Option<DateTime<Utc>>, interval: &str) -> ReplicationHealth {
        ReplicationHealthClassifier::new().classify(last, interval, ReplicationMode::Async, now())
    }

    #[test]
    fn test_parse_sync_interval() {
        assert_eq!(parse_sync_interval("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_sync_interval("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_sync_interval(" 1h ").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_sync_interval("2d").unwrap(), Duration::from_secs(172_800));

        assert!(parse_sync_interval("").is_err());
        assert!(parse_sync_interval("m").is_err());
        assert!(parse_sync_interval("0m").is_err());
        assert!(parse_sync_interval("5").is_err());
        assert!(parse_sync_interval("5x").is_err());
        assert!(parse_sync_interval("1.5h").is_err());
    }

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(classify(minutes_ago(3), "5m"), ReplicationHealth::Healthy);
        assert_eq!(classify(minutes_ago(5), "5m"), ReplicationHealth::Healthy);
        assert_eq!(classify(minutes_ago(7), "5m"), ReplicationHealth::Warning);
        assert_eq!(classify(minutes_ago(10), "5m"), ReplicationHealth::Warning);
        assert_eq!(classify(minutes_ago(11), "5m"), ReplicationHealth::Critical);
    }

    #[test]
    fn test_twelve_minutes_on_five_minute_interval_is_critical() {
        assert_eq!(classify(minutes_ago(12), "5m"), ReplicationHealth::Critical);
    }

    #[test]
    fn test_never_synced_is_critical() {
        assert_eq!(classify(None, "5m"), ReplicationHealth::Critical);
    }

    #[test]
    fn test_malformed_interval_is_critical() {
        assert_eq!(classify(minutes_ago(0), "five minutes"), ReplicationHealth::Critical);
        assert_eq!(classify(minutes_ago(0), ""), ReplicationHealth::Critical);
    }

    #[test]
    fn test_future_sync_time_is_healthy() {
        assert_eq!(classify(minutes_ago(-3), "5m"), ReplicationHealth::Healthy);
    }

    #[test]
    fn test_sync_mode_uses_sync_interval() {
        let classifier = ReplicationHealthClassifier::new();
        let grade = |m| classifier.classify(minutes_ago(m), "0m", ReplicationMode::Sync, now());

        assert_eq!(grade(4), ReplicationHealth::Healthy);
        assert_eq!(grade(8), ReplicationHealth::Warning);
        assert_eq!(grade(20), ReplicationHealth::Critical);
    }

    #[test]
    fn test_custom_multipliers() {
        let classifier = ReplicationHealthClassifier::with_config(ClassifierConfig {
            healthy_multiplier: 2,
            warning_multiplier: 3,
            ..Default::default()
        });
        let grade = |m| classifier.classify(minutes_ago(m), "5m", ReplicationMode::Async, now());

        assert_eq!(grade(9), ReplicationHealth::Healthy);
        assert_eq!(grade(12), ReplicationHealth::Warning);
        assert_eq!(grade(16), ReplicationHealth::Critical);
    }

    #[test]
    fn test_classifier_is_monotonic() {
        let mut previous = ReplicationHealth::Healthy;
        for m in 0..60 {
            let grade = classify(minutes_ago(m), "5m");
            assert!(grade >= previous, "grade improved at {} minutes", m);
            previous = grade;
        }
        assert!(classify(None, "5m") >= previous);
    }

    #[test]
    fn test_config_validate() {
        assert!(ClassifierConfig::default().validate().is_ok());

        let zero = ClassifierConfig {
            healthy_multiplier: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let inverted = ClassifierConfig {
            healthy_multiplier: 3,
            warning_multiplier: 2,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());
    }
}
