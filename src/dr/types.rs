//! Core DR status types
//!
//! `DRContext` is the canonical record every topology normalizer produces;
//! the resolver and detail builder only ever see this shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crd::DRCondition;

// =============================================================================
// Replication Health
// =============================================================================

/// Health grade of one replication stream, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplicationHealth {
    Healthy,
    Warning,
    Critical,
}

impl std::fmt::Display for ReplicationHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplicationHealth::Healthy => write!(f, "HEALTHY"),
            ReplicationHealth::Warning => write!(f, "WARNING"),
            ReplicationHealth::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Replication mode of a DR policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplicationMode {
    Sync,
    Async,
}

impl ReplicationMode {
    /// Derive the mode from a policy scheduling interval.
    ///
    /// Metro (synchronous) policies carry a zero or empty interval.
    pub fn from_scheduling_interval(interval: &str) -> Self {
        let interval = interval.trim();
        let digits = interval.trim_end_matches(|c: char| c.is_ascii_alphabetic());
        if interval.is_empty() || (!digits.is_empty() && digits.chars().all(|c| c == '0')) {
            ReplicationMode::Sync
        } else {
            ReplicationMode::Async
        }
    }
}

// =============================================================================
// Phase
// =============================================================================

/// Lifecycle phase of a protected placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DRPhase {
    Deployed,
    FailingOver,
    FailedOver,
    Relocating,
    Relocated,
}

impl DRPhase {
    /// Parse a DRPC phase string; unknown phases yield `None`
    pub fn parse(phase: &str) -> Option<Self> {
        match phase {
            "Deployed" => Some(DRPhase::Deployed),
            "FailingOver" => Some(DRPhase::FailingOver),
            "FailedOver" => Some(DRPhase::FailedOver),
            "Relocating" => Some(DRPhase::Relocating),
            "Relocated" => Some(DRPhase::Relocated),
            _ => None,
        }
    }

    /// Check if a failover or relocate is in flight
    pub fn is_transitioning(&self) -> bool {
        matches!(self, DRPhase::FailingOver | DRPhase::Relocating)
    }
}

impl std::fmt::Display for DRPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DRPhase::Deployed => write!(f, "Deployed"),
            DRPhase::FailingOver => write!(f, "FailingOver"),
            DRPhase::FailedOver => write!(f, "FailedOver"),
            DRPhase::Relocating => write!(f, "Relocating"),
            DRPhase::Relocated => write!(f, "Relocated"),
        }
    }
}

// =============================================================================
// Resolved Status
// =============================================================================

/// Resolved DR status; `Ord` follows precedence (greatest wins)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DRStatus {
    Healthy,
    Warning,
    Critical,
    Relocating,
    FailingOver,
    WaitOnUserCleanup,
}

impl DRStatus {
    /// Status for a steady-state health grade
    pub fn from_health(health: ReplicationHealth) -> Self {
        match health {
            ReplicationHealth::Healthy => DRStatus::Healthy,
            ReplicationHealth::Warning => DRStatus::Warning,
            ReplicationHealth::Critical => DRStatus::Critical,
        }
    }

    /// Health grade behind a steady-state status
    pub fn health_grade(&self) -> Option<ReplicationHealth> {
        match self {
            DRStatus::Healthy => Some(ReplicationHealth::Healthy),
            DRStatus::Warning => Some(ReplicationHealth::Warning),
            DRStatus::Critical => Some(ReplicationHealth::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for DRStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DRStatus::Healthy => write!(f, "Healthy"),
            DRStatus::Warning => write!(f, "Warning"),
            DRStatus::Critical => write!(f, "Critical"),
            DRStatus::Relocating => write!(f, "Relocating"),
            DRStatus::FailingOver => write!(f, "FailingOver"),
            DRStatus::WaitOnUserCleanup => write!(f, "WaitOnUserCleanup"),
        }
    }
}

// =============================================================================
// DR Context
// =============================================================================

/// Canonical DR state of one protected workload, rebuilt on every update
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DRContext {
    /// Placement-control name
    pub name: String,
    /// Placement-control namespace
    pub namespace: String,

    pub is_cleanup_required: bool,
    pub phase: Option<DRPhase>,

    pub volume_replication_health: ReplicationHealth,
    /// Present only when object-metadata protection is configured
    pub kube_object_replication_health: Option<ReplicationHealth>,

    pub primary_cluster: String,
    pub target_cluster: String,

    pub policy_name: String,
    pub scheduling_interval: String,
    /// Object-metadata capture interval, when configured
    pub kube_object_capture_interval: Option<String>,

    pub volume_last_sync_time: Option<DateTime<Utc>>,
    pub last_kube_object_protection_time: Option<DateTime<Utc>>,

    /// Placement-level conditions
    pub placement_conditions: Vec<DRCondition>,
    /// Resource-aggregate conditions
    pub resource_conditions: Vec<DRCondition>,

    /// Protected condition (discovered applications)
    pub protected_condition: Option<DRCondition>,
    /// Available condition (discovered applications)
    pub available_condition: Option<DRCondition>,
}

impl DRContext {
    /// Check if object-metadata protection is configured
    pub fn has_kube_object_protection(&self) -> bool {
        self.kube_object_replication_health.is_some()
    }

    /// Present health grades: volume first, then object metadata
    pub fn health_grades(&self) -> impl Iterator<Item = ReplicationHealth> {
        std::iter::once(self.volume_replication_health).chain(self.kube_object_replication_health)
    }
}
