//! DRPlacementControl CRD
//!
//! The placement-control resource records a protected workload's DR action,
//! its lifecycle phase and the replication progress reported by the hub.
//! The engine only reads it.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::condition::DRCondition;

/// Progression value published while stale resources await manual removal
pub const PROGRESSION_WAIT_ON_USER_CLEANUP: &str = "WaitOnUserToCleanUp";

// =============================================================================
// DRPlacementControl CRD
// =============================================================================

/// DRPlacementControl binds a workload's placement to a DR policy and drives
/// failover/relocate actions between the policy's clusters.
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "ramendr.openshift.io",
    version = "v1alpha1",
    kind = "DRPlacementControl",
    plural = "drplacementcontrols",
    shortname = "drpc",
    status = "DRPlacementControlStatus",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct DRPlacementControlSpec {
    /// Placement this DRPC protects
    pub placement_ref: ObjectReference,

    /// DR policy governing replication
    pub dr_policy_ref: ObjectReference,

    /// Cluster the workload should run on when not failed over
    #[serde(default)]
    pub preferred_cluster: Option<String>,

    /// Cluster the workload fails over to
    #[serde(default)]
    pub failover_cluster: Option<String>,

    /// Requested action (Failover, Relocate)
    #[serde(default)]
    pub action: Option<DRAction>,

    /// Object-metadata (kube object) protection settings
    #[serde(default)]
    pub kube_object_protection: Option<KubeObjectProtectionSpec>,

    /// Namespaces protected for discovered applications
    #[serde(default)]
    pub protected_namespaces: Vec<String>,
}

// =============================================================================
// Sub-Types
// =============================================================================

/// Reference to another object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
}

/// DR action requested on the placement-control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DRAction {
    Failover,
    Relocate,
}

impl std::fmt::Display for DRAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DRAction::Failover => write!(f, "Failover"),
            DRAction::Relocate => write!(f, "Relocate"),
        }
    }
}

/// Object-metadata protection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KubeObjectProtectionSpec {
    /// How often cluster objects are captured (e.g. "5m")
    #[serde(default)]
    pub capture_interval: Option<String>,
}

// =============================================================================
// Status
// =============================================================================

/// Status of the DRPlacementControl
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DRPlacementControlStatus {
    /// Lifecycle phase (Deployed, FailingOver, FailedOver, Relocating, Relocated)
    #[serde(default)]
    pub phase: Option<String>,

    /// Fine grained progression within the phase
    #[serde(default)]
    pub progression: Option<String>,

    /// Placement-level conditions
    #[serde(default)]
    pub conditions: Vec<DRCondition>,

    /// Conditions aggregated from the protected resources on the managed cluster
    #[serde(default)]
    pub resource_conditions: Option<ResourceConditions>,

    /// Cluster of the last successful deployment
    #[serde(default)]
    pub preferred_decision: Option<PlacementDecisionRef>,

    /// Last completed volume group sync (RFC3339)
    #[serde(default)]
    pub last_group_sync_time: Option<String>,

    /// Last completed object-metadata capture (RFC3339)
    #[serde(default)]
    pub last_kube_object_protection_time: Option<String>,
}

/// Conditions reported by the managed-cluster replication group
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceConditions {
    #[serde(default)]
    pub conditions: Vec<DRCondition>,
}

/// Cluster decision recorded on the status
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlacementDecisionRef {
    #[serde(default)]
    pub cluster_name: String,
}

// =============================================================================
// Implementations
// =============================================================================

impl DRPlacementControl {
    /// Raw phase string, if any
    pub fn phase(&self) -> Option<&str> {
        self.status.as_ref().and_then(|s| s.phase.as_deref())
    }

    /// Placement-level conditions
    pub fn conditions(&self) -> &[DRCondition] {
        self.status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default()
    }

    /// Resource-aggregate conditions
    pub fn resource_conditions(&self) -> &[DRCondition] {
        self.status
            .as_ref()
            .and_then(|s| s.resource_conditions.as_ref())
            .map(|r| r.conditions.as_slice())
            .unwrap_or_default()
    }

    /// Cluster of the last successful deployment, if recorded
    pub fn last_deployed_cluster(&self) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|s| s.preferred_decision.as_ref())
            .map(|d| d.cluster_name.as_str())
            .filter(|name| !name.is_empty())
    }

    /// Capture interval when object-metadata protection is configured
    pub fn capture_interval(&self) -> Option<&str> {
        self.spec
            .kube_object_protection
            .as_ref()
            .and_then(|k| k.capture_interval.as_deref())
            .filter(|i| !i.trim().is_empty())
    }

    /// Check if this DRPC protects the given placement
    pub fn protects_placement(&self, kind: &str, name: &str, namespace: &str) -> bool {
        let placement = &self.spec.placement_ref;
        let kind_matches = placement
            .kind
            .as_deref()
            .map(|k| k.eq_ignore_ascii_case(kind))
            .unwrap_or(true);
        let namespace_matches = placement
            .namespace
            .as_deref()
            .or(self.metadata.namespace.as_deref())
            .map(|ns| ns == namespace)
            .unwrap_or(false);
        placement.name == name && kind_matches && namespace_matches
    }
}
