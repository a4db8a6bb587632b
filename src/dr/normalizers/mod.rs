//! Topology Normalizers
//!
//! Each normalizer reads one workload topology's resource graph and produces
//! the canonical `DRContext`:
//! - ApplicationSet: GitOps ApplicationSet -> Placement -> DRPC -> DRPolicy
//! - Subscription: Application -> Subscription groups -> DRPC per group
//! - Discovered: DRPC + DRPolicy directly
//!
//! A normalizer never returns a partially filled context: while any required
//! watch is loading or failed it reports `ContextState::Loading`.

pub mod application_set;
pub mod discovered;
pub mod subscription;

pub use application_set::*;
pub use discovered::*;
pub use subscription::*;

use chrono::{DateTime, Utc};
use kube::ResourceExt;
use tracing::{debug, warn};

use super::health::ReplicationHealthClassifier;
use super::types::{DRContext, DRPhase, ReplicationMode};
use crate::crd::{
    find_condition, parse_timestamp, DRAction, DRPlacementControl, DRPolicy,
    PROGRESSION_WAIT_ON_USER_CLEANUP,
};
use crate::domain::ports::{WatchPending, Watched};

/// Condition type published while the peer cluster is being prepared
pub const CONDITION_PEER_READY: &str = "PeerReady";

/// PeerReady reason while stale resources are removed
pub const REASON_CLEANING: &str = "Cleaning";

// =============================================================================
// Normalizer Output
// =============================================================================

/// Outcome of normalizing one workload
#[derive(Debug, Clone)]
pub enum ContextState {
    /// Required inputs are still loading or failed to load
    Loading,
    /// The workload has no DR relationship
    NotProtected,
    /// Canonical DR context
    Ready(DRContext),
}

impl ContextState {
    /// The context, when ready
    pub fn context(&self) -> Option<&DRContext> {
        match self {
            ContextState::Ready(ctx) => Some(ctx),
            _ => None,
        }
    }
}

// =============================================================================
// Watch Helpers
// =============================================================================

type Step<T> = std::result::Result<T, ContextState>;

/// Data of a single-object watch, or `Loading`
fn watched_object<'a, T>(kind: &str, watched: &'a Watched<T>) -> Step<Option<&'a T>> {
    watched.ready().map_err(|pending| pending_state(kind, pending))
}

/// Items of a list watch (absent data is an empty list), or `Loading`
fn watched_list<'a, T>(kind: &str, watched: &'a Watched<Vec<T>>) -> Step<&'a [T]> {
    watched
        .ready()
        .map(|data| data.map(Vec::as_slice).unwrap_or_default())
        .map_err(|pending| pending_state(kind, pending))
}

fn pending_state(kind: &str, pending: WatchPending<'_>) -> ContextState {
    match pending {
        WatchPending::Loading => debug!("{} watch still loading", kind),
        WatchPending::Failed(err) => warn!("{} watch failed: {}", kind, err),
    }
    ContextState::Loading
}

fn not_protected(reason: &str) -> ContextState {
    debug!("No DR context: {}", reason);
    ContextState::NotProtected
}

/// Policy referenced by the DRPC
fn find_policy<'a>(drpc: &DRPlacementControl, policies: &'a [DRPolicy]) -> Step<&'a DRPolicy> {
    let name = &drpc.spec.dr_policy_ref.name;
    policies.iter().find(|p| p.name_any() == *name).ok_or_else(|| {
        warn!(drpc = %drpc.name_any(), policy = %name, "referenced DRPolicy not found");
        ContextState::NotProtected
    })
}

// =============================================================================
// Shared Extraction
// =============================================================================

/// Build the canonical context from a DRPC and its policy
pub(crate) fn build_context(
    drpc: &DRPlacementControl,
    policy: &DRPolicy,
    classifier: &ReplicationHealthClassifier,
    now: DateTime<Utc>,
) -> DRContext {
    let status = drpc.status.as_ref();
    let phase = drpc.phase().and_then(DRPhase::parse);
    let scheduling_interval = policy.spec.scheduling_interval.clone();
    let mode = ReplicationMode::from_scheduling_interval(&scheduling_interval);

    let volume_last_sync_time = status
        .and_then(|s| s.last_group_sync_time.as_deref())
        .and_then(parse_timestamp);
    let last_kube_object_protection_time = status
        .and_then(|s| s.last_kube_object_protection_time.as_deref())
        .and_then(parse_timestamp);

    let volume_replication_health =
        classifier.classify(volume_last_sync_time, &scheduling_interval, mode, now);
    let capture_interval = drpc.capture_interval();
    let kube_object_replication_health = capture_interval.map(|interval| {
        classifier.classify(
            last_kube_object_protection_time,
            interval,
            ReplicationMode::Async,
            now,
        )
    });

    let primary_cluster = primary_cluster(drpc, phase);
    let target_cluster = target_cluster(drpc, policy, phase, &primary_cluster);

    DRContext {
        name: drpc.name_any(),
        namespace: drpc.namespace().unwrap_or_default(),
        is_cleanup_required: is_cleanup_required(drpc),
        phase,
        volume_replication_health,
        kube_object_replication_health,
        primary_cluster,
        target_cluster,
        policy_name: policy.name_any(),
        scheduling_interval,
        kube_object_capture_interval: capture_interval.map(str::to_string),
        volume_last_sync_time,
        last_kube_object_protection_time,
        placement_conditions: drpc.conditions().to_vec(),
        resource_conditions: drpc.resource_conditions().to_vec(),
        protected_condition: None,
        available_condition: None,
    }
}

/// Stale resources must be removed before replication resumes
pub fn is_cleanup_required(drpc: &DRPlacementControl) -> bool {
    let waiting = drpc
        .status
        .as_ref()
        .and_then(|s| s.progression.as_deref())
        .map(|p| p == PROGRESSION_WAIT_ON_USER_CLEANUP)
        .unwrap_or(false);
    let cleaning = find_condition(drpc.conditions(), CONDITION_PEER_READY)
        .map(|c| !c.is_true() && c.reason() == REASON_CLEANING)
        .unwrap_or(false);
    waiting || cleaning
}

/// Cluster currently (or last successfully) running the workload
pub fn primary_cluster(drpc: &DRPlacementControl, phase: Option<DRPhase>) -> String {
    if let Some(cluster) = drpc.last_deployed_cluster() {
        return cluster.to_string();
    }
    let failed_over = matches!(phase, Some(DRPhase::FailedOver))
        || (phase.is_none() && drpc.spec.action == Some(DRAction::Failover));
    let cluster = if failed_over {
        drpc.spec.failover_cluster.as_deref()
    } else {
        drpc.spec.preferred_cluster.as_deref()
    };
    cluster.unwrap_or_default().to_string()
}

/// Cluster the workload is moving to, or its replication peer(s)
pub fn target_cluster(
    drpc: &DRPlacementControl,
    policy: &DRPolicy,
    phase: Option<DRPhase>,
    primary: &str,
) -> String {
    let in_flight = match phase {
        Some(DRPhase::FailingOver) => drpc.spec.failover_cluster.as_deref(),
        Some(DRPhase::Relocating) => drpc.spec.preferred_cluster.as_deref(),
        _ => None,
    };
    match in_flight {
        Some(cluster) if !cluster.is_empty() => cluster.to_string(),
        _ => peer_clusters(policy, primary),
    }
}

/// Policy clusters other than `primary`, comma separated
pub fn peer_clusters(policy: &DRPolicy, primary: &str) -> String {
    policy.peer_clusters(primary).collect::<Vec<_>>().join(", ")
}
