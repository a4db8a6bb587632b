//! Discovered application normalizer
//!
//! Namespace-level protection has no intermediate placement object: the DRPC
//! and its policy are read directly.

use chrono::{DateTime, Utc};
use kube::ResourceExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    build_context, find_policy, not_protected, peer_clusters, watched_list, watched_object,
    ContextState, Step,
};
use crate::crd::{DRCondition, DRPlacementControl, DRPolicy};
use crate::domain::ports::Watched;
use crate::dr::health::ReplicationHealthClassifier;
use crate::dr::types::DRContext;

/// Condition reporting that protection is in place
pub const CONDITION_PROTECTED: &str = "Protected";

/// Condition reporting that the workload is available on its primary
pub const CONDITION_AVAILABLE: &str = "Available";

/// Watched resources of one discovered application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiscoveredResources {
    pub drpc: Watched<DRPlacementControl>,
    pub policies: Watched<Vec<DRPolicy>>,
}

/// Normalize a discovered application
pub fn normalize_discovered(
    resources: &DiscoveredResources,
    classifier: &ReplicationHealthClassifier,
    now: DateTime<Utc>,
) -> ContextState {
    match try_normalize(resources, classifier, now) {
        Ok(ctx) => ContextState::Ready(ctx),
        Err(state) => state,
    }
}

fn try_normalize(
    resources: &DiscoveredResources,
    classifier: &ReplicationHealthClassifier,
    now: DateTime<Utc>,
) -> Step<DRContext> {
    let drpc = watched_object("DRPlacementControl", &resources.drpc)?;
    let policies = watched_list("DRPolicy", &resources.policies)?;

    let drpc = drpc.ok_or_else(|| not_protected("DRPlacementControl not found"))?;
    let policy = find_policy(drpc, policies)?;

    let mut ctx = build_context(drpc, policy, classifier, now);
    ctx.target_cluster = peer_clusters(policy, &ctx.primary_cluster);

    let (protected, available, rest) =
        split_conditions(std::mem::take(&mut ctx.placement_conditions));
    ctx.protected_condition = protected;
    ctx.available_condition = available;
    ctx.placement_conditions = rest;

    debug!(
        drpc = %drpc.name_any(),
        target = %ctx.target_cluster,
        "normalized discovered application"
    );
    Ok(ctx)
}

/// Pull the Protected and Available conditions out of a condition list
fn split_conditions(
    conditions: Vec<DRCondition>,
) -> (Option<DRCondition>, Option<DRCondition>, Vec<DRCondition>) {
    let mut protected = None;
    let mut available = None;
    let mut rest = Vec::with_capacity(conditions.len());
    for condition in conditions {
        match condition.r#type.as_str() {
            CONDITION_PROTECTED if protected.is_none() => protected = Some(condition),
            CONDITION_AVAILABLE if available.is_none() => available = Some(condition),
            _ => rest.push(condition),
        }
    }
    (protected, available, rest)
}
