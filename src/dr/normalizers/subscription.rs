//! Subscription normalizer
//!
//! An ACM Application may map to several subscription groups, one per
//! placement, each protected by its own DRPC. Normalization is a two stage
//! reduction: classify every group on its own, then pick the worst health
//! across groups and one representative group for cluster/sync details.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use kube::ResourceExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    build_context, find_policy, not_protected, watched_list, watched_object, ContextState, Step,
};
use crate::crd::{Application, DRPlacementControl, DRPolicy, PlacementReference, Subscription};
use crate::domain::ports::Watched;
use crate::dr::health::ReplicationHealthClassifier;
use crate::dr::resolver::worst_health;
use crate::dr::types::{DRContext, ReplicationHealth};

/// Watched resources of one subscription based Application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubscriptionResources {
    pub application: Watched<Application>,
    pub subscriptions: Watched<Vec<Subscription>>,
    pub drpcs: Watched<Vec<DRPlacementControl>>,
    pub policies: Watched<Vec<DRPolicy>>,
}

/// Subscriptions sharing one placement
#[derive(Debug, Clone)]
pub struct SubscriptionGroup<'a> {
    pub placement: PlacementReference,
    pub subscriptions: Vec<&'a Subscription>,
}

/// DR context of one protected subscription group
#[derive(Debug, Clone)]
pub struct GroupContext {
    pub placement: PlacementReference,
    pub subscription_names: Vec<String>,
    pub context: DRContext,
}

/// Cross-group reduction result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSelection {
    /// Most severe volume health across groups
    pub worst_volume_health: ReplicationHealth,
    /// Most severe object-metadata health among groups that have one
    pub worst_kube_object_health: Option<ReplicationHealth>,
    /// Index of the group surfaced for cluster and sync details
    pub representative: usize,
    /// Index of the group carrying the worst object-metadata grade
    pub kube_object_source: Option<usize>,
}

/// Normalize a subscription based Application
pub fn normalize_subscription(
    resources: &SubscriptionResources,
    classifier: &ReplicationHealthClassifier,
    now: DateTime<Utc>,
) -> ContextState {
    match try_normalize(resources, classifier, now) {
        Ok(ctx) => ContextState::Ready(ctx),
        Err(state) => state,
    }
}

fn try_normalize(
    resources: &SubscriptionResources,
    classifier: &ReplicationHealthClassifier,
    now: DateTime<Utc>,
) -> Step<DRContext> {
    let application = watched_object("Application", &resources.application)?;
    let subscriptions = watched_list("Subscription", &resources.subscriptions)?;
    let drpcs = watched_list("DRPlacementControl", &resources.drpcs)?;
    let policies = watched_list("DRPolicy", &resources.policies)?;

    let application = application.ok_or_else(|| not_protected("Application not found"))?;
    let namespace = application.namespace().unwrap_or_default();

    let groups: Vec<GroupContext> = group_subscriptions(application, subscriptions)
        .iter()
        .filter_map(|group| classify_group(group, &namespace, drpcs, policies, classifier, now))
        .collect();

    let selection = select_worst_and_representative(&groups)
        .ok_or_else(|| not_protected("no subscription group is DR protected"))?;

    let representative = &groups[selection.representative];
    debug!(
        application = %application.name_any(),
        groups = groups.len(),
        representative = %representative.placement.name,
        worst = %selection.worst_volume_health,
        "normalized subscription workload"
    );

    let mut ctx = representative.context.clone();
    ctx.volume_replication_health = selection.worst_volume_health;
    ctx.kube_object_replication_health = selection.worst_kube_object_health;
    if let Some(source) = selection.kube_object_source.map(|i| &groups[i].context) {
        ctx.kube_object_capture_interval = source.kube_object_capture_interval.clone();
        ctx.last_kube_object_protection_time = source.last_kube_object_protection_time;
    }
    Ok(ctx)
}

/// Group the Application's subscriptions by placement, in first-seen order.
/// Subscriptions without a placement reference are skipped.
pub fn group_subscriptions<'a>(
    application: &Application,
    subscriptions: &'a [Subscription],
) -> Vec<SubscriptionGroup<'a>> {
    let mut groups: IndexMap<PlacementReference, Vec<&'a Subscription>> = IndexMap::new();
    for subscription in subscriptions.iter().filter(|s| application.selects(s)) {
        if let Some(placement) = subscription.placement_ref() {
            groups
                .entry(placement.clone())
                .or_default()
                .push(subscription);
        }
    }
    groups
        .into_iter()
        .map(|(placement, subscriptions)| SubscriptionGroup {
            placement,
            subscriptions,
        })
        .collect()
}

/// DR context of one group; `None` when its placement is not protected or
/// its DRPC references a missing policy
pub fn classify_group(
    group: &SubscriptionGroup<'_>,
    namespace: &str,
    drpcs: &[DRPlacementControl],
    policies: &[DRPolicy],
    classifier: &ReplicationHealthClassifier,
    now: DateTime<Utc>,
) -> Option<GroupContext> {
    let placement = &group.placement;
    let drpc = drpcs
        .iter()
        .find(|d| d.protects_placement(placement.kind(), &placement.name, namespace))?;
    let policy = find_policy(drpc, policies).ok()?;

    Some(GroupContext {
        placement: group.placement.clone(),
        subscription_names: group.subscriptions.iter().map(|s| s.name_any()).collect(),
        context: build_context(drpc, policy, classifier, now),
    })
}

/// Worst health across groups and the representative group: the first group
/// waiting on cleanup, else the first failing over or relocating, else the
/// first group. `None` for no groups.
pub fn select_worst_and_representative(groups: &[GroupContext]) -> Option<GroupSelection> {
    let worst_volume_health =
        worst_health(groups.iter().map(|g| g.context.volume_replication_health))?;
    let worst_kube_object_health =
        worst_health(groups.iter().filter_map(|g| g.context.kube_object_replication_health));
    let kube_object_source = worst_kube_object_health.and_then(|worst| {
        groups
            .iter()
            .position(|g| g.context.kube_object_replication_health == Some(worst))
    });

    let transitioning =
        |g: &GroupContext| g.context.phase.map(|p| p.is_transitioning()).unwrap_or(false);
    let representative = groups
        .iter()
        .position(|g| g.context.is_cleanup_required)
        .or_else(|| groups.iter().position(transitioning))
        .unwrap_or(0);

    Some(GroupSelection {
        worst_volume_health,
        worst_kube_object_health,
        representative,
        kube_object_source,
    })
}
