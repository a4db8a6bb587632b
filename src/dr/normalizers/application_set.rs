//! ApplicationSet normalizer
//!
//! GitOps workloads are placed by the Placement their ApplicationSet's
//! cluster decision generator selects; the DRPC protecting that Placement
//! carries the DR state.

use chrono::{DateTime, Utc};
use kube::ResourceExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    build_context, find_policy, not_protected, watched_list, watched_object, ContextState, Step,
};
use crate::crd::{ApplicationSet, DRPlacementControl, DRPolicy, Placement, PLACEMENT_KIND};
use crate::domain::ports::Watched;
use crate::dr::health::ReplicationHealthClassifier;
use crate::dr::types::DRContext;

/// Watched resources of one ApplicationSet workload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationSetResources {
    pub application_set: Watched<ApplicationSet>,
    pub placements: Watched<Vec<Placement>>,
    pub drpcs: Watched<Vec<DRPlacementControl>>,
    pub policies: Watched<Vec<DRPolicy>>,
}

/// Normalize an ApplicationSet workload
pub fn normalize_application_set(
    resources: &ApplicationSetResources,
    classifier: &ReplicationHealthClassifier,
    now: DateTime<Utc>,
) -> ContextState {
    match try_normalize(resources, classifier, now) {
        Ok(ctx) => ContextState::Ready(ctx),
        Err(state) => state,
    }
}

fn try_normalize(
    resources: &ApplicationSetResources,
    classifier: &ReplicationHealthClassifier,
    now: DateTime<Utc>,
) -> Step<DRContext> {
    let application_set = watched_object("ApplicationSet", &resources.application_set)?;
    let placements = watched_list("Placement", &resources.placements)?;
    let drpcs = watched_list("DRPlacementControl", &resources.drpcs)?;
    let policies = watched_list("DRPolicy", &resources.policies)?;

    let application_set =
        application_set.ok_or_else(|| not_protected("ApplicationSet not found"))?;
    let namespace = application_set.namespace().unwrap_or_default();
    let placement_name = application_set
        .placement_name()
        .ok_or_else(|| not_protected("ApplicationSet has no placement generator"))?;

    let placement = placements
        .iter()
        .find(|p| {
            p.name_any() == placement_name && p.namespace().as_deref() == Some(namespace.as_str())
        })
        .ok_or_else(|| not_protected("placement not found"))?;

    let drpc = drpcs
        .iter()
        .find(|d| d.protects_placement(PLACEMENT_KIND, &placement.name_any(), &namespace))
        .ok_or_else(|| not_protected("placement is not DR protected"))?;
    let policy = find_policy(drpc, policies)?;

    debug!(
        application_set = %application_set.name_any(),
        placement = %placement_name,
        drpc = %drpc.name_any(),
        "normalized ApplicationSet workload"
    );
    Ok(build_context(drpc, policy, classifier, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{
        ApplicationSetGenerator, ApplicationSetSpec, ClusterDecisionResource, LabelSelectorSpec,
        PlacementSpec, PLACEMENT_LABEL,
    };
    use crate::dr::normalizers::fixtures::*;
    use crate::dr::types::{DRPhase, ReplicationHealth};
    use assert_matches::assert_matches;
    use std::collections::BTreeMap;

    const NS: &str = "openshift-gitops";

    fn application_set() -> ApplicationSet {
        let mut appset = ApplicationSet::new(
            "busybox",
            ApplicationSetSpec {
                generators: vec![ApplicationSetGenerator {
                    cluster_decision_resource: Some(ClusterDecisionResource {
                        config_map_ref: Some("acm-placement".into()),
                        label_selector: LabelSelectorSpec {
                            match_labels: BTreeMap::from([(
                                PLACEMENT_LABEL.to_string(),
                                "busybox-placement".to_string(),
                            )]),
                        },
                    }),
                }],
            },
        );
        appset.metadata.namespace = Some(NS.into());
        appset
    }

    fn placement() -> Placement {
        let mut placement = Placement::new("busybox-placement", PlacementSpec::default());
        placement.metadata.namespace = Some(NS.into());
        placement
    }

    fn resources() -> ApplicationSetResources {
        ApplicationSetResources {
            application_set: Watched::loaded(application_set()),
            placements: Watched::loaded(vec![placement()]),
            drpcs: Watched::loaded(vec![drpc(
                "busybox-placement-drpc",
                NS,
                placement_ref("Placement", "busybox-placement"),
                4,
            )]),
            policies: Watched::loaded(vec![policy("dr-policy-5m", "5m")]),
        }
    }

    fn normalize(resources: &ApplicationSetResources) -> ContextState {
        normalize_application_set(resources, &ReplicationHealthClassifier::new(), now())
    }

    #[test]
    fn test_normalize_protected_appset() {
        let state = normalize(&resources());
        let ctx = state.context().expect("context");

        assert_eq!(ctx.name, "busybox-placement-drpc");
        assert_eq!(ctx.phase, Some(DRPhase::Deployed));
        assert_eq!(ctx.primary_cluster, "east");
        assert_eq!(ctx.target_cluster, "west");
        assert_eq!(ctx.volume_replication_health, ReplicationHealth::Healthy);
        assert_eq!(ctx.scheduling_interval, "5m");
    }

    #[test]
    fn test_loading_when_any_watch_pending() {
        let mut res = resources();
        res.drpcs = Watched::loading();
        assert_matches!(normalize(&res), ContextState::Loading);

        let mut res = resources();
        res.policies = Watched::failed("forbidden");
        assert_matches!(normalize(&res), ContextState::Loading);

        // A pending watch wins even when another lookup would fail
        let mut res = resources();
        res.application_set = Watched::loaded_empty();
        res.placements = Watched::loading();
        assert_matches!(normalize(&res), ContextState::Loading);
    }

    #[test]
    fn test_not_protected_cases() {
        let mut res = resources();
        res.application_set = Watched::loaded_empty();
        assert_matches!(normalize(&res), ContextState::NotProtected);

        let mut res = resources();
        res.drpcs = Watched::loaded(Vec::new());
        assert_matches!(normalize(&res), ContextState::NotProtected);

        let mut res = resources();
        res.placements = Watched::loaded(Vec::new());
        assert_matches!(normalize(&res), ContextState::NotProtected);

        let mut res = resources();
        res.policies = Watched::loaded(vec![policy("other-policy", "5m")]);
        assert_matches!(normalize(&res), ContextState::NotProtected);

        let mut res = resources();
        res.application_set =
            Watched::loaded(ApplicationSet::new("bare", ApplicationSetSpec::default()));
        assert_matches!(normalize(&res), ContextState::NotProtected);
    }

    #[test]
    fn test_drpc_for_placement_rule_is_ignored() {
        let mut res = resources();
        res.drpcs = Watched::loaded(vec![drpc(
            "rule-drpc",
            NS,
            placement_ref("PlacementRule", "busybox-placement"),
            4,
        )]);
        assert_matches!(normalize(&res), ContextState::NotProtected);
    }
}
