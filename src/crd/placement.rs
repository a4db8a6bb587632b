//! Placement CRD (open-cluster-management)
//!
//! Placements select the managed clusters a workload is deployed to. DR
//! protected placements are paused and driven by their DRPlacementControl.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind name used in placement references
pub const PLACEMENT_KIND: &str = "Placement";

/// Kind name of the legacy placement rule used by subscriptions
pub const PLACEMENT_RULE_KIND: &str = "PlacementRule";

/// Placement selects clusters from cluster sets
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "cluster.open-cluster-management.io",
    version = "v1beta1",
    kind = "Placement",
    plural = "placements",
    status = "PlacementStatus",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct PlacementSpec {
    #[serde(default)]
    pub cluster_sets: Vec<String>,

    #[serde(default)]
    pub number_of_clusters: Option<i32>,
}

/// Status of the Placement
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlacementStatus {
    #[serde(default)]
    pub number_of_selected_clusters: i32,
}
