//! ApplicationSet CRD (GitOps)
//!
//! Only the parts needed to find the placement that drives the
//! ApplicationSet's cluster decision generator are modelled.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label the cluster decision generator uses to select a placement
pub const PLACEMENT_LABEL: &str = "cluster.open-cluster-management.io/placement";

/// ApplicationSet generates Argo applications per selected cluster
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "argoproj.io",
    version = "v1alpha1",
    kind = "ApplicationSet",
    plural = "applicationsets",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSetSpec {
    #[serde(default)]
    pub generators: Vec<ApplicationSetGenerator>,
}

/// A single generator entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSetGenerator {
    #[serde(default)]
    pub cluster_decision_resource: Option<ClusterDecisionResource>,
}

/// Generator that reads cluster decisions from placement resources
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDecisionResource {
    #[serde(default)]
    pub config_map_ref: Option<String>,
    #[serde(default)]
    pub label_selector: LabelSelectorSpec,
}

/// Equality based label selector
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelectorSpec {
    #[serde(default)]
    pub match_labels: BTreeMap<String, String>,
}

impl LabelSelectorSpec {
    /// Check if all match labels are present in `labels`
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        !self.match_labels.is_empty()
            && self
                .match_labels
                .iter()
                .all(|(k, v)| labels.get(k) == Some(v))
    }
}

impl ApplicationSet {
    /// Name of the placement selected by the first cluster decision generator
    pub fn placement_name(&self) -> Option<&str> {
        self.spec
            .generators
            .iter()
            .filter_map(|g| g.cluster_decision_resource.as_ref())
            .find_map(|cdr| cdr.label_selector.match_labels.get(PLACEMENT_LABEL))
            .map(String::as_str)
    }
}
