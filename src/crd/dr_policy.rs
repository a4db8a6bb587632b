//! DRPolicy CRD
//!
//! A DR policy names the cluster pair a workload replicates between and the
//! scheduling interval for asynchronous replication.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::condition::DRCondition;

/// DRPolicy pairs clusters and sets the replication schedule
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "ramendr.openshift.io",
    version = "v1alpha1",
    kind = "DRPolicy",
    plural = "drpolicies",
    status = "DRPolicyStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct DRPolicySpec {
    /// Replication interval (e.g. "5m"); "0m" for synchronous replication
    #[serde(default)]
    pub scheduling_interval: String,

    /// Clusters participating in the policy
    #[serde(default)]
    pub dr_clusters: Vec<String>,
}

/// Status of the DRPolicy
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DRPolicyStatus {
    #[serde(default)]
    pub conditions: Vec<DRCondition>,
}

impl DRPolicy {
    /// Clusters other than `primary`, in policy order
    pub fn peer_clusters<'a>(&'a self, primary: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.spec
            .dr_clusters
            .iter()
            .map(String::as_str)
            .filter(move |c| *c != primary)
    }
}
