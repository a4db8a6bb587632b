//! Subscription and Application CRDs (open-cluster-management)
//!
//! An ACM Application selects subscriptions by label. Each subscription is
//! placed through a Placement or PlacementRule; subscriptions sharing a
//! placement form one DR protected group.

use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::application_set::LabelSelectorSpec;
use super::placement::PLACEMENT_RULE_KIND;

// =============================================================================
// Application
// =============================================================================

/// Application groups subscriptions by label selector
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "app.k8s.io",
    version = "v1beta1",
    kind = "Application",
    plural = "applications",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSpec {
    #[serde(default)]
    pub selector: LabelSelectorSpec,
}

// =============================================================================
// Subscription
// =============================================================================

/// Subscription deploys channel content to the placed clusters
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "apps.open-cluster-management.io",
    version = "v1",
    kind = "Subscription",
    plural = "subscriptions",
    shortname = "appsub",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSpec {
    #[serde(default)]
    pub channel: String,

    #[serde(default)]
    pub placement: Option<SubscriptionPlacement>,
}

/// Where a subscription is deployed
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlacement {
    #[serde(default)]
    pub placement_ref: Option<PlacementReference>,

    #[serde(default)]
    pub local: Option<bool>,
}

/// Reference to a Placement or PlacementRule
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlacementReference {
    #[serde(default)]
    pub kind: Option<String>,
    pub name: String,
}

impl PlacementReference {
    /// Referenced kind, defaulting to PlacementRule
    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or(PLACEMENT_RULE_KIND)
    }
}

impl Application {
    /// Check if the subscription belongs to this application
    pub fn selects(&self, subscription: &Subscription) -> bool {
        subscription.namespace() == self.namespace()
            && self.spec.selector.matches(subscription.labels())
    }
}

impl Subscription {
    /// Placement the subscription is deployed through, if any
    pub fn placement_ref(&self) -> Option<&PlacementReference> {
        self.spec
            .placement
            .as_ref()
            .and_then(|p| p.placement_ref.as_ref())
    }
}
