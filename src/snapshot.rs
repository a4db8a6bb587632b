//! Workload snapshots
//!
//! A snapshot captures the watched resources of one workload in a single
//! YAML or JSON document, tagged by topology:
//!
//! ```yaml
//! topology: discovered
//! drpc:
//!   data: { ... }
//!   loaded: true
//! policies:
//!   data: [ ... ]
//!   loaded: true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::dr::engine::{DrStatusEngine, StatusOutcome};
use crate::dr::normalizers::{ApplicationSetResources, DiscoveredResources, SubscriptionResources};
use crate::error::{Error, Result};

/// Watched resources of one workload, by topology
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "topology", rename_all = "camelCase")]
pub enum WorkloadSnapshot {
    ApplicationSet(ApplicationSetResources),
    Subscription(SubscriptionResources),
    Discovered(DiscoveredResources),
}

impl FromStr for WorkloadSnapshot {
    type Err = Error;

    /// YAML is a superset of JSON, so one parser covers both
    fn from_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

impl WorkloadSnapshot {
    /// Load a snapshot file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let snapshot: Self = content.parse()?;
        debug!(path = %path.display(), topology = snapshot.topology(), "loaded workload snapshot");
        Ok(snapshot)
    }

    /// Topology tag
    pub fn topology(&self) -> &'static str {
        match self {
            WorkloadSnapshot::ApplicationSet(_) => "applicationSet",
            WorkloadSnapshot::Subscription(_) => "subscription",
            WorkloadSnapshot::Discovered(_) => "discovered",
        }
    }

    /// Evaluate with the normalizer matching the topology
    pub fn evaluate(&self, engine: &DrStatusEngine) -> StatusOutcome {
        match self {
            WorkloadSnapshot::ApplicationSet(resources) => {
                engine.evaluate_application_set(resources)
            }
            WorkloadSnapshot::Subscription(resources) => engine.evaluate_subscription(resources),
            WorkloadSnapshot::Discovered(resources) => engine.evaluate_discovered(resources),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::domain::ports::{DefaultTimeFormatter, FixedClock};
    use crate::dr::types::DRStatus;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};
    use std::io::Write;
    use std::sync::Arc;

    const DISCOVERED: &str = r#"
topology: discovered
drpc:
  loaded: true
  data:
    apiVersion: ramendr.openshift.io/v1alpha1
    kind: DRPlacementControl
    metadata:
      name: busybox
      namespace: openshift-dr-ops
    spec:
      placementRef:
        kind: Placement
        name: busybox-placement
      drPolicyRef:
        name: dr-policy-5m
      preferredCluster: east
      failoverCluster: west
    status:
      phase: Relocating
      preferredDecision:
        clusterName: west
      lastGroupSyncTime: "2024-05-01T11:57:00Z"
policies:
  loaded: true
  data:
    - apiVersion: ramendr.openshift.io/v1alpha1
      kind: DRPolicy
      metadata:
        name: dr-policy-5m
      spec:
        schedulingInterval: 5m
        drClusters: [east, west]
"#;

    fn engine() -> DrStatusEngine {
        DrStatusEngine::with_collaborators(
            EngineConfig::default(),
            Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())),
            Arc::new(DefaultTimeFormatter),
        )
        .unwrap()
    }

    #[test]
    fn test_load_yaml_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DISCOVERED.as_bytes()).unwrap();

        let snapshot = WorkloadSnapshot::load(file.path()).unwrap();
        assert_eq!(snapshot.topology(), "discovered");

        let outcome = snapshot.evaluate(&engine());
        let view = outcome.view().expect("resolved");
        assert_eq!(view.status, DRStatus::Relocating);
    }

    #[test]
    fn test_json_snapshot_with_pending_watch() {
        let json = r#"{"topology": "applicationSet", "applicationSet": {"loaded": false}}"#;
        let snapshot = WorkloadSnapshot::from_str(json).unwrap();

        assert_matches!(snapshot, WorkloadSnapshot::ApplicationSet(_));
        assert_eq!(snapshot.evaluate(&engine()), StatusOutcome::Loading);
    }

    #[test]
    fn test_load_errors() {
        let err = WorkloadSnapshot::load("/nonexistent/snapshot.yaml").unwrap_err();
        assert_matches!(err, Error::Io(_));
        assert!(!err.is_data_error());

        let err = WorkloadSnapshot::from_str("topology: ferry\n").unwrap_err();
        assert!(err.is_data_error());
    }
}
