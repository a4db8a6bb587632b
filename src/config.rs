//! Engine configuration
//!
//! Thresholds and links are plain structs with defaults; the binary fills
//! them from CLI arguments and environment variables.

use crate::dr::health::ClassifierConfig;
use crate::dr::types::DRStatus;
use crate::error::Result;

/// Default documentation root for help links
pub const DEFAULT_HELP_BASE_URL: &str =
    "https://docs.redhat.com/en/documentation/red_hat_openshift_data_foundation/latest/html/configuring_openshift_data_foundation_disaster_recovery_for_openshift_workloads";

/// Top-level engine configuration
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Replication health thresholds
    pub classifier: ClassifierConfig,
    /// Help links attached to status views
    pub help_links: HelpLinks,
}

impl EngineConfig {
    /// Validate all sections
    pub fn validate(&self) -> Result<()> {
        self.classifier.validate()
    }
}

/// Builds help links for resolved statuses
#[derive(Debug, Clone)]
pub struct HelpLinks {
    /// Documentation root
    pub base_url: String,
}

impl Default for HelpLinks {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_HELP_BASE_URL.to_string(),
        }
    }
}

impl HelpLinks {
    /// Link target and label for a status; only degraded and transitioning
    /// statuses carry one
    pub fn for_status(&self, status: DRStatus) -> Option<(String, &'static str)> {
        let (anchor, label) = match status {
            DRStatus::Warning | DRStatus::Critical => {
                ("#troubleshooting-disaster-recovery", "Troubleshoot replication")
            }
            DRStatus::FailingOver => ("#application-failover", "Learn about failover"),
            DRStatus::Relocating => ("#relocating-application", "Learn about relocation"),
            DRStatus::Healthy | DRStatus::WaitOnUserCleanup => return None,
        };
        let base = self.base_url.trim_end_matches('/');
        Some((format!("{}{}", base, anchor), label))
    }
}
