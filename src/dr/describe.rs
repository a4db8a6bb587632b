//! Status Detail Builder
//!
//! Maps a resolved status and its context to a topology-agnostic view
//! payload. Health titles and messages come from a table keyed by
//! `(grade, attribution)`, so the resolver never deals with presentation text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use super::conditions::progress_details;
use super::types::{DRContext, DRPhase, DRStatus, ReplicationHealth};
use crate::config::HelpLinks;
use crate::crd::DRCondition;
use crate::domain::ports::{DefaultTimeFormatter, TimeFormatter};

// =============================================================================
// View Types
// =============================================================================

/// Display-ready status of one protected workload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DRStatusView {
    pub status: DRStatus,
    pub icon: StatusIcon,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub detail_section: DetailSection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_link: Option<HelpLink>,
    /// Pending condition details, most recent first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub progress_details: Vec<String>,
    /// Protected condition (discovered applications)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protected_condition: Option<DRCondition>,
    /// Available condition (discovered applications)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_condition: Option<DRCondition>,
}

/// Icon key for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusIcon {
    Healthy,
    Warning,
    Critical,
    InProgress,
    Pending,
}

impl StatusIcon {
    fn for_status(status: DRStatus) -> Self {
        match status {
            DRStatus::Healthy => StatusIcon::Healthy,
            DRStatus::Warning => StatusIcon::Warning,
            DRStatus::Critical => StatusIcon::Critical,
            DRStatus::FailingOver | DRStatus::Relocating => StatusIcon::InProgress,
            DRStatus::WaitOnUserCleanup => StatusIcon::Pending,
        }
    }
}

/// Which detail block to render under the message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DetailSection {
    ClusterDetails(ClusterDetails),
    SyncDetails {
        sync: SyncDetails,
        policy: PolicyDetails,
    },
    None,
}

/// Cluster pair during a transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDetails {
    pub primary_cluster: String,
    pub target_cluster: String,
    pub status: DRStatus,
}

/// Per-signal sync state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncDetails {
    pub volume: SignalSync,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kube_object: Option<SignalSync>,
}

/// Last sync and grade of one replication stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalSync {
    /// Formatted last sync time; `None` when never synced
    pub last_synced: Option<String>,
    pub health: ReplicationHealth,
}

/// Policy summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDetails {
    pub name: String,
    pub scheduling_interval: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kube_object_capture_interval: Option<String>,
}

/// Documentation link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpLink {
    pub href: String,
    pub label: String,
}

// =============================================================================
// Health Templates
// =============================================================================

/// Which signal(s) sit at the resolved grade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribution {
    Volume,
    KubeObject,
    Both,
}

impl Attribution {
    /// Attribute `grade` to the signals of `ctx` that carry it exactly
    pub fn of(grade: ReplicationHealth, ctx: &DRContext) -> Option<Self> {
        let volume = ctx.volume_replication_health == grade;
        let kube_object = ctx.kube_object_replication_health == Some(grade);
        match (volume, kube_object) {
            (true, true) => Some(Attribution::Both),
            (true, false) => Some(Attribution::Volume),
            (false, true) => Some(Attribution::KubeObject),
            (false, false) => None,
        }
    }
}

#[derive(Debug)]
struct Template {
    title: &'static str,
    message: Option<&'static str>,
}

static HEALTH_TEMPLATES: &[(ReplicationHealth, Attribution, Template)] = &[
    (
        ReplicationHealth::Healthy,
        Attribution::Volume,
        Template {
            title: "All volumes are synced",
            message: None,
        },
    ),
    (
        ReplicationHealth::Healthy,
        Attribution::Both,
        Template {
            title: "All volumes & Kubernetes object metadata are synced",
            message: None,
        },
    ),
    (
        ReplicationHealth::Warning,
        Attribution::Volume,
        Template {
            title: "Volume replication delayed",
            message: Some("The last volume sync is older than the scheduled interval. Replication may be slowing down."),
        },
    ),
    (
        ReplicationHealth::Warning,
        Attribution::KubeObject,
        Template {
            title: "Kubernetes object replication delayed",
            message: Some("The last object metadata capture is older than the capture interval. Replication may be slowing down."),
        },
    ),
    (
        ReplicationHealth::Warning,
        Attribution::Both,
        Template {
            title: "Volume and Kubernetes object replication delayed",
            message: Some("Both volume data and object metadata are behind their scheduled intervals. Replication may be slowing down."),
        },
    ),
    (
        ReplicationHealth::Critical,
        Attribution::Volume,
        Template {
            title: "Volume replication behind schedule",
            message: Some("Volumes have not synced within the allowed window. Failing over now may lose recent data."),
        },
    ),
    (
        ReplicationHealth::Critical,
        Attribution::KubeObject,
        Template {
            title: "Kubernetes object replication behind schedule",
            message: Some("Object metadata has not been captured within the allowed window. Failing over now may restore outdated resources."),
        },
    ),
    (
        ReplicationHealth::Critical,
        Attribution::Both,
        Template {
            title: "Volume and Kubernetes object replication behind schedule",
            message: Some("Neither volumes nor object metadata replicated within the allowed window. Failing over now may lose recent data."),
        },
    ),
];

static UNKNOWN_TEMPLATE: Template = Template {
    title: "Status unknown",
    message: Some("The replication status could not be attributed to volumes or object metadata."),
};

fn health_template(
    grade: ReplicationHealth,
    attribution: Attribution,
) -> Option<&'static Template> {
    HEALTH_TEMPLATES
        .iter()
        .find(|(g, a, _)| *g == grade && *a == attribution)
        .map(|(_, _, template)| template)
}

const CLEANUP_TITLE: &str = "Cleanup of resources required";
const TRANSITION_MESSAGE: &str = "The application is being deployed on the target cluster.";

// =============================================================================
// Builder
// =============================================================================

/// Builds status views from resolved statuses
#[derive(Clone)]
pub struct StatusDetailBuilder {
    help_links: HelpLinks,
    formatter: Arc<dyn TimeFormatter>,
}

impl Default for StatusDetailBuilder {
    fn default() -> Self {
        Self::new(HelpLinks::default(), Arc::new(DefaultTimeFormatter))
    }
}

impl StatusDetailBuilder {
    /// Create a builder
    pub fn new(help_links: HelpLinks, formatter: Arc<dyn TimeFormatter>) -> Self {
        Self {
            help_links,
            formatter,
        }
    }

    /// Describe `status` for the workload in `ctx`
    pub fn describe(&self, status: DRStatus, ctx: &DRContext) -> DRStatusView {
        let (title, message, detail_section) = match status {
            DRStatus::WaitOnUserCleanup => {
                let cluster = match ctx.phase {
                    Some(DRPhase::FailingOver) => &ctx.target_cluster,
                    _ => &ctx.primary_cluster,
                };
                (
                    CLEANUP_TITLE.to_string(),
                    Some(format!(
                        "Stale resources remain on cluster {}. Remove them to resume replication.",
                        cluster
                    )),
                    DetailSection::None,
                )
            }
            DRStatus::FailingOver | DRStatus::Relocating => (
                if status == DRStatus::FailingOver {
                    "Failing over".to_string()
                } else {
                    "Relocating".to_string()
                },
                Some(TRANSITION_MESSAGE.to_string()),
                DetailSection::ClusterDetails(ClusterDetails {
                    primary_cluster: ctx.primary_cluster.clone(),
                    target_cluster: ctx.target_cluster.clone(),
                    status,
                }),
            ),
            DRStatus::Healthy | DRStatus::Warning | DRStatus::Critical => {
                let template = self.select_health_template(status, ctx);
                (
                    template.title.to_string(),
                    template.message.map(str::to_string),
                    self.sync_section(ctx),
                )
            }
        };

        let progress_details = if status == DRStatus::Healthy {
            Vec::new()
        } else {
            // Protected/Available are placement-level too when split out
            let placement: Vec<DRCondition> = ctx
                .placement_conditions
                .iter()
                .chain(&ctx.protected_condition)
                .chain(&ctx.available_condition)
                .cloned()
                .collect();
            progress_details(&placement, &ctx.resource_conditions, self.formatter.as_ref())
        };

        DRStatusView {
            status,
            icon: StatusIcon::for_status(status),
            title,
            message,
            detail_section,
            help_link: self
                .help_links
                .for_status(status)
                .map(|(href, label)| HelpLink {
                    href,
                    label: label.to_string(),
                }),
            progress_details,
            protected_condition: ctx.protected_condition.clone(),
            available_condition: ctx.available_condition.clone(),
        }
    }

    fn select_health_template(&self, status: DRStatus, ctx: &DRContext) -> &'static Template {
        let template = status.health_grade().and_then(|grade| {
            Attribution::of(grade, ctx).and_then(|attribution| health_template(grade, attribution))
        });
        match template {
            Some(template) => template,
            None => {
                warn!(
                    drpc = %ctx.name,
                    %status,
                    volume = %ctx.volume_replication_health,
                    "no health template matches, using unknown status"
                );
                &UNKNOWN_TEMPLATE
            }
        }
    }

    fn sync_section(&self, ctx: &DRContext) -> DetailSection {
        let fmt_time = |t: &Option<DateTime<Utc>>| t.as_ref().map(|t| self.formatter.format(t));
        DetailSection::SyncDetails {
            sync: SyncDetails {
                volume: SignalSync {
                    last_synced: fmt_time(&ctx.volume_last_sync_time),
                    health: ctx.volume_replication_health,
                },
                kube_object: ctx.kube_object_replication_health.map(|health| SignalSync {
                    last_synced: fmt_time(&ctx.last_kube_object_protection_time),
                    health,
                }),
            },
            policy: PolicyDetails {
                name: ctx.policy_name.clone(),
                scheduling_interval: ctx.scheduling_interval.clone(),
                kube_object_capture_interval: ctx.kube_object_capture_interval.clone(),
            },
        }
    }
}
