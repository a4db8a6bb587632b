//! Engine facade
//!
//! Wires normalize -> resolve -> describe behind one type so callers only
//! hand over watched resources.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use super::describe::{DRStatusView, StatusDetailBuilder};
use super::health::ReplicationHealthClassifier;
use super::normalizers::{
    normalize_application_set, normalize_discovered, normalize_subscription,
    ApplicationSetResources, ContextState, DiscoveredResources, SubscriptionResources,
};
use super::resolver::resolve;
use super::types::DRContext;
use crate::config::EngineConfig;
use crate::domain::ports::{Clock, DefaultTimeFormatter, SystemClock, TimeFormatter};
use crate::error::Result;

/// Result of evaluating one workload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "view", rename_all = "camelCase")]
pub enum StatusOutcome {
    /// Inputs still loading; render nothing yet
    Loading,
    /// Workload has no DR protection
    NotProtected,
    /// Resolved status and its explanation
    Resolved(DRStatusView),
}

impl StatusOutcome {
    /// The view, when resolved
    pub fn view(&self) -> Option<&DRStatusView> {
        match self {
            StatusOutcome::Resolved(view) => Some(view),
            _ => None,
        }
    }
}

/// Evaluates DR status for protected workloads
#[derive(Clone)]
pub struct DrStatusEngine {
    classifier: ReplicationHealthClassifier,
    builder: StatusDetailBuilder,
    clock: Arc<dyn Clock>,
}

impl DrStatusEngine {
    /// Create an engine on the wall clock
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_collaborators(config, Arc::new(SystemClock), Arc::new(DefaultTimeFormatter))
    }

    /// Create an engine with explicit clock and time formatter
    pub fn with_collaborators(
        config: EngineConfig,
        clock: Arc<dyn Clock>,
        formatter: Arc<dyn TimeFormatter>,
    ) -> Result<Self> {
        config.validate()?;
        info!(
            healthy_multiplier = config.classifier.healthy_multiplier,
            warning_multiplier = config.classifier.warning_multiplier,
            "DR status engine configured"
        );
        Ok(Self {
            classifier: ReplicationHealthClassifier::with_config(config.classifier),
            builder: StatusDetailBuilder::new(config.help_links, formatter),
            clock,
        })
    }

    /// Health classifier shared by the normalizers
    pub fn classifier(&self) -> &ReplicationHealthClassifier {
        &self.classifier
    }

    /// Resolve a normalizer result
    pub fn evaluate(&self, state: ContextState) -> StatusOutcome {
        match state {
            ContextState::Loading => StatusOutcome::Loading,
            ContextState::NotProtected => StatusOutcome::NotProtected,
            ContextState::Ready(ctx) => StatusOutcome::Resolved(self.evaluate_context(&ctx)),
        }
    }

    /// Resolve and describe a canonical context
    pub fn evaluate_context(&self, ctx: &DRContext) -> DRStatusView {
        let status = resolve(ctx);
        debug!(
            drpc = %ctx.name,
            namespace = %ctx.namespace,
            status = %status,
            "resolved DR status"
        );
        self.builder.describe(status, ctx)
    }

    pub fn evaluate_application_set(&self, resources: &ApplicationSetResources) -> StatusOutcome {
        self.evaluate(normalize_application_set(resources, &self.classifier, self.clock.now()))
    }

    pub fn evaluate_subscription(&self, resources: &SubscriptionResources) -> StatusOutcome {
        self.evaluate(normalize_subscription(resources, &self.classifier, self.clock.now()))
    }

    pub fn evaluate_discovered(&self, resources: &DiscoveredResources) -> StatusOutcome {
        self.evaluate(normalize_discovered(resources, &self.classifier, self.clock.now()))
    }
}

impl std::fmt::Debug for DrStatusEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrStatusEngine")
            .field("classifier", &self.classifier)
            .finish_non_exhaustive()
    }
}
