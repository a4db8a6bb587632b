//! Status Precedence Resolver
//!
//! Picks one overall status for a workload. Rules are evaluated in order and
//! the first match wins:
//!
//! 1. cleanup pending            -> WaitOnUserCleanup
//! 2. phase FailingOver          -> FailingOver
//! 3. phase Relocating           -> Relocating
//! 4. worst present health grade -> Critical / Warning / Healthy
//! 5. no health grade at all     -> Critical

use tracing::trace;

use super::types::{DRContext, DRPhase, DRStatus, ReplicationHealth};

/// Resolve the overall status of a workload
pub fn resolve(ctx: &DRContext) -> DRStatus {
    if ctx.is_cleanup_required {
        trace!(drpc = %ctx.name, "cleanup pending");
        return DRStatus::WaitOnUserCleanup;
    }

    match ctx.phase {
        Some(DRPhase::FailingOver) => {
            trace!(drpc = %ctx.name, "failover in flight");
            return DRStatus::FailingOver;
        }
        Some(DRPhase::Relocating) => {
            trace!(drpc = %ctx.name, "relocate in flight");
            return DRStatus::Relocating;
        }
        _ => {}
    }

    let status = worst_health(ctx.health_grades())
        .map(DRStatus::from_health)
        .unwrap_or(DRStatus::Critical);
    trace!(drpc = %ctx.name, %status, "resolved from health grades");
    status
}

/// Worst grade among the present grades; `None` for an empty set
pub fn worst_health<I>(grades: I) -> Option<ReplicationHealth>
where
    I: IntoIterator<Item = ReplicationHealth>,
{
    grades.into_iter().max()
}
