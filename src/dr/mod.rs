//! DR status aggregation
//!
//! Normalizers turn a topology's resources into a `DRContext`, the resolver
//! picks one `DRStatus`, and the detail builder explains it.

pub mod conditions;
pub mod describe;
pub mod engine;
pub mod health;
pub mod normalizers;
pub mod resolver;
pub mod types;

pub use conditions::{
    build_detail_list, combine_detail_lists, is_pending, is_pending_and_used, progress_details,
};
pub use describe::{DRStatusView, DetailSection, HelpLink, StatusDetailBuilder, StatusIcon};
pub use engine::{DrStatusEngine, StatusOutcome};
pub use health::{parse_sync_interval, ClassifierConfig, ReplicationHealthClassifier};
pub use normalizers::{
    normalize_application_set, normalize_discovered, normalize_subscription,
    ApplicationSetResources, ContextState, DiscoveredResources, SubscriptionResources,
};
pub use resolver::{resolve, worst_health};
pub use types::{DRContext, DRPhase, DRStatus, ReplicationHealth, ReplicationMode};
