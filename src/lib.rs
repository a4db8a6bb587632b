//! DR Status Engine
//!
//! Aggregates disaster-recovery signals of protected workloads into one
//! prioritized status with a human readable explanation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                           Topology Normalizers                               │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────────┐  │
//! │  │ ApplicationSet  │  │  Subscription   │  │        Discovered           │  │
//! │  │ AppSet→Placement│  │ groups→DRPC each│  │       DRPC + DRPolicy       │  │
//! │  └────────┬────────┘  └────────┬────────┘  └─────────────┬───────────────┘  │
//! │           └────────────────────┼─────────────────────────┘                   │
//! │                                ▼                                             │
//! │                    ┌───────────────────────┐   ┌──────────────────────────┐ │
//! │                    │       DRContext       │◄──│ Replication Health       │ │
//! │                    │   (canonical record)  │   │ Classifier               │ │
//! │                    └───────────┬───────────┘   └──────────────────────────┘ │
//! ├────────────────────────────────┼────────────────────────────────────────────┤
//! │                    ┌───────────▼───────────┐                                │
//! │                    │  Precedence Resolver  │ → DRStatus                     │
//! │                    └───────────┬───────────┘                                │
//! │                    ┌───────────▼───────────┐   ┌──────────────────────────┐ │
//! │                    │ Status Detail Builder │◄──│ Condition Aggregator     │ │
//! │                    └───────────┬───────────┘   └──────────────────────────┘ │
//! │                                ▼                                             │
//! │                          DRStatusView                                        │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`dr`]: Normalizers, classifier, resolver, detail builder and engine
//! - [`crd`]: Custom resource shapes read by the normalizers
//! - [`domain`]: Watch, clock and time formatting ports
//! - [`config`]: Engine configuration
//! - [`snapshot`]: YAML/JSON workload snapshots
//! - [`error`]: Error types and handling

pub mod config;
pub mod crd;
pub mod domain;
pub mod dr;
pub mod error;
pub mod snapshot;

// Re-export commonly used types
pub use config::{EngineConfig, HelpLinks};

pub use crd::{
    Application, ApplicationSet, DRCondition, DRPlacementControl, DRPolicy, Placement, Subscription,
};

pub use domain::ports::{
    Clock, DefaultTimeFormatter, FixedClock, SystemClock, TimeFormatter, Watched,
};

pub use dr::{
    ApplicationSetResources, ClassifierConfig, ContextState, DRContext, DRPhase, DRStatus,
    DRStatusView, DetailSection, DiscoveredResources, DrStatusEngine, ReplicationHealth,
    ReplicationHealthClassifier, ReplicationMode, StatusOutcome, SubscriptionResources,
};

pub use error::{Error, Result};

pub use snapshot::WorkloadSnapshot;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
