//! Typed views of the watched DR resources
//!
//! This module contains the CRD types the normalizers read:
//! - DRPlacementControl: DR phase, conditions and sync progress
//! - DRPolicy: cluster pair and scheduling interval
//! - ApplicationSet / Placement: GitOps topology
//! - Application / Subscription: ACM subscription topology

pub mod application_set;
pub mod condition;
pub mod dr_policy;
pub mod drpc;
pub mod placement;
pub mod subscription;

pub use application_set::*;
pub use condition::*;
pub use dr_policy::*;
pub use drpc::*;
pub use placement::*;
pub use subscription::*;
