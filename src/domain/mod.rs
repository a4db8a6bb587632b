//! Domain layer - Port definitions
//!
//! This module defines the seams (ports) through which the engine consumes
//! its external collaborators, following hexagonal architecture principles.

pub mod ports;

pub use ports::*;
