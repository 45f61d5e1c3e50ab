//! # tribunal-routing
//!
//! Decides which critics and judges take part in a prediction.
//!
//! - [`PersonaRegistry`]: immutable snapshot of the active persona versions.
//! - [`ArmStats`]: per (context, persona version) value estimate.
//! - [`Router`]: decaying epsilon-greedy selection over the registry.

pub mod arm;
pub mod registry;
pub mod router;

pub use arm::ArmStats;
pub use registry::PersonaRegistry;
pub use router::{RankedPersona, Router, RoutingDecision};
