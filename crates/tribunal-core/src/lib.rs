//! # tribunal-core
//!
//! Foundation crate for the Tribunal rating system.
//! Defines personas, opinions, prediction events, review models, traits for
//! the external collaborators, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod cancellation;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod persona;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use cancellation::CancellationToken;
pub use config::TribunalConfig;
pub use errors::{TribunalError, TribunalResult};
pub use models::{JudgeEstimate, Opinion, PredictionEvent};
pub use persona::{AggregationStrategy, Persona, PersonaRef, Role};
