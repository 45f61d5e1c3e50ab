//! Error handling for Tribunal.
//! One error enum per subsystem, `thiserror` only, aggregated into [`TribunalError`].

pub mod calibration_error;
pub mod config_error;
pub mod feedback_error;
pub mod lifecycle_error;
pub mod opinion_error;
pub mod routing_error;
pub mod skill_error;
pub mod storage_error;
pub mod tribunal_error;

pub use calibration_error::CalibrationError;
pub use config_error::ConfigError;
pub use feedback_error::FeedbackError;
pub use lifecycle_error::LifecycleError;
pub use opinion_error::OpinionError;
pub use routing_error::RoutingError;
pub use skill_error::SkillError;
pub use storage_error::StorageError;
pub use tribunal_error::{TribunalError, TribunalResult};
