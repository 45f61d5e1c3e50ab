use super::{
    CalibrationError, ConfigError, FeedbackError, LifecycleError, OpinionError, RoutingError,
    SkillError, StorageError,
};

/// Top-level error aggregating every subsystem error via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum TribunalError {
    #[error("routing error: {0}")]
    Routing(#[from] RoutingError),

    #[error("skill error: {0}")]
    Skill(#[from] SkillError),

    #[error("calibration error: {0}")]
    Calibration(#[from] CalibrationError),

    #[error("feedback rejected: {0}")]
    Feedback(#[from] FeedbackError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("opinion error: {0}")]
    Opinion(#[from] OpinionError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("prediction request cancelled at stage {stage}")]
    Cancelled { stage: String },
}

impl TribunalError {
    /// True when feedback was rejected because the event already has a rating.
    pub fn is_duplicate_feedback(&self) -> bool {
        matches!(
            self,
            TribunalError::Feedback(FeedbackError::DuplicateFeedback { .. })
        )
    }

    /// True when feedback targeted an event the log does not know about.
    pub fn is_unknown_event(&self) -> bool {
        matches!(
            self,
            TribunalError::Feedback(FeedbackError::UnknownEvent { .. })
        )
    }
}

/// Convenience alias used across every Tribunal crate.
pub type TribunalResult<T> = Result<T, TribunalError>;
