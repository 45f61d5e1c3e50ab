use tribunal_core::errors::{FeedbackError, RoutingError, TribunalError};

/// Caller-facing engine errors.
///
/// The variants callers are expected to branch on are lifted out of
/// [`TribunalError`]; everything else stays wrapped.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("feedback already recorded for event {event_id}")]
    DuplicateFeedback { event_id: String },

    #[error("unknown or expired event {event_id}")]
    UnknownEvent { event_id: String },

    #[error("no {role} personas are registered")]
    NoPersonasAvailable { role: String },

    #[error("prediction request cancelled at stage {stage}")]
    Cancelled { stage: String },

    #[error("engine is missing its {component}")]
    MissingComponent { component: &'static str },

    #[error(transparent)]
    Tribunal(TribunalError),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl From<TribunalError> for EngineError {
    fn from(err: TribunalError) -> Self {
        match err {
            TribunalError::Feedback(FeedbackError::DuplicateFeedback { event_id }) => {
                EngineError::DuplicateFeedback { event_id }
            }
            TribunalError::Feedback(FeedbackError::UnknownEvent { event_id }) => {
                EngineError::UnknownEvent { event_id }
            }
            TribunalError::Routing(RoutingError::NoPersonasAvailable { role }) => {
                EngineError::NoPersonasAvailable { role }
            }
            TribunalError::Cancelled { stage } => EngineError::Cancelled { stage },
            other => EngineError::Tribunal(other),
        }
    }
}

macro_rules! via_tribunal {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for EngineError {
                fn from(err: $ty) -> Self {
                    EngineError::from(TribunalError::from(err))
                }
            }
        )*
    };
}

via_tribunal!(
    RoutingError,
    FeedbackError,
    tribunal_core::errors::CalibrationError,
    tribunal_core::errors::ConfigError,
    tribunal_core::errors::LifecycleError,
    tribunal_core::errors::StorageError,
);

impl EngineError {
    /// Short machine-readable reason, used in rejection logs.
    pub fn reason(&self) -> &'static str {
        match self {
            EngineError::DuplicateFeedback { .. } => "duplicate_feedback",
            EngineError::UnknownEvent { .. } => "unknown_event",
            EngineError::NoPersonasAvailable { .. } => "no_personas",
            EngineError::Cancelled { .. } => "cancelled",
            EngineError::MissingComponent { .. } => "missing_component",
            EngineError::Tribunal(TribunalError::Feedback(FeedbackError::InvalidRating { .. })) => {
                "invalid_rating"
            }
            EngineError::Tribunal(_) => "internal",
        }
    }
}
