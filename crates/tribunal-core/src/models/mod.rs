pub mod context;
pub mod judge_estimate;
pub mod opinion;
pub mod prediction_event;
pub mod review;
pub mod skill;

pub use context::{ItemContext, PredictionRequest, RoutingContext, UserContext};
pub use judge_estimate::JudgeEstimate;
pub use opinion::{CriticFailure, FailureKind, Opinion};
pub use prediction_event::{EventStage, PredictionEvent};
pub use review::{
    CalibratorSuggestion, CriticTrust, GenreError, JudgeStats, PredictionQuality,
    Recommendation, ReplacementDirective, ReviewReport, Severity, VersionStats,
};
pub use skill::{SkillEstimate, SkillView};
