use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CriticFailure, JudgeEstimate, Opinion, PredictionRequest};
use crate::errors::LifecycleError;

/// Lifecycle of a prediction event.
///
/// `Logged` is terminal when no feedback ever arrives; `Updated` is terminal
/// once feedback was applied. Stages only move forward, one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStage {
    Requested,
    Routed,
    OpinionsCollected,
    Judged,
    Calibrated,
    Logged,
    FeedbackReceived,
    Updated,
}

impl EventStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Routed => "routed",
            Self::OpinionsCollected => "opinions_collected",
            Self::Judged => "judged",
            Self::Calibrated => "calibrated",
            Self::Logged => "logged",
            Self::FeedbackReceived => "feedback_received",
            Self::Updated => "updated",
        }
    }

    /// The only stage reachable from `self`, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Requested => Some(Self::Routed),
            Self::Routed => Some(Self::OpinionsCollected),
            Self::OpinionsCollected => Some(Self::Judged),
            Self::Judged => Some(Self::Calibrated),
            Self::Calibrated => Some(Self::Logged),
            Self::Logged => Some(Self::FeedbackReceived),
            Self::FeedbackReceived => Some(Self::Updated),
            Self::Updated => None,
        }
    }

    /// Move to `to`, rejecting backward moves and skipped stages.
    pub fn advance(&mut self, to: EventStage) -> Result<(), LifecycleError> {
        if self.next() != Some(to) {
            return Err(LifecycleError::InvalidTransition {
                from: self.to_string(),
                to: to.to_string(),
            });
        }
        *self = to;
        Ok(())
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Logged | Self::Updated)
    }
}

impl fmt::Display for EventStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unit of record: everything that went into one prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionEvent {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub request: PredictionRequest,
    /// Router context bucket the request was served under.
    pub context_key: String,
    pub opinions: Vec<Opinion>,
    #[serde(default)]
    pub failures: Vec<CriticFailure>,
    pub judge_estimates: Vec<JudgeEstimate>,
    /// Exact calibrator input used at prediction time.
    pub calibration_features: Vec<f64>,
    pub yhat: f64,
    pub sigma: f64,
    pub degraded: bool,
    pub stage: EventStage,
    pub true_rating: Option<f64>,
}

impl PredictionEvent {
    pub fn user_id(&self) -> &str {
        &self.request.user.user_id
    }

    pub fn item_id(&self) -> &str {
        &self.request.item.item_id
    }

    pub fn has_feedback(&self) -> bool {
        self.true_rating.is_some()
    }

    /// Absolute error of the final prediction, once feedback is attached.
    pub fn abs_error(&self) -> Option<f64> {
        self.true_rating.map(|y| (y - self.yhat).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_advance_one_step_at_a_time() {
        let mut stage = EventStage::Requested;
        for next in [
            EventStage::Routed,
            EventStage::OpinionsCollected,
            EventStage::Judged,
            EventStage::Calibrated,
            EventStage::Logged,
            EventStage::FeedbackReceived,
            EventStage::Updated,
        ] {
            stage.advance(next).unwrap();
        }
        assert_eq!(stage, EventStage::Updated);
        assert!(stage.is_terminal());
    }

    #[test]
    fn backward_and_skipping_transitions_fail() {
        let mut stage = EventStage::Judged;
        assert!(stage.advance(EventStage::Routed).is_err());
        assert!(stage.advance(EventStage::Logged).is_err());
        assert!(stage.advance(EventStage::Judged).is_err());
        assert_eq!(stage, EventStage::Judged);
    }
}
