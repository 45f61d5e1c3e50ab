//! Feedback acknowledgement and participant credit assignment.

use serde_json::json;

use tribunal_core::models::PredictionEvent;
use tribunal_review::ReviewOutcome;
use tribunal_routing::Router;
use tribunal_skill::SkillTracker;

/// Returned once feedback has reached the calibrator, the skill tracker,
/// the router and the event log.
#[derive(Debug, Clone)]
pub struct FeedbackAck {
    pub event_id: String,
    pub true_rating: f64,
    /// Prediction the feedback was scored against.
    pub yhat: f64,
    /// `true_rating - yhat`.
    pub residual: f64,
    /// Calibrator updates applied so far, including this one.
    pub calibrator_updates: u64,
    /// Persona versions whose skill was updated.
    pub credited: usize,
    /// Review triggered by this feedback, if one was due.
    pub review: Option<ReviewOutcome>,
}

impl FeedbackAck {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "event_id": self.event_id,
            "true_rating": self.true_rating,
            "yhat": self.yhat,
            "residual": self.residual,
            "calibrator_updates": self.calibrator_updates,
            "credited": self.credited,
            "replaced": self
                .review
                .as_ref()
                .and_then(|r| r.replaced.as_ref())
                .map(|p| p.to_string()),
        })
    }
}

/// Score every critic and non-degraded judge of `event` against the true rating.
///
/// Critics are scored on their raw opinion, judges on their `r_tilde`. Both
/// feed the skill tracker and the router's value for the event's context.
pub(crate) fn credit_participants(
    event: &PredictionEvent,
    true_rating: f64,
    skills: &SkillTracker,
    router: &Router,
) -> usize {
    let mut credited = 0;

    for opinion in &event.opinions {
        let error = opinion.score - true_rating;
        match skills.record(&opinion.persona, error) {
            Ok(_) => credited += 1,
            Err(e) => tracing::warn!(persona = %opinion.persona, error = %e, "critic skill update skipped"),
        }
        router.observe(&event.context_key, &opinion.persona, error, Some(opinion.confidence));
    }

    // A degraded judge saw no opinions; its neutral output says nothing about it.
    for estimate in event.judge_estimates.iter().filter(|e| !e.degraded) {
        let error = estimate.r_tilde - true_rating;
        match skills.record(&estimate.persona, error) {
            Ok(_) => credited += 1,
            Err(e) => tracing::warn!(persona = %estimate.persona, error = %e, "judge skill update skipped"),
        }
        router.observe(&event.context_key, &estimate.persona, error, None);
    }

    credited
}
