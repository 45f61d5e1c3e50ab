//! Builder for hand-made prediction events.

use std::collections::BTreeMap;

use chrono::Utc;

use tribunal_core::models::{
    EventStage, JudgeEstimate, Opinion, PredictionEvent, PredictionRequest,
};
use tribunal_core::persona::{AggregationStrategy, PersonaRef};

pub struct EventBuilder {
    event: PredictionEvent,
}

impl EventBuilder {
    pub fn new() -> Self {
        let request = PredictionRequest::new("user-1", "item-1");
        Self {
            event: PredictionEvent {
                event_id: uuid::Uuid::new_v4().to_string(),
                timestamp: Utc::now(),
                context_key: request.routing_context().key(),
                request,
                opinions: Vec::new(),
                failures: Vec::new(),
                judge_estimates: Vec::new(),
                calibration_features: vec![0.0; 8],
                yhat: 3.0,
                sigma: 0.75,
                degraded: false,
                stage: EventStage::Logged,
                true_rating: None,
            },
        }
    }

    pub fn id(mut self, event_id: impl Into<String>) -> Self {
        self.event.event_id = event_id.into();
        self
    }

    pub fn user_item(mut self, user_id: &str, item_id: &str) -> Self {
        self.event.request.user.user_id = user_id.to_string();
        self.event.request.item.item_id = item_id.to_string();
        self
    }

    pub fn genres(mut self, genres: &[&str]) -> Self {
        self.event.request.item.genres = genres.iter().map(|g| g.to_string()).collect();
        self.event.context_key = self.event.request.routing_context().key();
        self
    }

    pub fn prediction(mut self, yhat: f64, sigma: f64) -> Self {
        self.event.yhat = yhat;
        self.event.sigma = sigma;
        self
    }

    pub fn features(mut self, features: Vec<f64>) -> Self {
        self.event.calibration_features = features;
        self
    }

    /// Add a critic opinion with the given score and confidence.
    pub fn opinion(mut self, critic_id: &str, score: f64, confidence: f64) -> Self {
        self.event.opinions.push(Opinion::new(
            PersonaRef::critic(critic_id, 0),
            score,
            confidence,
            "",
            5.0,
        ));
        self
    }

    /// Add a judge estimate with explicit critic weights.
    pub fn judge_with_weights(
        mut self,
        judge_id: &str,
        version: u32,
        r_tilde: f64,
        weights: &[(&str, f64)],
    ) -> Self {
        let weights_used: BTreeMap<String, f64> = weights
            .iter()
            .map(|(critic, a)| (PersonaRef::critic(*critic, 0).to_string(), *a))
            .collect();
        self.event.judge_estimates.push(JudgeEstimate {
            persona: PersonaRef::judge(judge_id, version),
            strategy: AggregationStrategy::Balanced,
            r_tilde,
            degraded: weights_used.is_empty(),
            weights_used,
            flagged: Vec::new(),
        });
        self
    }

    /// Add a judge estimate weighting a single critic fully.
    pub fn judge(self, judge_id: &str, version: u32, r_tilde: f64) -> Self {
        self.judge_with_weights(judge_id, version, r_tilde, &[("critic", 1.0)])
    }

    pub fn degraded(mut self) -> Self {
        self.event.degraded = true;
        self
    }

    pub fn true_rating(mut self, rating: f64) -> Self {
        self.event.true_rating = Some(rating);
        self.event.stage = EventStage::Updated;
        self
    }

    pub fn build(self) -> PredictionEvent {
        self.event
    }
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}
