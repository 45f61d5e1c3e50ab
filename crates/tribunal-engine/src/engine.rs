//! The prediction engine: request pipeline, feedback ingestion, reviews.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use tribunal_aggregation::Aggregator;
use tribunal_calibration::Calibrator;
use tribunal_core::config::TribunalConfig;
use tribunal_core::constants::MIN_LEARNING_RATE;
use tribunal_core::errors::FeedbackError;
use tribunal_core::models::{
    CalibratorSuggestion, CriticFailure, EventStage, FailureKind, PredictionEvent,
    PredictionRequest,
};
use tribunal_core::persona::PersonaRef;
use tribunal_core::traits::{
    IEventLog, IOpinionSource, IPersonaStore, IReplacementSink, OpinionRequest,
};
use tribunal_core::CancellationToken;
use tribunal_observability::tracing_setup::events;
use tribunal_observability::{feedback_span, predict_span, review_span, MetricsCollector};
use tribunal_review::{ReviewCycle, ReviewHistory, ReviewOutcome};
use tribunal_routing::Router;
use tribunal_skill::SkillTracker;

use crate::builder::EngineBuilder;
use crate::error::{EngineError, EngineResult};
use crate::feedback::{credit_participants, FeedbackAck};
use crate::opinions;

/// Summary handed back to the caller of [`Engine::predict`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub event_id: String,
    pub yhat: f64,
    pub sigma: f64,
    pub degraded: bool,
    pub context_key: String,
    pub critics: Vec<PersonaRef>,
    pub judges: Vec<PersonaRef>,
    pub failures: Vec<CriticFailure>,
}

impl Prediction {
    fn from_event(event: &PredictionEvent, critics: Vec<PersonaRef>) -> Self {
        Self {
            event_id: event.event_id.clone(),
            yhat: event.yhat,
            sigma: event.sigma,
            degraded: event.degraded,
            context_key: event.context_key.clone(),
            critics,
            judges: event
                .judge_estimates
                .iter()
                .map(|e| e.persona.clone())
                .collect(),
            failures: event.failures.clone(),
        }
    }

    /// `(yhat - sigma, yhat + sigma)`.
    pub fn interval(&self) -> (f64, f64) {
        (self.yhat - self.sigma, self.yhat + self.sigma)
    }
}

/// Owns the shared decision state and the external collaborators.
///
/// Cheap to share behind an `Arc`: every method takes `&self`.
pub struct Engine {
    pub(crate) config: TribunalConfig,
    pub(crate) router: Arc<Router>,
    pub(crate) skills: Arc<SkillTracker>,
    pub(crate) calibrator: Arc<Calibrator>,
    pub(crate) aggregator: Aggregator,
    pub(crate) opinion_source: Arc<dyn IOpinionSource>,
    pub(crate) event_log: Arc<dyn IEventLog>,
    pub(crate) persona_store: Arc<dyn IPersonaStore>,
    pub(crate) replacement_sink: Arc<dyn IReplacementSink>,
    pub(crate) review: ReviewCycle,
    pub(crate) metrics: Arc<MetricsCollector>,
    pub(crate) feedback_count: AtomicU64,
}

impl Engine {
    pub fn builder(config: TribunalConfig) -> EngineBuilder {
        EngineBuilder::new(config)
    }

    /// Run one request through routing, critics, judges and the calibrator,
    /// then log it.
    ///
    /// `cancel` is checked before every stage up to calibration. A cancelled
    /// request leaves no trace in the calibrator, the skill tracker or the log.
    pub async fn predict(
        &self,
        request: PredictionRequest,
        cancel: &CancellationToken,
    ) -> EngineResult<Prediction> {
        let span = predict_span!(request.user.user_id, request.item.item_id);
        self.run_pipeline(request, cancel).instrument(span).await
    }

    async fn run_pipeline(
        &self,
        request: PredictionRequest,
        cancel: &CancellationToken,
    ) -> EngineResult<Prediction> {
        let event_id = uuid::Uuid::new_v4().to_string();
        let max_rating = self.config.rating.max_rating;
        let mut stage = EventStage::Requested;

        // Routing.
        self.checkpoint(cancel, stage)?;
        let decision = self.router.route(&request.routing_context())?;
        stage.advance(EventStage::Routed)?;
        tracing::debug!(
            event_id = %event_id,
            context = %decision.context_key,
            critics = decision.critics.len(),
            judges = decision.judges.len(),
            epsilon = decision.epsilon,
            "routed"
        );

        // Critics.
        self.checkpoint(cancel, stage)?;
        let opinion_request = OpinionRequest {
            user: request.user.clone(),
            item: request.item.clone(),
        };
        let timeout = Duration::from_millis(self.config.engine.critic_timeout_ms);
        let collected = opinions::collect(
            self.opinion_source.as_ref(),
            &decision.critics,
            &opinion_request,
            timeout,
            max_rating,
        )
        .await;
        for failure in &collected.failures {
            let kind = match failure.kind {
                FailureKind::Timeout => {
                    self.metrics.record_critic_timeout();
                    "timeout"
                }
                FailureKind::Generation => {
                    self.metrics.record_critic_error();
                    "generation"
                }
            };
            events::critic_failed(&event_id, &failure.persona.to_string(), kind, &failure.message);
        }
        stage.advance(EventStage::OpinionsCollected)?;

        // Judges.
        self.checkpoint(cancel, stage)?;
        let critic_refs: Vec<PersonaRef> =
            decision.critics.iter().map(|c| c.persona_ref()).collect();
        let participants: Vec<PersonaRef> = critic_refs
            .iter()
            .cloned()
            .chain(decision.judges.iter().map(|j| j.persona_ref()))
            .collect();
        let skill_view = self.skills.critic_view(&participants);
        let estimates =
            self.aggregator
                .synthesize(&decision.judges, &collected.opinions, &skill_view);
        stage.advance(EventStage::Judged)?;

        // Calibration.
        self.checkpoint(cancel, stage)?;
        let calibrated =
            self.calibrator
                .predict(&estimates, &collected.opinions, &request, &skill_view)?;
        stage.advance(EventStage::Calibrated)?;

        if collected.opinions.is_empty() {
            events::degradation_triggered(&event_id, collected.failures.len());
        }

        let mut event = PredictionEvent {
            event_id,
            timestamp: Utc::now(),
            request,
            context_key: decision.context_key,
            opinions: collected.opinions,
            failures: collected.failures,
            judge_estimates: estimates,
            calibration_features: calibrated.features,
            yhat: calibrated.yhat,
            sigma: calibrated.sigma,
            degraded: calibrated.degraded,
            stage,
            true_rating: None,
        };
        event.stage.advance(EventStage::Logged)?;
        self.event_log.append(&event)?;

        self.metrics.record_prediction(event.degraded);
        events::prediction_logged(&event.event_id, event.yhat, event.sigma, event.degraded);
        Ok(Prediction::from_event(&event, critic_refs))
    }

    fn checkpoint(&self, cancel: &CancellationToken, stage: EventStage) -> EngineResult<()> {
        if cancel.is_cancelled() {
            self.metrics.record_cancelled();
            tracing::info!(stage = %stage, "prediction cancelled");
            return Err(EngineError::Cancelled {
                stage: stage.to_string(),
            });
        }
        Ok(())
    }

    /// Attach the observed rating to a logged event and learn from it.
    ///
    /// The event log is written first and is the only once-only guard: the
    /// calibrator, skill tracker and router learn only after the rating is
    /// durably attached. A failed write leaves every model untouched, so the
    /// same feedback can be retried. Every `reviewer.review_interval`
    /// accepted feedbacks trigger a review.
    pub fn submit_feedback(&self, event_id: &str, true_rating: f64) -> EngineResult<FeedbackAck> {
        let _span = feedback_span!(event_id).entered();
        match self.apply_feedback(event_id, true_rating) {
            Ok(ack) => {
                self.metrics.record_feedback(true);
                events::feedback_applied(event_id, true_rating, ack.residual);
                Ok(ack)
            }
            Err(err) => {
                self.metrics.record_feedback(false);
                events::feedback_rejected(event_id, err.reason());
                Err(err)
            }
        }
    }

    fn apply_feedback(&self, event_id: &str, true_rating: f64) -> EngineResult<FeedbackAck> {
        let max = self.config.rating.max_rating;
        if !true_rating.is_finite() || !(0.0..=max).contains(&true_rating) {
            return Err(FeedbackError::InvalidRating {
                rating: true_rating,
                max,
            }
            .into());
        }

        let logged = self
            .event_log
            .get(event_id)?
            .ok_or_else(|| FeedbackError::UnknownEvent {
                event_id: event_id.to_string(),
            })?;
        if logged.has_feedback() {
            return Err(EngineError::DuplicateFeedback {
                event_id: event_id.to_string(),
            });
        }

        // Concurrent submits for the same id race here; only one attach wins.
        let event = self.event_log.attach_feedback(event_id, true_rating)?;

        // The calibrator sees the event as it was before the rating landed.
        let outcome = self.calibrator.update(&logged, true_rating)?;
        let credited = credit_participants(&event, true_rating, &self.skills, &self.router);

        let accepted = self.feedback_count.fetch_add(1, Ordering::Relaxed) + 1;
        let interval = self.config.reviewer.review_interval;
        let review = if interval > 0 && accepted % interval == 0 {
            match self.run_review() {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    tracing::warn!(error = %e, "scheduled review failed");
                    None
                }
            }
        } else {
            None
        };

        Ok(FeedbackAck {
            event_id: event_id.to_string(),
            true_rating,
            yhat: event.yhat,
            residual: outcome.residual,
            calibrator_updates: outcome.updates,
            credited,
            review,
        })
    }

    /// Review the latest window now, replacing at most one judge.
    pub fn run_review(&self) -> EngineResult<ReviewOutcome> {
        let _span = review_span!(self.config.reviewer.window_size).entered();
        let outcome = self.review.run(
            self.event_log.as_ref(),
            &self.router,
            self.persona_store.as_ref(),
            self.replacement_sink.as_ref(),
        )?;

        if let (Some(directive), Some(new)) = (&outcome.report.replacement, &outcome.replaced) {
            events::judge_replaced(
                &directive.old_persona.to_string(),
                &new.to_string(),
                &directive.reason,
            );
        }
        self.metrics.record_review(outcome.replaced.is_some());
        events::review_completed(
            outcome.report.window_size,
            outcome.report.with_feedback,
            outcome.report.overall_avg_error,
            outcome.replaced.is_some(),
        );

        for suggestion in &outcome.suggestions {
            match suggestion {
                CalibratorSuggestion::DecreaseLearningRate { reason } => {
                    let current = self.calibrator.learning_rate();
                    let next = (current * 0.5).max(MIN_LEARNING_RATE);
                    self.calibrator.set_learning_rate(next);
                    tracing::info!(from = current, to = next, reason = %reason, "calibrator learning rate lowered");
                }
                CalibratorSuggestion::IncreaseCapacity { reason } => {
                    tracing::info!(reason = %reason, "calibrator capacity increase suggested");
                }
            }
        }

        Ok(outcome)
    }

    /// Stored event by id.
    pub fn event(&self, event_id: &str) -> EngineResult<Option<PredictionEvent>> {
        Ok(self.event_log.get(event_id)?)
    }

    pub fn config(&self) -> &TribunalConfig {
        &self.config
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub fn skills(&self) -> &Arc<SkillTracker> {
        &self.skills
    }

    pub fn calibrator(&self) -> &Arc<Calibrator> {
        &self.calibrator
    }

    pub fn event_log(&self) -> &Arc<dyn IEventLog> {
        &self.event_log
    }

    pub fn metrics(&self) -> &Arc<MetricsCollector> {
        &self.metrics
    }

    pub fn review_history(&self) -> ReviewHistory {
        self.review.history()
    }
}
