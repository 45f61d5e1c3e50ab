//! Online calibrator: `yhat = clip(w·x + b, 0, R_max)` trained by SGD with L2.
//!
//! Model state sits behind one `RwLock`: predictions read concurrently, and
//! each feedback update is a single write of `(w, b, v)`.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use tribunal_core::config::{CalibratorConfig, RatingConfig};
use tribunal_core::constants::BASE_FEATURE_DIMS;
use tribunal_core::errors::{CalibrationError, FeedbackError, TribunalResult};
use tribunal_core::models::{JudgeEstimate, Opinion, PredictionEvent, PredictionRequest, SkillView};

use crate::applied::AppliedIds;
use crate::features::featurize;

/// Process-wide calibrator state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibratorState {
    pub weights: Vec<f64>,
    pub bias: f64,
    /// Running residual variance.
    pub variance: f64,
    pub learning_rate: f64,
    pub l2: f64,
    pub updates: u64,
}

impl CalibratorState {
    fn initial(config: &CalibratorConfig) -> Self {
        Self {
            weights: vec![0.0; BASE_FEATURE_DIMS + config.context_dims],
            bias: 0.0,
            variance: config.prior_sigma * config.prior_sigma,
            learning_rate: config.learning_rate,
            l2: config.l2,
            updates: 0,
        }
    }

    fn raw_output(&self, x: &[f64]) -> f64 {
        self.weights.iter().zip(x).map(|(w, x)| w * x).sum::<f64>() + self.bias
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibratedPrediction {
    pub yhat: f64,
    pub sigma: f64,
    pub features: Vec<f64>,
    pub disagreement: f64,
    /// No judge responded, or at least one judge worked without opinions.
    pub degraded: bool,
}

/// Result of folding one feedback event into the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateOutcome {
    /// Signed residual `y - yhat`.
    pub residual: f64,
    pub variance: f64,
    pub updates: u64,
}

struct Model {
    state: CalibratorState,
    applied: AppliedIds,
}

impl Model {
    fn initial(config: &CalibratorConfig) -> Self {
        Self {
            state: CalibratorState::initial(config),
            applied: AppliedIds::new(config.applied_capacity),
        }
    }
}

pub struct Calibrator {
    rating: RatingConfig,
    config: CalibratorConfig,
    model: RwLock<Model>,
}

impl Calibrator {
    pub fn new(rating: RatingConfig, config: CalibratorConfig) -> Self {
        let model = Model::initial(&config);
        Self {
            rating,
            config,
            model: RwLock::new(model),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Model> {
        self.model.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Model> {
        self.model.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn dims(&self) -> usize {
        BASE_FEATURE_DIMS + self.config.context_dims
    }

    pub fn predict(
        &self,
        estimates: &[JudgeEstimate],
        opinions: &[Opinion],
        request: &PredictionRequest,
        skills: &SkillView,
    ) -> Result<CalibratedPrediction, CalibrationError> {
        let context_key = request.routing_context().key();
        let fv = featurize(
            estimates,
            opinions,
            &context_key,
            &request.context_features,
            skills,
            self.config.context_dims,
        )?;

        let (raw, variance) = {
            let model = self.read();
            (model.state.raw_output(&fv.values), model.state.variance)
        };
        let yhat = if raw.is_finite() {
            raw.clamp(0.0, self.rating.max_rating)
        } else {
            self.rating.neutral_rating
        };

        let degraded = estimates.is_empty() || estimates.iter().any(|e| e.degraded);
        let spread = 1.0 + fv.disagreement.min(self.config.disagreement_cap);
        let mut sigma = (variance.sqrt() * spread).max(self.config.min_sigma);
        if degraded {
            sigma *= self.config.degraded_inflation;
        }
        if estimates.len() < self.config.min_judges {
            sigma *= self.config.shortfall_inflation;
        }

        Ok(CalibratedPrediction {
            yhat,
            sigma,
            features: fv.values,
            disagreement: fv.disagreement,
            degraded,
        })
    }

    /// Fold feedback for `event` into the model, using the features recorded
    /// at prediction time.
    pub fn update(&self, event: &PredictionEvent, true_rating: f64) -> TribunalResult<UpdateOutcome> {
        if !true_rating.is_finite() || !(0.0..=self.rating.max_rating).contains(&true_rating) {
            return Err(FeedbackError::InvalidRating {
                rating: true_rating,
                max: self.rating.max_rating,
            }
            .into());
        }
        let x = &event.calibration_features;

        let mut model = self.write();
        if event.true_rating.is_some() || model.applied.contains(&event.event_id) {
            return Err(FeedbackError::DuplicateFeedback {
                event_id: event.event_id.clone(),
            }
            .into());
        }
        let Model { state, applied } = &mut *model;
        if x.len() != state.weights.len() {
            return Err(CalibrationError::FeatureDimensionMismatch {
                expected: state.weights.len(),
                actual: x.len(),
            }
            .into());
        }

        let e = true_rating - event.yhat;
        let lr = state.learning_rate;
        let l2 = state.l2;
        for (w, xi) in state.weights.iter_mut().zip(x) {
            *w += lr * (e * xi - l2 * *w);
        }
        state.bias += lr * e;
        let decay = self.config.variance_decay;
        state.variance = decay * state.variance + (1.0 - decay) * e * e;
        state.updates += 1;
        applied.insert(&event.event_id);

        tracing::debug!(
            event_id = %event.event_id,
            residual = e,
            variance = state.variance,
            updates = state.updates,
            "calibrator updated"
        );

        Ok(UpdateOutcome {
            residual: e,
            variance: state.variance,
            updates: state.updates,
        })
    }

    pub fn has_applied(&self, event_id: &str) -> bool {
        self.read().applied.contains(event_id)
    }

    /// Number of event ids currently remembered as applied.
    pub fn applied_len(&self) -> usize {
        self.read().applied.len()
    }

    pub fn snapshot(&self) -> CalibratorState {
        self.read().state.clone()
    }

    /// Discard everything learned.
    pub fn reset(&self) {
        *self.write() = Model::initial(&self.config);
        tracing::info!("calibrator reset");
    }

    pub fn learning_rate(&self) -> f64 {
        self.read().state.learning_rate
    }

    /// Change the learning rate for subsequent updates.
    pub fn set_learning_rate(&self, learning_rate: f64) {
        if learning_rate.is_finite() && learning_rate > 0.0 {
            self.write().state.learning_rate = learning_rate;
        }
    }
}
