use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::persona::PersonaRef;

/// Read-only view of one persona's tracked accuracy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEstimate {
    pub persona: PersonaRef,
    pub n: u64,
    /// Exponentially-weighted mean absolute error (neutral prior when `n == 0`).
    pub ema_error: f64,
    /// Exponentially-weighted variance of the absolute error.
    pub ema_var: f64,
    /// True when no sample has been recorded yet.
    pub is_prior: bool,
}

impl SkillEstimate {
    pub fn prior(persona: PersonaRef, neutral_error: f64) -> Self {
        Self {
            persona,
            n: 0,
            ema_error: neutral_error,
            ema_var: 0.0,
            is_prior: true,
        }
    }

    /// `1 / (1 + ema_error)`, in `(0, 1]`.
    pub fn trust(&self) -> f64 {
        1.0 / (1.0 + self.ema_error.max(0.0))
    }
}

/// Snapshot of skill estimates handed to judges and the calibrator.
#[derive(Debug, Clone, Default)]
pub struct SkillView {
    estimates: HashMap<PersonaRef, SkillEstimate>,
    neutral_error: f64,
}

impl SkillView {
    pub fn new(neutral_error: f64) -> Self {
        Self {
            estimates: HashMap::new(),
            neutral_error,
        }
    }

    pub fn insert(&mut self, estimate: SkillEstimate) {
        self.estimates.insert(estimate.persona.clone(), estimate);
    }

    /// The estimate for `persona`, or the neutral prior.
    pub fn get(&self, persona: &PersonaRef) -> SkillEstimate {
        self.estimates
            .get(persona)
            .cloned()
            .unwrap_or_else(|| SkillEstimate::prior(persona.clone(), self.neutral_error))
    }

    pub fn neutral_error(&self) -> f64 {
        self.neutral_error
    }

    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }
}
