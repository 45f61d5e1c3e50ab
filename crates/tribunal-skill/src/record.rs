use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tribunal_core::models::SkillEstimate;
use tribunal_core::persona::PersonaRef;

/// Mutable accuracy record for one persona version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub persona: PersonaRef,
    pub n: u64,
    pub ema_error: f64,
    pub ema_var: f64,
    pub last_updated: Option<DateTime<Utc>>,
}

impl SkillRecord {
    /// A zero-sample record.
    pub fn new(persona: PersonaRef) -> Self {
        Self {
            persona,
            n: 0,
            ema_error: 0.0,
            ema_var: 0.0,
            last_updated: None,
        }
    }

    /// Fold one error sample in. `error` must be finite.
    ///
    /// The first sample seeds the mean directly; after that
    /// `d = |e| - mean_old`, `mean = λ·mean + (1-λ)·|e|`, `var = λ·var + (1-λ)·d²`.
    pub fn apply(&mut self, error: f64, decay: f64) {
        let abs = error.abs();
        if self.n == 0 {
            self.ema_error = abs;
            self.ema_var = 0.0;
        } else {
            let d = abs - self.ema_error;
            self.ema_error = decay * self.ema_error + (1.0 - decay) * abs;
            self.ema_var = decay * self.ema_var + (1.0 - decay) * d * d;
        }
        self.n += 1;
        self.last_updated = Some(Utc::now());
    }

    /// Read-only estimate; the neutral prior stands in until a sample exists.
    pub fn estimate(&self, neutral_error: f64) -> SkillEstimate {
        if self.n == 0 {
            return SkillEstimate::prior(self.persona.clone(), neutral_error);
        }
        SkillEstimate {
            persona: self.persona.clone(),
            n: self.n,
            ema_error: self.ema_error,
            ema_var: self.ema_var,
            is_prior: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_seeds_mean() {
        let mut rec = SkillRecord::new(PersonaRef::critic("a", 0));
        rec.apply(-0.8, 0.9);
        assert_eq!(rec.n, 1);
        assert!((rec.ema_error - 0.8).abs() < 1e-12);
        assert_eq!(rec.ema_var, 0.0);
        assert!(rec.last_updated.is_some());
    }

    #[test]
    fn second_sample_decays() {
        let mut rec = SkillRecord::new(PersonaRef::critic("a", 0));
        rec.apply(1.0, 0.5);
        rec.apply(0.0, 0.5);
        assert!((rec.ema_error - 0.5).abs() < 1e-12);
        // d = 0 - 1 = -1, var = 0.5 * 0 + 0.5 * 1
        assert!((rec.ema_var - 0.5).abs() < 1e-12);
    }

    #[test]
    fn unsampled_estimate_is_prior() {
        let rec = SkillRecord::new(PersonaRef::judge("j", 2));
        let est = rec.estimate(1.0);
        assert!(est.is_prior);
        assert_eq!(est.ema_error, 1.0);
    }
}
