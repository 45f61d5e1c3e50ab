use serde::{Deserialize, Serialize};

/// Bandit statistics for one persona version inside one context bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmStats {
    /// Times this persona was selected. Never decreases.
    pub selections: u64,
    /// Feedback samples folded into `value`.
    pub samples: u64,
    /// EW mean of `-|error|`; meaningless while `samples == 0`.
    pub value: f64,
    /// EW mean of reported critic confidence, if any was observed.
    pub mean_confidence: Option<f64>,
}

impl ArmStats {
    pub fn observe(&mut self, error: f64, confidence: Option<f64>, decay: f64) {
        let reward = -error.abs();
        self.value = if self.samples == 0 {
            reward
        } else {
            decay * self.value + (1.0 - decay) * reward
        };
        self.samples += 1;

        if let Some(c) = confidence.filter(|c| c.is_finite()) {
            let c = c.clamp(0.0, 1.0);
            self.mean_confidence = Some(match self.mean_confidence {
                None => c,
                Some(m) => decay * m + (1.0 - decay) * c,
            });
        }
    }
}
