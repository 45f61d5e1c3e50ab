use serde::{Deserialize, Serialize};

use super::defaults;

/// Online calibrator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibratorConfig {
    /// SGD step size `η`.
    pub learning_rate: f64,
    /// L2 shrinkage applied to the weights on every step.
    pub l2: f64,
    /// Residual standard deviation assumed before any feedback.
    pub prior_sigma: f64,
    /// Lower bound on the reported sigma.
    pub min_sigma: f64,
    /// Decay of the residual variance estimate.
    pub variance_decay: f64,
    /// Largest disagreement that still widens sigma.
    pub disagreement_cap: f64,
    /// Sigma multiplier when an input estimate is degraded.
    pub degraded_inflation: f64,
    /// Sigma multiplier when fewer than `min_judges` responded.
    pub shortfall_inflation: f64,
    pub min_judges: usize,
    /// Number of numeric context features every request must carry.
    pub context_dims: usize,
    /// How many recently applied event ids are remembered to reject repeats.
    pub applied_capacity: usize,
}

impl Default for CalibratorConfig {
    fn default() -> Self {
        Self {
            learning_rate: defaults::DEFAULT_LEARNING_RATE,
            l2: defaults::DEFAULT_L2,
            prior_sigma: defaults::DEFAULT_PRIOR_SIGMA,
            min_sigma: defaults::DEFAULT_MIN_SIGMA,
            variance_decay: defaults::DEFAULT_VARIANCE_DECAY,
            disagreement_cap: defaults::DEFAULT_DISAGREEMENT_CAP,
            degraded_inflation: defaults::DEFAULT_DEGRADED_INFLATION,
            shortfall_inflation: defaults::DEFAULT_SHORTFALL_INFLATION,
            min_judges: defaults::DEFAULT_MIN_JUDGES,
            context_dims: defaults::DEFAULT_CONTEXT_DIMS,
            applied_capacity: defaults::DEFAULT_APPLIED_CAPACITY,
        }
    }
}
