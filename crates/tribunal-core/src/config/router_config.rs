use serde::{Deserialize, Serialize};

use super::defaults;

/// Bandit routing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Critics selected per request (`k_c`).
    pub critics_per_request: usize,
    /// Judges selected per request (`k_j`).
    pub judges_per_request: usize,
    /// Exploration probability before any request was served.
    pub epsilon_start: f64,
    /// Exploration floor.
    pub epsilon_min: f64,
    /// Requests over which exploration decays by a factor of e.
    pub epsilon_decay_requests: f64,
    /// Feedback samples per context below which a persona is still explored.
    pub min_samples: u64,
    /// Decay of the per-context value estimate.
    pub value_decay: f64,
    /// Weight of a critic's mean confidence in its selection value.
    pub confidence_bias: f64,
    /// Fixed RNG seed for reproducible routing.
    pub seed: Option<u64>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            critics_per_request: defaults::DEFAULT_CRITICS_PER_REQUEST,
            judges_per_request: defaults::DEFAULT_JUDGES_PER_REQUEST,
            epsilon_start: defaults::DEFAULT_EPSILON_START,
            epsilon_min: defaults::DEFAULT_EPSILON_MIN,
            epsilon_decay_requests: defaults::DEFAULT_EPSILON_DECAY_REQUESTS,
            min_samples: defaults::DEFAULT_ROUTER_MIN_SAMPLES,
            value_decay: defaults::DEFAULT_ROUTER_VALUE_DECAY,
            confidence_bias: defaults::DEFAULT_CONFIDENCE_BIAS,
            seed: None,
        }
    }
}
