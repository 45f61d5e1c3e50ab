use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::persona::{AggregationStrategy, PersonaRef};

/// One judge's synthesized rating for a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeEstimate {
    pub persona: PersonaRef,
    pub strategy: AggregationStrategy,
    /// Synthesized rating in `[0, max_rating]`.
    pub r_tilde: f64,
    /// Trust allocation over the critics present in the input, keyed by
    /// critic `id@vN`. Sums to 1 unless empty.
    pub weights_used: BTreeMap<String, f64>,
    /// Critics whose score was treated as an outlier.
    #[serde(default)]
    pub flagged: Vec<String>,
    /// Set when no critic opinion was available.
    pub degraded: bool,
}

impl JudgeEstimate {
    /// Sum of the trust weights.
    pub fn alpha_mass(&self) -> f64 {
        self.weights_used.values().sum()
    }
}
