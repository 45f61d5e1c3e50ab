use serde::{Deserialize, Serialize};

use super::defaults;

/// Judge aggregation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Robust z-score beyond which a critic's score is flagged as an outlier.
    pub outlier_cutoff: f64,
    /// Minimum spread used when critics nearly agree.
    pub outlier_floor: f64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            outlier_cutoff: defaults::DEFAULT_OUTLIER_CUTOFF,
            outlier_floor: defaults::DEFAULT_OUTLIER_FLOOR,
        }
    }
}
