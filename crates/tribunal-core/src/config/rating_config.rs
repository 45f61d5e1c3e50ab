use serde::{Deserialize, Serialize};

use super::defaults;

/// Rating scale shared by every component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Upper bound of the rating range; the lower bound is always 0.
    pub max_rating: f64,
    /// Rating emitted by a judge that received no opinions.
    pub neutral_rating: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            max_rating: defaults::DEFAULT_MAX_RATING,
            neutral_rating: defaults::DEFAULT_NEUTRAL_RATING,
        }
    }
}
