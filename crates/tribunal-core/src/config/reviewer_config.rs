use serde::{Deserialize, Serialize};

use super::defaults;

/// Reviewer audit configuration.
///
/// The thresholds are operator-tuned; the defaults are only a starting point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewerConfig {
    /// `N_min`: feedback samples a judge version needs before it can be replaced.
    pub min_samples: usize,
    /// `E_threshold`: mean absolute error above which a judge is replaced.
    pub error_threshold: f64,
    /// `S_threshold`: error standard deviation above which a judge is replaced.
    pub std_threshold: f64,
    /// Events read from the log per review.
    pub window_size: usize,
    /// Feedback events between automatic reviews (0 disables them).
    pub review_interval: u64,
    /// Reports kept in the review history.
    pub history_limit: usize,
}

impl Default for ReviewerConfig {
    fn default() -> Self {
        Self {
            min_samples: defaults::DEFAULT_REVIEW_MIN_SAMPLES,
            error_threshold: defaults::DEFAULT_ERROR_THRESHOLD,
            std_threshold: defaults::DEFAULT_STD_THRESHOLD,
            window_size: defaults::DEFAULT_REVIEW_WINDOW,
            review_interval: defaults::DEFAULT_REVIEW_INTERVAL,
            history_limit: defaults::DEFAULT_REVIEW_HISTORY,
        }
    }
}
