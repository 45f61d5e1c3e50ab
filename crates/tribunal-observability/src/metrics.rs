//! Process-wide counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Lock-free counters shared by every prediction flow.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    predictions: AtomicU64,
    degraded_predictions: AtomicU64,
    cancelled_predictions: AtomicU64,
    critic_timeouts: AtomicU64,
    critic_errors: AtomicU64,
    feedback_applied: AtomicU64,
    feedback_rejected: AtomicU64,
    reviews: AtomicU64,
    replacements: AtomicU64,
}

/// Point-in-time copy of [`MetricsCollector`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub predictions: u64,
    pub degraded_predictions: u64,
    pub cancelled_predictions: u64,
    pub critic_timeouts: u64,
    pub critic_errors: u64,
    pub feedback_applied: u64,
    pub feedback_rejected: u64,
    pub reviews: u64,
    pub replacements: u64,
}

impl MetricsSnapshot {
    /// Share of predictions that ran degraded.
    pub fn degraded_rate(&self) -> f64 {
        if self.predictions == 0 {
            0.0
        } else {
            self.degraded_predictions as f64 / self.predictions as f64
        }
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_prediction(&self, degraded: bool) {
        self.predictions.fetch_add(1, Ordering::Relaxed);
        if degraded {
            self.degraded_predictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_cancelled(&self) {
        self.cancelled_predictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_critic_timeout(&self) {
        self.critic_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_critic_error(&self) {
        self.critic_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_feedback(&self, accepted: bool) {
        if accepted {
            self.feedback_applied.fetch_add(1, Ordering::Relaxed);
        } else {
            self.feedback_rejected.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_review(&self, replaced: bool) {
        self.reviews.fetch_add(1, Ordering::Relaxed);
        if replaced {
            self.replacements.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            predictions: self.predictions.load(Ordering::Relaxed),
            degraded_predictions: self.degraded_predictions.load(Ordering::Relaxed),
            cancelled_predictions: self.cancelled_predictions.load(Ordering::Relaxed),
            critic_timeouts: self.critic_timeouts.load(Ordering::Relaxed),
            critic_errors: self.critic_errors.load(Ordering::Relaxed),
            feedback_applied: self.feedback_applied.load(Ordering::Relaxed),
            feedback_rejected: self.feedback_rejected.load(Ordering::Relaxed),
            reviews: self.reviews.load(Ordering::Relaxed),
            replacements: self.replacements.load(Ordering::Relaxed),
        }
    }

    /// Serialize the current counters as JSON.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.snapshot()).unwrap_or(serde_json::Value::Null)
    }
}
