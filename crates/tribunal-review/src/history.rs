//! Bounded archive of review reports and the calibrator hints derived from it.

use std::collections::VecDeque;

use tribunal_core::models::{CalibratorSuggestion, ReviewReport};

const CAPACITY_ERROR: f64 = 1.2;
const ERROR_GROWTH: f64 = 1.1;

#[derive(Debug, Clone)]
pub struct ReviewHistory {
    reports: VecDeque<ReviewReport>,
    limit: usize,
}

impl ReviewHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            reports: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    pub fn push(&mut self, report: ReviewReport) {
        if self.reports.len() == self.limit {
            self.reports.pop_front();
        }
        self.reports.push_back(report);
    }

    pub fn latest(&self) -> Option<&ReviewReport> {
        self.reports.back()
    }

    pub fn reports(&self) -> impl Iterator<Item = &ReviewReport> {
        self.reports.iter()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Hints from the latest report and its predecessor.
    pub fn suggestions(&self) -> Vec<CalibratorSuggestion> {
        let mut out = Vec::new();
        let Some(latest) = self.reports.back() else {
            return out;
        };
        if latest.overall_avg_error > CAPACITY_ERROR {
            out.push(CalibratorSuggestion::IncreaseCapacity {
                reason: format!(
                    "overall error {:.3} suggests underfitting",
                    latest.overall_avg_error
                ),
            });
        }
        if self.reports.len() > 1 {
            let prev = &self.reports[self.reports.len() - 2];
            if prev.with_feedback > 0
                && latest.overall_avg_error > prev.overall_avg_error * ERROR_GROWTH
            {
                out.push(CalibratorSuggestion::DecreaseLearningRate {
                    reason: format!(
                        "error grew from {:.3} to {:.3}",
                        prev.overall_avg_error, latest.overall_avg_error
                    ),
                });
            }
        }
        out
    }

    pub fn clear(&mut self) {
        self.reports.clear();
    }
}
