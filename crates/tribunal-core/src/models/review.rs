//! Review models: judge statistics, recommendations, and replacement directives.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::persona::PersonaRef;

/// Error statistics for one judge version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionStats {
    pub persona: PersonaRef,
    pub n: usize,
    pub avg_error: f64,
    pub std_error: f64,
}

/// Error statistics for one judge id, across the versions seen in the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeStats {
    pub judge_id: String,
    /// Number of judged events with feedback.
    pub n: usize,
    pub avg_error: f64,
    /// Sample standard deviation of the absolute error (0 when `n < 2`).
    pub std_error: f64,
    /// Number of judged events, with or without feedback.
    pub predictions: usize,
    /// Statistics of the most recent version seen in the window.
    pub latest: VersionStats,
}

/// Average trust a critic received from judges across the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticTrust {
    pub critic_id: String,
    pub avg_alpha: f64,
    pub samples: usize,
}

/// Mean error of final predictions for one genre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreError {
    pub genre: String,
    pub avg_error: f64,
    pub count: usize,
}

/// Quality of the calibrated predictions in the window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionQuality {
    pub count: usize,
    pub mae: f64,
    pub rmse: f64,
    pub max_error: f64,
    pub min_error: f64,
    pub avg_predicted: f64,
    pub avg_true: f64,
    /// Fraction of predictions whose true rating fell within `yhat ± sigma`.
    pub sigma_coverage: f64,
    /// Fraction of predictions flagged as degraded.
    pub degraded_fraction: f64,
    /// Genres sorted by ascending mean error.
    pub by_genre: Vec<GenreError>,
}

/// Severity of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// An actionable finding surfaced by a review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub severity: Severity,
    pub message: String,
    pub action: String,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {} ({})", self.severity, self.message, self.action)
    }
}

/// Instruction to replace a judge, consumed by the external prompt author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplacementDirective {
    pub old_persona: PersonaRef,
    pub new_version: u32,
    pub reason: String,
    /// Statistics that triggered the replacement.
    pub evidence: VersionStats,
    pub issued_at: DateTime<Utc>,
}

impl ReplacementDirective {
    pub fn new_persona(&self) -> PersonaRef {
        self.old_persona.with_version(self.new_version)
    }
}

/// Calibrator tuning hint derived from consecutive reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalibratorSuggestion {
    IncreaseCapacity { reason: String },
    DecreaseLearningRate { reason: String },
}

/// Read-only snapshot produced by one review cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewReport {
    pub generated_at: DateTime<Utc>,
    /// Events in the window.
    pub window_size: usize,
    /// Events in the window carrying a true rating.
    pub with_feedback: usize,
    pub judge_stats: Vec<JudgeStats>,
    pub overall_avg_error: f64,
    pub overall_std_error: f64,
    pub best_judge: Option<String>,
    pub worst_judge: Option<String>,
    pub critic_trust: BTreeMap<String, CriticTrust>,
    pub quality: PredictionQuality,
    pub recommendations: Vec<Recommendation>,
    pub replacement: Option<ReplacementDirective>,
}

impl ReviewReport {
    pub fn judge(&self, judge_id: &str) -> Option<&JudgeStats> {
        self.judge_stats.iter().find(|s| s.judge_id == judge_id)
    }

    pub fn recommendation_messages(&self) -> Vec<String> {
        self.recommendations.iter().map(|r| r.message.clone()).collect()
    }

    /// Plain-text rendering for operators.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "review at {} | {} events ({} with feedback)\n",
            self.generated_at.to_rfc3339(),
            self.window_size,
            self.with_feedback
        ));
        out.push_str(&format!(
            "overall judge error: {:.3} +/- {:.3}\n",
            self.overall_avg_error, self.overall_std_error
        ));
        if self.quality.count > 0 {
            out.push_str(&format!(
                "final predictions: mae {:.3} | rmse {:.3} | sigma coverage {:.0}%\n",
                self.quality.mae,
                self.quality.rmse,
                self.quality.sigma_coverage * 100.0
            ));
        }

        if !self.judge_stats.is_empty() {
            out.push_str("judges:\n");
            let mut stats: Vec<&JudgeStats> = self.judge_stats.iter().collect();
            stats.sort_by(|a, b| a.avg_error.total_cmp(&b.avg_error));
            for s in stats {
                out.push_str(&format!(
                    "  {:<20} avg {:.3} | std {:.3} | n {} | latest {}\n",
                    s.judge_id, s.avg_error, s.std_error, s.n, s.latest.persona
                ));
            }
        }
        if let Some(best) = &self.best_judge {
            out.push_str(&format!("best judge: {best}\n"));
        }
        if let Some(worst) = &self.worst_judge {
            out.push_str(&format!("needs improvement: {worst}\n"));
        }

        if !self.critic_trust.is_empty() {
            out.push_str("critic trust (avg alpha):\n");
            let mut trust: Vec<&CriticTrust> = self.critic_trust.values().collect();
            trust.sort_by(|a, b| b.avg_alpha.total_cmp(&a.avg_alpha));
            for t in trust {
                let filled = (t.avg_alpha.clamp(0.0, 1.0) * 20.0) as usize;
                out.push_str(&format!(
                    "  {:<20} [{}{}] {:.3}\n",
                    t.critic_id,
                    "#".repeat(filled),
                    ".".repeat(20 - filled),
                    t.avg_alpha
                ));
            }
        }

        if let Some(directive) = &self.replacement {
            out.push_str(&format!(
                "replacement: {} -> v{} ({})\n",
                directive.old_persona, directive.new_version, directive.reason
            ));
        }
        for rec in &self.recommendations {
            out.push_str(&format!("- {rec}\n"));
        }
        out
    }
}
