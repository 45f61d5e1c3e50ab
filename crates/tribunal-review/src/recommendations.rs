//! Audit heuristics turned into operator-facing recommendations.

use std::collections::BTreeMap;

use tribunal_core::models::{CriticTrust, JudgeStats, Recommendation, ReplacementDirective, Severity};

use crate::stats::mean;

const HIGH_ERROR: f64 = 1.5;
const EXCELLENT_ERROR: f64 = 0.5;
const INCONSISTENT_STD: f64 = 1.0;
const UNDERPERFORMING_RATIO: f64 = 1.3;
const UNDERUSED_ALPHA: f64 = 0.1;
const HEAVY_ALPHA: f64 = 0.5;
const CALIBRATOR_HINT_ERROR: f64 = 1.0;

fn rec(severity: Severity, message: String, action: &str) -> Recommendation {
    Recommendation {
        severity,
        message,
        action: action.to_string(),
    }
}

fn join_ids<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    ids.collect::<Vec<_>>().join(", ")
}

pub fn generate(
    judge_stats: &[JudgeStats],
    critic_trust: &BTreeMap<String, CriticTrust>,
    overall_error: Option<f64>,
    replacement: Option<&ReplacementDirective>,
) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if let Some(err) = overall_error {
        if err > HIGH_ERROR {
            recs.push(rec(
                Severity::Critical,
                format!("Overall error is high ({err:.3})"),
                "retrain the calibrator or revise judge instructions",
            ));
        } else if err < EXCELLENT_ERROR {
            recs.push(rec(
                Severity::Info,
                format!("Excellent overall performance ({err:.3})"),
                "none",
            ));
        }
    }

    let inconsistent: Vec<&JudgeStats> = judge_stats
        .iter()
        .filter(|s| s.std_error > INCONSISTENT_STD && s.n > 2)
        .collect();
    if !inconsistent.is_empty() {
        recs.push(rec(
            Severity::Warning,
            format!(
                "Inconsistent judges detected: {}",
                join_ids(inconsistent.iter().map(|s| s.judge_id.as_str()))
            ),
            "refine their instructions for more stable outputs",
        ));
    }

    let rated: Vec<&JudgeStats> = judge_stats.iter().filter(|s| s.n > 0).collect();
    if rated.len() > 1 {
        let avg = mean(&rated.iter().map(|s| s.avg_error).collect::<Vec<_>>());
        let under: Vec<&str> = rated
            .iter()
            .filter(|s| s.avg_error > avg * UNDERPERFORMING_RATIO)
            .map(|s| s.judge_id.as_str())
            .collect();
        if !under.is_empty() {
            recs.push(rec(
                Severity::Warning,
                format!("Underperforming judges: {}", under.join(", ")),
                "review their instructions or raise calibrator capacity",
            ));
        }
    }

    let underused: Vec<&str> = critic_trust
        .values()
        .filter(|t| t.avg_alpha < UNDERUSED_ALPHA)
        .map(|t| t.critic_id.as_str())
        .collect();
    if !underused.is_empty() {
        recs.push(rec(
            Severity::Info,
            format!("Underutilized critics: {}", underused.join(", ")),
            "improve their instructions or check their relevance",
        ));
    }
    let heavy: Vec<&str> = critic_trust
        .values()
        .filter(|t| t.avg_alpha > HEAVY_ALPHA)
        .map(|t| t.critic_id.as_str())
        .collect();
    if !heavy.is_empty() {
        recs.push(rec(
            Severity::Info,
            format!("Heavily weighted critics: {}", heavy.join(", ")),
            "none",
        ));
    }

    if overall_error.is_some_and(|e| e > CALIBRATOR_HINT_ERROR) {
        recs.push(rec(
            Severity::Warning,
            "Calibrator may be underfitting".to_string(),
            "add context features to the calibrator",
        ));
    }

    if let Some(d) = replacement {
        recs.push(rec(
            Severity::Critical,
            format!("Replace judge {} with v{}: {}", d.old_persona, d.new_version, d.reason),
            "author a new judge version",
        ));
    }

    if recs.is_empty() {
        recs.push(rec(
            Severity::Info,
            "No major issues detected".to_string(),
            "none",
        ));
    }
    recs
}
