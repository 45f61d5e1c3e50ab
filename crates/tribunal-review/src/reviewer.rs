//! The audit itself. Pure: reads events, never raises.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;

use tribunal_core::config::ReviewerConfig;
use tribunal_core::models::{
    CriticTrust, JudgeStats, PredictionEvent, ReplacementDirective, ReviewReport, VersionStats,
};
use tribunal_core::persona::PersonaRef;

use crate::quality::prediction_quality;
use crate::recommendations;
use crate::stats::{mean, sample_std};

#[derive(Default)]
struct JudgeAccumulator {
    errors: Vec<f64>,
    by_version: BTreeMap<u32, Vec<f64>>,
    predictions: usize,
    latest_version: u32,
}

fn version_stats(persona: PersonaRef, errors: &[f64]) -> VersionStats {
    VersionStats {
        persona,
        n: errors.len(),
        avg_error: mean(errors),
        std_error: sample_std(errors),
    }
}

/// Audit `events` with every judge eligible for replacement.
pub fn run_review(events: &[PredictionEvent], config: &ReviewerConfig) -> ReviewReport {
    run_review_filtered(events, config, |_| true)
}

/// Audit `events`; only judges whose latest version satisfies `is_active`
/// can receive a replacement directive.
pub fn run_review_filtered<F>(
    events: &[PredictionEvent],
    config: &ReviewerConfig,
    is_active: F,
) -> ReviewReport
where
    F: Fn(&PersonaRef) -> bool,
{
    let mut judges: BTreeMap<String, JudgeAccumulator> = BTreeMap::new();
    let mut alphas: HashMap<String, Vec<f64>> = HashMap::new();
    let mut all_errors = Vec::new();

    for event in events {
        for est in &event.judge_estimates {
            let acc = judges.entry(est.persona.id.clone()).or_default();
            acc.predictions += 1;
            acc.latest_version = acc.latest_version.max(est.persona.version);
            if let Some(y) = event.true_rating {
                let err = (est.r_tilde - y).abs();
                acc.errors.push(err);
                acc.by_version.entry(est.persona.version).or_default().push(err);
                all_errors.push(err);
            }
            for (critic, alpha) in &est.weights_used {
                alphas.entry(critic.clone()).or_default().push(*alpha);
            }
        }
    }

    let judge_stats: Vec<JudgeStats> = judges
        .into_iter()
        .map(|(id, acc)| {
            let latest_ref = PersonaRef::judge(id.clone(), acc.latest_version);
            let latest_errors = acc
                .by_version
                .get(&acc.latest_version)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            JudgeStats {
                judge_id: id,
                n: acc.errors.len(),
                avg_error: mean(&acc.errors),
                std_error: sample_std(&acc.errors),
                predictions: acc.predictions,
                latest: version_stats(latest_ref, latest_errors),
            }
        })
        .collect();

    let eligible: Vec<&JudgeStats> = judge_stats
        .iter()
        .filter(|s| s.n >= config.min_samples)
        .collect();
    let best_judge = eligible
        .iter()
        .min_by(|a, b| a.avg_error.total_cmp(&b.avg_error))
        .map(|s| s.judge_id.clone());
    let worst_judge = eligible
        .iter()
        .max_by(|a, b| a.avg_error.total_cmp(&b.avg_error))
        .map(|s| s.judge_id.clone());

    let replacement = judge_stats
        .iter()
        .map(|s| &s.latest)
        .filter(|v| v.n >= config.min_samples)
        .filter(|v| v.avg_error > config.error_threshold || v.std_error > config.std_threshold)
        .filter(|v| is_active(&v.persona))
        .max_by(|a, b| a.avg_error.total_cmp(&b.avg_error))
        .map(|v| directive_for(v, config));

    let critic_trust: BTreeMap<String, CriticTrust> = alphas
        .into_iter()
        .map(|(critic, values)| {
            let trust = CriticTrust {
                critic_id: critic.clone(),
                avg_alpha: mean(&values),
                samples: values.len(),
            };
            (critic, trust)
        })
        .collect();

    let with_feedback = events.iter().filter(|e| e.has_feedback()).count();
    let overall_avg_error = mean(&all_errors);
    let overall_std_error = sample_std(&all_errors);
    let recommendations = recommendations::generate(
        &judge_stats,
        &critic_trust,
        (!all_errors.is_empty()).then_some(overall_avg_error),
        replacement.as_ref(),
    );

    ReviewReport {
        generated_at: Utc::now(),
        window_size: events.len(),
        with_feedback,
        judge_stats,
        overall_avg_error,
        overall_std_error,
        best_judge,
        worst_judge,
        critic_trust,
        quality: prediction_quality(events),
        recommendations,
        replacement,
    }
}

fn directive_for(stats: &VersionStats, config: &ReviewerConfig) -> ReplacementDirective {
    let reason = if stats.avg_error > config.error_threshold {
        format!(
            "average error {:.3} exceeds {:.3} over {} samples",
            stats.avg_error, config.error_threshold, stats.n
        )
    } else {
        format!(
            "error std {:.3} exceeds {:.3} over {} samples",
            stats.std_error, config.std_threshold, stats.n
        )
    };
    ReplacementDirective {
        old_persona: stats.persona.clone(),
        new_version: stats.persona.version + 1,
        reason,
        evidence: stats.clone(),
        issued_at: Utc::now(),
    }
}
