//! Per-strategy critic weighting.
//!
//! | Strategy | raw weight |
//! |---|---|
//! | `SkillDominant` | `trust² · q^0.5` |
//! | `ConfidenceDominant` | `trust^0.5 · q²` |
//! | `Balanced` | `trust · q` |
//! | `UniformOutlierDownweight` | `1 / (1 + (|s - median| / scale)²)` |
//!
//! `trust = 1 / (1 + ema_error)` and `q = max(confidence, 1e-3)`.

use tribunal_core::config::AggregationConfig;
use tribunal_core::constants::{MAD_SCALE, MIN_CONFIDENCE_WEIGHT};
use tribunal_core::models::{Opinion, SkillView};
use tribunal_core::persona::AggregationStrategy;

use crate::stats;

/// Unnormalized weights, index-aligned with the opinions, plus the indices
/// treated as outliers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawWeights {
    pub raw: Vec<f64>,
    pub flagged: Vec<usize>,
}

pub fn raw_weights(
    strategy: AggregationStrategy,
    opinions: &[Opinion],
    skills: &SkillView,
    config: &AggregationConfig,
) -> RawWeights {
    match strategy {
        AggregationStrategy::UniformOutlierDownweight => outlier_weights(opinions, config),
        _ => {
            let raw = opinions
                .iter()
                .map(|op| {
                    let trust = skills.get(&op.persona).trust();
                    let q = op.confidence.max(MIN_CONFIDENCE_WEIGHT);
                    match strategy {
                        AggregationStrategy::SkillDominant => trust.powi(2) * q.sqrt(),
                        AggregationStrategy::ConfidenceDominant => trust.sqrt() * q.powi(2),
                        _ => trust * q,
                    }
                })
                .collect();
            RawWeights {
                raw,
                flagged: Vec::new(),
            }
        }
    }
}

fn outlier_weights(opinions: &[Opinion], config: &AggregationConfig) -> RawWeights {
    let scores: Vec<f64> = opinions.iter().map(|op| op.score).collect();
    let center = stats::median(&scores);
    let scale = (MAD_SCALE * stats::mad(&scores, center)).max(config.outlier_floor);

    let mut flagged = Vec::new();
    let raw = scores
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let dev = (s - center).abs();
            if dev > config.outlier_cutoff * scale {
                flagged.push(i);
            }
            let z = dev / scale;
            1.0 / (1.0 + z * z)
        })
        .collect();
    RawWeights { raw, flagged }
}

/// `alpha = raw / Σ raw`, falling back to uniform when the mass is not positive.
pub fn normalize(raw: &[f64]) -> Vec<f64> {
    if raw.is_empty() {
        return Vec::new();
    }
    let clean: Vec<f64> = raw
        .iter()
        .map(|w| if w.is_finite() && *w > 0.0 { *w } else { 0.0 })
        .collect();
    let total: f64 = clean.iter().sum();
    if total > 0.0 && total.is_finite() {
        clean.iter().map(|w| w / total).collect()
    } else {
        vec![1.0 / raw.len() as f64; raw.len()]
    }
}
