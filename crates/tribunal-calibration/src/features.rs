//! Calibrator input features.
//!
//! Layout: `[s_mean, s_std, c_mean, c_std, j_mean, j_std, skill_mean,
//! genre_hash, context...]`. Empty inputs contribute zeros.

use tribunal_core::constants::BASE_FEATURE_DIMS;
use tribunal_core::errors::CalibrationError;
use tribunal_core::models::{JudgeEstimate, Opinion, SkillView};

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub values: Vec<f64>,
    /// `0.5 · (critic score std + judge estimate std)`.
    pub disagreement: f64,
}

/// Stable scalar in `[0, 1)` for a genre bucket key.
pub fn genre_hash(context_key: &str) -> f64 {
    let digest = blake3::hash(context_key.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest.as_bytes()[..8]);
    // 2^64 as f64; the quotient can round up to 1.0 for the largest values.
    let h = u64::from_le_bytes(head) as f64 / 18_446_744_073_709_551_616.0;
    if h >= 1.0 {
        0.0
    } else {
        h
    }
}

fn mean_std(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let values: Vec<f64> = values.collect();
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, var.sqrt())
}

pub fn featurize(
    estimates: &[JudgeEstimate],
    opinions: &[Opinion],
    context_key: &str,
    context_features: &[f64],
    skills: &SkillView,
    context_dims: usize,
) -> Result<FeatureVector, CalibrationError> {
    if context_features.len() != context_dims {
        return Err(CalibrationError::InvalidFeatures {
            expected: BASE_FEATURE_DIMS + context_dims,
            actual: BASE_FEATURE_DIMS + context_features.len(),
        });
    }
    if let Some((i, v)) = context_features
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite())
    {
        return Err(CalibrationError::NonFiniteFeature {
            index: BASE_FEATURE_DIMS + i,
            value: *v,
        });
    }

    let (s_mean, s_std) = mean_std(opinions.iter().map(|o| o.score));
    let (c_mean, c_std) = mean_std(opinions.iter().map(|o| o.confidence));
    let (j_mean, j_std) = mean_std(estimates.iter().map(|e| e.r_tilde));
    let (skill_mean, _) = mean_std(estimates.iter().map(|e| -skills.get(&e.persona).ema_error));

    let mut values = Vec::with_capacity(BASE_FEATURE_DIMS + context_dims);
    values.extend_from_slice(&[
        s_mean,
        s_std,
        c_mean,
        c_std,
        j_mean,
        j_std,
        skill_mean,
        genre_hash(context_key),
    ]);
    values.extend_from_slice(context_features);

    Ok(FeatureVector {
        values,
        disagreement: 0.5 * (s_std + j_std),
    })
}
