//! Accuracy of the final calibrated predictions.

use std::collections::BTreeMap;

use tribunal_core::models::{GenreError, PredictionEvent, PredictionQuality};

use crate::stats::mean;

/// Quality over the events that carry a true rating.
pub fn prediction_quality(events: &[PredictionEvent]) -> PredictionQuality {
    let rated: Vec<(&PredictionEvent, f64)> = events
        .iter()
        .filter_map(|e| e.true_rating.map(|y| (e, y)))
        .collect();
    if rated.is_empty() {
        return PredictionQuality::default();
    }

    let errors: Vec<f64> = rated.iter().map(|(e, y)| (e.yhat - y).abs()).collect();
    let covered = rated
        .iter()
        .filter(|(e, y)| (e.yhat - y).abs() <= e.sigma)
        .count();
    let degraded = rated.iter().filter(|(e, _)| e.degraded).count();

    let mut per_genre: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for ((event, _), err) in rated.iter().zip(&errors) {
        for genre in &event.request.item.genres {
            per_genre
                .entry(genre.trim().to_lowercase())
                .or_default()
                .push(*err);
        }
    }

    let n = rated.len() as f64;
    PredictionQuality {
        count: rated.len(),
        mae: mean(&errors),
        rmse: (errors.iter().map(|e| e * e).sum::<f64>() / n).sqrt(),
        max_error: errors.iter().copied().fold(f64::MIN, f64::max),
        min_error: errors.iter().copied().fold(f64::MAX, f64::min),
        avg_predicted: rated.iter().map(|(e, _)| e.yhat).sum::<f64>() / n,
        avg_true: rated.iter().map(|(_, y)| y).sum::<f64>() / n,
        sigma_coverage: covered as f64 / n,
        degraded_fraction: degraded as f64 / n,
        by_genre: per_genre
            .into_iter()
            .map(|(genre, errs)| GenreError {
                genre,
                avg_error: mean(&errs),
                count: errs.len(),
            })
            .collect(),
    }
}
