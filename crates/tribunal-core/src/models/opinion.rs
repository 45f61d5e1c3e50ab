use serde::{Deserialize, Serialize};

use crate::persona::PersonaRef;

/// One critic's view of a (user, item) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opinion {
    pub persona: PersonaRef,
    /// Score in `[0, max_rating]`.
    pub score: f64,
    /// Self-reported confidence in `[0, 1]`.
    pub confidence: f64,
    pub rationale: String,
}

impl Opinion {
    /// Build an opinion, clamping score and confidence into range.
    /// Non-finite inputs fall back to `max_rating / 2` and zero confidence.
    pub fn new(
        persona: PersonaRef,
        score: f64,
        confidence: f64,
        rationale: impl Into<String>,
        max_rating: f64,
    ) -> Self {
        let score = if score.is_finite() {
            score.clamp(0.0, max_rating)
        } else {
            max_rating / 2.0
        };
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            persona,
            score,
            confidence,
            rationale: rationale.into(),
        }
    }
}

/// Why a critic produced no opinion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Timeout,
    Generation,
}

/// A critic call that was absorbed at the aggregation boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticFailure {
    pub persona: PersonaRef,
    pub kind: FailureKind,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_values() {
        let op = Opinion::new(PersonaRef::critic("c", 0), 7.5, 1.4, "", 5.0);
        assert_eq!(op.score, 5.0);
        assert_eq!(op.confidence, 1.0);

        let op = Opinion::new(PersonaRef::critic("c", 0), -1.0, -0.2, "", 5.0);
        assert_eq!(op.score, 0.0);
        assert_eq!(op.confidence, 0.0);
    }

    #[test]
    fn non_finite_score_falls_back_to_scale_midpoint() {
        let op = Opinion::new(PersonaRef::critic("c", 0), f64::NAN, f64::NAN, "", 5.0);
        assert_eq!(op.score, 2.5);
        assert_eq!(op.confidence, 0.0);

        let op = Opinion::new(PersonaRef::critic("c", 0), f64::INFINITY, 0.5, "", 10.0);
        assert_eq!(op.score, 5.0);
    }
}
