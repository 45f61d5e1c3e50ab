use std::collections::BTreeMap;

use tribunal_core::config::{AggregationConfig, RatingConfig};
use tribunal_core::models::{JudgeEstimate, Opinion, SkillView};
use tribunal_core::persona::JudgePersona;

use crate::weights::{normalize, raw_weights};

/// Applies each judge's strategy to a set of critic opinions.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    rating: RatingConfig,
    config: AggregationConfig,
}

impl Aggregator {
    pub fn new(rating: RatingConfig, config: AggregationConfig) -> Self {
        Self { rating, config }
    }

    /// One judge's estimate. Only critics present in `opinions` get weight.
    /// With no opinions the judge emits the neutral rating, flagged degraded.
    pub fn aggregate(
        &self,
        judge: &JudgePersona,
        opinions: &[Opinion],
        skills: &SkillView,
    ) -> JudgeEstimate {
        if opinions.is_empty() {
            tracing::debug!(judge = %judge.persona_ref(), "no opinions, degraded estimate");
            return JudgeEstimate {
                persona: judge.persona_ref(),
                strategy: judge.strategy,
                r_tilde: self.rating.neutral_rating,
                weights_used: BTreeMap::new(),
                flagged: Vec::new(),
                degraded: true,
            };
        }

        let raw = raw_weights(judge.strategy, opinions, skills, &self.config);
        let alpha = normalize(&raw.raw);

        let mut weights_used: BTreeMap<String, f64> = BTreeMap::new();
        let mut r_tilde = 0.0;
        for (op, a) in opinions.iter().zip(&alpha) {
            *weights_used.entry(op.persona.to_string()).or_insert(0.0) += a;
            r_tilde += a * op.score;
        }
        let flagged = raw
            .flagged
            .iter()
            .map(|&i| opinions[i].persona.to_string())
            .collect();

        JudgeEstimate {
            persona: judge.persona_ref(),
            strategy: judge.strategy,
            r_tilde: r_tilde.clamp(0.0, self.rating.max_rating),
            weights_used,
            flagged,
            degraded: false,
        }
    }

    /// Estimates for every judge, in judge order.
    pub fn synthesize(
        &self,
        judges: &[JudgePersona],
        opinions: &[Opinion],
        skills: &SkillView,
    ) -> Vec<JudgeEstimate> {
        judges
            .iter()
            .map(|judge| self.aggregate(judge, opinions, skills))
            .collect()
    }
}
