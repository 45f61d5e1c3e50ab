use std::fmt;

use serde::{Deserialize, Serialize};

/// How a judge turns critic skill and opinion confidence into trust weights.
///
/// The weighting math lives in `tribunal-aggregation`; the strategy is part
/// of the judge's identity so it is carried across replacements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationStrategy {
    /// Trust is driven mostly by the critic's tracked accuracy.
    SkillDominant,
    /// Trust is driven mostly by the critic's self-reported confidence.
    ConfidenceDominant,
    /// Skill and confidence contribute equally.
    Balanced,
    /// Equal weights, with scores far from the median down-weighted.
    UniformOutlierDownweight,
}

impl AggregationStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SkillDominant => "skill_dominant",
            Self::ConfidenceDominant => "confidence_dominant",
            Self::Balanced => "balanced",
            Self::UniformOutlierDownweight => "uniform_outlier_downweight",
        }
    }
}

impl fmt::Display for AggregationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
