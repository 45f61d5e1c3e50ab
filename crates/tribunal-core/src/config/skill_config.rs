use serde::{Deserialize, Serialize};

use super::defaults;

/// Skill tracking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillConfig {
    /// EMA decay `λ ∈ (0, 1)`; higher keeps more history.
    pub decay: f64,
    /// Error assumed for personas without samples.
    pub neutral_error: f64,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            decay: defaults::DEFAULT_SKILL_DECAY,
            neutral_error: defaults::DEFAULT_NEUTRAL_ERROR,
        }
    }
}
