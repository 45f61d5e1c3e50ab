use serde::{Deserialize, Serialize};

use super::defaults;

/// Request orchestration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Per-critic timeout for opinion generation.
    pub critic_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            critic_timeout_ms: defaults::DEFAULT_CRITIC_TIMEOUT_MS,
        }
    }
}
