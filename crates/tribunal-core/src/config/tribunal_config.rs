//! Top-level Tribunal configuration.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{
    AggregationConfig, CalibratorConfig, EngineConfig, ObservabilityConfig, RatingConfig,
    ReviewerConfig, RouterConfig, SkillConfig, StorageConfig,
};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`TRIBUNAL_*`)
/// 2. Config file passed to [`TribunalConfig::load`]
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TribunalConfig {
    pub rating: RatingConfig,
    pub router: RouterConfig,
    pub skill: SkillConfig,
    pub aggregation: AggregationConfig,
    pub calibrator: CalibratorConfig,
    pub reviewer: ReviewerConfig,
    pub engine: EngineConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

impl TribunalConfig {
    /// Load configuration from `path` (if it exists), apply environment
    /// overrides, and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content =
                std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })?;
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string. Missing keys take defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    /// Apply environment variable overrides.
    /// Pattern: `TRIBUNAL_<SECTION>_<FIELD>`. Unparseable values are ignored.
    pub fn apply_env_overrides(&mut self) {
        env_override("TRIBUNAL_ROUTER_CRITICS_PER_REQUEST", &mut self.router.critics_per_request);
        env_override("TRIBUNAL_ROUTER_JUDGES_PER_REQUEST", &mut self.router.judges_per_request);
        env_override("TRIBUNAL_ROUTER_EPSILON_START", &mut self.router.epsilon_start);
        env_override("TRIBUNAL_ROUTER_EPSILON_MIN", &mut self.router.epsilon_min);
        env_override("TRIBUNAL_SKILL_DECAY", &mut self.skill.decay);
        env_override("TRIBUNAL_CALIBRATOR_LEARNING_RATE", &mut self.calibrator.learning_rate);
        env_override("TRIBUNAL_REVIEWER_MIN_SAMPLES", &mut self.reviewer.min_samples);
        env_override("TRIBUNAL_REVIEWER_ERROR_THRESHOLD", &mut self.reviewer.error_threshold);
        env_override("TRIBUNAL_REVIEWER_STD_THRESHOLD", &mut self.reviewer.std_threshold);
        env_override("TRIBUNAL_REVIEWER_WINDOW_SIZE", &mut self.reviewer.window_size);
        env_override("TRIBUNAL_ENGINE_CRITIC_TIMEOUT_MS", &mut self.engine.critic_timeout_ms);
        env_override("TRIBUNAL_STORAGE_BACKEND", &mut self.storage.backend);
        env_override("TRIBUNAL_STORAGE_DB_PATH", &mut self.storage.db_path);
        env_override("TRIBUNAL_LOG_LEVEL", &mut self.observability.log_level);
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.rating;
        check(r.max_rating.is_finite() && r.max_rating > 0.0, "rating.max_rating", "must be a positive number")?;
        check(
            (0.0..=r.max_rating).contains(&r.neutral_rating),
            "rating.neutral_rating",
            "must lie within [0, max_rating]",
        )?;

        let rt = &self.router;
        check(rt.critics_per_request > 0, "router.critics_per_request", "must be greater than 0")?;
        check(rt.judges_per_request > 0, "router.judges_per_request", "must be greater than 0")?;
        check(unit(rt.epsilon_start), "router.epsilon_start", "must be between 0.0 and 1.0")?;
        check(
            unit(rt.epsilon_min) && rt.epsilon_min <= rt.epsilon_start,
            "router.epsilon_min",
            "must be between 0.0 and epsilon_start",
        )?;
        check(rt.epsilon_decay_requests > 0.0, "router.epsilon_decay_requests", "must be greater than 0")?;
        check(open_unit(rt.value_decay), "router.value_decay", "must be strictly between 0.0 and 1.0")?;
        check(rt.confidence_bias.is_finite() && rt.confidence_bias >= 0.0, "router.confidence_bias", "must be non-negative")?;

        check(open_unit(self.skill.decay), "skill.decay", "must be strictly between 0.0 and 1.0")?;
        check(self.skill.neutral_error >= 0.0, "skill.neutral_error", "must be non-negative")?;

        check(self.aggregation.outlier_cutoff > 0.0, "aggregation.outlier_cutoff", "must be greater than 0")?;
        check(self.aggregation.outlier_floor > 0.0, "aggregation.outlier_floor", "must be greater than 0")?;

        let c = &self.calibrator;
        check(c.learning_rate > 0.0 && c.learning_rate.is_finite(), "calibrator.learning_rate", "must be greater than 0")?;
        check(c.l2 >= 0.0, "calibrator.l2", "must be non-negative")?;
        check(c.prior_sigma > 0.0, "calibrator.prior_sigma", "must be greater than 0")?;
        check(c.min_sigma > 0.0, "calibrator.min_sigma", "must be greater than 0")?;
        check(open_unit(c.variance_decay), "calibrator.variance_decay", "must be strictly between 0.0 and 1.0")?;
        check(c.disagreement_cap >= 0.0, "calibrator.disagreement_cap", "must be non-negative")?;
        check(
            c.degraded_inflation > 1.0 + c.disagreement_cap,
            "calibrator.degraded_inflation",
            "must exceed 1 + disagreement_cap",
        )?;
        check(c.shortfall_inflation >= 1.0, "calibrator.shortfall_inflation", "must be at least 1.0")?;
        check(c.min_judges > 0, "calibrator.min_judges", "must be greater than 0")?;
        check(c.applied_capacity > 0, "calibrator.applied_capacity", "must be greater than 0")?;

        let rv = &self.reviewer;
        check(rv.min_samples > 0, "reviewer.min_samples", "must be greater than 0")?;
        check(rv.error_threshold > 0.0, "reviewer.error_threshold", "must be greater than 0")?;
        check(rv.std_threshold > 0.0, "reviewer.std_threshold", "must be greater than 0")?;
        check(rv.window_size > 0, "reviewer.window_size", "must be greater than 0")?;

        check(self.engine.critic_timeout_ms > 0, "engine.critic_timeout_ms", "must be greater than 0")?;

        check(
            matches!(self.storage.backend.as_str(), "memory" | "sqlite"),
            "storage.backend",
            "must be \"memory\" or \"sqlite\"",
        )?;
        check(self.storage.retention_events > 0, "storage.retention_events", "must be greater than 0")?;
        Ok(())
    }
}

fn env_override<T: FromStr>(key: &str, target: &mut T) {
    if let Ok(val) = std::env::var(key) {
        if let Ok(v) = val.parse::<T>() {
            *target = v;
        }
    }
}

fn check(ok: bool, field: &str, message: &str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::ValidationFailed {
            field: field.to_string(),
            message: message.to_string(),
        })
    }
}

fn unit(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}

fn open_unit(v: f64) -> bool {
    v > 0.0 && v < 1.0
}
