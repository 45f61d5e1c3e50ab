//! Configuration system for Tribunal.
//! TOML-based: file > `TRIBUNAL_*` environment overrides > compiled defaults.

pub mod aggregation_config;
pub mod calibrator_config;
pub mod defaults;
pub mod engine_config;
pub mod observability_config;
pub mod rating_config;
pub mod reviewer_config;
pub mod router_config;
pub mod skill_config;
pub mod storage_config;
pub mod tribunal_config;

pub use aggregation_config::AggregationConfig;
pub use calibrator_config::CalibratorConfig;
pub use engine_config::EngineConfig;
pub use observability_config::ObservabilityConfig;
pub use rating_config::RatingConfig;
pub use reviewer_config::ReviewerConfig;
pub use router_config::RouterConfig;
pub use skill_config::SkillConfig;
pub use storage_config::StorageConfig;
pub use tribunal_config::TribunalConfig;
