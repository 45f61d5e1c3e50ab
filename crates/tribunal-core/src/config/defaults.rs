// Single source of truth for all default values.

// --- Rating scale ---
pub const DEFAULT_MAX_RATING: f64 = 5.0;
pub const DEFAULT_NEUTRAL_RATING: f64 = 3.0;

// --- Router ---
pub const DEFAULT_CRITICS_PER_REQUEST: usize = 4;
pub const DEFAULT_JUDGES_PER_REQUEST: usize = 1;
pub const DEFAULT_EPSILON_START: f64 = 0.2;
pub const DEFAULT_EPSILON_MIN: f64 = 0.02;
pub const DEFAULT_EPSILON_DECAY_REQUESTS: f64 = 500.0;
pub const DEFAULT_ROUTER_MIN_SAMPLES: u64 = 3;
pub const DEFAULT_ROUTER_VALUE_DECAY: f64 = 0.9;
pub const DEFAULT_CONFIDENCE_BIAS: f64 = 0.1;

// --- Skill tracking ---
pub const DEFAULT_SKILL_DECAY: f64 = 0.9;
pub const DEFAULT_NEUTRAL_ERROR: f64 = 1.0;

// --- Aggregation ---
pub const DEFAULT_OUTLIER_CUTOFF: f64 = 2.5;
pub const DEFAULT_OUTLIER_FLOOR: f64 = 0.25;

// --- Calibrator ---
pub const DEFAULT_LEARNING_RATE: f64 = 0.01;
pub const DEFAULT_L2: f64 = 1e-4;
pub const DEFAULT_PRIOR_SIGMA: f64 = 0.75;
pub const DEFAULT_MIN_SIGMA: f64 = 0.1;
pub const DEFAULT_VARIANCE_DECAY: f64 = 0.95;
pub const DEFAULT_DISAGREEMENT_CAP: f64 = 1.0;
pub const DEFAULT_DEGRADED_INFLATION: f64 = 2.5;
pub const DEFAULT_SHORTFALL_INFLATION: f64 = 1.5;
pub const DEFAULT_MIN_JUDGES: usize = 1;
pub const DEFAULT_CONTEXT_DIMS: usize = 0;
pub const DEFAULT_APPLIED_CAPACITY: usize = 10_000;

// --- Reviewer ---
pub const DEFAULT_REVIEW_MIN_SAMPLES: usize = 3;
pub const DEFAULT_ERROR_THRESHOLD: f64 = 1.0;
pub const DEFAULT_STD_THRESHOLD: f64 = 1.0;
pub const DEFAULT_REVIEW_WINDOW: usize = 200;
pub const DEFAULT_REVIEW_INTERVAL: u64 = 5;
pub const DEFAULT_REVIEW_HISTORY: usize = 20;

// --- Engine ---
pub const DEFAULT_CRITIC_TIMEOUT_MS: u64 = 10_000;

// --- Storage ---
pub const DEFAULT_STORAGE_BACKEND: &str = "memory";
pub const DEFAULT_DB_FILENAME: &str = "tribunal.db";
pub const DEFAULT_RETENTION_EVENTS: usize = 10_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
