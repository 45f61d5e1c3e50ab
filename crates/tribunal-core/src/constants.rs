/// Tribunal system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of calibration features derived from opinions and judge estimates,
/// before any caller-supplied context features are appended.
pub const BASE_FEATURE_DIMS: usize = 8;

/// Lower bound applied to critic confidence before it enters a weight.
pub const MIN_CONFIDENCE_WEIGHT: f64 = 1e-3;

/// Floating tolerance used when checking that trust weights sum to one.
pub const ALPHA_SUM_TOLERANCE: f64 = 1e-9;

/// Context key used for requests that carry no genre.
pub const WILDCARD_CONTEXT: &str = "*";

/// Scale factor turning a median absolute deviation into a normal-consistent spread.
pub const MAD_SCALE: f64 = 1.4826;

/// Floor for the calibrator learning rate when reviews keep lowering it.
pub const MIN_LEARNING_RATE: f64 = 1e-4;
