/// Calibrator input errors. Surfaced to the caller, never defaulted.
#[derive(Debug, thiserror::Error)]
pub enum CalibrationError {
    #[error("feature vector has {actual} context features, expected {expected}")]
    InvalidFeatures { expected: usize, actual: usize },

    #[error("feature {index} is not finite: {value}")]
    NonFiniteFeature { index: usize, value: f64 },

    #[error("stored feature vector has {actual} entries, calibrator expects {expected}")]
    FeatureDimensionMismatch { expected: usize, actual: usize },
}
