/// Prediction event state machine violations.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("invalid event transition {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}
