/// Failures reported by the external opinion source for a single critic.
///
/// These are always recoverable: the aggregator treats them as "no opinion".
#[derive(Debug, Clone, thiserror::Error)]
pub enum OpinionError {
    #[error("critic {persona} timed out after {timeout_ms}ms")]
    Timeout { persona: String, timeout_ms: u64 },

    #[error("critic {persona} failed to generate an opinion: {reason}")]
    Generation { persona: String, reason: String },
}
