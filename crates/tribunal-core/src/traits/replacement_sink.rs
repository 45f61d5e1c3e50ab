use crate::errors::TribunalResult;
use crate::models::ReplacementDirective;

/// Receives replacement directives, e.g. a prompt-authoring service that
/// writes the new judge's instructions.
pub trait IReplacementSink: Send + Sync {
    fn submit(&self, directive: &ReplacementDirective) -> TribunalResult<()>;
}
