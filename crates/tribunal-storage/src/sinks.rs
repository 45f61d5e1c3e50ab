//! Replacement sinks: where directives go once the router has switched over.

use std::sync::Mutex;

use tribunal_core::errors::{StorageError, TribunalResult};
use tribunal_core::models::ReplacementDirective;
use tribunal_core::traits::IReplacementSink;

/// Drops directives after logging them.
#[derive(Debug, Default)]
pub struct NoopReplacementSink;

impl IReplacementSink for NoopReplacementSink {
    fn submit(&self, directive: &ReplacementDirective) -> TribunalResult<()> {
        tracing::debug!(
            persona = %directive.old_persona,
            new_version = directive.new_version,
            "replacement directive discarded"
        );
        Ok(())
    }
}

/// Keeps every directive it receives.
#[derive(Debug, Default)]
pub struct CollectingReplacementSink {
    directives: Mutex<Vec<ReplacementDirective>>,
}

impl CollectingReplacementSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn directives(&self) -> Vec<ReplacementDirective> {
        self.directives
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }
}

impl IReplacementSink for CollectingReplacementSink {
    fn submit(&self, directive: &ReplacementDirective) -> TribunalResult<()> {
        self.directives
            .lock()
            .map_err(|_| StorageError::LockPoisoned)?
            .push(directive.clone());
        Ok(())
    }
}
