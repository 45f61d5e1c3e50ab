//! # tribunal-storage
//!
//! Implementations of the storage-side traits from `tribunal-core`:
//! event logs, the persona store, and replacement sinks.

pub mod memory;
pub mod migrations;
pub mod persona_store;
pub mod pragmas;
pub mod sinks;
pub mod sqlite;

use std::path::Path;
use std::sync::Arc;

use tribunal_core::config::StorageConfig;
use tribunal_core::errors::{FeedbackError, StorageError, TribunalError, TribunalResult};
use tribunal_core::models::{EventStage, PredictionEvent};
use tribunal_core::traits::IEventLog;

pub use memory::InMemoryEventLog;
pub use persona_store::InMemoryPersonaStore;
pub use sinks::{CollectingReplacementSink, NoopReplacementSink};
pub use sqlite::SqliteEventLog;

/// Convert a storage failure message into a [`TribunalError`].
pub fn to_storage_err(message: impl Into<String>) -> TribunalError {
    TribunalError::Storage(StorageError::SqliteError {
        message: message.into(),
    })
}

/// Attach `rating` to `event`, moving it through `FeedbackReceived` to `Updated`.
pub(crate) fn record_feedback(event: &mut PredictionEvent, rating: f64) -> TribunalResult<()> {
    if event.has_feedback() {
        return Err(FeedbackError::DuplicateFeedback {
            event_id: event.event_id.clone(),
        }
        .into());
    }
    event.stage.advance(EventStage::FeedbackReceived)?;
    event.stage.advance(EventStage::Updated)?;
    event.true_rating = Some(rating);
    Ok(())
}

/// Open the event log selected by `config.backend`.
pub fn open_event_log(config: &StorageConfig) -> TribunalResult<Arc<dyn IEventLog>> {
    match config.backend.as_str() {
        "sqlite" => Ok(Arc::new(SqliteEventLog::open(
            Path::new(&config.db_path),
            config.retention_events,
        )?)),
        _ => Ok(Arc::new(InMemoryEventLog::new(config.retention_events))),
    }
}
