//! Bounded in-process event log.

use std::collections::{HashMap, VecDeque};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tribunal_core::errors::{FeedbackError, StorageError, TribunalResult};
use tribunal_core::models::PredictionEvent;
use tribunal_core::traits::IEventLog;

use crate::record_feedback;

#[derive(Default)]
struct Inner {
    order: VecDeque<String>,
    events: HashMap<String, PredictionEvent>,
}

/// Keeps the most recent `retention` events; older ones are pruned on append.
pub struct InMemoryEventLog {
    inner: RwLock<Inner>,
    retention: usize,
}

impl InMemoryEventLog {
    pub fn new(retention: usize) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            retention: retention.max(1),
        }
    }

    fn read(&self) -> TribunalResult<RwLockReadGuard<'_, Inner>> {
        self.inner.read().map_err(|_| StorageError::LockPoisoned.into())
    }

    fn write(&self) -> TribunalResult<RwLockWriteGuard<'_, Inner>> {
        self.inner.write().map_err(|_| StorageError::LockPoisoned.into())
    }
}

impl Default for InMemoryEventLog {
    fn default() -> Self {
        Self::new(tribunal_core::config::defaults::DEFAULT_RETENTION_EVENTS)
    }
}

impl IEventLog for InMemoryEventLog {
    fn append(&self, event: &PredictionEvent) -> TribunalResult<()> {
        let mut inner = self.write()?;
        if inner.events.contains_key(&event.event_id) {
            return Err(StorageError::DuplicateEvent {
                event_id: event.event_id.clone(),
            }
            .into());
        }
        inner.order.push_back(event.event_id.clone());
        inner.events.insert(event.event_id.clone(), event.clone());
        while inner.order.len() > self.retention {
            if let Some(old) = inner.order.pop_front() {
                inner.events.remove(&old);
            }
        }
        Ok(())
    }

    fn read_window(&self, n: usize) -> TribunalResult<Vec<PredictionEvent>> {
        let inner = self.read()?;
        let skip = inner.order.len().saturating_sub(n);
        Ok(inner
            .order
            .iter()
            .skip(skip)
            .filter_map(|id| inner.events.get(id).cloned())
            .collect())
    }

    fn get(&self, event_id: &str) -> TribunalResult<Option<PredictionEvent>> {
        Ok(self.read()?.events.get(event_id).cloned())
    }

    fn attach_feedback(&self, event_id: &str, true_rating: f64) -> TribunalResult<PredictionEvent> {
        let mut inner = self.write()?;
        let event = inner
            .events
            .get_mut(event_id)
            .ok_or_else(|| FeedbackError::UnknownEvent {
                event_id: event_id.to_string(),
            })?;
        record_feedback(event, true_rating)?;
        Ok(event.clone())
    }

    fn len(&self) -> TribunalResult<usize> {
        Ok(self.read()?.order.len())
    }
}
