//! Bounded record of event ids already folded into the model.

use std::collections::{HashSet, VecDeque};

/// Remembers the most recent `capacity` ids; the oldest is forgotten first.
#[derive(Debug, Clone)]
pub(crate) struct AppliedIds {
    order: VecDeque<String>,
    ids: HashSet<String>,
    capacity: usize,
}

impl AppliedIds {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::new(),
            ids: HashSet::new(),
            capacity,
        }
    }

    pub(crate) fn contains(&self, event_id: &str) -> bool {
        self.ids.contains(event_id)
    }

    pub(crate) fn insert(&mut self, event_id: &str) {
        if self.capacity == 0 || !self.ids.insert(event_id.to_string()) {
            return;
        }
        self.order.push_back(event_id.to_string());
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.ids.remove(&oldest);
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.ids.len()
    }
}
