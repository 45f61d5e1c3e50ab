//! Concurrent per-persona accuracy, one DashMap entry per persona version.

use dashmap::DashMap;

use tribunal_core::config::SkillConfig;
use tribunal_core::errors::SkillError;
use tribunal_core::models::{SkillEstimate, SkillView};
use tribunal_core::persona::PersonaRef;

use crate::record::SkillRecord;

/// Thread-safe skill tracker. Updates lock only the entry being modified.
pub struct SkillTracker {
    records: DashMap<PersonaRef, SkillRecord>,
    decay: f64,
    neutral_error: f64,
}

impl SkillTracker {
    pub fn new(config: &SkillConfig) -> Self {
        Self {
            records: DashMap::new(),
            decay: config.decay,
            neutral_error: config.neutral_error,
        }
    }

    /// Record one signed error for `persona`.
    pub fn record(&self, persona: &PersonaRef, error: f64) -> Result<SkillEstimate, SkillError> {
        if !error.is_finite() {
            return Err(SkillError::NonFiniteError {
                persona: persona.to_string(),
                value: error,
            });
        }
        let mut entry = self
            .records
            .entry(persona.clone())
            .or_insert_with(|| SkillRecord::new(persona.clone()));
        entry.apply(error, self.decay);
        let estimate = entry.estimate(self.neutral_error);
        drop(entry);

        tracing::trace!(
            persona = %persona,
            n = estimate.n,
            ema_error = estimate.ema_error,
            "skill updated"
        );
        Ok(estimate)
    }

    /// Current estimate; neutral prior when `persona` has no samples.
    pub fn query(&self, persona: &PersonaRef) -> SkillEstimate {
        self.records
            .get(persona)
            .map(|r| r.estimate(self.neutral_error))
            .unwrap_or_else(|| SkillEstimate::prior(persona.clone(), self.neutral_error))
    }

    /// Insert an explicit zero-sample record. Existing records are kept.
    pub fn register(&self, persona: &PersonaRef) {
        self.records
            .entry(persona.clone())
            .or_insert_with(|| SkillRecord::new(persona.clone()));
    }

    pub fn is_registered(&self, persona: &PersonaRef) -> bool {
        self.records.contains_key(persona)
    }

    /// All records (cloned), sorted by persona.
    pub fn snapshot(&self) -> Vec<SkillRecord> {
        let mut out: Vec<SkillRecord> = self.records.iter().map(|r| r.value().clone()).collect();
        out.sort_by(|a, b| a.persona.cmp(&b.persona));
        out
    }

    /// Read-only view over the given personas, as consumed by judges.
    pub fn critic_view<'a, I>(&self, personas: I) -> SkillView
    where
        I: IntoIterator<Item = &'a PersonaRef>,
    {
        let mut view = SkillView::new(self.neutral_error);
        for persona in personas {
            view.insert(self.query(persona));
        }
        view
    }

    pub fn neutral_error(&self) -> f64 {
        self.neutral_error
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for SkillTracker {
    fn default() -> Self {
        Self::new(&SkillConfig::default())
    }
}
