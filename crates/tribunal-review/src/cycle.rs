//! One review pass wired to the log, the router and the persona store.

use std::sync::Mutex;

use tribunal_core::config::ReviewerConfig;
use tribunal_core::errors::TribunalResult;
use tribunal_core::models::{CalibratorSuggestion, ReviewReport};
use tribunal_core::persona::PersonaRef;
use tribunal_core::traits::{IEventLog, IPersonaStore, IReplacementSink};
use tribunal_routing::Router;

use crate::history::ReviewHistory;
use crate::reviewer::run_review_filtered;

#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub report: ReviewReport,
    /// The persona version activated by this cycle, if any.
    pub replaced: Option<PersonaRef>,
    pub suggestions: Vec<CalibratorSuggestion>,
}

pub struct ReviewCycle {
    config: ReviewerConfig,
    history: Mutex<ReviewHistory>,
}

impl ReviewCycle {
    pub fn new(config: ReviewerConfig) -> Self {
        let history = ReviewHistory::new(config.history_limit);
        Self {
            config,
            history: Mutex::new(history),
        }
    }

    /// Review the latest window and apply the replacement, if one is due.
    ///
    /// The new version is created by `store`, swapped into `router`
    /// atomically, then handed to `sink`. A sink failure is logged and does
    /// not undo the swap.
    pub fn run(
        &self,
        log: &dyn IEventLog,
        router: &Router,
        store: &dyn IPersonaStore,
        sink: &dyn IReplacementSink,
    ) -> TribunalResult<ReviewOutcome> {
        let events = log.read_window(self.config.window_size)?;
        let registry = router.registry();
        let report = run_review_filtered(&events, &self.config, |p| registry.is_active(p));

        let mut replaced = None;
        if let Some(directive) = &report.replacement {
            let persona = store.register_new_version(&directive.old_persona.id, directive.new_version)?;
            router.apply_replacement(directive, persona)?;
            replaced = Some(directive.new_persona());
            if let Err(e) = sink.submit(directive) {
                tracing::warn!(
                    persona = %directive.old_persona,
                    error = %e,
                    "replacement sink rejected directive"
                );
            }
        }

        tracing::debug!(
            window = report.window_size,
            with_feedback = report.with_feedback,
            overall_error = report.overall_avg_error,
            worst = ?report.worst_judge,
            replaced = ?replaced.as_ref().map(|p| p.to_string()),
            "review completed"
        );

        let suggestions = {
            let mut history = self.history.lock().unwrap_or_else(|e| e.into_inner());
            history.push(report.clone());
            history.suggestions()
        };

        Ok(ReviewOutcome {
            report,
            replaced,
            suggestions,
        })
    }

    pub fn history(&self) -> ReviewHistory {
        self.history.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn config(&self) -> &ReviewerConfig {
        &self.config
    }
}
