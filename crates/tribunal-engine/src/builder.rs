use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use tribunal_aggregation::Aggregator;
use tribunal_calibration::Calibrator;
use tribunal_core::config::TribunalConfig;
use tribunal_core::persona::{Persona, Role};
use tribunal_core::traits::{IEventLog, IOpinionSource, IPersonaStore, IReplacementSink};
use tribunal_observability::MetricsCollector;
use tribunal_review::ReviewCycle;
use tribunal_routing::{PersonaRegistry, Router};
use tribunal_skill::SkillTracker;
use tribunal_storage::{open_event_log, InMemoryPersonaStore, NoopReplacementSink};

use crate::engine::Engine;
use crate::error::{EngineError, EngineResult};

/// Assembles an [`Engine`] from a config and its collaborators.
///
/// Only the opinion source is mandatory. Missing pieces default to the
/// event log selected by `storage.backend`, an empty in-memory persona
/// store, and a sink that drops directives.
pub struct EngineBuilder {
    config: TribunalConfig,
    opinion_source: Option<Arc<dyn IOpinionSource>>,
    persona_store: Option<Arc<dyn IPersonaStore>>,
    event_log: Option<Arc<dyn IEventLog>>,
    replacement_sink: Option<Arc<dyn IReplacementSink>>,
    metrics: Option<Arc<MetricsCollector>>,
}

impl EngineBuilder {
    pub fn new(config: TribunalConfig) -> Self {
        Self {
            config,
            opinion_source: None,
            persona_store: None,
            event_log: None,
            replacement_sink: None,
            metrics: None,
        }
    }

    pub fn opinion_source(mut self, source: Arc<dyn IOpinionSource>) -> Self {
        self.opinion_source = Some(source);
        self
    }

    pub fn persona_store(mut self, store: Arc<dyn IPersonaStore>) -> Self {
        self.persona_store = Some(store);
        self
    }

    /// Shorthand for an [`InMemoryPersonaStore`] seeded with `personas`.
    pub fn personas(self, personas: impl IntoIterator<Item = Persona>) -> Self {
        self.persona_store(Arc::new(InMemoryPersonaStore::new(personas)))
    }

    pub fn event_log(mut self, log: Arc<dyn IEventLog>) -> Self {
        self.event_log = Some(log);
        self
    }

    pub fn replacement_sink(mut self, sink: Arc<dyn IReplacementSink>) -> Self {
        self.replacement_sink = Some(sink);
        self
    }

    pub fn metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> EngineResult<Engine> {
        self.config.validate()?;

        let opinion_source = self.opinion_source.ok_or(EngineError::MissingComponent {
            component: "opinion source",
        })?;
        let persona_store: Arc<dyn IPersonaStore> = match self.persona_store {
            Some(store) => store,
            None => Arc::new(InMemoryPersonaStore::new(Vec::new())),
        };
        let event_log = match self.event_log {
            Some(log) => log,
            None => open_event_log(&self.config.storage)?,
        };
        let replacement_sink: Arc<dyn IReplacementSink> = match self.replacement_sink {
            Some(sink) => sink,
            None => Arc::new(NoopReplacementSink),
        };

        let mut personas = persona_store.load_active_personas(Role::Critic)?;
        personas.extend(persona_store.load_active_personas(Role::Judge)?);

        let skills = Arc::new(SkillTracker::new(&self.config.skill));
        for persona in &personas {
            skills.register(&persona.persona_ref());
        }
        let registry = PersonaRegistry::new(personas)?;
        tracing::info!(
            personas = registry.len(),
            backend = %self.config.storage.backend,
            "engine initialized"
        );

        let router = Arc::new(Router::new(
            self.config.router.clone(),
            registry,
            Arc::clone(&skills),
        ));
        let calibrator = Arc::new(Calibrator::new(
            self.config.rating.clone(),
            self.config.calibrator.clone(),
        ));
        let aggregator = Aggregator::new(self.config.rating.clone(), self.config.aggregation.clone());
        let review = ReviewCycle::new(self.config.reviewer.clone());

        Ok(Engine {
            config: self.config,
            router,
            skills,
            calibrator,
            aggregator,
            opinion_source,
            event_log,
            persona_store,
            replacement_sink,
            review,
            metrics: self.metrics.unwrap_or_default(),
            feedback_count: AtomicU64::new(0),
        })
    }
}
