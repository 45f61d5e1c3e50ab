//! End-to-end tests for the prediction engine with scripted critics.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;

use test_fixtures::{CriticScript, ScriptedOpinionSource};
use tribunal_core::config::TribunalConfig;
use tribunal_core::errors::{OpinionError, StorageError, TribunalResult};
use tribunal_core::models::{
    EventStage, FailureKind, Opinion, PredictionEvent, PredictionRequest, RoutingContext,
};
use tribunal_core::persona::{AggregationStrategy, CriticPersona, Persona, PersonaRef, Role};
use tribunal_core::traits::{IEventLog, IOpinionSource, OpinionRequest};
use tribunal_core::CancellationToken;
use tribunal_engine::{Engine, EngineError};
use tribunal_storage::{CollectingReplacementSink, InMemoryEventLog};

fn test_config() -> TribunalConfig {
    let mut config = TribunalConfig::default();
    config.router.seed = Some(7);
    config.router.epsilon_start = 0.0;
    config.router.epsilon_min = 0.0;
    config.router.critics_per_request = 2;
    config.router.judges_per_request = 1;
    config.engine.critic_timeout_ms = 200;
    config.reviewer.review_interval = 0;
    config
}

fn personas(judge: AggregationStrategy) -> Vec<Persona> {
    vec![
        Persona::critic("a"),
        Persona::critic("b"),
        Persona::judge("j", judge),
    ]
}

fn engine_with(config: TribunalConfig, source: Arc<ScriptedOpinionSource>, personas: Vec<Persona>) -> Engine {
    Engine::builder(config)
        .opinion_source(source)
        .personas(personas)
        .build()
        .unwrap()
}

fn drama(user: &str, item: &str) -> PredictionRequest {
    PredictionRequest::new(user, item).with_genres(["Drama"])
}

#[tokio::test]
async fn accurate_critic_outranks_inaccurate_one() {
    let source = Arc::new(
        ScriptedOpinionSource::new(5.0)
            .with_script("a", CriticScript::Offset { bias: 0.1, confidence: 0.8, fallback: 3.0 })
            .with_script("b", CriticScript::Offset { bias: -2.0, confidence: 0.8, fallback: 3.0 }),
    );
    let engine = engine_with(
        test_config(),
        Arc::clone(&source),
        personas(AggregationStrategy::UniformOutlierDownweight),
    );
    let cancel = CancellationToken::new();

    for round in 0..10 {
        let item = format!("movie-{round}");
        source.set_truth(&item, 4.0);
        let prediction = engine.predict(drama("u1", &item), &cancel).await.unwrap();
        assert_eq!(prediction.critics.len(), 2);
        engine.submit_feedback(&prediction.event_id, 4.0).unwrap();
    }

    let a = engine.skills().query(&PersonaRef::critic("a", 0));
    let b = engine.skills().query(&PersonaRef::critic("b", 0));
    assert_eq!(a.n, 10);
    assert!(a.ema_error < b.ema_error, "a={} b={}", a.ema_error, b.ema_error);

    let ranking = engine
        .router()
        .ranking(&RoutingContext::for_genres(["drama"]), Role::Critic);
    assert_eq!(ranking[0].persona.id, "a");
    assert_eq!(ranking[1].persona.id, "b");

    let snap = engine.metrics().snapshot();
    assert_eq!(snap.predictions, 10);
    assert_eq!(snap.feedback_applied, 10);
}

#[tokio::test]
async fn zero_critics_degrades_and_widens_sigma() {
    let healthy = Arc::new(
        ScriptedOpinionSource::new(5.0)
            .with_script("a", CriticScript::Fixed { score: 3.5, confidence: 0.7 })
            .with_script("b", CriticScript::Fixed { score: 3.5, confidence: 0.7 }),
    );
    let broken = Arc::new(
        ScriptedOpinionSource::new(5.0)
            .with_script("a", CriticScript::Fail { reason: "model offline".into() })
            .with_script("b", CriticScript::Fail { reason: "model offline".into() }),
    );
    let personas = personas(AggregationStrategy::Balanced);
    let ok_engine = engine_with(test_config(), healthy, personas.clone());
    let bad_engine = engine_with(test_config(), broken, personas);
    let cancel = CancellationToken::new();

    let ok = ok_engine.predict(drama("u1", "m1"), &cancel).await.unwrap();
    let bad = bad_engine.predict(drama("u1", "m1"), &cancel).await.unwrap();

    assert!(!ok.degraded);
    assert!(bad.degraded);
    assert!(bad.sigma > ok.sigma);
    assert_eq!(bad.failures.len(), 2);
    assert!(bad.failures.iter().all(|f| f.kind == FailureKind::Generation));

    let event = bad_engine.event(&bad.event_id).unwrap().unwrap();
    assert!(event.opinions.is_empty());
    assert!(event.judge_estimates.iter().all(|e| e.degraded));
    assert_eq!(event.stage, EventStage::Logged);
    assert_eq!(bad_engine.metrics().snapshot().critic_errors, 2);
}

#[tokio::test]
async fn slow_critic_times_out() {
    let source = Arc::new(
        ScriptedOpinionSource::new(5.0)
            .with_script("a", CriticScript::Fixed { score: 4.0, confidence: 0.9 })
            .with_script("b", CriticScript::Slow { delay_ms: 2_000, score: 1.0 }),
    );
    let mut config = test_config();
    config.engine.critic_timeout_ms = 50;
    let engine = engine_with(config, source, personas(AggregationStrategy::Balanced));

    let prediction = engine
        .predict(drama("u1", "m1"), &CancellationToken::new())
        .await
        .unwrap();

    assert!(!prediction.degraded);
    assert_eq!(prediction.failures.len(), 1);
    assert_eq!(prediction.failures[0].persona.id, "b");
    assert_eq!(prediction.failures[0].kind, FailureKind::Timeout);

    let event = engine.event(&prediction.event_id).unwrap().unwrap();
    assert_eq!(event.opinions.len(), 1);
    assert_eq!(event.opinions[0].persona.id, "a");
    assert_eq!(engine.metrics().snapshot().critic_timeouts, 1);
}

#[tokio::test]
async fn feedback_is_applied_exactly_once() {
    let source = Arc::new(
        ScriptedOpinionSource::new(5.0)
            .with_script("a", CriticScript::Fixed { score: 4.0, confidence: 0.9 })
            .with_script("b", CriticScript::Fixed { score: 3.0, confidence: 0.6 }),
    );
    let engine = engine_with(test_config(), source, personas(AggregationStrategy::SkillDominant));
    let prediction = engine
        .predict(drama("u1", "m1"), &CancellationToken::new())
        .await
        .unwrap();

    let ack = engine.submit_feedback(&prediction.event_id, 4.5).unwrap();
    assert_eq!(ack.calibrator_updates, 1);
    assert_eq!(ack.credited, 3);
    assert!((ack.residual - (4.5 - prediction.yhat)).abs() < 1e-12);

    let before = engine.calibrator().snapshot();
    let err = engine.submit_feedback(&prediction.event_id, 1.0).unwrap_err();
    assert!(matches!(err, EngineError::DuplicateFeedback { .. }));
    assert_eq!(engine.calibrator().snapshot().weights, before.weights);
    assert_eq!(engine.calibrator().snapshot().updates, 1);

    let event = engine.event(&prediction.event_id).unwrap().unwrap();
    assert_eq!(event.true_rating, Some(4.5));
    assert_eq!(event.stage, EventStage::Updated);

    let err = engine.submit_feedback("no-such-event", 3.0).unwrap_err();
    assert!(matches!(err, EngineError::UnknownEvent { .. }));

    let snap = engine.metrics().snapshot();
    assert_eq!(snap.feedback_applied, 1);
    assert_eq!(snap.feedback_rejected, 2);
}

#[tokio::test]
async fn out_of_range_rating_is_rejected_without_side_effects() {
    let source = Arc::new(
        ScriptedOpinionSource::new(5.0)
            .with_script("a", CriticScript::Fixed { score: 4.0, confidence: 0.9 })
            .with_script("b", CriticScript::Fixed { score: 3.0, confidence: 0.6 }),
    );
    let engine = engine_with(test_config(), source, personas(AggregationStrategy::Balanced));
    let prediction = engine
        .predict(drama("u1", "m1"), &CancellationToken::new())
        .await
        .unwrap();

    let err = engine.submit_feedback(&prediction.event_id, 7.5).unwrap_err();
    assert_eq!(err.reason(), "invalid_rating");
    assert_eq!(engine.skills().query(&PersonaRef::critic("a", 0)).n, 0);

    // A valid rating is still accepted afterwards.
    engine.submit_feedback(&prediction.event_id, 4.0).unwrap();
}

#[tokio::test]
async fn cancelled_before_start_logs_nothing() {
    let source = Arc::new(
        ScriptedOpinionSource::new(5.0)
            .with_script("a", CriticScript::Fixed { score: 4.0, confidence: 0.9 })
            .with_script("b", CriticScript::Fixed { score: 3.0, confidence: 0.6 }),
    );
    let engine = engine_with(test_config(), Arc::clone(&source), personas(AggregationStrategy::Balanced));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = engine.predict(drama("u1", "m1"), &cancel).await.unwrap_err();
    assert!(matches!(err, EngineError::Cancelled { ref stage } if stage == "requested"));
    assert_eq!(source.calls(), 0);
    assert_eq!(engine.event_log().len().unwrap(), 0);
    assert_eq!(engine.metrics().snapshot().cancelled_predictions, 1);
}

/// Cancels its token while answering, as a caller giving up mid-request would.
struct CancellingSource {
    token: CancellationToken,
}

#[async_trait]
impl IOpinionSource for CancellingSource {
    async fn generate_opinion(
        &self,
        critic: &CriticPersona,
        _request: &OpinionRequest,
    ) -> Result<Opinion, OpinionError> {
        self.token.cancel();
        Ok(Opinion::new(critic.persona_ref(), 4.0, 0.9, "", 5.0))
    }
}

#[tokio::test]
async fn cancelled_mid_request_never_reaches_calibrator() {
    let token = CancellationToken::new();
    let engine = Engine::builder(test_config())
        .opinion_source(Arc::new(CancellingSource { token: token.clone() }))
        .personas(personas(AggregationStrategy::Balanced))
        .build()
        .unwrap();

    let err = engine.predict(drama("u1", "m1"), &token).await.unwrap_err();
    assert!(matches!(err, EngineError::Cancelled { ref stage } if stage == "opinions_collected"));
    assert_eq!(engine.event_log().len().unwrap(), 0);
    assert_eq!(engine.calibrator().snapshot().updates, 0);
    assert_eq!(engine.skills().query(&PersonaRef::critic("a", 0)).n, 0);
}

#[tokio::test]
async fn scheduled_review_replaces_bad_judge() {
    let source = Arc::new(
        ScriptedOpinionSource::new(5.0)
            .with_script("a", CriticScript::Offset { bias: 2.0, confidence: 0.9, fallback: 3.0 })
            .with_script("b", CriticScript::Offset { bias: 2.0, confidence: 0.9, fallback: 3.0 }),
    );
    let sink = Arc::new(CollectingReplacementSink::new());
    let mut config = test_config();
    config.reviewer.review_interval = 3;
    config.reviewer.min_samples = 3;
    config.reviewer.error_threshold = 1.0;
    let engine = Engine::builder(config)
        .opinion_source(source.clone())
        .personas(personas(AggregationStrategy::Balanced))
        .replacement_sink(sink.clone())
        .build()
        .unwrap();
    let cancel = CancellationToken::new();

    let mut acks = Vec::new();
    for round in 0..3 {
        let item = format!("movie-{round}");
        source.set_truth(&item, 1.0);
        let prediction = engine.predict(drama("u1", &item), &cancel).await.unwrap();
        acks.push(engine.submit_feedback(&prediction.event_id, 1.0).unwrap());
    }

    assert!(acks[0].review.is_none());
    assert!(acks[1].review.is_none());
    let review = acks[2].review.as_ref().expect("review after third feedback");
    assert_eq!(review.replaced, Some(PersonaRef::judge("j", 1)));
    assert_eq!(review.report.worst_judge.as_deref(), Some("j"));

    assert_eq!(engine.router().registry().get("j").map(Persona::version), Some(1));
    assert_eq!(sink.directives().len(), 1);
    assert_eq!(engine.metrics().snapshot().replacements, 1);
    assert_eq!(engine.review_history().len(), 1);

    source.set_truth("movie-next", 1.0);
    let next = engine.predict(drama("u1", "movie-next"), &cancel).await.unwrap();
    assert_eq!(next.judges, vec![PersonaRef::judge("j", 1)]);
}

#[tokio::test]
async fn concurrent_predictions_are_all_logged() {
    let source = Arc::new(
        ScriptedOpinionSource::new(5.0)
            .with_script("a", CriticScript::Fixed { score: 4.0, confidence: 0.9 })
            .with_script("b", CriticScript::Fixed { score: 2.0, confidence: 0.4 }),
    );
    let engine = Arc::new(engine_with(test_config(), source, personas(AggregationStrategy::ConfidenceDominant)));
    let cancel = CancellationToken::new();

    let predictions = join_all((0..20).map(|i| {
        let engine = Arc::clone(&engine);
        let cancel = cancel.clone();
        tokio::spawn(async move {
            engine
                .predict(drama(&format!("u{i}"), &format!("m{i}")), &cancel)
                .await
        })
    }))
    .await;

    let mut ids = Vec::new();
    for joined in predictions {
        let prediction = joined.unwrap().unwrap();
        assert!(prediction.yhat >= 0.0 && prediction.yhat <= 5.0);
        ids.push(prediction.event_id);
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20);
    assert_eq!(engine.event_log().len().unwrap(), 20);
    assert_eq!(engine.metrics().snapshot().predictions, 20);
}

#[tokio::test]
async fn sqlite_backend_round_trips_feedback() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config();
    config.storage.backend = "sqlite".into();
    config.storage.db_path = dir.path().join("events.db").to_string_lossy().into_owned();

    let source = Arc::new(
        ScriptedOpinionSource::new(5.0)
            .with_script("a", CriticScript::Fixed { score: 4.0, confidence: 0.9 })
            .with_script("b", CriticScript::Fixed { score: 3.0, confidence: 0.6 }),
    );
    let engine = engine_with(config, source, personas(AggregationStrategy::Balanced));
    let prediction = engine
        .predict(drama("u1", "m1"), &CancellationToken::new())
        .await
        .unwrap();
    engine.submit_feedback(&prediction.event_id, 3.5).unwrap();

    let event = engine.event(&prediction.event_id).unwrap().unwrap();
    assert_eq!(event.true_rating, Some(3.5));
    assert_eq!(event.stage, EventStage::Updated);
    assert_eq!(event.calibration_features.len(), engine.calibrator().dims());
}

#[test]
fn build_requires_an_opinion_source() {
    let err = Engine::builder(test_config()).build().err().unwrap();
    assert!(matches!(err, EngineError::MissingComponent { .. }));
}

#[tokio::test]
async fn empty_persona_store_reports_missing_role() {
    let source = Arc::new(ScriptedOpinionSource::new(5.0));
    let engine = engine_with(test_config(), source, Vec::new());
    let err = engine
        .predict(drama("u1", "m1"), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NoPersonasAvailable { ref role } if role == "critic"));
}

/// Event log whose next `attach_feedback` fails once, like a full disk.
struct FailingAttachLog {
    inner: InMemoryEventLog,
    fail_next_attach: AtomicBool,
}

impl IEventLog for FailingAttachLog {
    fn append(&self, event: &PredictionEvent) -> TribunalResult<()> {
        self.inner.append(event)
    }

    fn read_window(&self, n: usize) -> TribunalResult<Vec<PredictionEvent>> {
        self.inner.read_window(n)
    }

    fn get(&self, event_id: &str) -> TribunalResult<Option<PredictionEvent>> {
        self.inner.get(event_id)
    }

    fn attach_feedback(&self, event_id: &str, true_rating: f64) -> TribunalResult<PredictionEvent> {
        if self.fail_next_attach.swap(false, Ordering::SeqCst) {
            return Err(StorageError::SqliteError {
                message: "disk I/O error".into(),
            }
            .into());
        }
        self.inner.attach_feedback(event_id, true_rating)
    }

    fn len(&self) -> TribunalResult<usize> {
        self.inner.len()
    }
}

#[tokio::test]
async fn failed_log_write_leaves_models_untouched_and_can_be_retried() {
    let source = Arc::new(
        ScriptedOpinionSource::new(5.0)
            .with_script("a", CriticScript::Fixed { score: 4.0, confidence: 0.9 })
            .with_script("b", CriticScript::Fixed { score: 3.0, confidence: 0.6 }),
    );
    let log = Arc::new(FailingAttachLog {
        inner: InMemoryEventLog::new(100),
        fail_next_attach: AtomicBool::new(true),
    });
    let engine = Engine::builder(test_config())
        .opinion_source(source)
        .personas(personas(AggregationStrategy::Balanced))
        .event_log(log)
        .build()
        .unwrap();
    let prediction = engine
        .predict(drama("u1", "m1"), &CancellationToken::new())
        .await
        .unwrap();

    let err = engine.submit_feedback(&prediction.event_id, 4.0).unwrap_err();
    assert_eq!(err.reason(), "internal");
    assert_eq!(engine.calibrator().snapshot().updates, 0);
    assert!(!engine.calibrator().has_applied(&prediction.event_id));
    assert_eq!(engine.skills().query(&PersonaRef::critic("a", 0)).n, 0);
    let event = engine.event(&prediction.event_id).unwrap().unwrap();
    assert_eq!(event.true_rating, None);
    assert_eq!(event.stage, EventStage::Logged);

    let ack = engine.submit_feedback(&prediction.event_id, 4.0).unwrap();
    assert_eq!(ack.calibrator_updates, 1);
    assert_eq!(engine.skills().query(&PersonaRef::critic("a", 0)).n, 1);
    let event = engine.event(&prediction.event_id).unwrap().unwrap();
    assert_eq!(event.true_rating, Some(4.0));
    assert_eq!(event.stage, EventStage::Updated);
}

/// Answers with a NaN score, bypassing the clamping constructor.
struct NanSource;

#[async_trait]
impl IOpinionSource for NanSource {
    async fn generate_opinion(
        &self,
        critic: &CriticPersona,
        _request: &OpinionRequest,
    ) -> Result<Opinion, OpinionError> {
        Ok(Opinion {
            persona: critic.persona_ref(),
            score: f64::NAN,
            confidence: 0.8,
            rationale: "garbled".into(),
        })
    }
}

#[tokio::test]
async fn non_finite_critic_output_counts_as_failure() {
    let engine = Engine::builder(test_config())
        .opinion_source(Arc::new(NanSource))
        .personas(personas(AggregationStrategy::Balanced))
        .build()
        .unwrap();
    let prediction = engine
        .predict(drama("u1", "m1"), &CancellationToken::new())
        .await
        .unwrap();

    assert!(prediction.degraded);
    assert_eq!(prediction.failures.len(), 2);
    assert!(prediction.failures.iter().all(|f| f.kind == FailureKind::Generation));
    let event = engine.event(&prediction.event_id).unwrap().unwrap();
    assert!(event.opinions.is_empty());
    assert_eq!(engine.metrics().snapshot().critic_errors, 2);

    engine.submit_feedback(&prediction.event_id, 3.0).unwrap();
    assert_eq!(engine.skills().query(&PersonaRef::critic("a", 0)).n, 0);
}
