//! Reviewer audit and review-cycle tests.

use std::sync::Arc;

use proptest::prelude::*;

use test_fixtures::{load_scenario, EventBuilder, ReviewScenario};
use tribunal_core::config::{ReviewerConfig, RouterConfig, SkillConfig};
use tribunal_core::models::{CalibratorSuggestion, RoutingContext, Severity};
use tribunal_core::persona::{AggregationStrategy, Persona, PersonaRef};
use tribunal_core::traits::IEventLog;
use tribunal_review::{run_review, ReviewCycle, ReviewHistory};
use tribunal_routing::{PersonaRegistry, Router};
use tribunal_skill::SkillTracker;
use tribunal_storage::{CollectingReplacementSink, InMemoryEventLog, InMemoryPersonaStore};

fn config_for(scenario: &ReviewScenario) -> ReviewerConfig {
    ReviewerConfig {
        min_samples: scenario.min_samples,
        error_threshold: scenario.error_threshold,
        std_threshold: scenario.std_threshold,
        ..Default::default()
    }
}

#[test]
fn golden_scenarios() {
    for file in [
        "review/two_judges.json",
        "review/insufficient_samples.json",
        "review/inconsistent_judge.json",
    ] {
        let scenario = load_scenario(file);
        let report = run_review(&scenario.events(), &config_for(&scenario));
        assert_eq!(report.worst_judge, scenario.expected_worst, "{}", scenario.description);
        assert_eq!(report.best_judge, scenario.expected_best, "{}", scenario.description);
        assert_eq!(
            report.replacement.as_ref().map(|d| d.old_persona.id.clone()),
            scenario.expected_replacement,
            "{}",
            scenario.description
        );
    }
}

#[test]
fn two_judge_statistics() {
    let scenario = load_scenario("review/two_judges.json");
    let report = run_review(&scenario.events(), &config_for(&scenario));

    let j1 = report.judge("j1").unwrap();
    assert_eq!(j1.n, 3);
    assert!((j1.avg_error - 0.15).abs() < 1e-9);
    let j2 = report.judge("j2").unwrap();
    assert!((j2.avg_error - 1.2666666666).abs() < 1e-6);

    let directive = report.replacement.as_ref().unwrap();
    assert_eq!(directive.old_persona, PersonaRef::judge("j2", 0));
    assert_eq!(directive.new_version, 1);
    assert_eq!(directive.evidence.n, 3);
    assert!(report
        .recommendations
        .iter()
        .any(|r| r.severity == Severity::Critical && r.message.contains("j2@v0")));
}

#[test]
fn events_without_feedback_only_feed_critic_trust() {
    let events = vec![
        EventBuilder::new()
            .judge_with_weights("j1", 0, 4.0, &[("a", 0.8), ("b", 0.2)])
            .build(),
        EventBuilder::new()
            .judge_with_weights("j1", 0, 4.0, &[("a", 0.6), ("b", 0.4)])
            .build(),
    ];
    let report = run_review(&events, &ReviewerConfig::default());
    assert_eq!(report.with_feedback, 0);
    assert_eq!(report.judge("j1").unwrap().n, 0);
    assert_eq!(report.judge("j1").unwrap().predictions, 2);
    assert!((report.critic_trust["a@v0"].avg_alpha - 0.7).abs() < 1e-9);
    assert!(report.replacement.is_none());
    assert_eq!(report.quality.count, 0);
}

#[test]
fn decision_uses_latest_version_only() {
    let config = ReviewerConfig {
        min_samples: 3,
        error_threshold: 0.7,
        ..Default::default()
    };
    let mut events = Vec::new();
    for _ in 0..5 {
        events.push(EventBuilder::new().judge("j", 0, 5.0).true_rating(3.0).build());
    }
    for _ in 0..2 {
        events.push(EventBuilder::new().judge("j", 1, 3.1).true_rating(3.0).build());
    }
    let report = run_review(&events, &config);
    let stats = report.judge("j").unwrap();
    assert_eq!(stats.n, 7);
    assert_eq!(stats.latest.persona, PersonaRef::judge("j", 1));
    assert_eq!(stats.latest.n, 2);
    // The new version has too few samples to be judged yet.
    assert!(report.replacement.is_none());
}

#[test]
fn prediction_quality_covers_rated_events() {
    let events = vec![
        EventBuilder::new().genres(&["Drama"]).prediction(3.0, 0.5).true_rating(3.4).build(),
        EventBuilder::new().genres(&["Drama", "War"]).prediction(2.0, 0.5).true_rating(4.0).build(),
        EventBuilder::new().prediction(1.0, 0.5).build(),
    ];
    let q = run_review(&events, &ReviewerConfig::default()).quality;
    assert_eq!(q.count, 2);
    assert!((q.mae - 1.2).abs() < 1e-9);
    assert!((q.max_error - 2.0).abs() < 1e-9);
    assert!((q.sigma_coverage - 0.5).abs() < 1e-9);
    let drama = q.by_genre.iter().find(|g| g.genre == "drama").unwrap();
    assert_eq!(drama.count, 2);
}

proptest! {
    #[test]
    fn at_most_one_replacement_and_only_with_enough_samples(
        errors in proptest::collection::vec(proptest::collection::vec(0.0f64..2.0, 0..6), 1..5),
        min_samples in 1usize..5,
    ) {
        let rounds = errors.iter().map(Vec::len).max().unwrap_or(0);
        let events: Vec<_> = (0..rounds)
            .map(|i| {
                let mut b = EventBuilder::new();
                for (j, errs) in errors.iter().enumerate() {
                    if let Some(e) = errs.get(i) {
                        b = b.judge(&format!("j{j}"), 0, 2.0 + e);
                    }
                }
                b.true_rating(2.0).build()
            })
            .collect();
        let config = ReviewerConfig {
            min_samples,
            error_threshold: 0.5,
            std_threshold: 0.5,
            ..Default::default()
        };
        let report = run_review(&events, &config);
        if let Some(d) = &report.replacement {
            let stats = report.judge(&d.old_persona.id).unwrap();
            prop_assert!(stats.latest.n >= min_samples);
            prop_assert_eq!(d.new_version, d.old_persona.version + 1);
        }
        for s in &report.judge_stats {
            if s.n < min_samples {
                prop_assert!(report.best_judge.as_deref() != Some(s.judge_id.as_str()));
                prop_assert!(report.worst_judge.as_deref() != Some(s.judge_id.as_str()));
            }
        }
    }
}

#[test]
fn history_suggests_calibrator_changes() {
    let mut history = ReviewHistory::new(2);
    let good = run_review(
        &[EventBuilder::new().judge("j", 0, 3.5).true_rating(3.0).build()],
        &ReviewerConfig::default(),
    );
    let bad = run_review(
        &[EventBuilder::new().judge("j", 0, 5.0).true_rating(2.0).build()],
        &ReviewerConfig::default(),
    );
    history.push(good.clone());
    assert!(history.suggestions().is_empty());
    history.push(bad);
    let suggestions = history.suggestions();
    assert!(matches!(suggestions[0], CalibratorSuggestion::IncreaseCapacity { .. }));
    assert!(matches!(suggestions[1], CalibratorSuggestion::DecreaseLearningRate { .. }));
    history.push(good);
    assert_eq!(history.len(), 2);
}

#[test]
fn cycle_applies_replacement_once() {
    let personas = vec![
        Persona::critic("critic"),
        Persona::judge("j1", AggregationStrategy::Balanced),
        Persona::judge("j2", AggregationStrategy::ConfidenceDominant),
    ];
    let skills = Arc::new(SkillTracker::new(&SkillConfig::default()));
    let router = Router::new(
        RouterConfig {
            judges_per_request: 2,
            seed: Some(1),
            ..Default::default()
        },
        PersonaRegistry::new(personas.clone()).unwrap(),
        Arc::clone(&skills),
    );
    let store = InMemoryPersonaStore::new(personas);
    let sink = CollectingReplacementSink::new();
    let log = InMemoryEventLog::new(100);

    let scenario = load_scenario("review/two_judges.json");
    for event in scenario.events() {
        log.append(&event).unwrap();
    }

    let cycle = ReviewCycle::new(config_for(&scenario));
    let outcome = cycle.run(&log, &router, &store, &sink).unwrap();
    assert_eq!(outcome.replaced, Some(PersonaRef::judge("j2", 1)));
    assert_eq!(sink.directives().len(), 1);
    assert!(router.registry().is_active(&PersonaRef::judge("j2", 1)));
    assert!(skills.is_registered(&PersonaRef::judge("j2", 1)));

    // Same window again: the flagged version is no longer active.
    let again = cycle.run(&log, &router, &store, &sink).unwrap();
    assert!(again.replaced.is_none());
    assert_eq!(sink.directives().len(), 1);
    assert_eq!(cycle.history().len(), 2);

    let decision = router.route(&RoutingContext::default()).unwrap();
    assert!(decision
        .judges
        .iter()
        .all(|j| j.persona_ref() != PersonaRef::judge("j2", 0)));
}
