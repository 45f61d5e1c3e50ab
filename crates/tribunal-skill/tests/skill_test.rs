//! SkillTracker behaviour under sequential and concurrent updates.

use std::sync::Arc;

use proptest::prelude::*;

use tribunal_core::config::SkillConfig;
use tribunal_core::errors::SkillError;
use tribunal_core::persona::PersonaRef;
use tribunal_skill::SkillTracker;

fn tracker(decay: f64) -> SkillTracker {
    SkillTracker::new(&SkillConfig {
        decay,
        neutral_error: 1.0,
    })
}

proptest! {
    #[test]
    fn single_update_stays_within_observed_bounds(
        first in -5.0f64..5.0,
        second in -5.0f64..5.0,
        decay in 0.05f64..0.95,
    ) {
        let t = tracker(decay);
        let p = PersonaRef::critic("c", 0);
        t.record(&p, first).unwrap();
        let est = t.record(&p, second).unwrap();
        let lo = first.abs().min(second.abs());
        let hi = first.abs().max(second.abs());
        prop_assert!(est.ema_error >= lo - 1e-9 && est.ema_error <= hi + 1e-9);
        prop_assert!(est.ema_var >= 0.0);
        prop_assert_eq!(est.n, 2);
    }
}

#[test]
fn unknown_persona_returns_prior() {
    let t = tracker(0.9);
    let est = t.query(&PersonaRef::judge("j", 0));
    assert!(est.is_prior);
    assert_eq!(est.n, 0);
    assert_eq!(est.ema_error, 1.0);
}

#[test]
fn non_finite_error_is_rejected() {
    let t = tracker(0.9);
    let p = PersonaRef::critic("c", 0);
    let err = t.record(&p, f64::NAN).unwrap_err();
    assert!(matches!(err, SkillError::NonFiniteError { .. }));
    assert!(!t.is_registered(&p));
}

#[test]
fn versions_are_tracked_independently() {
    let t = tracker(0.9);
    let v0 = PersonaRef::judge("j", 0);
    let v1 = PersonaRef::judge("j", 1);
    t.record(&v0, 2.0).unwrap();
    t.register(&v1);

    assert_eq!(t.query(&v0).n, 1);
    assert!(t.query(&v1).is_prior);
    assert_eq!(t.snapshot().len(), 2);
}

#[test]
fn register_does_not_reset_existing_record() {
    let t = tracker(0.9);
    let p = PersonaRef::critic("c", 0);
    t.record(&p, 0.5).unwrap();
    t.register(&p);
    assert_eq!(t.query(&p).n, 1);
}

#[test]
fn critic_view_covers_requested_personas() {
    let t = tracker(0.9);
    let a = PersonaRef::critic("a", 0);
    let b = PersonaRef::critic("b", 0);
    t.record(&a, 0.2).unwrap();
    let view = t.critic_view([&a, &b]);
    assert_eq!(view.len(), 2);
    assert!((view.get(&a).ema_error - 0.2).abs() < 1e-12);
    assert!(view.get(&b).is_prior);
}

#[test]
fn concurrent_updates_count_every_sample() {
    let t = Arc::new(tracker(0.9));
    let p = PersonaRef::critic("c", 0);
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let t = Arc::clone(&t);
            let p = p.clone();
            std::thread::spawn(move || {
                for _ in 0..100 {
                    t.record(&p, 0.5).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    let est = t.query(&p);
    assert_eq!(est.n, 800);
    assert!((est.ema_error - 0.5).abs() < 1e-9);
}
