//! Judge synthesis properties.

use proptest::prelude::*;

use tribunal_core::config::{AggregationConfig, RatingConfig};
use tribunal_core::models::{Opinion, SkillEstimate, SkillView};
use tribunal_core::persona::{AggregationStrategy, JudgePersona, PersonaRef};
use tribunal_aggregation::Aggregator;

const STRATEGIES: [AggregationStrategy; 4] = [
    AggregationStrategy::SkillDominant,
    AggregationStrategy::ConfidenceDominant,
    AggregationStrategy::Balanced,
    AggregationStrategy::UniformOutlierDownweight,
];

fn judge(strategy: AggregationStrategy) -> JudgePersona {
    JudgePersona {
        id: format!("judge-{}", strategy.as_str()),
        version: 0,
        strategy,
    }
}

fn view_with(errors: &[(&str, f64)]) -> SkillView {
    let mut view = SkillView::new(1.0);
    for (id, err) in errors {
        view.insert(SkillEstimate {
            persona: PersonaRef::critic(*id, 0),
            n: 10,
            ema_error: *err,
            ema_var: 0.0,
            is_prior: false,
        });
    }
    view
}

proptest! {
    #[test]
    fn alphas_are_a_distribution(
        raw in proptest::collection::vec((0.0f64..5.0, 0.0f64..1.0, 0.0f64..3.0), 1..8),
        strategy_idx in 0usize..4,
    ) {
        let opinions: Vec<Opinion> = raw
            .iter()
            .enumerate()
            .map(|(i, (s, c, _))| Opinion::new(PersonaRef::critic(format!("c{i}"), 0), *s, *c, "", 5.0))
            .collect();
        let mut view = SkillView::new(1.0);
        for (i, (_, _, e)) in raw.iter().enumerate() {
            view.insert(SkillEstimate {
                persona: PersonaRef::critic(format!("c{i}"), 0),
                n: 1,
                ema_error: *e,
                ema_var: 0.0,
                is_prior: false,
            });
        }

        let agg = Aggregator::default();
        let est = agg.aggregate(&judge(STRATEGIES[strategy_idx]), &opinions, &view);
        prop_assert!(!est.degraded);
        prop_assert!(est.weights_used.values().all(|a| *a >= 0.0 && *a <= 1.0 + 1e-12));
        prop_assert!((est.alpha_mass() - 1.0).abs() < 1e-9);
        prop_assert!((0.0..=5.0).contains(&est.r_tilde));
    }
}

#[test]
fn skill_dominant_trusts_accurate_critic() {
    let opinions = [
        Opinion::new(PersonaRef::critic("good", 0), 4.0, 0.5, "", 5.0),
        Opinion::new(PersonaRef::critic("bad", 0), 1.0, 0.5, "", 5.0),
    ];
    let view = view_with(&[("good", 0.1), ("bad", 2.0)]);
    let est = Aggregator::default().aggregate(&judge(AggregationStrategy::SkillDominant), &opinions, &view);
    assert!(est.weights_used["good@v0"] > est.weights_used["bad@v0"]);
    assert!(est.r_tilde > 2.5);
}

#[test]
fn confidence_dominant_trusts_confident_critic() {
    let opinions = [
        Opinion::new(PersonaRef::critic("sure", 0), 5.0, 0.95, "", 5.0),
        Opinion::new(PersonaRef::critic("unsure", 0), 1.0, 0.2, "", 5.0),
    ];
    let view = view_with(&[("sure", 1.0), ("unsure", 1.0)]);
    let est =
        Aggregator::default().aggregate(&judge(AggregationStrategy::ConfidenceDominant), &opinions, &view);
    assert!(est.weights_used["sure@v0"] > 0.9);
}

#[test]
fn uniform_outlier_downweights_far_score() {
    let opinions = [
        Opinion::new(PersonaRef::critic("a", 0), 4.0, 0.5, "", 5.0),
        Opinion::new(PersonaRef::critic("b", 0), 4.2, 0.5, "", 5.0),
        Opinion::new(PersonaRef::critic("c", 0), 3.8, 0.5, "", 5.0),
        Opinion::new(PersonaRef::critic("d", 0), 0.5, 0.5, "", 5.0),
    ];
    let est = Aggregator::default().aggregate(
        &judge(AggregationStrategy::UniformOutlierDownweight),
        &opinions,
        &SkillView::new(1.0),
    );
    assert_eq!(est.flagged, vec!["d@v0".to_string()]);
    assert!(est.r_tilde > 3.5);
}

#[test]
fn synthesize_returns_one_estimate_per_judge() {
    let agg = Aggregator::new(RatingConfig::default(), AggregationConfig::default());
    let judges: Vec<JudgePersona> = STRATEGIES.iter().map(|s| judge(*s)).collect();
    let opinions = [Opinion::new(PersonaRef::critic("a", 0), 2.0, 0.6, "", 5.0)];
    let estimates = agg.synthesize(&judges, &opinions, &SkillView::new(1.0));
    assert_eq!(estimates.len(), 4);
    assert!(estimates.iter().all(|e| (e.r_tilde - 2.0).abs() < 1e-12));

    let degraded = agg.synthesize(&judges, &[], &SkillView::new(1.0));
    assert!(degraded.iter().all(|e| e.degraded && e.r_tilde == 3.0));
}
