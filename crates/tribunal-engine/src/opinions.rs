//! Concurrent critic fan-out with a per-call timeout.

use std::time::Duration;

use futures::future::join_all;

use tribunal_core::errors::OpinionError;
use tribunal_core::models::{CriticFailure, FailureKind, Opinion};
use tribunal_core::persona::CriticPersona;
use tribunal_core::traits::{IOpinionSource, OpinionRequest};

pub(crate) struct Collected {
    pub opinions: Vec<Opinion>,
    pub failures: Vec<CriticFailure>,
}

/// Ask every critic at once. Results keep critic order; failures are absorbed.
pub(crate) async fn collect(
    source: &dyn IOpinionSource,
    critics: &[CriticPersona],
    request: &OpinionRequest,
    timeout: Duration,
    max_rating: f64,
) -> Collected {
    let calls = critics.iter().map(|critic| async move {
        let outcome = tokio::time::timeout(timeout, source.generate_opinion(critic, request)).await;
        (critic, outcome)
    });

    let mut opinions = Vec::with_capacity(critics.len());
    let mut failures = Vec::new();
    for (critic, outcome) in join_all(calls).await {
        let persona = critic.persona_ref();
        match outcome {
            Ok(Ok(opinion)) if !opinion.score.is_finite() || !opinion.confidence.is_finite() => {
                failures.push(CriticFailure {
                    message: format!("critic {persona} returned a non-finite score or confidence"),
                    persona,
                    kind: FailureKind::Generation,
                });
            }
            Ok(Ok(opinion)) => {
                // Re-key and re-clamp: the source does not get to speak for another persona.
                opinions.push(Opinion::new(
                    persona,
                    opinion.score,
                    opinion.confidence,
                    opinion.rationale,
                    max_rating,
                ));
            }
            Ok(Err(err)) => {
                let kind = match err {
                    OpinionError::Timeout { .. } => FailureKind::Timeout,
                    OpinionError::Generation { .. } => FailureKind::Generation,
                };
                failures.push(CriticFailure {
                    persona,
                    kind,
                    message: err.to_string(),
                });
            }
            Err(_) => failures.push(CriticFailure {
                message: format!("critic {persona} timed out after {}ms", timeout.as_millis()),
                persona,
                kind: FailureKind::Timeout,
            }),
        }
    }

    Collected { opinions, failures }
}
