//! Deterministic stand-in for the language-model opinion source.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use tribunal_core::errors::OpinionError;
use tribunal_core::models::Opinion;
use tribunal_core::persona::CriticPersona;
use tribunal_core::traits::{IOpinionSource, OpinionRequest};

/// How one scripted critic behaves.
#[derive(Debug, Clone)]
pub enum CriticScript {
    /// Always the same score.
    Fixed { score: f64, confidence: f64 },
    /// The item's true rating plus `bias`; falls back to `fallback` for
    /// items without a known truth.
    Offset {
        bias: f64,
        confidence: f64,
        fallback: f64,
    },
    /// Fails with a generation error.
    Fail { reason: String },
    /// Sleeps before answering; used to trigger timeouts.
    Slow { delay_ms: u64, score: f64 },
}

pub struct ScriptedOpinionSource {
    max_rating: f64,
    scripts: HashMap<String, CriticScript>,
    truth: Mutex<HashMap<String, f64>>,
    calls: AtomicUsize,
}

impl ScriptedOpinionSource {
    pub fn new(max_rating: f64) -> Self {
        Self {
            max_rating,
            scripts: HashMap::new(),
            truth: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_script(mut self, critic_id: &str, script: CriticScript) -> Self {
        self.scripts.insert(critic_id.to_string(), script);
        self
    }

    /// Record the rating a user will eventually give `item_id`.
    pub fn set_truth(&self, item_id: &str, rating: f64) {
        self.truth
            .lock()
            .unwrap()
            .insert(item_id.to_string(), rating);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IOpinionSource for ScriptedOpinionSource {
    async fn generate_opinion(
        &self,
        critic: &CriticPersona,
        request: &OpinionRequest,
    ) -> Result<Opinion, OpinionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let persona = critic.persona_ref();
        let script = self.scripts.get(&critic.id).cloned().ok_or_else(|| {
            OpinionError::Generation {
                persona: persona.to_string(),
                reason: "no script for critic".to_string(),
            }
        })?;

        match script {
            CriticScript::Fixed { score, confidence } => Ok(Opinion::new(
                persona,
                score,
                confidence,
                "fixed",
                self.max_rating,
            )),
            CriticScript::Offset {
                bias,
                confidence,
                fallback,
            } => {
                let truth = self
                    .truth
                    .lock()
                    .unwrap()
                    .get(&request.item.item_id)
                    .copied();
                let score = truth.map(|t| t + bias).unwrap_or(fallback);
                Ok(Opinion::new(persona, score, confidence, "offset", self.max_rating))
            }
            CriticScript::Fail { reason } => Err(OpinionError::Generation {
                persona: persona.to_string(),
                reason,
            }),
            CriticScript::Slow { delay_ms, score } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(Opinion::new(persona, score, 0.5, "slow", self.max_rating))
            }
        }
    }
}
