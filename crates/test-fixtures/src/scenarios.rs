//! JSON review scenarios under `fixtures/`.

use std::path::PathBuf;

use serde::Deserialize;

use tribunal_core::models::PredictionEvent;

use crate::events::EventBuilder;

/// A reviewer scenario: per-judge absolute errors against a fixed truth.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewScenario {
    pub description: String,
    pub true_rating: f64,
    pub judges: Vec<ScenarioJudge>,
    pub error_threshold: f64,
    pub std_threshold: f64,
    pub min_samples: usize,
    pub expected_worst: Option<String>,
    pub expected_best: Option<String>,
    pub expected_replacement: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioJudge {
    pub id: String,
    #[serde(default)]
    pub version: u32,
    pub errors: Vec<f64>,
}

impl ReviewScenario {
    /// One event per error index; each judge's estimate sits `error` above the truth.
    pub fn events(&self) -> Vec<PredictionEvent> {
        let rounds = self.judges.iter().map(|j| j.errors.len()).max().unwrap_or(0);
        (0..rounds)
            .map(|i| {
                let mut builder = EventBuilder::new().prediction(self.true_rating, 0.5);
                for judge in &self.judges {
                    if let Some(err) = judge.errors.get(i) {
                        builder = builder.judge(&judge.id, judge.version, self.true_rating + err);
                    }
                }
                builder.true_rating(self.true_rating).build()
            })
            .collect()
    }
}

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load a scenario from `fixtures/<relative_path>`.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_scenario(relative_path: &str) -> ReviewScenario {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}
