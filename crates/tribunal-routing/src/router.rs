//! Decaying epsilon-greedy router.
//!
//! `ε_t = ε_min + (ε_start - ε_min) · exp(-t / τ)` with `t` the number of
//! requests served. Each slot is explored with probability `ε_t` among the
//! personas still under `min_samples` in the request's context; every other
//! slot is filled greedily.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use dashmap::DashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use tribunal_core::config::RouterConfig;
use tribunal_core::errors::RoutingError;
use tribunal_core::models::{ReplacementDirective, RoutingContext};
use tribunal_core::persona::{CriticPersona, JudgePersona, Persona, PersonaRef, Role};
use tribunal_skill::SkillTracker;

use crate::arm::ArmStats;
use crate::registry::PersonaRegistry;

/// Participants chosen for one request.
#[derive(Debug, Clone)]
pub struct RoutingDecision {
    pub context_key: String,
    pub critics: Vec<CriticPersona>,
    pub judges: Vec<JudgePersona>,
    /// Exploration rate in force for this request.
    pub epsilon: f64,
    /// Personas picked by the exploration branch.
    pub explored: Vec<PersonaRef>,
}

/// One row of the greedy order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPersona {
    pub persona: PersonaRef,
    pub value: f64,
    pub samples: u64,
    pub selections: u64,
    /// No feedback yet, neither in this context nor globally.
    pub unsampled: bool,
}

pub struct Router {
    config: RouterConfig,
    registry: RwLock<Arc<PersonaRegistry>>,
    arms: DashMap<(String, PersonaRef), ArmStats>,
    requests: AtomicU64,
    rng: Mutex<StdRng>,
    skills: Arc<SkillTracker>,
}

impl Router {
    pub fn new(config: RouterConfig, registry: PersonaRegistry, skills: Arc<SkillTracker>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            registry: RwLock::new(Arc::new(registry)),
            arms: DashMap::new(),
            requests: AtomicU64::new(0),
            rng: Mutex::new(rng),
            skills,
        }
    }

    /// Current registry snapshot.
    pub fn registry(&self) -> Arc<PersonaRegistry> {
        let guard = self.registry.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    pub fn requests_served(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Exploration rate after `t` requests.
    pub fn epsilon_at(&self, t: u64) -> f64 {
        let c = &self.config;
        c.epsilon_min + (c.epsilon_start - c.epsilon_min) * (-(t as f64) / c.epsilon_decay_requests).exp()
    }

    /// Select critics and judges for `context`.
    pub fn route(&self, context: &RoutingContext) -> Result<RoutingDecision, RoutingError> {
        let registry = self.registry();
        let key = context.key();

        let critic_refs = registry.active_refs(Role::Critic);
        let judge_refs = registry.active_refs(Role::Judge);
        if critic_refs.is_empty() {
            return Err(RoutingError::NoPersonasAvailable {
                role: Role::Critic.to_string(),
            });
        }
        if judge_refs.is_empty() {
            return Err(RoutingError::NoPersonasAvailable {
                role: Role::Judge.to_string(),
            });
        }

        let t = self.requests.fetch_add(1, Ordering::Relaxed);
        let epsilon = self.epsilon_at(t);
        let mut explored = Vec::new();

        let chosen_critics = self.select(&key, &critic_refs, self.config.critics_per_request, epsilon, &mut explored);
        let chosen_judges = self.select(&key, &judge_refs, self.config.judges_per_request, epsilon, &mut explored);

        for persona in chosen_critics.iter().chain(chosen_judges.iter()) {
            self.arms
                .entry((key.clone(), persona.clone()))
                .or_default()
                .selections += 1;
        }

        let critics = chosen_critics
            .iter()
            .filter_map(|r| match registry.get(&r.id) {
                Some(Persona::Critic(c)) => Some(c.clone()),
                _ => None,
            })
            .collect();
        let judges = chosen_judges
            .iter()
            .filter_map(|r| registry.get(&r.id).and_then(Persona::as_judge).cloned())
            .collect();

        tracing::debug!(
            context = %key,
            epsilon,
            explored = explored.len(),
            "request routed"
        );

        Ok(RoutingDecision {
            context_key: key,
            critics,
            judges,
            epsilon,
            explored,
        })
    }

    fn select(
        &self,
        key: &str,
        candidates: &[PersonaRef],
        k: usize,
        epsilon: f64,
        explored: &mut Vec<PersonaRef>,
    ) -> Vec<PersonaRef> {
        let k = k.min(candidates.len());
        let ranked = self.rank(key, candidates);
        let mut under_sampled: Vec<PersonaRef> = ranked
            .iter()
            .filter(|r| r.samples < self.config.min_samples)
            .map(|r| r.persona.clone())
            .collect();
        let mut greedy = ranked.into_iter().map(|r| r.persona);

        let mut chosen: Vec<PersonaRef> = Vec::with_capacity(k);
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        while chosen.len() < k {
            if !under_sampled.is_empty() && rng.gen::<f64>() < epsilon {
                let pick = under_sampled.swap_remove(rng.gen_range(0..under_sampled.len()));
                explored.push(pick.clone());
                chosen.push(pick);
                continue;
            }
            match greedy.by_ref().find(|p| !chosen.contains(p)) {
                Some(p) => {
                    under_sampled.retain(|u| *u != p);
                    chosen.push(p);
                }
                None => break,
            }
        }
        chosen
    }

    /// Candidates in greedy order: unsampled first, then descending value,
    /// then fewest selections, then id.
    fn rank(&self, key: &str, candidates: &[PersonaRef]) -> Vec<RankedPersona> {
        let mut ranked: Vec<RankedPersona> = candidates
            .iter()
            .map(|p| {
                let arm = self.arm(key, p);
                let skill = self.skills.query(p);
                RankedPersona {
                    persona: p.clone(),
                    value: self.value_of(p, &arm, skill.ema_error),
                    samples: arm.samples,
                    selections: arm.selections,
                    unsampled: arm.samples == 0 && skill.is_prior,
                }
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.unsampled
                .cmp(&a.unsampled)
                .then_with(|| b.value.total_cmp(&a.value))
                .then_with(|| a.selections.cmp(&b.selections))
                .then_with(|| a.persona.id.cmp(&b.persona.id))
        });
        ranked
    }

    fn value_of(&self, persona: &PersonaRef, arm: &ArmStats, skill_error: f64) -> f64 {
        let base = if arm.samples > 0 { arm.value } else { -skill_error };
        match (persona.role, arm.mean_confidence) {
            (Role::Critic, Some(conf)) => base + self.config.confidence_bias * (conf - 0.5),
            _ => base,
        }
    }

    fn arm(&self, key: &str, persona: &PersonaRef) -> ArmStats {
        self.arms
            .get(&(key.to_string(), persona.clone()))
            .map(|a| a.clone())
            .unwrap_or_default()
    }

    /// Selection value of `persona` in `context`.
    pub fn selection_value(&self, context: &RoutingContext, persona: &PersonaRef) -> f64 {
        let key = context.key();
        let arm = self.arm(&key, persona);
        self.value_of(persona, &arm, self.skills.query(persona).ema_error)
    }

    /// Greedy order for `role` among the active personas.
    pub fn ranking(&self, context: &RoutingContext, role: Role) -> Vec<RankedPersona> {
        let registry = self.registry();
        self.rank(&context.key(), &registry.active_refs(role))
    }

    pub fn arm_stats(&self, context: &RoutingContext, persona: &PersonaRef) -> ArmStats {
        self.arm(&context.key(), persona)
    }

    /// Fold one feedback error into the context value of `persona`.
    pub fn observe(&self, context_key: &str, persona: &PersonaRef, error: f64, confidence: Option<f64>) {
        if !error.is_finite() {
            tracing::warn!(persona = %persona, error, "ignoring non-finite routing error");
            return;
        }
        if self.registry().retired().contains(persona) {
            tracing::debug!(persona = %persona, "ignoring feedback for retired persona");
            return;
        }
        self.arms
            .entry((context_key.to_string(), persona.clone()))
            .or_default()
            .observe(error, confidence, self.config.value_decay);
    }

    /// Add a brand-new persona id to the active set.
    pub fn register(&self, persona: Persona) -> Result<(), RoutingError> {
        let mut guard = self.registry.write().unwrap_or_else(|e| e.into_inner());
        let persona_ref = persona.persona_ref();
        let next = guard.with_persona(persona)?;
        self.skills.register(&persona_ref);
        *guard = Arc::new(next);
        Ok(())
    }

    /// Retire `directive.old_persona` and activate `replacement` in one swap.
    pub fn apply_replacement(
        &self,
        directive: &ReplacementDirective,
        replacement: Persona,
    ) -> Result<(), RoutingError> {
        let mut guard = self.registry.write().unwrap_or_else(|e| e.into_inner());
        let new_ref = replacement.persona_ref();
        let next = guard.with_replacement(&directive.old_persona, replacement)?;
        self.skills.register(&new_ref);
        *guard = Arc::new(next);
        drop(guard);
        let old = &directive.old_persona;
        self.arms.retain(|(_, persona), _| persona != old);

        tracing::info!(
            old = %directive.old_persona,
            new = %new_ref,
            "persona replaced"
        );
        Ok(())
    }
}
