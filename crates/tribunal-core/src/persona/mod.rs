//! Personas: immutable, versioned critics and judges.
//!
//! A persona is a tagged variant over the two roles. Each role has a fixed
//! capability: critics produce opinions through the external opinion
//! source, judges aggregate critic opinions with their [`AggregationStrategy`].
//! Replacing a persona never mutates it; [`Persona::successor`] builds the
//! next version with the same id.

pub mod persona_ref;
pub mod strategy;

use serde::{Deserialize, Serialize};

pub use persona_ref::{PersonaRef, Role};
pub use strategy::AggregationStrategy;

/// An opinion-producing persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticPersona {
    pub id: String,
    pub version: u32,
}

/// An aggregating persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgePersona {
    pub id: String,
    pub version: u32,
    pub strategy: AggregationStrategy,
}

/// A critic or a judge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Persona {
    Critic(CriticPersona),
    Judge(JudgePersona),
}

impl Persona {
    /// Version 0 critic.
    pub fn critic(id: impl Into<String>) -> Self {
        Persona::Critic(CriticPersona {
            id: id.into(),
            version: 0,
        })
    }

    /// Version 0 judge with the given strategy.
    pub fn judge(id: impl Into<String>, strategy: AggregationStrategy) -> Self {
        Persona::Judge(JudgePersona {
            id: id.into(),
            version: 0,
            strategy,
        })
    }

    pub fn id(&self) -> &str {
        match self {
            Persona::Critic(c) => &c.id,
            Persona::Judge(j) => &j.id,
        }
    }

    pub fn version(&self) -> u32 {
        match self {
            Persona::Critic(c) => c.version,
            Persona::Judge(j) => j.version,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Persona::Critic(_) => Role::Critic,
            Persona::Judge(_) => Role::Judge,
        }
    }

    /// Stable key for this persona version.
    pub fn persona_ref(&self) -> PersonaRef {
        PersonaRef::new(self.id(), self.version(), self.role())
    }

    /// The judge capability, if this persona is a judge.
    pub fn as_judge(&self) -> Option<&JudgePersona> {
        match self {
            Persona::Judge(j) => Some(j),
            Persona::Critic(_) => None,
        }
    }

    /// Build the replacement persona carrying `new_version`.
    ///
    /// Judges keep their aggregation strategy; the replacement's instructions
    /// are authored outside the core.
    pub fn successor(&self, new_version: u32) -> Self {
        match self {
            Persona::Critic(c) => Persona::Critic(CriticPersona {
                id: c.id.clone(),
                version: new_version,
            }),
            Persona::Judge(j) => Persona::Judge(JudgePersona {
                id: j.id.clone(),
                version: new_version,
                strategy: j.strategy,
            }),
        }
    }
}

impl JudgePersona {
    pub fn persona_ref(&self) -> PersonaRef {
        PersonaRef::new(&self.id, self.version, Role::Judge)
    }
}

impl CriticPersona {
    pub fn persona_ref(&self) -> PersonaRef {
        PersonaRef::new(&self.id, self.version, Role::Critic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successor_keeps_id_and_strategy() {
        let judge = Persona::judge("strict", AggregationStrategy::SkillDominant);
        let next = judge.successor(1);
        assert_eq!(next.id(), "strict");
        assert_eq!(next.version(), 1);
        assert_eq!(
            next.as_judge().map(|j| j.strategy),
            Some(AggregationStrategy::SkillDominant)
        );
        // The original is untouched.
        assert_eq!(judge.version(), 0);
    }

    #[test]
    fn persona_serializes_with_role_tag() {
        let critic = Persona::critic("cinephile");
        let json = serde_json::to_string(&critic).unwrap();
        assert!(json.contains("\"role\":\"critic\""));
        let back: Persona = serde_json::from_str(&json).unwrap();
        assert_eq!(back, critic);
    }
}
