//! Immutable snapshot of the active persona versions.
//!
//! The router swaps whole snapshots, so a request sees either the old or the
//! new set, never a mix.

use std::collections::BTreeMap;

use tribunal_core::errors::RoutingError;
use tribunal_core::persona::{CriticPersona, JudgePersona, Persona, PersonaRef, Role};

#[derive(Debug, Clone, Default)]
pub struct PersonaRegistry {
    active: BTreeMap<String, Persona>,
    retired: Vec<PersonaRef>,
}

impl PersonaRegistry {
    /// Build a registry. Persona ids must be unique across roles.
    pub fn new(personas: impl IntoIterator<Item = Persona>) -> Result<Self, RoutingError> {
        let mut registry = Self::default();
        for persona in personas {
            registry.insert(persona)?;
        }
        Ok(registry)
    }

    fn insert(&mut self, persona: Persona) -> Result<(), RoutingError> {
        if self.active.contains_key(persona.id()) {
            return Err(RoutingError::DuplicatePersona {
                id: persona.id().to_string(),
            });
        }
        self.active.insert(persona.id().to_string(), persona);
        Ok(())
    }

    /// A copy with `persona` added.
    pub fn with_persona(&self, persona: Persona) -> Result<Self, RoutingError> {
        let mut next = self.clone();
        next.insert(persona)?;
        Ok(next)
    }

    /// A copy where `old` is retired and `replacement` takes its place.
    pub fn with_replacement(
        &self,
        old: &PersonaRef,
        replacement: Persona,
    ) -> Result<Self, RoutingError> {
        let current = self
            .active
            .get(&old.id)
            .ok_or_else(|| RoutingError::UnknownPersona { id: old.id.clone() })?;
        if current.version() != old.version || current.role() != old.role {
            return Err(RoutingError::StaleReplacement {
                target: old.to_string(),
                active: current.persona_ref().to_string(),
            });
        }
        if replacement.id() != old.id || replacement.role() != old.role {
            return Err(RoutingError::UnknownPersona {
                id: replacement.id().to_string(),
            });
        }
        if replacement.version() <= old.version {
            return Err(RoutingError::VersionNotIncreasing {
                id: old.id.clone(),
                old: old.version,
                new: replacement.version(),
            });
        }

        let mut next = self.clone();
        next.retired.push(old.clone());
        next.active.insert(old.id.clone(), replacement);
        Ok(next)
    }

    /// Active personas of `role`, ordered by id.
    pub fn active(&self, role: Role) -> Vec<&Persona> {
        self.active.values().filter(|p| p.role() == role).collect()
    }

    pub fn active_refs(&self, role: Role) -> Vec<PersonaRef> {
        self.active(role).into_iter().map(Persona::persona_ref).collect()
    }

    pub fn critics(&self) -> Vec<CriticPersona> {
        self.active
            .values()
            .filter_map(|p| match p {
                Persona::Critic(c) => Some(c.clone()),
                Persona::Judge(_) => None,
            })
            .collect()
    }

    pub fn judges(&self) -> Vec<JudgePersona> {
        self.active
            .values()
            .filter_map(Persona::as_judge)
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Persona> {
        self.active.get(id)
    }

    pub fn is_active(&self, persona: &PersonaRef) -> bool {
        self.active
            .get(&persona.id)
            .is_some_and(|p| p.persona_ref() == *persona)
    }

    pub fn retired(&self) -> &[PersonaRef] {
        &self.retired
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
