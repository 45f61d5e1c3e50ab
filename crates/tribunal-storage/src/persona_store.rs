//! In-process persona store keeping every version ever registered.

use std::collections::BTreeMap;
use std::sync::RwLock;

use tribunal_core::errors::{RoutingError, StorageError, TribunalResult};
use tribunal_core::persona::{Persona, Role};
use tribunal_core::traits::IPersonaStore;

pub struct InMemoryPersonaStore {
    versions: RwLock<BTreeMap<String, Vec<Persona>>>,
}

impl InMemoryPersonaStore {
    pub fn new(personas: impl IntoIterator<Item = Persona>) -> Self {
        let mut versions: BTreeMap<String, Vec<Persona>> = BTreeMap::new();
        for persona in personas {
            versions.entry(persona.id().to_string()).or_default().push(persona);
        }
        for history in versions.values_mut() {
            history.sort_by_key(Persona::version);
        }
        Self {
            versions: RwLock::new(versions),
        }
    }

    /// Every version of `persona_id`, oldest first.
    pub fn versions(&self, persona_id: &str) -> TribunalResult<Vec<Persona>> {
        let versions = self.versions.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(versions.get(persona_id).cloned().unwrap_or_default())
    }
}

impl IPersonaStore for InMemoryPersonaStore {
    fn load_active_personas(&self, role: Role) -> TribunalResult<Vec<Persona>> {
        let versions = self.versions.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(versions
            .values()
            .filter_map(|history| history.last())
            .filter(|p| p.role() == role)
            .cloned()
            .collect())
    }

    fn register_new_version(&self, persona_id: &str, new_version: u32) -> TribunalResult<Persona> {
        let mut versions = self.versions.write().map_err(|_| StorageError::LockPoisoned)?;
        let history = versions
            .get_mut(persona_id)
            .ok_or_else(|| RoutingError::UnknownPersona {
                id: persona_id.to_string(),
            })?;
        let latest = history.last().ok_or_else(|| RoutingError::UnknownPersona {
            id: persona_id.to_string(),
        })?;
        if new_version <= latest.version() {
            return Err(RoutingError::VersionNotIncreasing {
                id: persona_id.to_string(),
                old: latest.version(),
                new: new_version,
            }
            .into());
        }
        let next = latest.successor(new_version);
        history.push(next.clone());
        tracing::info!(persona = %next.persona_ref(), "registered new persona version");
        Ok(next)
    }
}
