use crate::errors::TribunalResult;
use crate::persona::{Persona, Role};

/// Durable registry of persona definitions.
pub trait IPersonaStore: Send + Sync {
    /// Latest version of every persona with the given role, in registration order.
    fn load_active_personas(&self, role: Role) -> TribunalResult<Vec<Persona>>;

    /// Reserve `new_version` for `persona_id` and return the new persona.
    fn register_new_version(&self, persona_id: &str, new_version: u32) -> TribunalResult<Persona>;
}
