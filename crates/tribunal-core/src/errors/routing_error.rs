/// Router and persona registry errors.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("no {role} personas are registered")]
    NoPersonasAvailable { role: String },

    #[error("persona {id} is already registered")]
    DuplicatePersona { id: String },

    #[error("persona {id} is not registered")]
    UnknownPersona { id: String },

    #[error("replacement targets {target} but the active version is {active}")]
    StaleReplacement { target: String, active: String },

    #[error("replacement for {id} must increase the version: {old} -> {new}")]
    VersionNotIncreasing { id: String, old: u32, new: u32 },
}
