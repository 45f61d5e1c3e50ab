use std::fmt;

use serde::{Deserialize, Serialize};

/// Persona role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Critic,
    Judge,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Critic => "critic",
            Role::Judge => "judge",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one immutable persona version. Displays as `id@vN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonaRef {
    pub id: String,
    pub version: u32,
    pub role: Role,
}

impl PersonaRef {
    pub fn new(id: impl Into<String>, version: u32, role: Role) -> Self {
        Self {
            id: id.into(),
            version,
            role,
        }
    }

    pub fn critic(id: impl Into<String>, version: u32) -> Self {
        Self::new(id, version, Role::Critic)
    }

    pub fn judge(id: impl Into<String>, version: u32) -> Self {
        Self::new(id, version, Role::Judge)
    }

    /// The same persona id at another version.
    pub fn with_version(&self, version: u32) -> Self {
        Self::new(self.id.clone(), version, self.role)
    }
}

impl fmt::Display for PersonaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@v{}", self.id, self.version)
    }
}
