use serde::{Deserialize, Serialize};

use super::defaults;

/// Event log configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `"memory"` or `"sqlite"`.
    pub backend: String,
    /// SQLite database path (sqlite backend only).
    pub db_path: String,
    /// Events retained before the oldest are pruned.
    pub retention_events: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: defaults::DEFAULT_STORAGE_BACKEND.to_string(),
            db_path: defaults::DEFAULT_DB_FILENAME.to_string(),
            retention_events: defaults::DEFAULT_RETENTION_EVENTS,
        }
    }
}
