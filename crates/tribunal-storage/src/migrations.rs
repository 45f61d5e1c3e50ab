//! Schema migrations, tracked through `PRAGMA user_version`.

use rusqlite::Connection;

use tribunal_core::errors::TribunalResult;

use crate::to_storage_err;

pub const LATEST_VERSION: u32 = 1;

fn v001_prediction_events(conn: &Connection) -> TribunalResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS prediction_events (
            seq          INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id     TEXT NOT NULL UNIQUE,
            timestamp    TEXT NOT NULL,
            user_id      TEXT NOT NULL,
            item_id      TEXT NOT NULL,
            context_key  TEXT NOT NULL,
            yhat         REAL NOT NULL,
            sigma        REAL NOT NULL,
            degraded     INTEGER NOT NULL,
            stage        TEXT NOT NULL,
            true_rating  REAL,
            payload      TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_prediction_events_user ON prediction_events(user_id);
        CREATE INDEX IF NOT EXISTS idx_prediction_events_item ON prediction_events(item_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn current_version(conn: &Connection) -> TribunalResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Apply every migration newer than the database's `user_version`.
pub fn run_migrations(conn: &Connection) -> TribunalResult<()> {
    let version = current_version(conn)?;
    if version < 1 {
        v001_prediction_events(conn)?;
        tracing::debug!(version = 1, "applied migration");
    }
    if version < LATEST_VERSION {
        conn.pragma_update(None, "user_version", LATEST_VERSION)
            .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(())
}
