//! Connection settings for the event log database.

use std::time::Duration;

use rusqlite::Connection;

use tribunal_core::errors::TribunalResult;

use crate::to_storage_err;

/// Applied after the journal mode, in order.
const SETTINGS: &[(&str, &str)] = &[
    ("synchronous", "NORMAL"),
    ("cache_size", "-16000"),
    ("temp_store", "MEMORY"),
];

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Switch the connection to WAL and apply [`SETTINGS`].
///
/// In-memory databases cannot use WAL and keep the `memory` journal.
pub fn apply_pragmas(conn: &Connection) -> TribunalResult<()> {
    let mode: String = conn
        .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    for &(name, value) in SETTINGS {
        conn.pragma_update(None, name, value)
            .map_err(|e| to_storage_err(format!("PRAGMA {name}: {e}")))?;
    }
    conn.busy_timeout(BUSY_TIMEOUT)
        .map_err(|e| to_storage_err(e.to_string()))?;
    tracing::debug!(journal_mode = %mode, "sqlite connection configured");
    Ok(())
}

pub fn journal_mode(conn: &Connection) -> TribunalResult<String> {
    conn.pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn verify_wal_mode(conn: &Connection) -> TribunalResult<bool> {
    Ok(journal_mode(conn)?.eq_ignore_ascii_case("wal"))
}
