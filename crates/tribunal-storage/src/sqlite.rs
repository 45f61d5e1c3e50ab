//! SQLite-backed event log. Each event is stored as a JSON payload next to
//! a few indexed columns.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use tribunal_core::errors::{FeedbackError, StorageError, TribunalError, TribunalResult};
use tribunal_core::models::PredictionEvent;
use tribunal_core::traits::IEventLog;

use crate::{migrations, pragmas, record_feedback, to_storage_err};

pub struct SqliteEventLog {
    conn: Mutex<Connection>,
    retention: usize,
}

fn sql_err(e: rusqlite::Error) -> TribunalError {
    to_storage_err(e.to_string())
}

fn decode(payload: &str) -> TribunalResult<PredictionEvent> {
    serde_json::from_str(payload).map_err(|e| {
        StorageError::CorruptPayload {
            message: e.to_string(),
        }
        .into()
    })
}

impl SqliteEventLog {
    /// Open (or create) a database file.
    pub fn open(path: &Path, retention: usize) -> TribunalResult<Self> {
        let conn = Connection::open(path).map_err(sql_err)?;
        Self::initialize(conn, retention)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory(retention: usize) -> TribunalResult<Self> {
        let conn = Connection::open_in_memory().map_err(sql_err)?;
        Self::initialize(conn, retention)
    }

    fn initialize(conn: Connection, retention: usize) -> TribunalResult<Self> {
        pragmas::apply_pragmas(&conn)?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            retention: retention.max(1),
        })
    }

    fn conn(&self) -> TribunalResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned.into())
    }

    /// Whether the underlying connection runs in WAL mode.
    pub fn is_wal(&self) -> TribunalResult<bool> {
        pragmas::verify_wal_mode(&*self.conn()?)
    }

    fn prune(&self, conn: &Connection) -> TribunalResult<usize> {
        let removed = conn
            .execute(
                "DELETE FROM prediction_events
                 WHERE seq <= (SELECT MAX(seq) FROM prediction_events) - ?1",
                params![self.retention as i64],
            )
            .map_err(sql_err)?;
        if removed > 0 {
            tracing::debug!(removed, "pruned prediction events");
        }
        Ok(removed)
    }
}

impl IEventLog for SqliteEventLog {
    fn append(&self, event: &PredictionEvent) -> TribunalResult<()> {
        let payload = serde_json::to_string(event)?;
        let conn = self.conn()?;
        let result = conn.execute(
            "INSERT INTO prediction_events
                (event_id, timestamp, user_id, item_id, context_key, yhat, sigma,
                 degraded, stage, true_rating, payload)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                event.event_id,
                event.timestamp.to_rfc3339(),
                event.user_id(),
                event.item_id(),
                event.context_key,
                event.yhat,
                event.sigma,
                event.degraded,
                event.stage.as_str(),
                event.true_rating,
                payload,
            ],
        );
        match result {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                return Err(StorageError::DuplicateEvent {
                    event_id: event.event_id.clone(),
                }
                .into());
            }
            Err(e) => return Err(sql_err(e)),
        }
        self.prune(&conn)?;
        Ok(())
    }

    fn read_window(&self, n: usize) -> TribunalResult<Vec<PredictionEvent>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT payload FROM (
                    SELECT seq, payload FROM prediction_events ORDER BY seq DESC LIMIT ?1
                 ) ORDER BY seq ASC",
            )
            .map_err(sql_err)?;
        let payloads = stmt
            .query_map(params![n as i64], |row| row.get::<_, String>(0))
            .map_err(sql_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(sql_err)?;
        payloads.iter().map(|p| decode(p)).collect()
    }

    fn get(&self, event_id: &str) -> TribunalResult<Option<PredictionEvent>> {
        let conn = self.conn()?;
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM prediction_events WHERE event_id = ?1",
                params![event_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(sql_err)?;
        payload.as_deref().map(decode).transpose()
    }

    fn attach_feedback(&self, event_id: &str, true_rating: f64) -> TribunalResult<PredictionEvent> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(sql_err)?;
        let payload: Option<String> = tx
            .query_row(
                "SELECT payload FROM prediction_events WHERE event_id = ?1",
                params![event_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(sql_err)?;
        let mut event = match payload {
            Some(p) => decode(&p)?,
            None => {
                return Err(FeedbackError::UnknownEvent {
                    event_id: event_id.to_string(),
                }
                .into())
            }
        };
        record_feedback(&mut event, true_rating)?;

        tx.execute(
            "UPDATE prediction_events SET true_rating = ?1, stage = ?2, payload = ?3
             WHERE event_id = ?4",
            params![
                true_rating,
                event.stage.as_str(),
                serde_json::to_string(&event)?,
                event_id
            ],
        )
        .map_err(sql_err)?;
        tx.commit().map_err(sql_err)?;
        Ok(event)
    }

    fn len(&self) -> TribunalResult<usize> {
        let conn = self.conn()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM prediction_events", [], |row| row.get(0))
            .map_err(sql_err)?;
        Ok(count as usize)
    }
}
