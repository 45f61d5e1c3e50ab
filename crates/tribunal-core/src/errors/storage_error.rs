/// Event log and persona store errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("event {event_id} already appended")]
    DuplicateEvent { event_id: String },

    #[error("event payload could not be decoded: {message}")]
    CorruptPayload { message: String },

    #[error("event log lock poisoned")]
    LockPoisoned,
}
