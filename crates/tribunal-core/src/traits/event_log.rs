use crate::errors::TribunalResult;
use crate::models::PredictionEvent;

/// Append-only record of prediction and feedback events.
pub trait IEventLog: Send + Sync {
    /// Append a logged event. Appending the same id twice is an error.
    fn append(&self, event: &PredictionEvent) -> TribunalResult<()>;

    /// The most recent `n` events in chronological order.
    fn read_window(&self, n: usize) -> TribunalResult<Vec<PredictionEvent>>;

    /// Look up a single event.
    fn get(&self, event_id: &str) -> TribunalResult<Option<PredictionEvent>>;

    /// Attach the true rating exactly once. Fails with `DuplicateFeedback`
    /// when a rating is already present and `UnknownEvent` when the id is
    /// missing or pruned.
    fn attach_feedback(&self, event_id: &str, true_rating: f64) -> TribunalResult<PredictionEvent>;

    /// Number of retained events.
    fn len(&self) -> TribunalResult<usize>;

    fn is_empty(&self) -> TribunalResult<bool> {
        Ok(self.len()? == 0)
    }
}
