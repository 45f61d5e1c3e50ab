/// Errors returned to callers submitting ground-truth feedback.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeedbackError {
    #[error("feedback already recorded for event {event_id}")]
    DuplicateFeedback { event_id: String },

    #[error("unknown or expired event {event_id}")]
    UnknownEvent { event_id: String },

    #[error("rating {rating} outside the valid range [0, {max}]")]
    InvalidRating { rating: f64, max: f64 },
}
