//! Span constructors for each engine entry point.

/// Create a prediction span.
#[macro_export]
macro_rules! predict_span {
    ($user_id:expr, $item_id:expr) => {
        tracing::info_span!("tribunal.predict", user_id = %$user_id, item_id = %$item_id)
    };
}

/// Create a feedback span.
#[macro_export]
macro_rules! feedback_span {
    ($event_id:expr) => {
        tracing::info_span!("tribunal.feedback", event_id = %$event_id)
    };
}

/// Create a review span.
#[macro_export]
macro_rules! review_span {
    ($window:expr) => {
        tracing::info_span!("tribunal.review", window = $window)
    };
}
