//! Structured log events for key system operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// A prediction was calibrated and written to the event log.
pub fn prediction_logged(event_id: &str, yhat: f64, sigma: f64, degraded: bool) {
    tracing::info!(
        event = "prediction_logged",
        event_id = %event_id,
        yhat = yhat,
        sigma = sigma,
        degraded = degraded,
        "prediction logged"
    );
}

/// A critic call timed out or failed and was dropped from the request.
pub fn critic_failed(event_id: &str, critic: &str, kind: &str, message: &str) {
    tracing::warn!(
        event = "critic_failed",
        event_id = %event_id,
        critic = %critic,
        kind = %kind,
        message = %message,
        "critic failed"
    );
}

/// A request finished without any critic opinion.
pub fn degradation_triggered(event_id: &str, failed_critics: usize) {
    tracing::warn!(
        event = "degradation_triggered",
        event_id = %event_id,
        failed_critics = failed_critics,
        "prediction degraded"
    );
}

pub fn feedback_applied(event_id: &str, true_rating: f64, residual: f64) {
    tracing::info!(
        event = "feedback_applied",
        event_id = %event_id,
        true_rating = true_rating,
        residual = residual,
        "feedback applied"
    );
}

pub fn feedback_rejected(event_id: &str, reason: &str) {
    tracing::warn!(
        event = "feedback_rejected",
        event_id = %event_id,
        reason = %reason,
        "feedback rejected"
    );
}

pub fn judge_replaced(old: &str, new: &str, reason: &str) {
    tracing::warn!(
        event = "judge_replaced",
        old = %old,
        new = %new,
        reason = %reason,
        "judge replaced"
    );
}

pub fn review_completed(window: usize, with_feedback: usize, overall_error: f64, replaced: bool) {
    tracing::info!(
        event = "review_completed",
        window = window,
        with_feedback = with_feedback,
        overall_error = overall_error,
        replaced = replaced,
        "review completed"
    );
}
