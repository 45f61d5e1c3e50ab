//! # tribunal-review
//!
//! Audits judge accuracy over a window of prediction events, issues at most
//! one replacement directive per review, and keeps a bounded report history.

pub mod cycle;
pub mod history;
pub mod quality;
pub mod recommendations;
pub mod reviewer;
pub mod stats;

pub use cycle::{ReviewCycle, ReviewOutcome};
pub use history::ReviewHistory;
pub use quality::prediction_quality;
pub use reviewer::{run_review, run_review_filtered};
