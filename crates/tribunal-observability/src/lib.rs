//! # tribunal-observability
//!
//! Tracing subscriber setup, named structured events, span macros, and the
//! process-wide [`MetricsCollector`].

pub mod metrics;
pub mod tracing_setup;

pub use metrics::{MetricsCollector, MetricsSnapshot};
pub use tracing_setup::{init_tracing, init_tracing_with_filter};
