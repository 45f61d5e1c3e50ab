//! # tribunal-engine
//!
//! Wires the routing, aggregation, calibration, skill, storage and review
//! crates into one prediction service.
//!
//! A request walks `Requested → Routed → OpinionsCollected → Judged →
//! Calibrated → Logged`; feedback later moves the logged event to `Updated`
//! and feeds the calibrator, the skill tracker and the router.

pub mod builder;
pub mod engine;
pub mod error;
pub mod feedback;
mod opinions;

pub use builder::EngineBuilder;
pub use engine::{Engine, Prediction};
pub use error::{EngineError, EngineResult};
pub use feedback::FeedbackAck;
