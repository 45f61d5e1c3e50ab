//! # tribunal-calibration
//!
//! Fuses judge estimates into a final `(yhat, sigma)` with a small online
//! linear model, and learns from feedback one event at a time.

mod applied;
pub mod calibrator;
pub mod features;

pub use calibrator::{CalibratedPrediction, Calibrator, CalibratorState, UpdateOutcome};
pub use features::{featurize, genre_hash, FeatureVector};
