//! # tribunal-skill
//!
//! Tracks how accurate each persona version has been, as an exponentially
//! weighted mean and variance of its absolute error.

pub mod record;
pub mod tracker;

pub use record::SkillRecord;
pub use tracker::SkillTracker;
