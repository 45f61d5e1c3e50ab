//! # tribunal-aggregation
//!
//! Turns critic opinions into one judge-level estimate per judge.
//! Each judge weights critics according to its [`AggregationStrategy`].
//!
//! [`AggregationStrategy`]: tribunal_core::persona::AggregationStrategy

pub mod aggregator;
pub mod stats;
pub mod weights;

pub use aggregator::Aggregator;
pub use weights::{normalize, raw_weights, RawWeights};
