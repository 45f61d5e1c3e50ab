//! Seams to the external collaborators the decision loop depends on.

pub mod event_log;
pub mod opinion_source;
pub mod persona_store;
pub mod replacement_sink;

pub use event_log::IEventLog;
pub use opinion_source::{IOpinionSource, OpinionRequest};
pub use persona_store::IPersonaStore;
pub use replacement_sink::IReplacementSink;
