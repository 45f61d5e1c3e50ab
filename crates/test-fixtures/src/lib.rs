//! Test support for the Tribunal workspace: scripted critics, prediction
//! event builders, and JSON review scenarios.

pub mod events;
pub mod opinion_source;
pub mod scenarios;

pub use events::EventBuilder;
pub use opinion_source::{CriticScript, ScriptedOpinionSource};
pub use scenarios::{load_scenario, ReviewScenario};
