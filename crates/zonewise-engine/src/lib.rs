//! # zonewise-engine
//!
//! One chat turn: zoning record lookup, prompt assembly, generation, artifact
//! extraction, marker sanitizing and detached persistence.

pub mod classify;
pub mod error;
pub mod extract;
pub mod gazetteer;
pub mod generation;
pub mod lookup;
pub mod persist;
pub mod pipeline;
pub mod prompt;
pub mod sanitize;

pub use error::EngineError;
pub use lookup::ZoningSource;
pub use persist::{Exchange, ExchangeSink, SqliteSink};
pub use pipeline::{AssistantConfig, TurnRequest, TurnResponse, ZoningAssistant};
