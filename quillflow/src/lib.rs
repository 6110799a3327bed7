//! # Quillflow
//!
//! A resilient research-answer pipeline: retrieve sources, analyze them, and
//! write a markdown answer, with retries and fallbacks at every stage.
//!
//! Quillflow turns a user query into a structured response through three
//! cooperating agents, with support for:
//!
//! - **Staged execution**: Research, analysis, and writing run through one
//!   executor with bounded retries and guaranteed fallbacks
//! - **Quality gating**: Responses below a score threshold trigger a single
//!   regeneration pass
//! - **Typed task routing**: Stage inputs travel as payload variants that
//!   cannot be paired with the wrong stage
//! - **Event-driven observability**: Phase transitions, attempts, fallbacks,
//!   and quality decisions are emitted to a pluggable sink
//! - **Persistent memory**: Consulted sources, extracted claims, and finished
//!   conversations accumulate in a JSON-backed store
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use quillflow::prelude::*;
//!
//! // Assemble a pipeline with default settings
//! let orchestrator = Orchestrator::with_config(
//!     PipelineConfig::new().with_memory_path("memory_store.json"),
//! );
//!
//! // Answer a query
//! let response = orchestrator.run("What is agentic AI?").await;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod agents;
pub mod config;
pub mod controller;
pub mod errors;
pub mod events;
pub mod executor;
pub mod memory;
pub mod model;
pub mod orchestrator;
pub mod protocol;
pub mod quality;
pub mod testing;
pub mod tools;

#[cfg(test)]
mod integration_tests;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::agents::{
        AnalysisAgent, AnalysisProvider, ResearchAgent, ResearchProvider, ResponseWriter,
        WriterAgent,
    };
    pub use crate::config::PipelineConfig;
    pub use crate::controller::Controller;
    pub use crate::errors::{PipelineError, StageError};
    pub use crate::events::{
        CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink, PipelineEvent,
        PipelinePhase,
    };
    pub use crate::executor::{RetryPolicy, StageExecutor};
    pub use crate::memory::{JsonFileMemory, Memory, MemoryContext};
    pub use crate::model::{Analysis, Source};
    pub use crate::orchestrator::Orchestrator;
    pub use crate::protocol::{AgentRole, TaskKind, TaskMessage, TaskPayload};
    pub use crate::quality::{QualityGate, QualityScore};
}

#[cfg(test)]
mod tests {
    #[test]
    fn library_compiles() {
        assert!(true);
    }
}
