//! Top-level facade assembling memory, agents, and the controller.

use std::sync::Arc;

use tracing::info;

use crate::agents::{AnalysisAgent, ResearchAgent, WriterAgent};
use crate::config::PipelineConfig;
use crate::controller::Controller;
use crate::events::EventSink;
use crate::memory::{JsonFileMemory, Memory};
use crate::quality::QualityGate;

/// Owns a fully wired pipeline and answers queries with it.
///
/// The orchestrator builds the memory store once and threads it into each
/// agent at construction time. Every query reuses the same wiring, so facts
/// and conversations accumulate across calls.
pub struct Orchestrator {
    controller: Controller,
    memory: Arc<dyn Memory>,
}

impl Orchestrator {
    /// Creates an orchestrator with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// Creates an orchestrator from `config`, backed by a JSON file store.
    #[must_use]
    pub fn with_config(config: PipelineConfig) -> Self {
        let memory: Arc<dyn Memory> = Arc::new(
            JsonFileMemory::new(&config.memory_path).with_max_entries(config.max_memory_entries),
        );
        Self::with_memory(config, memory)
    }

    /// Creates an orchestrator from `config` over a caller-supplied store.
    #[must_use]
    pub fn with_memory(config: PipelineConfig, memory: Arc<dyn Memory>) -> Self {
        let research = Arc::new(ResearchAgent::new(memory.clone()));
        let analysis = Arc::new(AnalysisAgent::new(memory.clone()));
        let writer = Arc::new(WriterAgent::new(memory.clone()));

        let controller = Controller::new(research, analysis, writer)
            .with_retry_policy(config.retry)
            .with_quality_gate(QualityGate::new().with_threshold(config.quality_threshold))
            .with_top_k(config.top_k);

        Self { controller, memory }
    }

    /// Sets the event sink observed by the pipeline.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.controller = self.controller.with_event_sink(sink);
        self
    }

    /// Answers a query. Always returns text.
    pub async fn run(&self, query: &str) -> String {
        info!(query = %query, "orchestrator starting query");
        let response = self.controller.handle(query).await;
        info!(chars = response.chars().count(), "orchestrator finished query");
        response
    }

    /// Returns the shared memory store.
    #[must_use]
    pub fn memory(&self) -> Arc<dyn Memory> {
        self.memory.clone()
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}
