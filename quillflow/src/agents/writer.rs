//! Writer agent: markdown rendering and conversation recording.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::agents::ResponseWriter;
use crate::errors::StageError;
use crate::memory::Memory;
use crate::model::{Analysis, Source};
use crate::tools::format_markdown;

/// Renders the final markdown response and records the query-response pair.
pub struct WriterAgent {
    memory: Arc<dyn Memory>,
}

impl WriterAgent {
    /// Creates a writer recording conversations into `memory`.
    #[must_use]
    pub fn new(memory: Arc<dyn Memory>) -> Self {
        Self { memory }
    }
}

#[async_trait]
impl ResponseWriter for WriterAgent {
    async fn write(
        &self,
        query: &str,
        analysis: &Analysis,
        sources: &[Source],
    ) -> Result<String, StageError> {
        info!(query = %query, "starting writing step");

        let response = format_markdown(
            query,
            &analysis.summary,
            &analysis.claims,
            &analysis.evidence,
            sources,
        );
        self.memory.add_conversation(query, &response);

        info!(chars = response.chars().count(), "writing step completed");
        Ok(response)
    }
}
