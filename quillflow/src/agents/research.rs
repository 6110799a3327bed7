//! Research agent backed by the corpus search tool.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::agents::ResearchProvider;
use crate::errors::StageError;
use crate::memory::Memory;
use crate::model::Source;
use crate::tools::CorpusSearch;

/// Retrieves sources by keyword search over the built-in corpus and records
/// which titles were consulted.
pub struct ResearchAgent {
    search: CorpusSearch,
    memory: Arc<dyn Memory>,
}

impl ResearchAgent {
    /// Creates an agent searching the built-in corpus.
    #[must_use]
    pub fn new(memory: Arc<dyn Memory>) -> Self {
        Self {
            search: CorpusSearch::new(),
            memory,
        }
    }

    /// Replaces the search backend.
    #[must_use]
    pub fn with_search(mut self, search: CorpusSearch) -> Self {
        self.search = search;
        self
    }
}

#[async_trait]
impl ResearchProvider for ResearchAgent {
    async fn research(&self, query: &str, top_k: usize) -> Result<Vec<Source>, StageError> {
        info!(query = %query, top_k, "starting research step");
        let results = self.search.search(query, top_k);

        for source in &results {
            self.memory.add_fact(
                &format!("Consulted source: {}", source.title),
                Some(&source.title),
            );
        }

        info!(results = results.len(), "research step completed");
        Ok(results)
    }
}
