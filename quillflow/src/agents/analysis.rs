//! Analysis agent: summarization plus claim extraction.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::agents::AnalysisProvider;
use crate::errors::StageError;
use crate::memory::Memory;
use crate::model::{Analysis, Source};
use crate::tools::{detect, summarize_sources, ClaimExtraction, MAX_SUMMARY_SENTENCES};

/// Condenses sources into a summary and classifies its sentences into claims
/// and evidence. Extracted claims are recorded as facts.
pub struct AnalysisAgent {
    extractor: Arc<dyn ClaimExtraction>,
    memory: Arc<dyn Memory>,
}

impl AnalysisAgent {
    /// Creates an agent using the extraction strategy chosen by
    /// [`detect`].
    #[must_use]
    pub fn new(memory: Arc<dyn Memory>) -> Self {
        Self {
            extractor: detect(),
            memory,
        }
    }

    /// Replaces the extraction strategy.
    #[must_use]
    pub fn with_extractor(mut self, extractor: Arc<dyn ClaimExtraction>) -> Self {
        self.extractor = extractor;
        self
    }
}

#[async_trait]
impl AnalysisProvider for AnalysisAgent {
    async fn analyze(&self, query: &str, sources: &[Source]) -> Result<Analysis, StageError> {
        info!(query = %query, sources = sources.len(), "starting analysis step");

        let summary = summarize_sources(sources, MAX_SUMMARY_SENTENCES);
        let extraction = self.extractor.extract(&summary);

        for claim in &extraction.claims {
            self.memory.add_fact(claim, Some("analysis_summary"));
        }

        info!(
            claims = extraction.claims.len(),
            confidence = extraction.confidence,
            "analysis step completed"
        );
        Ok(Analysis::new(
            summary,
            extraction.claims,
            extraction.evidence,
            extraction.confidence,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingMemory;

    #[tokio::test]
    async fn test_analyze_summarizes_and_extracts() {
        let memory = Arc::new(RecordingMemory::new());
        let agent = AnalysisAgent::new(memory);

        let sources = vec![Source::new(
            "Doc",
            "Water is wet. Measured in the lab on Tuesday. A third sentence.",
        )];
        let analysis = agent.analyze("q", &sources).await.unwrap();

        assert_eq!(analysis.summary, "Water is wet. Measured in the lab on Tuesday.");
        assert_eq!(analysis.claims, vec!["Water is wet".to_string()]);
        assert_eq!(
            analysis.evidence,
            vec!["Measured in the lab on Tuesday".to_string()]
        );
        assert!((analysis.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_analyze_records_claims_as_facts() {
        let memory = Arc::new(RecordingMemory::new());
        let agent = AnalysisAgent::new(memory.clone());

        let sources = vec![Source::new("Doc", "Agents can plan ahead. Observed in trials.")];
        agent.analyze("q", &sources).await.unwrap();

        let facts = memory.facts();
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].fact, "Agents can plan ahead");
        assert_eq!(facts[0].source.as_deref(), Some("analysis_summary"));
    }

    #[tokio::test]
    async fn test_analyze_with_no_sources_uses_notice_summary() {
        let memory = Arc::new(RecordingMemory::new());
        let agent = AnalysisAgent::new(memory.clone());

        let analysis = agent.analyze("q", &[]).await.unwrap();

        assert_eq!(
            analysis.summary,
            "No relevant documents were found to summarize."
        );
        assert!(analysis.claims.is_empty());
        assert!(memory.facts().is_empty());
    }
}
