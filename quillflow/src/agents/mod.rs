//! Stage collaborators and their trait seams.
//!
//! The controller talks to each stage through one of the traits below, so
//! tests can substitute scripted doubles and callers can swap in their own
//! retrieval or rendering backends. The default implementations delegate to
//! the deterministic tools in [`crate::tools`] and record what they saw in
//! the shared [`Memory`](crate::memory::Memory) store.

mod analysis;
mod research;
mod writer;

pub use analysis::AnalysisAgent;
pub use research::ResearchAgent;
pub use writer::WriterAgent;

use async_trait::async_trait;

use crate::errors::StageError;
use crate::model::{Analysis, Source};

/// Retrieves sources for a query.
#[async_trait]
pub trait ResearchProvider: Send + Sync {
    /// Returns up to `top_k` sources relevant to `query`.
    async fn research(&self, query: &str, top_k: usize) -> Result<Vec<Source>, StageError>;
}

/// Produces structured findings from retrieved sources.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Summarizes `sources` and classifies the summary's sentences.
    async fn analyze(&self, query: &str, sources: &[Source]) -> Result<Analysis, StageError>;
}

/// Renders the final response text.
#[async_trait]
pub trait ResponseWriter: Send + Sync {
    /// Formats `analysis` and `sources` into the answer for `query`.
    async fn write(
        &self,
        query: &str,
        analysis: &Analysis,
        sources: &[Source],
    ) -> Result<String, StageError>;
}
