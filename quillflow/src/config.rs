//! Pipeline configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::controller::DEFAULT_TOP_K;
use crate::executor::RetryPolicy;
use crate::memory::{DEFAULT_MAX_ENTRIES, DEFAULT_MEMORY_FILE};
use crate::quality::DEFAULT_QUALITY_THRESHOLD;

/// Settings used to assemble a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Retry policy applied to every stage.
    pub retry: RetryPolicy,
    /// Minimum quality score accepted without regeneration.
    pub quality_threshold: f64,
    /// Number of sources requested from the research stage.
    pub top_k: usize,
    /// Path of the JSON memory file.
    pub memory_path: PathBuf,
    /// Per-list cap on stored memory entries.
    pub max_memory_entries: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            quality_threshold: DEFAULT_QUALITY_THRESHOLD,
            top_k: DEFAULT_TOP_K,
            memory_path: PathBuf::from(DEFAULT_MEMORY_FILE),
            max_memory_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl PipelineConfig {
    /// Creates a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the quality threshold.
    #[must_use]
    pub const fn with_quality_threshold(mut self, threshold: f64) -> Self {
        self.quality_threshold = threshold;
        self
    }

    /// Sets the research result count.
    #[must_use]
    pub const fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Sets the memory file path.
    #[must_use]
    pub fn with_memory_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.memory_path = path.into();
        self
    }

    /// Sets the per-list memory cap.
    #[must_use]
    pub const fn with_max_memory_entries(mut self, max_entries: usize) -> Self {
        self.max_memory_entries = max_entries;
        self
    }
}
