//! Domain data passed between pipeline stages.

use serde::{Deserialize, Serialize};

/// A retrieved document consulted while answering a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Document title.
    pub title: String,
    /// Document body text.
    pub content: String,
}

impl Source {
    /// Creates a new source.
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Structured findings produced by the analysis stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Condensed summary of the consulted sources.
    pub summary: String,
    /// Assertive statements extracted from the sources.
    pub claims: Vec<String>,
    /// Supporting statements that back the claims.
    pub evidence: Vec<String>,
    /// Fraction of sentences that were classified, in `[0.0, 1.0]`.
    pub confidence: f64,
}

impl Analysis {
    /// Creates a new analysis. Confidence is clamped to `[0.0, 1.0]`.
    #[must_use]
    pub fn new(
        summary: impl Into<String>,
        claims: Vec<String>,
        evidence: Vec<String>,
        confidence: f64,
    ) -> Self {
        Self {
            summary: summary.into(),
            claims,
            evidence,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}
