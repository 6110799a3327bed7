//! Quality scoring for generated responses.
//!
//! The gate scores a response from the analysis that produced it and the
//! response text itself. Scoring is pure: the same inputs always produce the
//! same score. A score below the gate's threshold requests one regeneration
//! pass; the half-open comparison means a score equal to the threshold
//! passes.

use tracing::info;

use crate::model::Analysis;

/// Default minimum score a response must reach to be accepted as-is.
pub const DEFAULT_QUALITY_THRESHOLD: f64 = 0.6;

/// A quality score in `[0.0, 1.0]`, rounded to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct QualityScore {
    value: f64,
}

impl QualityScore {
    /// Returns the numeric score.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Returns true when the score falls strictly below `threshold`.
    #[must_use]
    pub fn should_retry(&self, threshold: f64) -> bool {
        self.value < threshold
    }
}

/// Scores responses and decides whether to regenerate.
///
/// The score is additive: `0.5` when the analysis extracted at least one
/// claim, `0.3` when the response is longer than 50 whitespace-separated
/// tokens, and a further `0.2` when it is longer than 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityGate {
    threshold: f64,
}

impl Default for QualityGate {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_QUALITY_THRESHOLD,
        }
    }
}

impl QualityGate {
    /// Creates a gate with the default threshold.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the threshold, clamped to `[0.0, 1.0]`.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Returns the threshold.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Scores a response against the analysis that produced it.
    #[must_use]
    pub fn score(&self, analysis: &Analysis, response: &str) -> QualityScore {
        let mut value: f64 = 0.0;

        if !analysis.claims.is_empty() {
            value += 0.5;
        }

        let tokens = response.split_whitespace().count();
        if tokens > 50 {
            value += 0.3;
        }
        if tokens > 100 {
            value += 0.2;
        }

        let value = (value.min(1.0) * 100.0).round() / 100.0;
        QualityScore { value }
    }

    /// Returns true when the score falls below the threshold.
    pub fn should_retry(&self, score: QualityScore) -> bool {
        let retry = score.should_retry(self.threshold);
        info!(
            score = score.value(),
            threshold = self.threshold,
            retry,
            "quality gate evaluated response"
        );
        retry
    }
}
