//! Claim and evidence extraction strategies.
//!
//! Extraction strategies classify the sentences of a text into assertive
//! claims and supporting evidence. Two implementations exist: a regex-based
//! one that matches claim verbs on word boundaries, and a plain substring
//! matcher. [`detect`] probes the regex strategy at startup and returns the
//! substring matcher only when compilation is unavailable, so the choice is
//! made once rather than per call.

use std::sync::Arc;

use regex::Regex;
use tracing::{debug, warn};

/// Verbs that mark a sentence as a claim.
pub const CLAIM_KEYWORDS: [&str; 6] = ["is", "are", "will", "can", "should", "must"];

/// Sentence classification produced by an extraction strategy.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extraction {
    /// Sentences containing a claim verb.
    pub claims: Vec<String>,
    /// Remaining sentences.
    pub evidence: Vec<String>,
    /// Fraction of sentences assigned to either bucket, in `[0.0, 1.0]`.
    pub confidence: f64,
}

/// Strategy interface for classifying sentences.
pub trait ClaimExtraction: Send + Sync {
    /// Classifies `text` sentence by sentence.
    fn extract(&self, text: &str) -> Extraction;

    /// Short strategy name for logs.
    fn name(&self) -> &'static str;
}

fn classify(text: &str, is_claim: impl Fn(&str) -> bool) -> Extraction {
    let sentences: Vec<&str> = text
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let mut claims = Vec::new();
    let mut evidence = Vec::new();
    for sentence in &sentences {
        if is_claim(sentence) {
            claims.push((*sentence).to_string());
        } else {
            evidence.push((*sentence).to_string());
        }
    }

    let total = sentences.len();
    let classified = claims.len() + evidence.len();
    let confidence = if total > 0 {
        #[allow(clippy::cast_precision_loss)]
        let fraction = classified as f64 / total as f64;
        (fraction * 100.0).round() / 100.0
    } else {
        0.0
    };

    Extraction {
        claims,
        evidence,
        confidence,
    }
}

/// Classifies sentences by matching claim verbs on word boundaries.
#[derive(Debug, Clone)]
pub struct PatternClaimExtractor {
    pattern: Regex,
}

impl PatternClaimExtractor {
    /// Compiles the claim verb pattern.
    ///
    /// # Errors
    ///
    /// Returns the regex error when the pattern cannot be compiled.
    pub fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(r"\b(?:is|are|will|can|should|must)\b")?,
        })
    }
}

impl ClaimExtraction for PatternClaimExtractor {
    fn extract(&self, text: &str) -> Extraction {
        classify(text, |sentence| {
            self.pattern.is_match(&sentence.to_lowercase())
        })
    }

    fn name(&self) -> &'static str {
        "pattern"
    }
}

/// Classifies sentences by space-padded substring matching.
///
/// A claim verb only counts when surrounded by spaces, so verbs at the very
/// start or end of a sentence are missed. Kept as the fallback strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClaimExtractor;

impl ClaimExtraction for KeywordClaimExtractor {
    fn extract(&self, text: &str) -> Extraction {
        classify(text, |sentence| {
            let lowered = sentence.to_lowercase();
            CLAIM_KEYWORDS
                .iter()
                .any(|kw| lowered.contains(&format!(" {kw} ")))
        })
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}

/// Selects an extraction strategy at startup.
///
/// Prefers the pattern strategy and falls back to keyword matching when the
/// pattern cannot be compiled.
#[must_use]
pub fn detect() -> Arc<dyn ClaimExtraction> {
    match PatternClaimExtractor::compile() {
        Ok(extractor) => {
            debug!(strategy = extractor.name(), "selected claim extraction strategy");
            Arc::new(extractor)
        }
        Err(err) => {
            warn!(error = %err, "pattern strategy unavailable, falling back to keyword matching");
            Arc::new(KeywordClaimExtractor)
        }
    }
}
