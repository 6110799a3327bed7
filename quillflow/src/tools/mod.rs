//! Deterministic tools the agents delegate to.
//!
//! This module provides:
//! - Keyword search over the built-in corpus
//! - Extractive summarization
//! - Claim and evidence extraction strategies
//! - Markdown rendering of the final response

mod extract;
mod format;
mod search;
mod summarize;

pub use extract::{
    detect, ClaimExtraction, Extraction, KeywordClaimExtractor, PatternClaimExtractor,
    CLAIM_KEYWORDS,
};
pub use format::format_markdown;
pub use search::{built_in_corpus, CorpusSearch};
pub use summarize::{summarize_sources, MAX_SUMMARY_SENTENCES};
