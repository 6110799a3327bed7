//! Naive extractive summarization over retrieved sources.

use crate::model::Source;

/// Maximum sentences kept in a summary.
pub const MAX_SUMMARY_SENTENCES: usize = 4;

/// Condenses sources into a short summary.
///
/// Takes up to two period-delimited sentences from each source, truncates the
/// combined list to `max_sentences`, and joins them back together. An empty
/// source slice yields a fixed notice instead.
#[must_use]
pub fn summarize_sources(sources: &[Source], max_sentences: usize) -> String {
    if sources.is_empty() {
        return "No relevant documents were found to summarize.".to_string();
    }

    let mut sentences: Vec<&str> = Vec::new();
    for doc in sources {
        sentences.extend(
            doc.content
                .split('.')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .take(2),
        );
    }
    sentences.truncate(max_sentences);

    let mut summary = sentences.join(". ");
    if !summary.ends_with('.') {
        summary.push('.');
    }
    summary
}
