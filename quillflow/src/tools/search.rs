//! Keyword search over an in-process document corpus.

use crate::model::Source;

/// Returns the documents bundled with the crate.
///
/// The corpus is small and fixed so the pipeline runs offline and tests are
/// deterministic.
#[must_use]
pub fn built_in_corpus() -> Vec<Source> {
    vec![
        Source::new(
            "Introduction to Agentic AI Systems",
            "Agentic AI systems use autonomous agents that can plan, act, and collaborate. \
             They often include a controller, memory, and tools.",
        ),
        Source::new(
            "Multi-Agent Orchestration Basics",
            "Multi-agent orchestration coordinates multiple specialized agents. \
             A controller delegates tasks, and agents use tools to complete subtasks.",
        ),
        Source::new(
            "Reinforcement Learning for Improvement",
            "Reinforcement learning can be used to improve an agent's behavior over time. \
             Feedback signals can adjust strategies or prompt configurations.",
        ),
        Source::new(
            "Fact-Checking in Research Assistants",
            "Research assistants should cross-check sources, extract claims, and map evidence \
             to those claims for improved reliability.",
        ),
    ]
}

/// Scores corpus documents against a query by keyword overlap.
///
/// A query word counts toward a document's score when it appears anywhere in
/// the lowercased title or content. Words of two characters or fewer are
/// ignored. Documents with a zero score are dropped; ties keep corpus order.
#[derive(Debug, Clone)]
pub struct CorpusSearch {
    corpus: Vec<Source>,
}

impl Default for CorpusSearch {
    fn default() -> Self {
        Self {
            corpus: built_in_corpus(),
        }
    }
}

impl CorpusSearch {
    /// Creates a search over the built-in corpus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a search over a caller-supplied corpus.
    #[must_use]
    pub const fn with_corpus(corpus: Vec<Source>) -> Self {
        Self { corpus }
    }

    /// Returns the corpus being searched.
    #[must_use]
    pub fn corpus(&self) -> &[Source] {
        &self.corpus
    }

    /// Returns up to `top_k` matching documents, best score first.
    #[must_use]
    pub fn search(&self, query: &str, top_k: usize) -> Vec<Source> {
        let query_words: Vec<String> = query
            .split_whitespace()
            .filter(|w| w.chars().count() > 2)
            .map(str::to_lowercase)
            .collect();

        let mut scored: Vec<(usize, &Source)> = Vec::new();
        for doc in &self.corpus {
            let text = format!("{} {}", doc.content, doc.title).to_lowercase();
            let score = query_words
                .iter()
                .filter(|w| text.contains(w.as_str()))
                .count();
            if score > 0 {
                scored.push((score, doc));
            }
        }

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .into_iter()
            .take(top_k)
            .map(|(_, doc)| doc.clone())
            .collect()
    }
}
