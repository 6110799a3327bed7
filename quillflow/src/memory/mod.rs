//! Conversation and fact memory shared by the agents.
//!
//! Memory is a best-effort side channel: recording never fails the pipeline,
//! and storage errors are logged rather than surfaced. The store is handed to
//! each agent explicitly at construction time.

mod json_file;

pub use json_file::{JsonFileMemory, DEFAULT_MAX_ENTRIES, DEFAULT_MEMORY_FILE};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored query-response pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntry {
    /// The user query.
    pub query: String,
    /// The generated response.
    pub response: String,
    /// When the pair was recorded.
    #[serde(default = "Utc::now")]
    pub recorded_at: DateTime<Utc>,
}

/// A stored fact, optionally attributed to a source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactEntry {
    /// The fact text.
    pub fact: String,
    /// Where the fact came from, when known.
    pub source: Option<String>,
    /// When the fact was recorded.
    #[serde(default = "Utc::now")]
    pub recorded_at: DateTime<Utc>,
}

/// The most recent slice of memory, as returned by
/// [`Memory::recent_context`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryContext {
    /// Most recent conversations, oldest first.
    pub conversations: Vec<ConversationEntry>,
    /// Most recent facts, oldest first.
    pub facts: Vec<FactEntry>,
}

/// Store for conversations and facts accumulated across queries.
pub trait Memory: Send + Sync {
    /// Records a fact, optionally attributed to a source.
    fn add_fact(&self, fact: &str, source: Option<&str>);

    /// Records a completed query-response pair.
    fn add_conversation(&self, query: &str, response: &str);

    /// Returns the last `limit` conversations and facts.
    fn recent_context(&self, limit: usize) -> MemoryContext;
}
