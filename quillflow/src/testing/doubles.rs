//! Scripted stage collaborators and an in-memory store.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::agents::{AnalysisProvider, ResearchProvider, ResponseWriter};
use crate::errors::StageError;
use crate::memory::{ConversationEntry, FactEntry, Memory, MemoryContext};
use crate::model::{Analysis, Source};

/// Call script shared by the stubs: fail the first `failures_remaining`
/// calls, then keep returning `value`. A permanent error fails every call.
struct Script<T> {
    value: T,
    failures_remaining: Mutex<u32>,
    permanent_error: Option<String>,
    calls: Mutex<u32>,
}

impl<T: Clone> Script<T> {
    fn returning(value: T) -> Self {
        Self {
            value,
            failures_remaining: Mutex::new(0),
            permanent_error: None,
            calls: Mutex::new(0),
        }
    }

    fn failing(value: T, error: impl Into<String>) -> Self {
        Self {
            value,
            failures_remaining: Mutex::new(0),
            permanent_error: Some(error.into()),
            calls: Mutex::new(0),
        }
    }

    fn failing_times(failures: u32, value: T) -> Self {
        Self {
            value,
            failures_remaining: Mutex::new(failures),
            permanent_error: None,
            calls: Mutex::new(0),
        }
    }

    fn next(&self) -> Result<T, StageError> {
        *self.calls.lock() += 1;

        if let Some(error) = &self.permanent_error {
            return Err(StageError::provider(error.clone()));
        }

        let mut remaining = self.failures_remaining.lock();
        if *remaining > 0 {
            *remaining -= 1;
            return Err(StageError::provider("scripted failure"));
        }

        Ok(self.value.clone())
    }

    fn calls(&self) -> u32 {
        *self.calls.lock()
    }
}

/// A scripted research provider.
pub struct StubResearch {
    script: Script<Vec<Source>>,
}

impl StubResearch {
    /// Always returns `sources`.
    #[must_use]
    pub fn returning(sources: Vec<Source>) -> Self {
        Self {
            script: Script::returning(sources),
        }
    }

    /// Fails every call with `error`.
    #[must_use]
    pub fn failing(error: impl Into<String>) -> Self {
        Self {
            script: Script::failing(Vec::new(), error),
        }
    }

    /// Fails the first `failures` calls, then returns `sources`.
    #[must_use]
    pub fn failing_times(failures: u32, sources: Vec<Source>) -> Self {
        Self {
            script: Script::failing_times(failures, sources),
        }
    }

    /// Number of calls received.
    #[must_use]
    pub fn calls(&self) -> u32 {
        self.script.calls()
    }
}

#[async_trait]
impl ResearchProvider for StubResearch {
    async fn research(&self, _query: &str, _top_k: usize) -> Result<Vec<Source>, StageError> {
        self.script.next()
    }
}

/// A scripted analysis provider.
pub struct StubAnalysis {
    script: Script<Analysis>,
}

impl StubAnalysis {
    /// Always returns `analysis`.
    #[must_use]
    pub fn returning(analysis: Analysis) -> Self {
        Self {
            script: Script::returning(analysis),
        }
    }

    /// Fails every call with `error`.
    #[must_use]
    pub fn failing(error: impl Into<String>) -> Self {
        Self {
            script: Script::failing(Analysis::new("", vec![], vec![], 0.0), error),
        }
    }

    /// Fails the first `failures` calls, then returns `analysis`.
    #[must_use]
    pub fn failing_times(failures: u32, analysis: Analysis) -> Self {
        Self {
            script: Script::failing_times(failures, analysis),
        }
    }

    /// Number of calls received.
    #[must_use]
    pub fn calls(&self) -> u32 {
        self.script.calls()
    }
}

#[async_trait]
impl AnalysisProvider for StubAnalysis {
    async fn analyze(&self, _query: &str, _sources: &[Source]) -> Result<Analysis, StageError> {
        self.script.next()
    }
}

/// A scripted response writer.
pub struct StubWriter {
    script: Script<String>,
}

impl StubWriter {
    /// Always returns `response`.
    #[must_use]
    pub fn returning(response: impl Into<String>) -> Self {
        Self {
            script: Script::returning(response.into()),
        }
    }

    /// Fails every call with `error`.
    #[must_use]
    pub fn failing(error: impl Into<String>) -> Self {
        Self {
            script: Script::failing(String::new(), error),
        }
    }

    /// Fails the first `failures` calls, then returns `response`.
    #[must_use]
    pub fn failing_times(failures: u32, response: impl Into<String>) -> Self {
        Self {
            script: Script::failing_times(failures, response.into()),
        }
    }

    /// Number of calls received.
    #[must_use]
    pub fn calls(&self) -> u32 {
        self.script.calls()
    }
}

#[async_trait]
impl ResponseWriter for StubWriter {
    async fn write(
        &self,
        _query: &str,
        _analysis: &Analysis,
        _sources: &[Source],
    ) -> Result<String, StageError> {
        self.script.next()
    }
}

/// An in-memory [`Memory`] that exposes everything it recorded.
#[derive(Default)]
pub struct RecordingMemory {
    facts: Mutex<Vec<FactEntry>>,
    conversations: Mutex<Vec<ConversationEntry>>,
}

impl RecordingMemory {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded facts.
    #[must_use]
    pub fn facts(&self) -> Vec<FactEntry> {
        self.facts.lock().clone()
    }

    /// Returns all recorded conversations.
    #[must_use]
    pub fn conversations(&self) -> Vec<ConversationEntry> {
        self.conversations.lock().clone()
    }
}

impl Memory for RecordingMemory {
    fn add_fact(&self, fact: &str, source: Option<&str>) {
        self.facts.lock().push(FactEntry {
            fact: fact.to_string(),
            source: source.map(str::to_string),
            recorded_at: Utc::now(),
        });
    }

    fn add_conversation(&self, query: &str, response: &str) {
        self.conversations.lock().push(ConversationEntry {
            query: query.to_string(),
            response: response.to_string(),
            recorded_at: Utc::now(),
        });
    }

    fn recent_context(&self, limit: usize) -> MemoryContext {
        let facts = self.facts.lock();
        let conversations = self.conversations.lock();
        let fact_start = facts.len().saturating_sub(limit);
        let conv_start = conversations.len().saturating_sub(limit);
        MemoryContext {
            conversations: conversations[conv_start..].to_vec(),
            facts: facts[fact_start..].to_vec(),
        }
    }
}
