//! JSON-file-backed memory store.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::memory::{ConversationEntry, FactEntry, Memory, MemoryContext};

/// Default path of the memory file.
pub const DEFAULT_MEMORY_FILE: &str = "memory_store.json";

/// Default cap on stored conversations and facts, applied to each list.
pub const DEFAULT_MAX_ENTRIES: usize = 50;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct MemoryState {
    #[serde(default)]
    conversations: Vec<ConversationEntry>,
    #[serde(default)]
    facts: Vec<FactEntry>,
}

/// Memory store persisted to a JSON file.
///
/// State is loaded once at construction and written back after every append.
/// A missing file starts empty; an unreadable or unparsable file is logged
/// and replaced with fresh state on the next write.
#[derive(Debug)]
pub struct JsonFileMemory {
    path: PathBuf,
    max_entries: usize,
    state: Mutex<MemoryState>,
}

impl JsonFileMemory {
    /// Opens the store at `path`, loading any existing state.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = Self::load(&path);
        Self {
            path,
            max_entries: DEFAULT_MAX_ENTRIES,
            state: Mutex::new(state),
        }
    }

    /// Sets the per-list entry cap.
    #[must_use]
    pub const fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> MemoryState {
        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(state) => {
                    info!(path = %path.display(), "memory loaded");
                    state
                }
                Err(err) => {
                    error!(
                        path = %path.display(),
                        error = %err,
                        "failed to load memory, initializing fresh"
                    );
                    MemoryState::default()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => MemoryState::default(),
            Err(err) => {
                error!(
                    path = %path.display(),
                    error = %err,
                    "failed to load memory, initializing fresh"
                );
                MemoryState::default()
            }
        }
    }

    fn save(&self, state: &MemoryState) {
        match serde_json::to_string_pretty(state) {
            Ok(json) => {
                if let Err(err) = fs::write(&self.path, json) {
                    error!(path = %self.path.display(), error = %err, "failed to save memory");
                }
            }
            Err(err) => {
                error!(path = %self.path.display(), error = %err, "failed to serialize memory");
            }
        }
    }

    fn trim<T>(entries: &mut Vec<T>, max: usize) {
        if entries.len() > max {
            let excess = entries.len() - max;
            entries.drain(..excess);
        }
    }
}

impl Memory for JsonFileMemory {
    fn add_fact(&self, fact: &str, source: Option<&str>) {
        let mut state = self.state.lock();
        state.facts.push(FactEntry {
            fact: fact.to_string(),
            source: source.map(str::to_string),
            recorded_at: Utc::now(),
        });
        Self::trim(&mut state.facts, self.max_entries);
        self.save(&state);
    }

    fn add_conversation(&self, query: &str, response: &str) {
        let mut state = self.state.lock();
        state.conversations.push(ConversationEntry {
            query: query.to_string(),
            response: response.to_string(),
            recorded_at: Utc::now(),
        });
        Self::trim(&mut state.conversations, self.max_entries);
        self.save(&state);
    }

    fn recent_context(&self, limit: usize) -> MemoryContext {
        let state = self.state.lock();
        let conv_start = state.conversations.len().saturating_sub(limit);
        let fact_start = state.facts.len().saturating_sub(limit);
        MemoryContext {
            conversations: state.conversations[conv_start..].to_vec(),
            facts: state.facts[fact_start..].to_vec(),
        }
    }
}
