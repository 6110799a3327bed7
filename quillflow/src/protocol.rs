//! Typed task messages exchanged between the controller and its agents.
//!
//! Every message carries a payload variant matching its task kind, so a stage
//! handler can prove at the type level that it received the inputs it needs.
//! Messages are built through factory constructors; there is no way to pair a
//! task kind with the wrong payload shape.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Analysis, Source};

/// Roles that participate in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// The orchestrating controller.
    Controller,
    /// The source-retrieval agent.
    Research,
    /// The analysis agent.
    Analysis,
    /// The response-writing agent.
    Writer,
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Controller => write!(f, "controller"),
            Self::Research => write!(f, "research"),
            Self::Analysis => write!(f, "analysis"),
            Self::Writer => write!(f, "writer"),
        }
    }
}

/// The kind of work a task message asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Retrieve sources for a query.
    Research,
    /// Analyze retrieved sources.
    Analyze,
    /// Write the final response.
    Write,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Research => write!(f, "research"),
            Self::Analyze => write!(f, "analyze"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// Inputs for one task, one variant per [`TaskKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskPayload {
    /// Inputs for the research stage.
    Research {
        /// The user query.
        query: String,
    },
    /// Inputs for the analysis stage.
    Analyze {
        /// The user query.
        query: String,
        /// Sources retrieved by the research stage.
        sources: Vec<Source>,
    },
    /// Inputs for the writing stage.
    Write {
        /// The user query.
        query: String,
        /// Findings produced by the analysis stage.
        analysis: Analysis,
        /// Sources retrieved by the research stage.
        sources: Vec<Source>,
    },
}

impl TaskPayload {
    /// Returns the task kind this payload belongs to.
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        match self {
            Self::Research { .. } => TaskKind::Research,
            Self::Analyze { .. } => TaskKind::Analyze,
            Self::Write { .. } => TaskKind::Write,
        }
    }
}

/// A routed unit of work sent from one agent to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskMessage {
    id: Uuid,
    sender: AgentRole,
    receiver: AgentRole,
    payload: TaskPayload,
}

impl TaskMessage {
    /// Creates a research task addressed to the research agent.
    #[must_use]
    pub fn research(query: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: AgentRole::Controller,
            receiver: AgentRole::Research,
            payload: TaskPayload::Research {
                query: query.into(),
            },
        }
    }

    /// Creates an analyze task addressed to the analysis agent.
    #[must_use]
    pub fn analyze(query: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: AgentRole::Controller,
            receiver: AgentRole::Analysis,
            payload: TaskPayload::Analyze {
                query: query.into(),
                sources,
            },
        }
    }

    /// Creates a write task addressed to the writer agent.
    #[must_use]
    pub fn write(query: impl Into<String>, analysis: Analysis, sources: Vec<Source>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: AgentRole::Controller,
            receiver: AgentRole::Writer,
            payload: TaskPayload::Write {
                query: query.into(),
                analysis,
                sources,
            },
        }
    }

    /// Returns the unique message id.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the sending role.
    #[must_use]
    pub const fn sender(&self) -> AgentRole {
        self.sender
    }

    /// Returns the receiving role.
    #[must_use]
    pub const fn receiver(&self) -> AgentRole {
        self.receiver
    }

    /// Returns the payload.
    #[must_use]
    pub const fn payload(&self) -> &TaskPayload {
        &self.payload
    }

    /// Returns the task kind carried by this message.
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        self.payload.kind()
    }
}
