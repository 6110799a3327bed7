//! Error types for the quillflow pipeline.
//!
//! The taxonomy has two levels. [`StageError`] covers failures raised inside a
//! single stage attempt: a collaborator failing or producing output that does
//! not pass validation. These are recovered locally by the executor through
//! retries and fallbacks and never escape a stage boundary. [`PipelineError`]
//! covers failures of the pipeline itself: a blank query or a wiring mistake
//! that routed the wrong payload to a stage. These surface to the controller,
//! which maps them to user-facing text exactly once.

use thiserror::Error;

use crate::protocol::TaskKind;

/// Error raised inside a single stage attempt.
///
/// Stage errors are always recoverable: the executor retries the attempt and
/// falls back to a synthetic result once attempts are exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    /// The stage's collaborator failed to produce a result.
    #[error("provider failure: {reason}")]
    Provider {
        /// What went wrong inside the collaborator.
        reason: String,
    },

    /// The collaborator produced a result that failed validation.
    #[error("invalid output: {reason}")]
    Invalid {
        /// Why the output was rejected.
        reason: String,
    },
}

impl StageError {
    /// Creates a provider failure error.
    #[must_use]
    pub fn provider(reason: impl Into<String>) -> Self {
        Self::Provider {
            reason: reason.into(),
        }
    }

    /// Creates a validation rejection error.
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}

/// Error raised by the pipeline outside any stage attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The query was empty or contained only whitespace.
    #[error("query is empty")]
    EmptyQuery,

    /// A stage received a task message carrying the wrong payload kind.
    #[error("payload mismatch: '{expected}' stage received a '{actual}' task")]
    PayloadMismatch {
        /// The payload kind the stage expected.
        expected: TaskKind,
        /// The payload kind the message actually carried.
        actual: TaskKind,
    },
}

impl PipelineError {
    /// Creates a payload mismatch error.
    #[must_use]
    pub const fn payload_mismatch(expected: TaskKind, actual: TaskKind) -> Self {
        Self::PayloadMismatch { expected, actual }
    }
}
