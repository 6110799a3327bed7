//! Typed pipeline events.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::protocol::TaskKind;

/// Phases a query passes through, in order.
///
/// `Regenerating` only appears when the quality gate requests a second pass,
/// in which case `Writing` appears a second time as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelinePhase {
    /// Pipeline run created.
    Init,
    /// Query is being validated.
    Validating,
    /// Research stage is running.
    Researching,
    /// Analysis stage is running.
    Analyzing,
    /// Writing stage is running.
    Writing,
    /// Quality gate is scoring the response.
    QualityCheck,
    /// Quality gate requested one regeneration pass.
    Regenerating,
    /// Pipeline run finished.
    Done,
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::Validating => write!(f, "validating"),
            Self::Researching => write!(f, "researching"),
            Self::Analyzing => write!(f, "analyzing"),
            Self::Writing => write!(f, "writing"),
            Self::QualityCheck => write!(f, "quality_check"),
            Self::Regenerating => write!(f, "regenerating"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Whether a stage attempt produced a valid result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// The attempt returned a result that passed validation.
    Succeeded,
    /// The attempt failed or its result was rejected.
    Failed,
}

/// An observable event emitted while a query runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// The pipeline entered a new phase.
    PhaseEntered {
        /// The phase that was entered.
        phase: PipelinePhase,
    },
    /// A stage attempt finished.
    StageAttempt {
        /// The stage that ran.
        stage: TaskKind,
        /// 1-based attempt number.
        attempt: u32,
        /// Whether the attempt succeeded.
        outcome: AttemptOutcome,
        /// The error text when the attempt failed.
        error: Option<String>,
    },
    /// A stage exhausted its attempts and substituted a fallback result.
    StageFallback {
        /// The stage that fell back.
        stage: TaskKind,
        /// How many attempts were made before falling back.
        attempts: u32,
    },
    /// The quality gate scored a response.
    QualityEvaluated {
        /// The computed score.
        score: f64,
        /// The gate's threshold.
        threshold: f64,
        /// Whether a regeneration pass was requested.
        retry: bool,
    },
}

impl PipelineEvent {
    /// Creates a phase transition event.
    #[must_use]
    pub const fn phase_entered(phase: PipelinePhase) -> Self {
        Self::PhaseEntered { phase }
    }

    /// Creates a successful stage attempt event.
    #[must_use]
    pub const fn attempt_succeeded(stage: TaskKind, attempt: u32) -> Self {
        Self::StageAttempt {
            stage,
            attempt,
            outcome: AttemptOutcome::Succeeded,
            error: None,
        }
    }

    /// Creates a failed stage attempt event.
    #[must_use]
    pub fn attempt_failed(stage: TaskKind, attempt: u32, error: impl Into<String>) -> Self {
        Self::StageAttempt {
            stage,
            attempt,
            outcome: AttemptOutcome::Failed,
            error: Some(error.into()),
        }
    }

    /// Creates a fallback event.
    #[must_use]
    pub const fn fallback(stage: TaskKind, attempts: u32) -> Self {
        Self::StageFallback { stage, attempts }
    }

    /// Creates a quality evaluation event.
    #[must_use]
    pub const fn quality_evaluated(score: f64, threshold: f64, retry: bool) -> Self {
        Self::QualityEvaluated {
            score,
            threshold,
            retry,
        }
    }

    /// Returns a stable dotted name for the event kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PhaseEntered { .. } => "pipeline.phase",
            Self::StageAttempt { .. } => "stage.attempt",
            Self::StageFallback { .. } => "stage.fallback",
            Self::QualityEvaluated { .. } => "quality.evaluated",
        }
    }
}
