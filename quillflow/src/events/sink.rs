//! Destinations for pipeline events.

use async_trait::async_trait;
use tracing::{debug, info, Level};

use crate::events::event::{AttemptOutcome, PipelineEvent};
use crate::protocol::TaskKind;

/// Receiver for [`PipelineEvent`]s.
///
/// Sinks are passed explicitly to the components that emit events; there is
/// no ambient registry.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Delivers an event asynchronously.
    async fn emit(&self, event: PipelineEvent);

    /// Delivers an event without awaiting. Must never panic.
    fn try_emit(&self, event: PipelineEvent);
}

/// Discards every event it receives.
///
/// This is the sink callers get when they never configure one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: PipelineEvent) {}

    fn try_emit(&self, _event: PipelineEvent) {}
}

/// Forwards events to the `tracing` subscriber at a fixed level.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self::info()
    }
}

impl LoggingEventSink {
    /// Builds a sink that logs at `level`.
    #[must_use]
    pub const fn new(level: Level) -> Self {
        Self { level }
    }

    /// Shorthand for a `DEBUG` sink.
    #[must_use]
    pub const fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    /// Shorthand for an `INFO` sink.
    #[must_use]
    pub const fn info() -> Self {
        Self::new(Level::INFO)
    }

    fn log_event(&self, event: &PipelineEvent) {
        if self.level == Level::DEBUG {
            debug!(kind = %event.kind(), detail = ?event, "event: {}", event.kind());
        } else {
            info!(kind = %event.kind(), detail = ?event, "event: {}", event.kind());
        }
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, event: PipelineEvent) {
        self.log_event(&event);
    }

    fn try_emit(&self, event: PipelineEvent) {
        self.log_event(&event);
    }
}

/// Buffers events in memory so tests can assert on what a run emitted.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: parking_lot::RwLock<Vec<PipelineEvent>>,
}

impl CollectingEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far, in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.read().clone()
    }

    /// Number of buffered events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// True when nothing has been emitted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Drops all buffered events.
    pub fn clear(&self) {
        self.events.write().clear();
    }

    /// Events whose kind matches `kind`, e.g. `"stage.attempt"`.
    #[must_use]
    pub fn of_kind(&self, kind: &str) -> Vec<PipelineEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.kind() == kind)
            .cloned()
            .collect()
    }

    /// The phases entered, in order.
    #[must_use]
    pub fn phases(&self) -> Vec<crate::events::PipelinePhase> {
        self.events
            .read()
            .iter()
            .filter_map(|e| match e {
                PipelineEvent::PhaseEntered { phase } => Some(*phase),
                _ => None,
            })
            .collect()
    }

    /// The `(attempt, outcome)` pairs recorded for one stage, in order.
    #[must_use]
    pub fn stage_attempts(&self, stage: TaskKind) -> Vec<(u32, AttemptOutcome)> {
        self.events
            .read()
            .iter()
            .filter_map(|e| match e {
                PipelineEvent::StageAttempt {
                    stage: s,
                    attempt,
                    outcome,
                    ..
                } if *s == stage => Some((*attempt, *outcome)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, event: PipelineEvent) {
        self.events.write().push(event);
    }

    fn try_emit(&self, event: PipelineEvent) {
        self.events.write().push(event);
    }
}
