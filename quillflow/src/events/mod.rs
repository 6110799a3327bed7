//! Pipeline observability: typed events and the sinks that receive them.
//!
//! Sinks are handed to the components that emit events at construction time.
//! Tests observe a run by injecting a [`CollectingEventSink`] and inspecting
//! the recorded [`PipelineEvent`] values afterwards.

mod event;
mod sink;

pub use event::{AttemptOutcome, PipelineEvent, PipelinePhase};
pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
