//! Full-pipeline tests wiring real agents, scripted collaborators, and
//! collecting sinks together.

use std::sync::Arc;
use std::time::Duration;

use crate::agents::{AnalysisAgent, WriterAgent};
use crate::controller::Controller;
use crate::events::{CollectingEventSink, PipelinePhase};
use crate::executor::RetryPolicy;
use crate::model::{Analysis, Source};
use crate::protocol::TaskKind;
use crate::testing::{
    keyword_coverage, response_tokens, RecordingMemory, StubAnalysis, StubResearch, StubWriter,
};

fn fast_policy() -> RetryPolicy {
    RetryPolicy::new().with_base_delay(Duration::ZERO)
}

fn rich_agentic_sources() -> Vec<Source> {
    vec![
        Source::new(
            "Agentic Patterns in Production Systems",
            "Agentic AI systems coordinate planning, tool use, and reflection across multiple \
             steps. They are typically built around a controller that routes work between \
             specialized components. Memory modules keep track of prior findings so later \
             steps can reuse them.",
        ),
        Source::new(
            "Evaluating Agentic Workflows",
            "Benchmarks for agentic workflows should include coverage, latency, and robustness \
             to failures. Evaluation harnesses can replay recorded traces to compare controller \
             policies. Regression suites are the most reliable guard against silent quality \
             drops.",
        ),
    ]
}

#[tokio::test]
async fn failed_research_degrades_to_synthetic_sources() {
    let memory = Arc::new(RecordingMemory::new());
    let research = Arc::new(StubResearch::failing("index unreachable"));
    let sink = Arc::new(CollectingEventSink::new());

    let controller = Controller::new(
        research.clone(),
        Arc::new(AnalysisAgent::new(memory.clone())),
        Arc::new(WriterAgent::new(memory.clone())),
    )
    .with_retry_policy(fast_policy())
    .with_event_sink(sink.clone());

    let response = controller.handle("what is quantum computing?").await;

    // The synthetic source flows through analysis into the final text.
    assert!(response.contains("Unable to retrieve sources for query: what is quantum computing?"));
    assert!(response.contains("- 1. System Notice"));

    // Research was attempted exactly max_attempts times, then fell back once.
    assert_eq!(research.calls(), 3);
    assert_eq!(sink.stage_attempts(TaskKind::Research).len(), 3);
    assert_eq!(sink.of_kind("stage.fallback").len(), 1);
}

#[tokio::test]
async fn failed_analysis_degrades_to_fallback_summary() {
    let memory = Arc::new(RecordingMemory::new());

    let controller = Controller::new(
        Arc::new(StubResearch::returning(vec![Source::new("Doc", "Body text.")])),
        Arc::new(StubAnalysis::failing("model offline")),
        Arc::new(WriterAgent::new(memory.clone())),
    )
    .with_retry_policy(fast_policy());

    let response = controller.handle("anything").await;

    assert!(response.contains("Analysis could not be completed. Please try a different query."));
    assert!(response.contains("- 1. Doc"));
}

#[tokio::test]
async fn every_stage_failing_still_returns_text() {
    let research = Arc::new(StubResearch::failing("down"));
    let analysis = Arc::new(StubAnalysis::failing("down"));
    let writer = Arc::new(StubWriter::failing("down"));
    let sink = Arc::new(CollectingEventSink::new());

    let controller = Controller::new(research.clone(), analysis.clone(), writer.clone())
        .with_retry_policy(fast_policy())
        .with_event_sink(sink.clone());

    let response = controller.handle("query").await;

    assert!(!response.is_empty());
    assert!(response.contains("Unable to generate response."));

    // One research run, then two runs each of analysis and writing because
    // the fallback response always scores below the gate.
    assert_eq!(research.calls(), 3);
    assert_eq!(analysis.calls(), 6);
    assert_eq!(writer.calls(), 6);
}

#[tokio::test]
async fn analysis_and_writing_rerun_at_most_once() {
    // Zero-claim analysis and a one-token response force the lowest score.
    let sink = Arc::new(CollectingEventSink::new());
    let controller = Controller::new(
        Arc::new(StubResearch::returning(vec![Source::new("Doc", "Body.")])),
        Arc::new(StubAnalysis::returning(Analysis::new("s.", vec![], vec![], 0.0))),
        Arc::new(StubWriter::returning("y".repeat(80))),
    )
    .with_retry_policy(fast_policy())
    .with_event_sink(sink.clone());

    controller.handle("query").await;

    let phases = sink.phases();
    let count = |phase: PipelinePhase| phases.iter().filter(|p| **p == phase).count();

    assert_eq!(count(PipelinePhase::Researching), 1);
    assert_eq!(count(PipelinePhase::Analyzing), 1);
    assert_eq!(count(PipelinePhase::Regenerating), 1);
    assert_eq!(count(PipelinePhase::Writing), 2);
    assert_eq!(count(PipelinePhase::Done), 1);
}

#[tokio::test]
async fn recovery_after_transient_failures_avoids_fallback() {
    let sources = vec![Source::new("Doc", "Agents can plan. Seen in trials.")];
    let research = Arc::new(StubResearch::failing_times(2, sources));
    let sink = Arc::new(CollectingEventSink::new());
    let memory = Arc::new(RecordingMemory::new());

    let controller = Controller::new(
        research.clone(),
        Arc::new(AnalysisAgent::new(memory.clone())),
        Arc::new(WriterAgent::new(memory.clone())),
    )
    .with_retry_policy(fast_policy())
    .with_event_sink(sink.clone());

    let response = controller.handle("agents").await;

    assert_eq!(research.calls(), 3);
    assert!(sink.of_kind("stage.fallback").is_empty());
    assert!(response.contains("- 1. Doc"));
}

#[tokio::test]
async fn end_to_end_agentic_query_is_substantial() {
    let memory = Arc::new(RecordingMemory::new());

    let controller = Controller::new(
        Arc::new(StubResearch::returning(rich_agentic_sources())),
        Arc::new(AnalysisAgent::new(memory.clone())),
        Arc::new(WriterAgent::new(memory.clone())),
    )
    .with_retry_policy(fast_policy());

    let response = controller.handle("What is agentic AI?").await;

    assert!(response.contains("## Overview"));
    assert!(response.contains("## Key Claims"));
    assert!(response_tokens(&response) > 100);
    assert!((keyword_coverage(&response, &["agentic", "controller"]) - 1.0).abs() < f64::EPSILON);

    // The full exchange was remembered.
    let conversations = memory.conversations();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].query, "What is agentic AI?");
    assert_eq!(conversations[0].response, response);
}
