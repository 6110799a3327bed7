//! Pipeline controller: validation, stage routing, and quality gating.
//!
//! [`Controller::handle`] runs a query through research, analysis, and
//! writing, scoring the result and regenerating once when it falls below the
//! quality threshold. Every stage runs through the [`StageExecutor`], so a
//! failing collaborator degrades the answer instead of aborting the run.
//! `handle` itself never fails: pipeline-level errors are mapped to
//! user-facing text at this boundary and nowhere else.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::agents::{AnalysisProvider, ResearchProvider, ResponseWriter};
use crate::errors::{PipelineError, StageError};
use crate::events::{EventSink, NoOpEventSink, PipelineEvent, PipelinePhase};
use crate::executor::{RetryPolicy, StageExecutor};
use crate::model::{Analysis, Source};
use crate::protocol::{TaskKind, TaskMessage, TaskPayload};
use crate::quality::QualityGate;

/// Response returned for an empty or whitespace-only query.
pub const EMPTY_QUERY_RESPONSE: &str =
    "Your query appears to be empty. Please provide a meaningful question.";

/// Default number of sources requested from the research stage.
pub const DEFAULT_TOP_K: usize = 3;

const ANALYSIS_FALLBACK_SUMMARY: &str =
    "Analysis could not be completed. Please try a different query.";

const WRITE_FALLBACK_RESPONSE: &str =
    "# System Error\n\nUnable to generate response. Please try again.";

/// Minimum characters a trimmed response must have to pass validation.
const MIN_RESPONSE_CHARS: usize = 50;

fn research_fallback(query: &str) -> Vec<Source> {
    vec![Source::new(
        "System Notice",
        format!("Unable to retrieve sources for query: {query}. Using cached knowledge."),
    )]
}

fn analysis_fallback() -> Analysis {
    Analysis::new(ANALYSIS_FALLBACK_SUMMARY, vec![], vec![], 0.0)
}

fn write_fallback() -> String {
    WRITE_FALLBACK_RESPONSE.to_string()
}

fn critical_error_response(err: &PipelineError) -> String {
    format!(
        "# System Error\n\nAn unexpected error occurred: {err}\nPlease try again or contact support."
    )
}

/// Routes a query through the three stages and gates the result.
pub struct Controller {
    research: Arc<dyn ResearchProvider>,
    analysis: Arc<dyn AnalysisProvider>,
    writer: Arc<dyn ResponseWriter>,
    policy: RetryPolicy,
    gate: QualityGate,
    sink: Arc<dyn EventSink>,
    top_k: usize,
}

impl Controller {
    /// Creates a controller over the three stage collaborators.
    #[must_use]
    pub fn new(
        research: Arc<dyn ResearchProvider>,
        analysis: Arc<dyn AnalysisProvider>,
        writer: Arc<dyn ResponseWriter>,
    ) -> Self {
        Self {
            research,
            analysis,
            writer,
            policy: RetryPolicy::default(),
            gate: QualityGate::new(),
            sink: Arc::new(NoOpEventSink),
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Sets the retry policy applied to every stage.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the quality gate.
    #[must_use]
    pub const fn with_quality_gate(mut self, gate: QualityGate) -> Self {
        self.gate = gate;
        self
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Sets how many sources the research stage is asked for.
    #[must_use]
    pub const fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Answers a query. Always returns text.
    pub async fn handle(&self, query: &str) -> String {
        match self.run_pipeline(query).await {
            Ok(response) => response,
            Err(PipelineError::EmptyQuery) => {
                warn!("rejected empty query");
                EMPTY_QUERY_RESPONSE.to_string()
            }
            Err(err) => {
                error!(error = %err, "pipeline failed outside stage boundaries");
                critical_error_response(&err)
            }
        }
    }

    async fn run_pipeline(&self, query: &str) -> Result<String, PipelineError> {
        self.enter(PipelinePhase::Init).await;

        self.enter(PipelinePhase::Validating).await;
        if query.trim().is_empty() {
            return Err(PipelineError::EmptyQuery);
        }

        let executor = StageExecutor::new(self.policy).with_sink(self.sink.clone());

        self.enter(PipelinePhase::Researching).await;
        let sources = self
            .research_stage(&executor, TaskMessage::research(query))
            .await?;

        self.enter(PipelinePhase::Analyzing).await;
        let analysis = self
            .analysis_stage(&executor, TaskMessage::analyze(query, sources.clone()))
            .await?;

        self.enter(PipelinePhase::Writing).await;
        let mut response = self
            .write_stage(
                &executor,
                TaskMessage::write(query, analysis.clone(), sources.clone()),
            )
            .await?;

        self.enter(PipelinePhase::QualityCheck).await;
        let score = self.gate.score(&analysis, &response);
        let retry = self.gate.should_retry(score);
        self.sink
            .emit(PipelineEvent::quality_evaluated(
                score.value(),
                self.gate.threshold(),
                retry,
            ))
            .await;

        if retry {
            self.enter(PipelinePhase::Regenerating).await;
            let analysis = self
                .analysis_stage(&executor, TaskMessage::analyze(query, sources.clone()))
                .await?;

            self.enter(PipelinePhase::Writing).await;
            response = self
                .write_stage(&executor, TaskMessage::write(query, analysis, sources))
                .await?;
        }

        self.enter(PipelinePhase::Done).await;
        Ok(response)
    }

    async fn enter(&self, phase: PipelinePhase) {
        debug!(phase = %phase, "entering phase");
        self.sink.emit(PipelineEvent::phase_entered(phase)).await;
    }

    async fn research_stage(
        &self,
        executor: &StageExecutor,
        msg: TaskMessage,
    ) -> Result<Vec<Source>, PipelineError> {
        let TaskPayload::Research { query } = msg.payload() else {
            return Err(PipelineError::payload_mismatch(TaskKind::Research, msg.kind()));
        };
        let query = query.clone();
        let fallback_query = query.clone();
        let provider = self.research.clone();
        let top_k = self.top_k;

        let sources = executor
            .execute(
                TaskKind::Research,
                move || {
                    let provider = provider.clone();
                    let query = query.clone();
                    async move { provider.research(&query, top_k).await }
                },
                |sources: &Vec<Source>| {
                    if sources.is_empty() {
                        Err(StageError::invalid("no sources returned"))
                    } else {
                        Ok(())
                    }
                },
                move || research_fallback(&fallback_query),
            )
            .await;
        Ok(sources)
    }

    async fn analysis_stage(
        &self,
        executor: &StageExecutor,
        msg: TaskMessage,
    ) -> Result<Analysis, PipelineError> {
        let TaskPayload::Analyze { query, sources } = msg.payload() else {
            return Err(PipelineError::payload_mismatch(TaskKind::Analyze, msg.kind()));
        };
        let query = query.clone();
        let sources = sources.clone();
        let provider = self.analysis.clone();

        let analysis = executor
            .execute(
                TaskKind::Analyze,
                move || {
                    let provider = provider.clone();
                    let query = query.clone();
                    let sources = sources.clone();
                    async move { provider.analyze(&query, &sources).await }
                },
                |analysis: &Analysis| {
                    if analysis.summary.trim().is_empty() {
                        Err(StageError::invalid("analysis missing summary"))
                    } else {
                        Ok(())
                    }
                },
                analysis_fallback,
            )
            .await;
        Ok(analysis)
    }

    async fn write_stage(
        &self,
        executor: &StageExecutor,
        msg: TaskMessage,
    ) -> Result<String, PipelineError> {
        let TaskPayload::Write {
            query,
            analysis,
            sources,
        } = msg.payload()
        else {
            return Err(PipelineError::payload_mismatch(TaskKind::Write, msg.kind()));
        };
        let query = query.clone();
        let analysis = analysis.clone();
        let sources = sources.clone();
        let writer = self.writer.clone();

        let response = executor
            .execute(
                TaskKind::Write,
                move || {
                    let writer = writer.clone();
                    let query = query.clone();
                    let analysis = analysis.clone();
                    let sources = sources.clone();
                    async move { writer.write(&query, &analysis, &sources).await }
                },
                |response: &String| {
                    if response.trim().chars().count() < MIN_RESPONSE_CHARS {
                        Err(StageError::invalid("response too short"))
                    } else {
                        Ok(())
                    }
                },
                write_fallback,
            )
            .await;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingEventSink;
    use crate::testing::{StubAnalysis, StubResearch, StubWriter};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new().with_base_delay(Duration::ZERO)
    }

    fn sample_sources() -> Vec<Source> {
        vec![Source::new("Doc", "Agents can plan. Observed in trials.")]
    }

    fn sample_analysis() -> Analysis {
        Analysis::new(
            "Agents can plan.",
            vec!["Agents can plan".to_string()],
            vec![],
            1.0,
        )
    }

    fn long_response() -> String {
        vec!["token"; 60].join(" ")
    }

    struct Fixture {
        research: Arc<StubResearch>,
        analysis: Arc<StubAnalysis>,
        writer: Arc<StubWriter>,
        sink: Arc<CollectingEventSink>,
        controller: Controller,
    }

    fn fixture(
        research: StubResearch,
        analysis: StubAnalysis,
        writer: StubWriter,
    ) -> Fixture {
        let research = Arc::new(research);
        let analysis = Arc::new(analysis);
        let writer = Arc::new(writer);
        let sink = Arc::new(CollectingEventSink::new());
        let controller = Controller::new(research.clone(), analysis.clone(), writer.clone())
            .with_retry_policy(fast_policy())
            .with_event_sink(sink.clone());
        Fixture {
            research,
            analysis,
            writer,
            sink,
            controller,
        }
    }

    #[tokio::test]
    async fn test_blank_query_short_circuits() {
        let f = fixture(
            StubResearch::returning(sample_sources()),
            StubAnalysis::returning(sample_analysis()),
            StubWriter::returning(long_response()),
        );

        let response = f.controller.handle("   ").await;

        assert_eq!(response, EMPTY_QUERY_RESPONSE);
        assert_eq!(f.research.calls(), 0);
        assert_eq!(f.analysis.calls(), 0);
        assert_eq!(f.writer.calls(), 0);
        assert_eq!(
            f.sink.phases(),
            vec![PipelinePhase::Init, PipelinePhase::Validating]
        );
    }

    #[tokio::test]
    async fn test_happy_path_runs_each_stage_once() {
        let response_text = long_response();
        let f = fixture(
            StubResearch::returning(sample_sources()),
            StubAnalysis::returning(sample_analysis()),
            StubWriter::returning(response_text.clone()),
        );

        let response = f.controller.handle("what can agents do?").await;

        assert_eq!(response, response_text);
        assert_eq!(f.research.calls(), 1);
        assert_eq!(f.analysis.calls(), 1);
        assert_eq!(f.writer.calls(), 1);
        assert_eq!(
            f.sink.phases(),
            vec![
                PipelinePhase::Init,
                PipelinePhase::Validating,
                PipelinePhase::Researching,
                PipelinePhase::Analyzing,
                PipelinePhase::Writing,
                PipelinePhase::QualityCheck,
                PipelinePhase::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let f = fixture(
            StubResearch::failing_times(2, sample_sources()),
            StubAnalysis::returning(sample_analysis()),
            StubWriter::returning(long_response()),
        );

        let response = f.controller.handle("query").await;

        assert_eq!(response, long_response());
        assert_eq!(f.research.calls(), 3);
        assert!(f.sink.of_kind("stage.fallback").is_empty());
    }

    #[tokio::test]
    async fn test_exhausted_research_uses_fallback_and_continues() {
        let f = fixture(
            StubResearch::failing("search offline"),
            StubAnalysis::returning(sample_analysis()),
            StubWriter::returning(long_response()),
        );

        let response = f.controller.handle("query").await;

        assert_eq!(response, long_response());
        assert_eq!(f.research.calls(), 3);
        assert_eq!(f.sink.stage_attempts(TaskKind::Research).len(), 3);
        assert_eq!(
            f.sink.of_kind("stage.fallback"),
            vec![PipelineEvent::fallback(TaskKind::Research, 3)]
        );
        // Later stages still ran.
        assert_eq!(f.analysis.calls(), 1);
        assert_eq!(f.writer.calls(), 1);
    }

    #[tokio::test]
    async fn test_low_quality_regenerates_once() {
        // No claims and a one-token response score 0.0, below the gate.
        let short_but_valid = "x".repeat(60);
        let f = fixture(
            StubResearch::returning(sample_sources()),
            StubAnalysis::returning(Analysis::new("bare summary.", vec![], vec![], 0.0)),
            StubWriter::returning(short_but_valid.clone()),
        );

        let response = f.controller.handle("query").await;

        assert_eq!(response, short_but_valid);
        assert_eq!(f.analysis.calls(), 2);
        assert_eq!(f.writer.calls(), 2);

        let phases = f.sink.phases();
        assert_eq!(
            phases
                .iter()
                .filter(|p| **p == PipelinePhase::Regenerating)
                .count(),
            1
        );
        assert_eq!(
            phases
                .iter()
                .filter(|p| **p == PipelinePhase::Writing)
                .count(),
            2
        );

        let quality = f.sink.of_kind("quality.evaluated");
        assert_eq!(quality.len(), 1);
        assert_eq!(quality[0], PipelineEvent::quality_evaluated(0.0, 0.6, true));
    }

    #[tokio::test]
    async fn test_acceptable_quality_skips_regeneration() {
        let f = fixture(
            StubResearch::returning(sample_sources()),
            StubAnalysis::returning(sample_analysis()),
            StubWriter::returning(long_response()),
        );

        f.controller.handle("query").await;

        assert_eq!(f.analysis.calls(), 1);
        assert_eq!(f.writer.calls(), 1);
        let quality = f.sink.of_kind("quality.evaluated");
        assert_eq!(
            quality,
            vec![PipelineEvent::quality_evaluated(0.8, 0.6, false)]
        );
    }

    #[tokio::test]
    async fn test_short_response_is_rejected_then_falls_back() {
        let f = fixture(
            StubResearch::returning(sample_sources()),
            StubAnalysis::returning(sample_analysis()),
            StubWriter::returning("too short"),
        );

        let response = f.controller.handle("query").await;

        // Validation rejects every attempt, so the write fallback is used.
        // The fallback text scores below the gate, which triggers the one
        // regeneration pass: two write stage runs of three attempts each.
        assert_eq!(response, WRITE_FALLBACK_RESPONSE);
        assert_eq!(f.writer.calls(), 6);
        assert_eq!(f.analysis.calls(), 2);
        assert_eq!(f.sink.of_kind("stage.fallback").len(), 2);
    }

    #[tokio::test]
    async fn test_mismatched_payload_is_a_pipeline_error() {
        let f = fixture(
            StubResearch::returning(sample_sources()),
            StubAnalysis::returning(sample_analysis()),
            StubWriter::returning(long_response()),
        );
        let executor = StageExecutor::new(fast_policy());

        let err = f
            .controller
            .analysis_stage(&executor, TaskMessage::research("q"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            PipelineError::payload_mismatch(TaskKind::Analyze, TaskKind::Research)
        );
    }

    #[test]
    fn test_critical_error_response_format() {
        let err = PipelineError::payload_mismatch(TaskKind::Write, TaskKind::Research);
        let text = critical_error_response(&err);

        assert!(text.starts_with("# System Error\n\nAn unexpected error occurred: "));
        assert!(text.ends_with("\nPlease try again or contact support."));
    }

    #[tokio::test]
    async fn test_research_fallback_names_the_query() {
        let sources = research_fallback("what is rust?");
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].title, "System Notice");
        assert_eq!(
            sources[0].content,
            "Unable to retrieve sources for query: what is rust?. Using cached knowledge."
        );
    }
}
