//! Stage execution with bounded retries and guaranteed fallbacks.
//!
//! [`StageExecutor::execute`] is the single chokepoint through which every
//! stage runs. It retries failed attempts up to the policy's limit and then
//! substitutes a caller-supplied fallback, so a stage invocation always
//! yields a usable value. An attempt fails either because the operation
//! returned an error or because its result was rejected by the validator;
//! the two are treated identically.

mod retry;

pub use retry::{RetryPolicy, RetryState};

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::StageError;
use crate::events::{EventSink, NoOpEventSink, PipelineEvent};
use crate::protocol::TaskKind;

/// Runs stage operations under a retry policy, emitting one event per
/// attempt and one more when a stage falls back.
#[derive(Clone)]
pub struct StageExecutor {
    policy: RetryPolicy,
    sink: Arc<dyn EventSink>,
}

impl StageExecutor {
    /// Creates an executor with the given policy and no event sink.
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            sink: Arc::new(NoOpEventSink),
        }
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Executes one stage to completion.
    ///
    /// Each attempt runs `operation` and checks the result with `validate`.
    /// On success the value is returned. Once attempts are exhausted,
    /// `fallback` supplies the stage result instead.
    pub async fn execute<T, Op, Fut, V, Fb>(
        &self,
        stage: TaskKind,
        mut operation: Op,
        validate: V,
        fallback: Fb,
    ) -> T
    where
        Op: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StageError>>,
        V: Fn(&T) -> Result<(), StageError>,
        Fb: FnOnce() -> T,
    {
        let mut state = RetryState::new();

        loop {
            let attempt = state.next_attempt();
            let result = match operation().await {
                Ok(value) => validate(&value).map(|()| value),
                Err(err) => Err(err),
            };

            match result {
                Ok(value) => {
                    debug!(stage = %stage, attempt, "stage attempt succeeded");
                    self.sink
                        .emit(PipelineEvent::attempt_succeeded(stage, attempt))
                        .await;
                    return value;
                }
                Err(err) => {
                    warn!(stage = %stage, attempt, error = %err, "stage attempt failed");
                    self.sink
                        .emit(PipelineEvent::attempt_failed(stage, attempt, err.to_string()))
                        .await;

                    if state.is_exhausted(&self.policy) {
                        warn!(stage = %stage, attempts = attempt, "stage attempts exhausted, using fallback");
                        self.sink.emit(PipelineEvent::fallback(stage, attempt)).await;
                        return fallback();
                    }

                    tokio::time::sleep(self.policy.base_delay).await;
                }
            }
        }
    }
}
