//! Scheduler trigger surface.
//!
//! The external trigger (cron, an orchestration service, an operator)
//! decides WHEN a run starts and supplies its identity; this module is
//! the ordered step sequence it invokes: announce-start, extract,
//! transform, load, announce-stop. A failed step is re-invoked up to the
//! configured retry count after a fixed delay before the run is marked
//! failed. Stages themselves never retry internally.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

use crate::errors::PipelineError;
use crate::runner::{PipelineRunner, RunReport, RunState, Stage};
use batch_indexer_shared::{RunId, RunOutcome};

/// Per-step retry policy supplied by whoever triggers the run.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure of a step.
    pub max_retries: u32,
    /// Fixed delay between attempts.
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            retry_delay: Duration::from_secs(300),
        }
    }
}

impl RetryPolicy {
    /// Create a policy from its parts.
    pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
        }
    }

    /// No retries: every step gets exactly one attempt.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            retry_delay: Duration::ZERO,
        }
    }
}

/// Drives a `PipelineRunner` through one run.
pub struct Scheduler {
    runner: PipelineRunner,
    policy: RetryPolicy,
}

impl Scheduler {
    /// Create a scheduler over the given runner and retry policy.
    pub fn new(runner: PipelineRunner, policy: RetryPolicy) -> Self {
        Self { runner, policy }
    }

    /// Execute one run end to end.
    ///
    /// Stages run strictly in sequence, each consuming its predecessor's
    /// persisted artifact. On success the report carries the outcome; a
    /// run with per-document load failures still succeeds, reported as
    /// "succeeded with N document failures". A failed run propagates the
    /// failing stage's error after its retries are exhausted.
    #[instrument(skip(self), fields(run = %run))]
    pub async fn execute(&self, run: &RunId) -> Result<RunReport, PipelineError> {
        info!("Run starting");
        let mut state = RunState::Pending;

        let rows_extracted = self
            .step(run, Stage::Extract, &mut state, || self.runner.extract(run))
            .await?;
        let rows_canonical = self
            .step(run, Stage::Transform, &mut state, || {
                self.runner.transform(run)
            })
            .await?;
        let load = self
            .step(run, Stage::Load, &mut state, || self.runner.load(run))
            .await?;

        state = RunState::Succeeded;
        let outcome = RunOutcome::from_report(&load);
        match &outcome {
            RunOutcome::Succeeded => {
                info!(state = %state, documents = load.total, "Run succeeded");
            }
            RunOutcome::SucceededWithFailures(count) => {
                warn!(
                    state = %state,
                    documents = load.total,
                    failed = count,
                    "Run succeeded with {} document failures",
                    count
                );
            }
        }
        info!("Run stopping");

        Ok(RunReport {
            run: run.clone(),
            rows_extracted,
            rows_canonical,
            load,
            outcome,
        })
    }

    /// Run one step with the configured retry policy.
    async fn step<T, F, Fut>(
        &self,
        run: &RunId,
        stage: Stage,
        state: &mut RunState,
        mut op: F,
    ) -> Result<T, PipelineError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, PipelineError>>,
    {
        *state = RunState::running(stage);
        debug!(state = %state, "Run state transition");

        let mut attempt: u32 = 0;
        loop {
            match op().await {
                Ok(value) => {
                    if attempt > 0 {
                        info!(stage = %stage, attempt, "Step succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) if attempt < self.policy.max_retries => {
                    attempt += 1;
                    warn!(
                        stage = %stage,
                        attempt,
                        max_retries = self.policy.max_retries,
                        delay_ms = self.policy.retry_delay.as_millis() as u64,
                        error = %e,
                        "Step failed; retrying after delay"
                    );
                    sleep(self.policy.retry_delay).await;
                }
                Err(e) => {
                    *state = RunState::Failed {
                        stage,
                        message: format!("{}: {}", e.kind(), e),
                    };
                    error!(
                        stage = %stage,
                        error_kind = e.kind(),
                        error = %e,
                        state = %state,
                        "Run failed"
                    );
                    return Err(e);
                }
            }
        }
    }
}
