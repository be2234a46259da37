//! Execution Dispatcher.
//!
//! Per request:
//!
//! 1. **Route**: the backend decides local vs. remote.
//! 2. **Submit**: local targets are lowered and simulated synchronously;
//!    remote targets connect (credentials checked first) and create a task.
//! 3. **Poll**: remote only. Status is checked every `poll_interval` until
//!    a terminal state or until `poll_timeout` has elapsed. This is the only
//!    suspension point.
//! 4. **Resolve**: `Completed` fetches counts; `Failed` becomes
//!    [`HalError::TaskFailed`]; an expired deadline becomes
//!    [`HalError::TaskTimeout`].

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, info, instrument, warn};

use crate::backend::{Backend, NativeCircuit, Route, Simulator};
use crate::error::{HalError, HalResult};
use crate::job::{Job, JobStatus};
use crate::kind::BackendKind;
use crate::remote::{TaskApi, TaskPayload};
use crate::request::ExecutionRequest;
use crate::result::ExecutionResult;

/// Runs native circuits locally or remotely and returns uniform results.
#[derive(Clone)]
pub struct Dispatcher {
    simulator: Arc<dyn Simulator>,
}

impl Dispatcher {
    /// Dispatcher using `simulator` for local targets.
    pub fn new(simulator: Arc<dyn Simulator>) -> Self {
        Self { simulator }
    }

    /// The local simulator.
    pub fn simulator(&self) -> &dyn Simulator {
        self.simulator.as_ref()
    }

    /// Execute a translated circuit.
    #[instrument(
        skip_all,
        fields(backend = %backend.kind(), target = %request.target, shots = request.repetitions)
    )]
    pub async fn execute(
        &self,
        backend: &dyn Backend,
        native: &dyn NativeCircuit,
        request: &ExecutionRequest,
    ) -> HalResult<ExecutionResult> {
        request.validate()?;
        let started = std::time::Instant::now();

        let result = match backend.route(request)? {
            Route::Local => self.run_local(backend.kind(), native, request.repetitions)?,
            Route::Remote { target } => {
                let api = backend.connect(request).await?;
                let payload = backend.payload(native, request, &target)?;
                self.submit_and_wait(api.as_ref(), backend.kind(), &payload, request)
                    .await?
            }
        };

        let elapsed = started.elapsed().as_millis() as u64;
        info!(elapsed_ms = elapsed, outcomes = result.counts.len(), "Execution finished");
        Ok(result.with_execution_time(elapsed))
    }

    fn run_local(
        &self,
        backend: BackendKind,
        native: &dyn NativeCircuit,
        shots: u32,
    ) -> HalResult<ExecutionResult> {
        let lowered = native.lower()?;
        debug!(
            simulator = self.simulator.name(),
            steps = lowered.ops().len(),
            "Running local simulation"
        );
        let counts = self.simulator.run(&lowered, shots)?;
        Ok(ExecutionResult::new(counts, shots).with_backend(backend))
    }

    /// Create a task, wait for it, and fetch its counts.
    pub async fn submit_and_wait(
        &self,
        api: &dyn TaskApi,
        backend: BackendKind,
        payload: &TaskPayload,
        request: &ExecutionRequest,
    ) -> HalResult<ExecutionResult> {
        let id = api.create_task(payload).await?;
        info!(task_id = %id, target = %payload.target, "Task submitted");

        let job = Job::new(id, backend, payload.shots);
        let job = wait_for_task(api, job, request.poll_timeout, request.poll_interval).await?;
        let counts = api.task_result(&job.id, payload).await?;
        let actual = counts.total_shots();
        if actual != u64::from(payload.shots) {
            warn!(
                task_id = %job.id,
                actual,
                expected = payload.shots,
                "Task counts do not match requested shots"
            );
            return Err(HalError::IncompleteResult {
                task_id: job.id.0,
                expected: u64::from(payload.shots),
                actual,
            });
        }

        Ok(ExecutionResult::new(counts, payload.shots)
            .with_backend(backend)
            .with_job(job))
    }
}

/// Poll until `job` reaches a terminal state or `timeout` elapses.
///
/// On timeout a best-effort cancellation is sent before returning
/// [`HalError::TaskTimeout`].
pub async fn wait_for_task(
    api: &dyn TaskApi,
    mut job: Job,
    timeout: Duration,
    interval: Duration,
) -> HalResult<Job> {
    let deadline = Instant::now() + timeout;

    loop {
        let status = api.task_status(&job.id).await?;
        job.polls += 1;
        debug!(task_id = %job.id, %status, poll = job.polls, "Polled task");
        job = job.with_status(status.clone());

        match status {
            JobStatus::Completed => return Ok(job),
            JobStatus::Failed(reason) => {
                return Err(HalError::TaskFailed {
                    task_id: job.id.0,
                    reason,
                });
            }
            JobStatus::Cancelled => return Err(HalError::TaskCancelled(job.id.0)),
            JobStatus::Queued | JobStatus::Running => {}
        }

        let now = Instant::now();
        if now >= deadline {
            warn!(task_id = %job.id, ?timeout, "Task did not finish in time, cancelling");
            if let Err(e) = api.cancel_task(&job.id).await {
                warn!(task_id = %job.id, error = %e, "Cancellation failed");
            }
            return Err(HalError::TaskTimeout {
                task_id: job.id.0,
                waited: timeout,
            });
        }
        sleep(interval.min(deadline - now)).await;
    }
}
