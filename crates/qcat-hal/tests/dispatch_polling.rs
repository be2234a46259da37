//! Dispatcher tests against scripted task doubles.
//!
//! Time is paused, so polling intervals and timeouts advance instantly and
//! deterministically.

use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use qcat_hal::{
    Backend, BackendKind, Counts, Dispatcher, ExecutionRequest, HalError, HalResult, JobId,
    JobStatus, LoweredCircuit, NativeCircuit, Program, Route, Simulator, TaskApi, TaskPayload,
    Target,
};
use qcat_ir::{Circuit, QubitId, matrices};
use tokio::time::Instant;

/// Task API that replays a fixed status script and records every call.
struct ScriptedTasks {
    statuses: Mutex<VecDeque<JobStatus>>,
    calls: Mutex<Vec<&'static str>>,
    missing_shots: u64,
}

impl ScriptedTasks {
    fn new(statuses: Vec<JobStatus>) -> Arc<Self> {
        Arc::new(Self {
            statuses: Mutex::new(statuses.into()),
            calls: Mutex::new(Vec::new()),
            missing_shots: 0,
        })
    }

    /// Completes immediately but returns `missing` fewer shots than requested.
    fn short_by(missing: u64) -> Arc<Self> {
        Arc::new(Self {
            statuses: Mutex::new(VecDeque::from([JobStatus::Completed])),
            calls: Mutex::new(Vec::new()),
            missing_shots: missing,
        })
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl TaskApi for ScriptedTasks {
    async fn create_task(&self, _payload: &TaskPayload) -> HalResult<JobId> {
        self.record("create");
        Ok(JobId::new("task-1"))
    }

    async fn task_status(&self, _id: &JobId) -> HalResult<JobStatus> {
        self.record("status");
        // An exhausted script stays pending forever.
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(JobStatus::Running))
    }

    async fn task_result(&self, _id: &JobId, payload: &TaskPayload) -> HalResult<Counts> {
        self.record("result");
        let shots = u64::from(payload.shots).saturating_sub(self.missing_shots);
        if shots == 0 {
            return Ok(Counts::new());
        }
        Ok(Counts::from_pairs([("11", shots)]))
    }

    async fn cancel_task(&self, _id: &JobId) -> HalResult<()> {
        self.record("cancel");
        Ok(())
    }
}

/// Simulator that puts every shot on the all-ones outcome.
struct AllOnes;

impl Simulator for AllOnes {
    fn name(&self) -> &str {
        "all-ones"
    }

    fn run(&self, circuit: &LoweredCircuit, shots: u32) -> HalResult<Counts> {
        let width = circuit.measured_qubits().len();
        if width == 0 {
            return Err(HalError::InvalidCircuit("no measurements".into()));
        }
        Ok(Counts::from_pairs([("1".repeat(width), u64::from(shots))]))
    }
}

#[derive(Debug)]
struct TwoQubitNative;

impl fmt::Display for TwoQubitNative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x q0; cx q0,q1; measure")
    }
}

impl NativeCircuit for TwoQubitNative {
    fn num_qubits(&self) -> u32 {
        2
    }

    fn lower(&self) -> HalResult<LoweredCircuit> {
        let mut lowered = LoweredCircuit::new(2);
        lowered.gate(matrices::x(), vec![QubitId(0)])?;
        lowered.controlled(matrices::x(), vec![QubitId(0)], vec![QubitId(1)])?;
        lowered.measure(QubitId(0));
        lowered.measure(QubitId(1));
        Ok(lowered)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Backend that routes devices to a scripted task API.
struct ScriptedBackend {
    tasks: Arc<ScriptedTasks>,
}

#[async_trait]
impl Backend for ScriptedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Braket
    }

    fn translate(&self, _circuit: &Circuit) -> HalResult<Arc<dyn NativeCircuit>> {
        Ok(Arc::new(TwoQubitNative))
    }

    fn route(&self, request: &ExecutionRequest) -> HalResult<Route> {
        Ok(match &request.target {
            Target::Simulator(_) => Route::Local,
            Target::Device(name) => Route::Remote {
                target: name.clone(),
            },
        })
    }

    async fn connect(&self, request: &ExecutionRequest) -> HalResult<Arc<dyn TaskApi>> {
        request.require_storage()?;
        Ok(self.tasks.clone())
    }

    fn payload(
        &self,
        native: &dyn NativeCircuit,
        request: &ExecutionRequest,
        target: &str,
    ) -> HalResult<TaskPayload> {
        Ok(TaskPayload {
            target: target.to_string(),
            shots: request.repetitions,
            program: Program::OpenQasm3(native.to_string()),
            num_qubits: native.num_qubits(),
            measured: vec![QubitId(0), QubitId(1)],
        })
    }
}

fn remote_request() -> ExecutionRequest {
    ExecutionRequest::new(BackendKind::Braket)
        .with_device("arn:aws:braket:::device/qpu/test")
        .with_storage("bucket", "results")
        .with_repetitions(50)
        .with_poll_timeout(Duration::from_secs(100))
        .with_poll_interval(Duration::from_secs(10))
}

fn dispatcher() -> Dispatcher {
    Dispatcher::new(Arc::new(AllOnes))
}

#[tokio::test(start_paused = true)]
async fn test_remote_completes_after_pending_polls() {
    let tasks = ScriptedTasks::new(vec![
        JobStatus::Queued,
        JobStatus::Running,
        JobStatus::Completed,
    ]);
    let backend = ScriptedBackend {
        tasks: tasks.clone(),
    };
    let start = Instant::now();

    let result = dispatcher()
        .execute(&backend, &TwoQubitNative, &remote_request())
        .await
        .unwrap();

    assert_eq!(result.counts.get("11"), 50);
    assert_eq!(result.counts.total_shots(), 50);
    let job = result.job.expect("remote results carry the task record");
    assert_eq!(job.polls, 3);
    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.finished_at.is_some());
    assert_eq!(start.elapsed(), Duration::from_secs(20));
    assert_eq!(
        tasks.calls(),
        vec!["create", "status", "status", "status", "result"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_remote_failure_is_task_failed() {
    let tasks = ScriptedTasks::new(vec![
        JobStatus::Running,
        JobStatus::Failed("calibration drift".into()),
    ]);
    let backend = ScriptedBackend {
        tasks: tasks.clone(),
    };

    let err = dispatcher()
        .execute(&backend, &TwoQubitNative, &remote_request())
        .await
        .unwrap_err();

    match err {
        HalError::TaskFailed { task_id, reason } => {
            assert_eq!(task_id, "task-1");
            assert_eq!(reason, "calibration drift");
        }
        other => panic!("expected TaskFailed, got {other:?}"),
    }
    assert_eq!(tasks.count("result"), 0);
    assert_eq!(tasks.count("cancel"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_remote_never_terminal_is_task_timeout() {
    let tasks = ScriptedTasks::new(vec![]);
    let backend = ScriptedBackend {
        tasks: tasks.clone(),
    };
    let start = Instant::now();

    let err = dispatcher()
        .execute(&backend, &TwoQubitNative, &remote_request())
        .await
        .unwrap_err();

    match err {
        HalError::TaskTimeout { task_id, waited } => {
            assert_eq!(task_id, "task-1");
            assert_eq!(waited, Duration::from_secs(100));
        }
        other => panic!("expected TaskTimeout, got {other:?}"),
    }
    assert_eq!(start.elapsed(), Duration::from_secs(100));
    // t = 0, 10, ..., 100
    assert_eq!(tasks.count("status"), 11);
    assert_eq!(tasks.count("cancel"), 1);
    assert_eq!(tasks.count("result"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_interval_longer_than_timeout_polls_at_deadline() {
    let tasks = ScriptedTasks::new(vec![]);
    let backend = ScriptedBackend {
        tasks: tasks.clone(),
    };
    let request = remote_request()
        .with_poll_timeout(Duration::from_secs(5))
        .with_poll_interval(Duration::from_secs(60));
    let start = Instant::now();

    let err = dispatcher()
        .execute(&backend, &TwoQubitNative, &request)
        .await
        .unwrap_err();

    assert!(matches!(err, HalError::TaskTimeout { .. }));
    assert_eq!(start.elapsed(), Duration::from_secs(5));
    assert_eq!(tasks.count("status"), 2);
}

#[tokio::test(start_paused = true)]
async fn test_short_counts_are_incomplete_result() {
    let tasks = ScriptedTasks::short_by(8);
    let backend = ScriptedBackend {
        tasks: tasks.clone(),
    };

    let err = dispatcher()
        .execute(&backend, &TwoQubitNative, &remote_request())
        .await
        .unwrap_err();

    match err {
        HalError::IncompleteResult {
            task_id,
            expected,
            actual,
        } => {
            assert_eq!(task_id, "task-1");
            assert_eq!(expected, 50);
            assert_eq!(actual, 42);
        }
        other => panic!("expected IncompleteResult, got {other:?}"),
    }
    assert_eq!(tasks.calls(), vec!["create", "status", "result"]);
}

#[tokio::test(start_paused = true)]
async fn test_empty_counts_are_incomplete_result() {
    let backend = ScriptedBackend {
        tasks: ScriptedTasks::short_by(50),
    };

    let err = dispatcher()
        .execute(&backend, &TwoQubitNative, &remote_request())
        .await
        .unwrap_err();

    assert!(matches!(err, HalError::IncompleteResult { actual: 0, .. }));
}

#[tokio::test]
async fn test_missing_storage_fails_before_any_call() {
    let tasks = ScriptedTasks::new(vec![JobStatus::Completed]);
    let backend = ScriptedBackend {
        tasks: tasks.clone(),
    };
    let mut request = remote_request();
    request.storage = None;

    let err = dispatcher()
        .execute(&backend, &TwoQubitNative, &request)
        .await
        .unwrap_err();

    assert!(matches!(err, HalError::MissingCredentials { .. }));
    assert!(tasks.calls().is_empty());
}

#[tokio::test]
async fn test_local_route_uses_simulator() {
    let tasks = ScriptedTasks::new(vec![]);
    let backend = ScriptedBackend {
        tasks: tasks.clone(),
    };
    let request = ExecutionRequest::new(BackendKind::Braket).with_repetitions(50);

    let result = dispatcher()
        .execute(&backend, &TwoQubitNative, &request)
        .await
        .unwrap();

    assert_eq!(result.counts.get("11"), 50);
    assert_eq!(result.backend, Some(BackendKind::Braket));
    assert!(result.job.is_none());
    assert!(result.execution_time_ms.is_some());
    assert!(tasks.calls().is_empty());
}

#[tokio::test]
async fn test_zero_repetitions_rejected() {
    let backend = ScriptedBackend {
        tasks: ScriptedTasks::new(vec![]),
    };
    let request = ExecutionRequest::new(BackendKind::Braket).with_repetitions(0);

    let err = dispatcher()
        .execute(&backend, &TwoQubitNative, &request)
        .await
        .unwrap_err();
    assert!(matches!(err, HalError::InvalidRequest(_)));
}
