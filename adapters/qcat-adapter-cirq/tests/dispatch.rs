//! End-to-end dispatch through the Cirq and IonQ backends.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use qcat_adapter_cirq::CirqBackend;
use qcat_adapter_cirq::ionq::IonqBackend;
use qcat_adapter_sim::StatevectorSimulator;
use qcat_hal::{
    Backend, BackendKind, Counts, Credentials, Dispatcher, ExecutionRequest, HalError, HalResult,
    JobId, JobStatus, Program, TaskApi, TaskPayload,
};
use qcat_ir::{Circuit, GateKind, QubitId};

/// Task API that records calls and replays a fixed status sequence.
struct Scripted {
    statuses: Mutex<Vec<JobStatus>>,
    calls: Mutex<Vec<String>>,
}

impl Scripted {
    fn new(mut statuses: Vec<JobStatus>) -> Self {
        statuses.reverse();
        Self {
            statuses: Mutex::new(statuses),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskApi for Scripted {
    async fn create_task(&self, payload: &TaskPayload) -> HalResult<JobId> {
        let format = match &payload.program {
            Program::Json(doc) => doc["format"].as_str().unwrap_or("?").to_string(),
            Program::OpenQasm3(_) => "qasm3".into(),
        };
        self.calls
            .lock()
            .unwrap()
            .push(format!("create {} {format}", payload.target));
        Ok(JobId::new("ionq-job"))
    }

    async fn task_status(&self, _id: &JobId) -> HalResult<JobStatus> {
        self.calls.lock().unwrap().push("status".into());
        let mut statuses = self.statuses.lock().unwrap();
        Ok(if statuses.len() > 1 {
            statuses.pop().unwrap()
        } else {
            statuses.last().cloned().unwrap_or(JobStatus::Running)
        })
    }

    async fn task_result(&self, _id: &JobId, payload: &TaskPayload) -> HalResult<Counts> {
        self.calls.lock().unwrap().push("result".into());
        let ones = "1".repeat(payload.measured.len());
        Ok(Counts::from_pairs([(ones, u64::from(payload.shots))]))
    }

    async fn cancel_task(&self, _id: &JobId) -> HalResult<()> {
        self.calls.lock().unwrap().push("cancel".into());
        Ok(())
    }
}

fn q(i: u32) -> QubitId {
    QubitId(i)
}

fn dispatcher() -> Dispatcher {
    Dispatcher::new(Arc::new(StatevectorSimulator::with_seed(5)))
}

fn bell() -> Circuit {
    let mut c = Circuit::new(2).unwrap();
    c.append(GateKind::HGate, vec![vec![q(0)]], vec![])
        .unwrap()
        .append(GateKind::CxGate, vec![vec![q(0)], vec![q(1)]], vec![])
        .unwrap()
        .append(GateKind::MeasureAll, vec![], vec![])
        .unwrap();
    c
}

#[tokio::test]
async fn test_cirq_bell_runs_locally() {
    let backend = CirqBackend::new();
    let native = backend.translate(&bell()).unwrap();
    let request = ExecutionRequest::new(BackendKind::Cirq).with_repetitions(500);

    let result = dispatcher()
        .execute(&backend, native.as_ref(), &request)
        .await
        .unwrap();

    assert_eq!(result.counts.total_shots(), 500);
    assert_eq!(result.counts.get("00") + result.counts.get("11"), 500);
    assert_eq!(result.backend, Some(BackendKind::Cirq));
}

#[tokio::test]
async fn test_cirq_rccx_matrix_acts_on_declared_qubit_order() {
    let mut c = Circuit::new(3).unwrap();
    c.append(GateKind::XGate, vec![vec![q(0)]], vec![])
        .unwrap()
        .append(GateKind::XGate, vec![vec![q(1)]], vec![])
        .unwrap()
        .append(
            GateKind::RccxGate,
            vec![vec![q(0)], vec![q(1)], vec![q(2)]],
            vec![],
        )
        .unwrap()
        .append(GateKind::MeasureAll, vec![], vec![])
        .unwrap();

    let backend = CirqBackend::new();
    let native = backend.translate(&c).unwrap();
    let request = ExecutionRequest::new(BackendKind::Cirq).with_repetitions(25);
    let result = dispatcher()
        .execute(&backend, native.as_ref(), &request)
        .await
        .unwrap();

    assert_eq!(result.counts.get("111"), 25);
}

#[tokio::test]
async fn test_rccx_with_only_target_set_is_untouched() {
    // Both controls clear: the target keeps its value.
    let mut c = Circuit::new(3).unwrap();
    c.append(GateKind::XGate, vec![vec![q(2)]], vec![])
        .unwrap()
        .append(
            GateKind::RccxGate,
            vec![vec![q(0)], vec![q(1)], vec![q(2)]],
            vec![],
        )
        .unwrap()
        .append(GateKind::MeasureAll, vec![], vec![])
        .unwrap();

    let backend = CirqBackend::new();
    let native = backend.translate(&c).unwrap();
    let request = ExecutionRequest::new(BackendKind::Cirq).with_repetitions(10);
    let result = dispatcher()
        .execute(&backend, native.as_ref(), &request)
        .await
        .unwrap();

    assert_eq!(result.counts.get("001"), 10);
}

#[tokio::test]
async fn test_cirq_device_is_unsupported_target() {
    let backend = CirqBackend::new();
    let native = backend.translate(&bell()).unwrap();
    let request = ExecutionRequest::new(BackendKind::Cirq).with_device("weber");

    let err = dispatcher()
        .execute(&backend, native.as_ref(), &request)
        .await
        .unwrap_err();
    assert!(matches!(err, HalError::UnsupportedTarget { .. }));
}

#[tokio::test]
async fn test_ionq_without_key_makes_no_calls() {
    let api = Arc::new(Scripted::new(vec![JobStatus::Completed]));
    let backend = IonqBackend::new().with_task_api(api.clone());
    let native = backend.translate(&bell()).unwrap();
    let request = ExecutionRequest::new(BackendKind::IonQ);

    let err = dispatcher()
        .execute(&backend, native.as_ref(), &request)
        .await
        .unwrap_err();

    match err {
        HalError::MissingCredentials { backend, credential } => {
            assert_eq!(backend, BackendKind::IonQ);
            assert!(credential.contains("API key"));
        }
        other => panic!("expected MissingCredentials, got {other:?}"),
    }
    assert!(api.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_ionq_polls_until_completed() {
    let api = Arc::new(Scripted::new(vec![
        JobStatus::Queued,
        JobStatus::Running,
        JobStatus::Completed,
    ]));
    let backend = IonqBackend::new().with_task_api(api.clone());
    let native = backend.translate(&bell()).unwrap();
    let request = ExecutionRequest::new(BackendKind::IonQ)
        .with_credentials(Credentials::new("key"))
        .with_repetitions(100)
        .with_poll_interval(Duration::from_secs(1));

    let result = dispatcher()
        .execute(&backend, native.as_ref(), &request)
        .await
        .unwrap();

    assert_eq!(result.counts.get("11"), 100);
    assert_eq!(
        api.calls(),
        vec![
            "create simulator ionq.circuit.v0",
            "status",
            "status",
            "status",
            "result"
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_ionq_failed_job_is_task_failed() {
    let api = Arc::new(Scripted::new(vec![
        JobStatus::Running,
        JobStatus::Failed("calibration".into()),
    ]));
    let backend = IonqBackend::new().with_task_api(api.clone());
    let native = backend.translate(&bell()).unwrap();
    let request = ExecutionRequest::new(BackendKind::IonQ)
        .with_device("qpu.aria-1")
        .with_credentials(Credentials::new("key"));

    let err = dispatcher()
        .execute(&backend, native.as_ref(), &request)
        .await
        .unwrap_err();

    match err {
        HalError::TaskFailed { task_id, reason } => {
            assert_eq!(task_id, "ionq-job");
            assert_eq!(reason, "calibration");
        }
        other => panic!("expected TaskFailed, got {other:?}"),
    }
    assert!(!api.calls().contains(&"result".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_ionq_timeout_cancels_and_is_distinct_from_failure() {
    let api = Arc::new(Scripted::new(vec![JobStatus::Running]));
    let backend = IonqBackend::new().with_task_api(api.clone());
    let native = backend.translate(&bell()).unwrap();
    let request = ExecutionRequest::new(BackendKind::IonQ)
        .with_credentials(Credentials::new("key"))
        .with_poll_timeout(Duration::from_secs(30))
        .with_poll_interval(Duration::from_secs(10));

    let err = dispatcher()
        .execute(&backend, native.as_ref(), &request)
        .await
        .unwrap_err();

    match err {
        HalError::TaskTimeout { task_id, waited } => {
            assert_eq!(task_id, "ionq-job");
            assert_eq!(waited, Duration::from_secs(30));
        }
        other => panic!("expected TaskTimeout, got {other:?}"),
    }
    assert_eq!(api.calls().last().map(String::as_str), Some("cancel"));
}
