//! End-to-end dispatch through the Qiskit backend.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use qcat_adapter_qiskit::QiskitBackend;
use qcat_adapter_sim::StatevectorSimulator;
use qcat_hal::{
    Backend, BackendKind, Counts, Credentials, Dispatcher, ExecutionRequest, HalError, HalResult,
    JobId, JobStatus, Program, TaskApi, TaskPayload,
};
use qcat_ir::{Circuit, GateKind, QubitId};

/// Task API that records every call and completes immediately.
#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<String>>,
}

impl Recorder {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskApi for Recorder {
    async fn create_task(&self, payload: &TaskPayload) -> HalResult<JobId> {
        let kind = match &payload.program {
            Program::OpenQasm3(_) => "qasm3",
            Program::Json(_) => "json",
        };
        self.calls
            .lock()
            .unwrap()
            .push(format!("create {} {kind}", payload.target));
        Ok(JobId::new("ibm-job"))
    }

    async fn task_status(&self, _id: &JobId) -> HalResult<JobStatus> {
        self.calls.lock().unwrap().push("status".into());
        Ok(JobStatus::Completed)
    }

    async fn task_result(&self, _id: &JobId, payload: &TaskPayload) -> HalResult<Counts> {
        self.calls.lock().unwrap().push("result".into());
        let zeros = "0".repeat(payload.measured.len());
        Ok(Counts::from_pairs([(zeros, u64::from(payload.shots))]))
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
    Dispatcher::new(Arc::new(StatevectorSimulator::with_seed(11)))
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
async fn test_device_without_token_makes_no_calls() {
    let recorder = Arc::new(Recorder::default());
    let backend = QiskitBackend::new().with_task_api(recorder.clone());
    let native = backend.translate(&bell()).unwrap();
    let request = ExecutionRequest::new(BackendKind::Qiskit).with_device("ibm_torino");

    let err = dispatcher()
        .execute(&backend, native.as_ref(), &request)
        .await
        .unwrap_err();

    match err {
        HalError::MissingCredentials { backend, credential } => {
            assert_eq!(backend, BackendKind::Qiskit);
            assert!(credential.contains("token"));
        }
        other => panic!("expected MissingCredentials, got {other:?}"),
    }
    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn test_device_with_token_submits_qasm3() {
    let recorder = Arc::new(Recorder::default());
    let backend = QiskitBackend::new().with_task_api(recorder.clone());
    let native = backend.translate(&bell()).unwrap();
    let request = ExecutionRequest::new(BackendKind::Qiskit)
        .with_device("ibm_torino")
        .with_credentials(Credentials::new("token"))
        .with_repetitions(64);

    let result = dispatcher()
        .execute(&backend, native.as_ref(), &request)
        .await
        .unwrap();

    assert_eq!(result.counts.get("00"), 64);
    assert_eq!(
        recorder.calls(),
        vec!["create ibm_torino qasm3", "status", "result"]
    );
}

#[tokio::test]
async fn test_local_bell_counts_sum_to_repetitions() {
    let backend = QiskitBackend::new();
    let native = backend.translate(&bell()).unwrap();
    let request = ExecutionRequest::new(BackendKind::Qiskit).with_repetitions(300);

    let result = dispatcher()
        .execute(&backend, native.as_ref(), &request)
        .await
        .unwrap();

    assert_eq!(result.counts.total_shots(), 300);
    assert_eq!(result.counts.get("00") + result.counts.get("11"), 300);
}

#[tokio::test]
async fn test_rccx_acts_on_declared_qubit_order() {
    // RCCX flips the target when both controls are set: |110> -> i|111>.
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

    let backend = QiskitBackend::new();
    let native = backend.translate(&c).unwrap();
    let request = ExecutionRequest::new(BackendKind::Qiskit).with_repetitions(40);
    let result = dispatcher()
        .execute(&backend, native.as_ref(), &request)
        .await
        .unwrap();

    assert_eq!(result.counts.get("111"), 40);
}

#[test]
fn test_translation_is_deterministic() {
    let backend = QiskitBackend::new();
    let first = qcat_adapter_qiskit::translate(&bell()).unwrap();
    let second = qcat_adapter_qiskit::translate(&bell()).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        backend.translate(&bell()).unwrap().to_string(),
        first.to_string()
    );
}
