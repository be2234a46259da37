//! Remote task boundary.

use async_trait::async_trait;
use qcat_ir::QubitId;

use crate::error::HalResult;
use crate::job::{JobId, JobStatus};
use crate::result::Counts;

/// Program body in the format the remote service accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Program {
    /// OpenQASM 3 source.
    OpenQasm3(String),
    /// A JSON circuit document.
    Json(serde_json::Value),
}

/// Everything a remote service needs to create a task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskPayload {
    /// Backend-specific target (device name, ARN, ...).
    pub target: String,
    /// Repetitions.
    pub shots: u32,
    /// The program.
    pub program: Program,
    /// Total qubits in the circuit.
    pub num_qubits: u32,
    /// Measured qubits in ascending order; decoders use this to build
    /// bitstrings.
    pub measured: Vec<QubitId>,
}

/// Submit/poll/fetch API of one remote service.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Submit a task and return its handle.
    async fn create_task(&self, payload: &TaskPayload) -> HalResult<JobId>;

    /// Current status of a task.
    async fn task_status(&self, id: &JobId) -> HalResult<JobStatus>;

    /// Counts of a completed task, keyed by measured-qubit bitstrings.
    async fn task_result(&self, id: &JobId, payload: &TaskPayload) -> HalResult<Counts>;

    /// Request cancellation.
    async fn cancel_task(&self, id: &JobId) -> HalResult<()>;
}
