//! Qiskit backend: local Aer-style simulation or IBM Quantum devices.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use qcat_hal::{
    Backend, BackendKind, ExecutionRequest, HalError, HalResult, NativeCircuit, Program, Route,
    TaskApi, TaskPayload, Target, downcast_native,
};
use qcat_ir::Circuit;
use tracing::info;

use crate::api::{DEFAULT_ENDPOINT, IbmClient};
use crate::circuit::QiskitCircuit;
use crate::translate::translate;

/// Credential name reported when no token is supplied.
pub const TOKEN_CREDENTIAL: &str = "an IBM Quantum API token";

/// The Qiskit backend family.
#[derive(Clone)]
pub struct QiskitBackend {
    endpoint: String,
    task_api: Option<Arc<dyn TaskApi>>,
}

impl QiskitBackend {
    /// Backend talking to the public IBM Quantum endpoint.
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            task_api: None,
        }
    }

    /// Use a different IBM Quantum API endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Submit through `api` instead of an [`IbmClient`].
    ///
    /// Credentials are still required before `api` is handed out.
    pub fn with_task_api(mut self, api: Arc<dyn TaskApi>) -> Self {
        self.task_api = Some(api);
        self
    }
}

impl Default for QiskitBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for QiskitBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QiskitBackend")
            .field("endpoint", &self.endpoint)
            .field("task_api", &self.task_api.is_some())
            .finish()
    }
}

#[async_trait]
impl Backend for QiskitBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Qiskit
    }

    fn translate(&self, circuit: &Circuit) -> HalResult<Arc<dyn NativeCircuit>> {
        Ok(Arc::new(translate(circuit)?))
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
        let token = request.require_credentials(TOKEN_CREDENTIAL)?;
        if let Some(api) = &self.task_api {
            return Ok(api.clone());
        }
        info!(endpoint = %self.endpoint, "Connecting to IBM Quantum");
        Ok(Arc::new(IbmClient::new(self.endpoint.clone(), token.expose())?))
    }

    fn payload(
        &self,
        native: &dyn NativeCircuit,
        request: &ExecutionRequest,
        target: &str,
    ) -> HalResult<TaskPayload> {
        let circuit = downcast_native::<QiskitCircuit>(native, self.kind())?;
        let measured = circuit.measured_qubits();
        if measured.is_empty() {
            return Err(HalError::InvalidCircuit(
                "IBM Quantum jobs need at least one measurement".into(),
            ));
        }
        Ok(TaskPayload {
            target: target.to_string(),
            shots: request.repetitions,
            program: Program::OpenQasm3(circuit.to_qasm3()),
            num_qubits: circuit.num_qubits(),
            measured,
        })
    }
}
