//! IonQ backend: every target is a remote IonQ job.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use qcat_hal::{
    Backend, BackendKind, ExecutionRequest, HalResult, NativeCircuit, Program, Route, TaskApi,
    TaskPayload, Target, downcast_native,
};
use qcat_ir::Circuit;
use tracing::info;

use super::API_KEY_CREDENTIAL;
use super::api::{DEFAULT_ENDPOINT, IonqClient};
use super::circuit::{IonqCircuit, translate};

/// IonQ's hosted ideal simulator.
pub const IONQ_SIMULATOR: &str = "simulator";

/// The IonQ backend family.
#[derive(Clone)]
pub struct IonqBackend {
    endpoint: String,
    task_api: Option<Arc<dyn TaskApi>>,
}

impl IonqBackend {
    /// Backend talking to the public IonQ endpoint.
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            task_api: None,
        }
    }

    /// Use a different IonQ API endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Submit through `api` instead of an [`IonqClient`].
    ///
    /// The API key is still required before `api` is handed out.
    pub fn with_task_api(mut self, api: Arc<dyn TaskApi>) -> Self {
        self.task_api = Some(api);
        self
    }
}

impl Default for IonqBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IonqBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IonqBackend")
            .field("endpoint", &self.endpoint)
            .field("task_api", &self.task_api.is_some())
            .finish()
    }
}

#[async_trait]
impl Backend for IonqBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::IonQ
    }

    fn translate(&self, circuit: &Circuit) -> HalResult<Arc<dyn NativeCircuit>> {
        Ok(Arc::new(translate(circuit)?))
    }

    fn route(&self, request: &ExecutionRequest) -> HalResult<Route> {
        let target = match &request.target {
            t if t.is_default_simulator() => IONQ_SIMULATOR.to_string(),
            Target::Simulator(name) | Target::Device(name) => name.clone(),
        };
        Ok(Route::Remote { target })
    }

    async fn connect(&self, request: &ExecutionRequest) -> HalResult<Arc<dyn TaskApi>> {
        let key = request.require_credentials(API_KEY_CREDENTIAL)?;
        if let Some(api) = &self.task_api {
            return Ok(api.clone());
        }
        info!(endpoint = %self.endpoint, "Connecting to IonQ");
        Ok(Arc::new(IonqClient::new(self.endpoint.clone(), key.expose())?))
    }

    fn payload(
        &self,
        native: &dyn NativeCircuit,
        request: &ExecutionRequest,
        target: &str,
    ) -> HalResult<TaskPayload> {
        let circuit = downcast_native::<IonqCircuit>(native, self.kind())?;
        Ok(TaskPayload {
            target: target.to_string(),
            shots: request.repetitions,
            program: Program::Json(circuit.to_json()?),
            num_qubits: circuit.num_qubits(),
            measured: circuit.measured_qubits(),
        })
    }
}
