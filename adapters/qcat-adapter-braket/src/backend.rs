//! Braket backend: local simulation or AWS Braket devices.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use qcat_hal::{
    Backend, BackendKind, ExecutionRequest, HalResult, NativeCircuit, Program, Route, TaskApi,
    TaskPayload, Target, downcast_native,
};
use qcat_ir::Circuit;
use tracing::info;

use crate::api::BraketClient;
use crate::device::{DEFAULT_REGION, region_from_arn, resolve_device};
use crate::program::BraketProgram;
use crate::translate::translate;

/// The Braket backend family.
#[derive(Clone, Default)]
pub struct BraketBackend {
    region: Option<String>,
    task_api: Option<Arc<dyn TaskApi>>,
}

impl BraketBackend {
    /// Backend using the device ARN's region, then `AWS_REGION`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Always use `region`.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Submit through `api` instead of a [`BraketClient`].
    ///
    /// The storage location is still required before `api` is handed out.
    pub fn with_task_api(mut self, api: Arc<dyn TaskApi>) -> Self {
        self.task_api = Some(api);
        self
    }

    fn region_for(&self, device_arn: &str) -> String {
        self.region
            .clone()
            .or_else(|| region_from_arn(device_arn).map(str::to_string))
            .or_else(|| std::env::var("AWS_REGION").ok())
            .unwrap_or_else(|| DEFAULT_REGION.to_string())
    }
}

impl fmt::Debug for BraketBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BraketBackend")
            .field("region", &self.region)
            .field("task_api", &self.task_api.is_some())
            .finish()
    }
}

#[async_trait]
impl Backend for BraketBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Braket
    }

    fn translate(&self, circuit: &Circuit) -> HalResult<Arc<dyn NativeCircuit>> {
        Ok(Arc::new(translate(circuit)?))
    }

    fn route(&self, request: &ExecutionRequest) -> HalResult<Route> {
        Ok(match &request.target {
            Target::Simulator(_) => Route::Local,
            Target::Device(name) => Route::Remote {
                target: resolve_device(name),
            },
        })
    }

    async fn connect(&self, request: &ExecutionRequest) -> HalResult<Arc<dyn TaskApi>> {
        let storage = request.require_storage()?;
        if let Some(api) = &self.task_api {
            return Ok(api.clone());
        }
        let device = resolve_device(request.target.name());
        let region = self.region_for(&device);
        info!(%region, bucket = %storage.bucket, "Connecting to AWS Braket");
        let client = BraketClient::new(region, &storage.bucket, &storage.directory).await?;
        Ok(Arc::new(client))
    }

    fn payload(
        &self,
        native: &dyn NativeCircuit,
        request: &ExecutionRequest,
        target: &str,
    ) -> HalResult<TaskPayload> {
        let program = downcast_native::<BraketProgram>(native, self.kind())?;
        Ok(TaskPayload {
            target: target.to_string(),
            shots: request.repetitions,
            program: Program::OpenQasm3(program.to_qasm()),
            num_qubits: program.num_qubits(),
            measured: program.measured_qubits(),
        })
    }
}
