//! The circuit façade.

use std::fmt;
use std::sync::Arc;

use qcat_adapter_sim::StatevectorSimulator;
use qcat_hal::{
    BackendKind, BackendRegistry, Dispatcher, ExecutionRequest, ExecutionResult, HalResult,
    NativeCircuit, Simulator,
};
use qcat_ir::{Circuit, GateKind, IrResult, Operation, Param, QubitId};
use tracing::{debug, info, instrument};

use crate::config::QcatConfig;
use crate::registry::default_registry;

/// Backend selected when none is given.
pub const DEFAULT_BACKEND: BackendKind = BackendKind::Cirq;

/// The last translation, keyed by backend and operation count.
struct CachedTranslation {
    backend: BackendKind,
    operations: usize,
    native: Arc<dyn NativeCircuit>,
}

/// A circuit plus its selected backend and translation cache.
///
/// Operations are validated when appended and never change afterwards.
/// A translation is reused while both the backend and the number of
/// operations are unchanged, so appending after a draw or execute
/// re-translates on the next call.
pub struct QCircuit {
    circuit: Circuit,
    backend: BackendKind,
    registry: BackendRegistry,
    pub(crate) dispatcher: Dispatcher,
    cache: Option<CachedTranslation>,
    translations: usize,
}

impl QCircuit {
    /// Empty circuit over `num_qubits` qubits on [`DEFAULT_BACKEND`].
    pub fn new(num_qubits: u32) -> IrResult<Self> {
        Ok(Self::from_circuit(Circuit::new(num_qubits)?))
    }

    /// Empty circuit using the backend and simulator settings of `config`.
    pub fn from_config(num_qubits: u32, config: &QcatConfig) -> IrResult<Self> {
        Ok(Self::new(num_qubits)?.configured(config))
    }

    /// Wrap an already built circuit.
    pub fn from_circuit(circuit: Circuit) -> Self {
        Self {
            circuit,
            backend: DEFAULT_BACKEND,
            registry: default_registry(),
            dispatcher: Dispatcher::new(Arc::new(StatevectorSimulator::new())),
            cache: None,
            translations: 0,
        }
    }

    /// Apply the backend and simulator settings of `config`.
    pub fn configured(self, config: &QcatConfig) -> Self {
        let simulator = match config.simulator.seed {
            Some(seed) => StatevectorSimulator::with_seed(seed),
            None => StatevectorSimulator::new(),
        }
        .with_max_qubits(config.simulator.max_qubits);
        self.with_backend(config.backend)
            .with_simulator(Arc::new(simulator))
    }

    /// Select `backend`.
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Use `registry` instead of [`default_registry`].
    pub fn with_registry(mut self, registry: BackendRegistry) -> Self {
        self.registry = registry;
        self.cache = None;
        self
    }

    /// Run local targets on `simulator`.
    pub fn with_simulator(mut self, simulator: Arc<dyn Simulator>) -> Self {
        self.dispatcher = Dispatcher::new(simulator);
        self
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.circuit.num_qubits()
    }

    /// The recorded operations, in order.
    pub fn operations(&self) -> &[Operation] {
        self.circuit.operations()
    }

    /// The underlying operation log.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Validate and record one operation.
    pub fn append(
        &mut self,
        kind: GateKind,
        qubit_groups: Vec<Vec<QubitId>>,
        params: Vec<Param>,
    ) -> IrResult<&mut Self> {
        self.circuit.append(kind, qubit_groups, params)?;
        Ok(self)
    }

    /// The selected backend.
    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    /// Select `backend` for subsequent draws.
    pub fn set_backend(&mut self, backend: BackendKind) -> &mut Self {
        self.backend = backend;
        self
    }

    /// How many times this circuit has been translated.
    pub fn translation_count(&self) -> usize {
        self.translations
    }

    /// Native circuit for `backend`, translating only when the cache does
    /// not hold one for this backend and operation count.
    ///
    /// `backend` becomes the selected backend.
    pub fn check_and_convert(&mut self, backend: BackendKind) -> HalResult<Arc<dyn NativeCircuit>> {
        self.backend = backend;
        let operations = self.circuit.len();
        if let Some(cached) = &self.cache {
            if cached.backend == backend && cached.operations == operations {
                debug!(%backend, operations, "Reusing cached translation");
                return Ok(cached.native.clone());
            }
        }

        let native = self.registry.get(backend)?.translate(&self.circuit)?;
        self.translations += 1;
        debug!(%backend, operations, translations = self.translations, "Translated circuit");
        self.cache = Some(CachedTranslation {
            backend,
            operations,
            native: native.clone(),
        });
        Ok(native)
    }

    /// Draw the circuit for the selected backend.
    pub fn draw(&mut self) -> HalResult<String> {
        self.draw_for(self.backend)
    }

    /// Draw the circuit for `backend`, selecting it.
    pub fn draw_for(&mut self, backend: BackendKind) -> HalResult<String> {
        Ok(self.check_and_convert(backend)?.to_string())
    }

    /// Translate for `request.backend` and execute.
    #[instrument(skip_all, fields(backend = %request.backend, target = %request.target))]
    pub async fn execute(&mut self, request: &ExecutionRequest) -> HalResult<ExecutionResult> {
        let native = self.check_and_convert(request.backend)?;
        let backend = self.registry.get(request.backend)?;
        let result = self
            .dispatcher
            .execute(backend.as_ref(), native.as_ref(), request)
            .await?;
        info!(
            shots = result.shots,
            outcomes = result.counts.len(),
            "Circuit executed"
        );
        Ok(result)
    }

    pub(crate) fn registry(&self) -> &BackendRegistry {
        &self.registry
    }
}

impl fmt::Debug for QCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QCircuit")
            .field("num_qubits", &self.circuit.num_qubits())
            .field("operations", &self.circuit.len())
            .field("backend", &self.backend)
            .field("translations", &self.translations)
            .finish()
    }
}
