//! qcat: one circuit API, several quantum backends.
//!
//! Build a circuit once with [`QCircuit`], then draw or execute it on any
//! registered backend family. Translation is cached per backend; execution
//! goes through the [`Dispatcher`](qcat_hal::Dispatcher), which runs
//! simulator targets locally and submits device targets to the backend's
//! cloud service.
//!
//! # Example
//!
//! ```rust,no_run
//! use qcat::{BackendKind, ExecutionRequest, QCircuit};
//!
//! # async fn run() -> Result<(), qcat::Error> {
//! let mut circuit = QCircuit::new(2)?;
//! circuit.h_gate(0)?.cx_gate(0, 1)?.measure_all()?;
//!
//! println!("{}", circuit.draw()?);
//!
//! let request = ExecutionRequest::new(BackendKind::Braket).with_repetitions(500);
//! let result = circuit.execute(&request).await?;
//! println!("{:?}", result.counts.sorted());
//!
//! let comparison = circuit.compare_results(None).await;
//! for (key, outcome) in comparison.iter() {
//!     println!("{key}: {}", outcome.is_ok());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Backends
//!
//! | Backend | Native form | Remote |
//! |---------|-------------|--------|
//! | `qiskit` | Qiskit circuit, drawn as OpenQASM 2 | IBM Quantum (token) |
//! | `cirq` | Cirq moments, drawn as a text diagram | none |
//! | `ionq` | Cirq circuit restricted to IonQ gates | IonQ (API key, always remote) |
//! | `braket` | OpenQASM 3 program | AWS Braket (S3 bucket) |
//! | `qsharp` | Q# program | none |
//!
//! # Errors
//!
//! Everything that reaches the caller is an [`Error`] (the HAL error type).
//! Append-time index violations are [`IrError`]s, which convert into it.

mod builders;
mod circuit;
pub mod compare;
pub mod config;
pub mod logging;
mod registry;

pub use circuit::{DEFAULT_BACKEND, QCircuit};
pub use compare::{Comparison, default_comparison};
pub use config::{ConfigError, ExecutionConfig, QcatConfig};
pub use registry::default_registry;

pub use qcat_hal::{
    Backend, BackendKind, BackendRegistry, Counts, Credentials, ExecutionRequest,
    ExecutionResult, HalError, HalResult, NativeCircuit, Target,
};
pub use qcat_ir::{Circuit, GateKind, IrError, IrResult, McxMode, Param, QubitId};

/// The caller-facing error type.
pub type Error = HalError;
