//! Error types for the IR crate.

use crate::gate::GateKind;
use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur while building or validating operations.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Operation references a qubit outside `[0, qubit_count)`.
    #[error("Qubit index {} out of bounds for a {qubit_count}-qubit circuit (gate: {kind})", .qubit.0)]
    QubitOutOfBounds {
        /// The offending qubit.
        qubit: QubitId,
        /// Number of qubits in the circuit.
        qubit_count: u32,
        /// Kind being appended.
        kind: GateKind,
    },

    /// Qubit groups do not match the kind's declared shape.
    #[error("Gate '{kind}' expects {expected}, got {got}")]
    QubitCountMismatch {
        /// Kind being appended.
        kind: GateKind,
        /// Human-readable description of the expected shape.
        expected: String,
        /// Human-readable description of what was supplied.
        got: String,
    },

    /// Parameters do not match the kind's declared parameter contract.
    #[error("Gate '{kind}' parameter mismatch: {reason}")]
    ParameterMismatch {
        /// Kind being appended.
        kind: GateKind,
        /// What went wrong.
        reason: String,
    },

    /// The same qubit appears twice in one operation.
    #[error("Duplicate qubit {qubit} in operation (gate: {kind})")]
    DuplicateQubit {
        /// The duplicated qubit.
        qubit: QubitId,
        /// Kind being appended.
        kind: GateKind,
    },

    /// A circuit must hold at least one qubit.
    #[error("Circuit qubit count must be positive")]
    EmptyCircuit,

    /// Matrix is not square or its dimension is not a power of two.
    #[error("Matrix '{name}' has invalid dimension: {reason}")]
    InvalidDimension {
        /// Matrix name.
        name: String,
        /// What went wrong.
        reason: String,
    },

    /// Matrix deviates from unitarity beyond tolerance.
    #[error("Matrix '{name}' is not unitary (max deviation {deviation:e})")]
    NonUnitary {
        /// Matrix name.
        name: String,
        /// Largest element-wise deviation of `U†U` from identity.
        deviation: f64,
    },

    /// Unknown gate kind name.
    #[error("Unknown gate kind: {0}")]
    UnknownKind(String),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
