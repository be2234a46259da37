//! Error types for the HAL crate.

use std::time::Duration;

use qcat_ir::{GateKind, IrError};
use thiserror::Error;

use crate::kind::BackendKind;

/// Errors that can occur while translating or executing a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// A gate kind has neither a native nor a custom-gate mapping on a backend.
    #[error("Cannot translate '{kind}' for backend '{backend}': {reason}")]
    UnsupportedTranslation {
        /// Kind being translated.
        kind: GateKind,
        /// Selected backend.
        backend: BackendKind,
        /// Why no mapping applies.
        reason: String,
    },

    /// A remote path needs connection details that were not supplied.
    #[error("Backend '{backend}' requires {credential}, but none was supplied")]
    MissingCredentials {
        /// Backend that needs the credential.
        backend: BackendKind,
        /// Human-readable name of the missing item.
        credential: String,
    },

    /// The remote backend reported the task as failed.
    #[error("Task {task_id} failed: {reason}")]
    TaskFailed {
        /// Remote task handle.
        task_id: String,
        /// Failure reason reported by the backend.
        reason: String,
    },

    /// Polling exceeded the configured timeout before a terminal state.
    #[error("Task {task_id} did not finish within {waited:?}")]
    TaskTimeout {
        /// Remote task handle.
        task_id: String,
        /// Configured poll timeout.
        waited: Duration,
    },

    /// A completed task returned counts that do not add up to the requested shots.
    #[error("Task {task_id} returned {actual} of {expected} shots")]
    IncompleteResult {
        /// Remote task handle.
        task_id: String,
        /// Requested repetitions.
        expected: u64,
        /// Sum of the returned counts.
        actual: u64,
    },

    /// The remote backend reported the task as cancelled.
    #[error("Task {0} was cancelled")]
    TaskCancelled(String),

    /// The backend cannot run on the requested simulator or device.
    #[error("Backend '{backend}' does not support target '{target}'")]
    UnsupportedTarget {
        /// Selected backend.
        backend: BackendKind,
        /// Requested target name.
        target: String,
    },

    /// No backend is registered under the requested kind.
    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    /// The circuit cannot be executed as built.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// The execution request is malformed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// IR validation error.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl HalError {
    /// Shorthand for [`HalError::UnsupportedTranslation`].
    pub fn unsupported(kind: GateKind, backend: BackendKind, reason: impl Into<String>) -> Self {
        HalError::UnsupportedTranslation {
            kind,
            backend,
            reason: reason.into(),
        }
    }

    /// Shorthand for [`HalError::MissingCredentials`].
    pub fn missing_credentials(backend: BackendKind, credential: impl Into<String>) -> Self {
        HalError::MissingCredentials {
            backend,
            credential: credential.into(),
        }
    }
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
