//! Backend capability and native circuit traits.
//!
//! A [`Backend`] owns everything that differs between backend families:
//!
//! ```text
//!   translate() ──→ route() ──┬──→ Local:  native.lower() ──→ Simulator::run()
//!    (sync)         (sync)    │
//!                             └──→ Remote: connect() ──→ payload() ──→ TaskApi
//!                                           (async)       (sync)
//! ```
//!
//! The dispatcher in [`crate::dispatch`] drives this sequence; backends
//! never branch on another backend's kind.
//!
//! | Method | Kind | Required | Returns |
//! |--------|------|----------|---------|
//! | `kind()` | sync | yes | `BackendKind` |
//! | `translate()` | sync | yes | `HalResult<Arc<dyn NativeCircuit>>` |
//! | `route()` | sync | provided | `HalResult<Route>` |
//! | `connect()` | async | provided | `HalResult<Arc<dyn TaskApi>>` |
//! | `payload()` | sync | provided | `HalResult<TaskPayload>` |

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use qcat_ir::Circuit;

use crate::error::{HalError, HalResult};
use crate::kind::BackendKind;
use crate::lowered::LoweredCircuit;
use crate::remote::{TaskApi, TaskPayload};
use crate::request::{ExecutionRequest, Target};
use crate::result::Counts;

/// A backend-native circuit produced by translation.
///
/// `Display` renders the backend's own drawing of the circuit.
pub trait NativeCircuit: fmt::Display + fmt::Debug + Send + Sync + 'static {
    /// Number of qubits.
    fn num_qubits(&self) -> u32;

    /// Lower the native gates to matrices for local simulation.
    fn lower(&self) -> HalResult<LoweredCircuit>;

    /// Upcast for downcasting back to the concrete type.
    fn as_any(&self) -> &dyn Any;
}

/// Borrow `native` as the concrete circuit type a backend produced.
pub fn downcast_native<T: NativeCircuit>(
    native: &dyn NativeCircuit,
    backend: BackendKind,
) -> HalResult<&T> {
    native.as_any().downcast_ref::<T>().ok_or_else(|| {
        HalError::InvalidCircuit(format!(
            "native circuit was not produced by the {backend} translator"
        ))
    })
}

/// How a request is executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Synchronous local simulation.
    Local,
    /// Submit, poll and resolve against a remote service.
    Remote {
        /// Backend-specific target identifier.
        target: String,
    },
}

/// One backend family.
#[async_trait]
pub trait Backend: Send + Sync {
    /// The family this backend implements.
    fn kind(&self) -> BackendKind;

    /// Translate the operation log into this backend's native circuit.
    ///
    /// Translation is pure: the same circuit always yields a structurally
    /// identical native circuit.
    fn translate(&self, circuit: &Circuit) -> HalResult<Arc<dyn NativeCircuit>>;

    /// Decide between local simulation and remote submission.
    ///
    /// The default runs every simulator target locally and rejects devices.
    fn route(&self, request: &ExecutionRequest) -> HalResult<Route> {
        match &request.target {
            Target::Simulator(_) => Ok(Route::Local),
            Target::Device(name) => Err(HalError::UnsupportedTarget {
                backend: self.kind(),
                target: name.clone(),
            }),
        }
    }

    /// Open the remote task API.
    ///
    /// Implementations check credentials before touching the network.
    async fn connect(&self, request: &ExecutionRequest) -> HalResult<Arc<dyn TaskApi>> {
        Err(HalError::UnsupportedTarget {
            backend: self.kind(),
            target: request.target.to_string(),
        })
    }

    /// Build the submission payload for a remote target.
    fn payload(
        &self,
        native: &dyn NativeCircuit,
        request: &ExecutionRequest,
        target: &str,
    ) -> HalResult<TaskPayload> {
        let _ = (native, request);
        Err(HalError::UnsupportedTarget {
            backend: self.kind(),
            target: target.to_string(),
        })
    }
}

/// Local simulator collaborator.
pub trait Simulator: Send + Sync {
    /// Simulator name, for logging.
    fn name(&self) -> &str;

    /// Run `shots` repetitions and return the measurement histogram.
    fn run(&self, circuit: &LoweredCircuit, shots: u32) -> HalResult<Counts>;
}
