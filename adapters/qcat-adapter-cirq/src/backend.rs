//! Cirq backend: local simulation only.

use std::sync::Arc;

use async_trait::async_trait;
use qcat_hal::{Backend, BackendKind, HalResult, NativeCircuit};
use qcat_ir::Circuit;

use crate::translate::translate;

/// The Cirq backend family.
///
/// Every simulator target runs on the local simulator; device targets are
/// rejected with [`qcat_hal::HalError::UnsupportedTarget`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CirqBackend;

impl CirqBackend {
    /// Create the backend.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Backend for CirqBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Cirq
    }

    fn translate(&self, circuit: &Circuit) -> HalResult<Arc<dyn NativeCircuit>> {
        Ok(Arc::new(translate(circuit)?))
    }
}
