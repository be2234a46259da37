//! Q# backend: local simulation only.

use std::sync::Arc;

use async_trait::async_trait;
use qcat_hal::{Backend, BackendKind, HalResult, NativeCircuit};
use qcat_ir::Circuit;

use crate::translate::translate;

/// The Q# backend family.
///
/// Programs run on the local simulator through their lowered form; device
/// targets are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct QSharpBackend;

impl QSharpBackend {
    /// Create the backend.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Backend for QSharpBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::QSharp
    }

    fn translate(&self, circuit: &Circuit) -> HalResult<Arc<dyn NativeCircuit>> {
        Ok(Arc::new(translate(circuit)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcat_hal::{ExecutionRequest, HalError};

    #[test]
    fn test_device_targets_are_rejected() {
        let request = ExecutionRequest::new(BackendKind::QSharp).with_device("quantinuum.h1");
        assert!(matches!(
            QSharpBackend::new().route(&request),
            Err(HalError::UnsupportedTarget {
                backend: BackendKind::QSharp,
                ..
            })
        ));
    }
}
