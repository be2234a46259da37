//! The stock backend set.

use std::sync::Arc;

use qcat_adapter_braket::BraketBackend;
use qcat_adapter_cirq::CirqBackend;
use qcat_adapter_cirq::ionq::IonqBackend;
use qcat_adapter_qiskit::QiskitBackend;
use qcat_adapter_qsharp::QSharpBackend;
use qcat_hal::BackendRegistry;

/// Registry holding every built-in backend with its default settings.
pub fn default_registry() -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    registry
        .register(Arc::new(QiskitBackend::new()))
        .register(Arc::new(CirqBackend::new()))
        .register(Arc::new(IonqBackend::new()))
        .register(Arc::new(BraketBackend::new()))
        .register(Arc::new(QSharpBackend::new()));
    registry
}
