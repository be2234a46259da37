//! Backend registry.
//!
//! The [`BackendRegistry`] is where a backend family is selected once, at
//! the façade boundary, instead of branching on backend names at every
//! call site.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::backend::Backend;
use crate::error::{HalError, HalResult};
use crate::kind::BackendKind;

/// Backends keyed by family.
#[derive(Clone, Default)]
pub struct BackendRegistry {
    backends: FxHashMap<BackendKind, Arc<dyn Backend>>,
}

impl BackendRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend under its own kind, replacing any previous one.
    pub fn register(&mut self, backend: Arc<dyn Backend>) -> &mut Self {
        let kind = backend.kind();
        debug!("Registering backend: {}", kind);
        self.backends.insert(kind, backend);
        self
    }

    /// Look up the backend for `kind`.
    pub fn get(&self, kind: BackendKind) -> HalResult<Arc<dyn Backend>> {
        self.backends.get(&kind).cloned().ok_or_else(|| {
            HalError::BackendUnavailable(format!("no backend registered for '{kind}'"))
        })
    }

    /// Registered kinds, sorted.
    pub fn available_backends(&self) -> Vec<BackendKind> {
        let mut kinds: Vec<_> = self.backends.keys().copied().collect();
        kinds.sort();
        kinds
    }

    /// Whether `kind` is registered.
    pub fn has_backend(&self, kind: BackendKind) -> bool {
        self.backends.contains_key(&kind)
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("backends", &self.available_backends())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::NativeCircuit;
    use qcat_ir::Circuit;

    struct Stub(BackendKind);

    #[async_trait::async_trait]
    impl Backend for Stub {
        fn kind(&self) -> BackendKind {
            self.0
        }

        fn translate(&self, _circuit: &Circuit) -> HalResult<Arc<dyn NativeCircuit>> {
            Err(HalError::Backend("stub".into()))
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = BackendRegistry::new();
        assert!(registry.available_backends().is_empty());
        assert!(!registry.has_backend(BackendKind::Cirq));
        assert!(matches!(
            registry.get(BackendKind::Cirq),
            Err(HalError::BackendUnavailable(_))
        ));
    }

    #[test]
    fn test_available_backends_sorted() {
        let mut registry = BackendRegistry::new();
        registry
            .register(Arc::new(Stub(BackendKind::QSharp)))
            .register(Arc::new(Stub(BackendKind::Qiskit)));

        assert_eq!(
            registry.available_backends(),
            vec![BackendKind::Qiskit, BackendKind::QSharp]
        );
        assert_eq!(registry.get(BackendKind::Qiskit).unwrap().kind(), BackendKind::Qiskit);
    }
}
