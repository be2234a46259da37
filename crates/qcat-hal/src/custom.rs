//! Custom gate library entries.
//!
//! A backend without a native primitive for some kind applies the kind's
//! explicit unitary instead. Each backend keeps its own library, because
//! the matrix has to match that backend's tensor convention.

use qcat_ir::{IrError, UnitaryMatrix};

use crate::error::{HalError, HalResult};

/// One custom gate: a checked unitary plus the labels a drawing shows on
/// each qubit wire.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomGate {
    name: String,
    arity: usize,
    matrix: UnitaryMatrix,
    labels: Vec<String>,
}

impl CustomGate {
    /// Build an entry, rejecting a matrix that is not unitary or whose
    /// dimension is not `2^arity`.
    pub fn new(
        name: impl Into<String>,
        arity: usize,
        matrix: UnitaryMatrix,
        labels: Vec<String>,
    ) -> HalResult<Self> {
        let name = name.into();
        if matrix.dim() != 1 << arity {
            return Err(IrError::InvalidDimension {
                name,
                reason: format!(
                    "dimension {} does not match arity {arity}",
                    matrix.dim()
                ),
            }
            .into());
        }
        if labels.len() != arity {
            return Err(HalError::InvalidCircuit(format!(
                "custom gate '{name}' has {} label(s) for {arity} qubit(s)",
                labels.len()
            )));
        }
        matrix.ensure_unitary(&name)?;
        Ok(Self {
            name,
            arity,
            matrix,
            labels,
        })
    }

    /// Entry with labels `NAME_0`, `NAME_1`, ...
    pub fn with_indexed_labels(
        name: impl Into<String>,
        arity: usize,
        matrix: UnitaryMatrix,
    ) -> HalResult<Self> {
        let name = name.into();
        let labels = if arity == 1 {
            vec![name.clone()]
        } else {
            (0..arity).map(|i| format!("{name}_{i}")).collect()
        };
        Self::new(name, arity, matrix, labels)
    }

    /// Gate name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// The unitary, big-endian over the qubits it is applied to.
    pub fn matrix(&self) -> &UnitaryMatrix {
        &self.matrix
    }

    /// Per-qubit drawing labels.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
