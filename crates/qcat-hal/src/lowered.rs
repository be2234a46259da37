//! Matrix-level circuits for local simulation.
//!
//! Every native circuit can lower itself to a [`LoweredCircuit`]: a flat
//! list of (possibly controlled) unitaries and measurements. Lowering
//! follows the native circuit's own gates, so simulating the lowered form
//! checks what the translator actually emitted.

use qcat_ir::{QubitId, UnitaryMatrix};

use crate::error::{HalError, HalResult};

/// One lowered step.
#[derive(Debug, Clone, PartialEq)]
pub enum LoweredOp {
    /// Apply `matrix` to `targets` when every control is `|1⟩`.
    ///
    /// The matrix is big-endian over `targets`.
    Gate {
        /// The unitary.
        matrix: UnitaryMatrix,
        /// Target qubits, most significant first.
        targets: Vec<QubitId>,
        /// Control qubits.
        controls: Vec<QubitId>,
    },
    /// Measure one qubit in the computational basis.
    Measure {
        /// The measured qubit.
        qubit: QubitId,
    },
}

/// Flat matrix-level circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct LoweredCircuit {
    num_qubits: u32,
    ops: Vec<LoweredOp>,
}

impl LoweredCircuit {
    /// Empty circuit.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            ops: Vec::new(),
        }
    }

    /// Append an uncontrolled unitary.
    pub fn gate(&mut self, matrix: UnitaryMatrix, targets: Vec<QubitId>) -> HalResult<()> {
        self.controlled(matrix, Vec::new(), targets)
    }

    /// Append a controlled unitary.
    pub fn controlled(
        &mut self,
        matrix: UnitaryMatrix,
        controls: Vec<QubitId>,
        targets: Vec<QubitId>,
    ) -> HalResult<()> {
        if matrix.num_qubits() != targets.len() {
            return Err(HalError::InvalidCircuit(format!(
                "{}-qubit matrix applied to {} target(s)",
                matrix.num_qubits(),
                targets.len()
            )));
        }
        for q in controls.iter().chain(&targets) {
            if q.0 >= self.num_qubits {
                return Err(HalError::InvalidCircuit(format!(
                    "lowered gate references {q} in a {}-qubit circuit",
                    self.num_qubits
                )));
            }
        }
        self.ops.push(LoweredOp::Gate {
            matrix,
            targets,
            controls,
        });
        Ok(())
    }

    /// Append a measurement.
    pub fn measure(&mut self, qubit: QubitId) {
        self.ops.push(LoweredOp::Measure { qubit });
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Steps in order.
    pub fn ops(&self) -> &[LoweredOp] {
        &self.ops
    }

    /// Measured qubits in ascending order, without duplicates.
    pub fn measured_qubits(&self) -> Vec<QubitId> {
        let mut measured: Vec<QubitId> = self
            .ops
            .iter()
            .filter_map(|op| match op {
                LoweredOp::Measure { qubit } => Some(*qubit),
                LoweredOp::Gate { .. } => None,
            })
            .collect();
        measured.sort_unstable();
        measured.dedup();
        measured
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcat_ir::matrices;

    #[test]
    fn test_rejects_arity_mismatch() {
        let mut circuit = LoweredCircuit::new(2);
        let err = circuit
            .gate(matrices::swap(), vec![QubitId(0)])
            .unwrap_err();
        assert!(matches!(err, HalError::InvalidCircuit(_)));
    }

    #[test]
    fn test_rejects_out_of_range() {
        let mut circuit = LoweredCircuit::new(1);
        assert!(
            circuit
                .controlled(matrices::x(), vec![QubitId(3)], vec![QubitId(0)])
                .is_err()
        );
    }

    #[test]
    fn test_measured_qubits_sorted() {
        let mut circuit = LoweredCircuit::new(3);
        circuit.gate(matrices::h(), vec![QubitId(0)]).unwrap();
        circuit.measure(QubitId(2));
        circuit.measure(QubitId(0));
        circuit.measure(QubitId(2));
        assert_eq!(circuit.measured_qubits(), vec![QubitId(0), QubitId(2)]);
        assert_eq!(circuit.ops().len(), 4);
    }
}
