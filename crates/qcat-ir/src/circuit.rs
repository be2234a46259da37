//! Append-only operation log.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::GateKind;
use crate::operation::Operation;
use crate::param::Param;
use crate::qubit::QubitId;

/// A fixed-width circuit: qubit count plus operations in execution order.
///
/// Operations are validated when appended and never reordered, removed, or
/// mutated afterwards. Deserialization runs the same validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCircuit")]
pub struct Circuit {
    num_qubits: u32,
    operations: Vec<Operation>,
}

#[derive(Deserialize)]
struct RawCircuit {
    num_qubits: u32,
    #[serde(default)]
    operations: Vec<Operation>,
}

impl TryFrom<RawCircuit> for Circuit {
    type Error = IrError;

    fn try_from(raw: RawCircuit) -> IrResult<Self> {
        let mut circuit = Circuit::new(raw.num_qubits)?;
        for op in raw.operations {
            circuit.push(op)?;
        }
        Ok(circuit)
    }
}

impl Circuit {
    /// Create an empty circuit over `num_qubits` qubits.
    pub fn new(num_qubits: u32) -> IrResult<Self> {
        if num_qubits == 0 {
            return Err(IrError::EmptyCircuit);
        }
        Ok(Self {
            num_qubits,
            operations: Vec::new(),
        })
    }

    /// Validate and append one operation.
    pub fn append(
        &mut self,
        kind: GateKind,
        qubit_groups: Vec<Vec<QubitId>>,
        params: Vec<Param>,
    ) -> IrResult<&mut Self> {
        self.push(Operation::new(kind, qubit_groups, params))
    }

    /// Validate and append a prebuilt operation.
    pub fn push(&mut self, op: Operation) -> IrResult<&mut Self> {
        op.validate(self.num_qubits)?;
        self.operations.push(op);
        Ok(self)
    }

    /// Number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Operations in execution order.
    #[inline]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Number of recorded operations.
    #[inline]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether no operation has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Whether any measurement was recorded.
    pub fn has_measurements(&self) -> bool {
        self.operations.iter().any(|op| op.kind().is_measurement())
    }

    /// Measured qubits in ascending index order, without duplicates.
    pub fn measured_qubits(&self) -> Vec<QubitId> {
        let mut measured = Vec::new();
        for op in &self.operations {
            match op.kind() {
                GateKind::MeasureAll => return (0..self.num_qubits).map(QubitId).collect(),
                GateKind::Measure => measured.extend(op.qubits()),
                _ => {}
            }
        }
        measured.sort_unstable();
        measured.dedup();
        measured
    }
}
