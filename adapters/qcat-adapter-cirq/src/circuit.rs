//! Cirq-native circuit model.
//!
//! A [`CirqCircuit`] is a list of moments. Operations are placed the way
//! `cirq.Circuit.append` does by default (`InsertStrategy.EARLIEST`): right
//! after the last moment that touches any of their qubits.

use std::any::Any;
use std::fmt;

use qcat_hal::{CustomGate, HalResult, LoweredCircuit, NativeCircuit};
use qcat_ir::{QubitId, matrices};

use crate::custom_gates::format_angle;
use crate::diagram;

/// A Cirq gate.
#[derive(Debug, Clone, PartialEq)]
pub enum CirqGate {
    /// `cirq.I`
    I,
    /// `cirq.X`
    X,
    /// `cirq.Y`
    Y,
    /// `cirq.Z`
    Z,
    /// `cirq.H`
    H,
    /// `cirq.S`
    S,
    /// `cirq.T`
    T,
    /// `cirq.rx(θ)`
    Rx(f64),
    /// `cirq.ry(θ)`
    Ry(f64),
    /// `cirq.rz(θ)`
    Rz(f64),
    /// `cirq.CNOT`
    CNOT,
    /// `cirq.CZ`
    CZ,
    /// `cirq.SWAP`
    SWAP,
    /// `cirq.ISWAP`
    ISWAP,
    /// `cirq.CCX`
    CCX,
    /// `cirq.CSWAP`
    CSWAP,
    /// `cirq.X.controlled(n)`
    ControlledX {
        /// Number of controls.
        num_controls: usize,
    },
    /// `cirq.MatrixGate` from the custom gate library.
    Matrix(CustomGate),
    /// A library `MatrixGate` with `.controlled(n)`.
    ControlledMatrix {
        /// The controlled gate.
        gate: CustomGate,
        /// Number of controls.
        num_controls: usize,
    },
    /// `cirq.measure(..., key=...)`
    Measure {
        /// Measurement key.
        key: String,
    },
}

impl CirqGate {
    /// Per-qubit diagram symbols for an operation on `arity` qubits.
    pub fn wire_symbols(&self, arity: usize) -> Vec<String> {
        let controls = |n: usize, rest: &[String]| {
            let mut symbols = vec!["@".to_string(); n];
            symbols.extend_from_slice(rest);
            symbols
        };
        let fixed = |s: &[&str]| s.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        match self {
            CirqGate::I => fixed(&["I"]),
            CirqGate::X => fixed(&["X"]),
            CirqGate::Y => fixed(&["Y"]),
            CirqGate::Z => fixed(&["Z"]),
            CirqGate::H => fixed(&["H"]),
            CirqGate::S => fixed(&["S"]),
            CirqGate::T => fixed(&["T"]),
            CirqGate::Rx(a) => vec![format!("Rx({})", format_angle(*a))],
            CirqGate::Ry(a) => vec![format!("Ry({})", format_angle(*a))],
            CirqGate::Rz(a) => vec![format!("Rz({})", format_angle(*a))],
            CirqGate::CNOT => fixed(&["@", "X"]),
            CirqGate::CZ => fixed(&["@", "@"]),
            CirqGate::SWAP => fixed(&["×", "×"]),
            CirqGate::ISWAP => fixed(&["iSwap", "iSwap"]),
            CirqGate::CCX => fixed(&["@", "@", "X"]),
            CirqGate::CSWAP => fixed(&["@", "×", "×"]),
            CirqGate::ControlledX { num_controls } => controls(*num_controls, &["X".to_string()]),
            CirqGate::Matrix(gate) => gate.labels().to_vec(),
            CirqGate::ControlledMatrix { gate, num_controls } => {
                controls(*num_controls, gate.labels())
            }
            CirqGate::Measure { key } => {
                let mut symbols = vec!["M".to_string(); arity];
                if let Some(first) = symbols.first_mut() {
                    *first = format!("M('{key}')");
                }
                symbols
            }
        }
    }
}

/// A gate applied to qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct CirqOperation {
    /// The gate.
    pub gate: CirqGate,
    /// Qubits in gate order.
    pub qubits: Vec<QubitId>,
}

/// Operations that act at the same time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Moment {
    /// Operations on disjoint qubits.
    pub operations: Vec<CirqOperation>,
}

impl Moment {
    fn touches(&self, qubits: &[QubitId]) -> bool {
        self.operations
            .iter()
            .any(|op| op.qubits.iter().any(|q| qubits.contains(q)))
    }
}

/// A `cirq.Circuit` over `cirq.LineQubit.range(n)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CirqCircuit {
    num_qubits: u32,
    moments: Vec<Moment>,
}

impl CirqCircuit {
    /// Empty circuit.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            moments: Vec::new(),
        }
    }

    /// Append with the earliest insert strategy.
    pub fn append(&mut self, gate: CirqGate, qubits: Vec<QubitId>) {
        let index = self
            .moments
            .iter()
            .rposition(|m| m.touches(&qubits))
            .map_or(0, |i| i + 1);
        if index == self.moments.len() {
            self.moments.push(Moment::default());
        }
        self.moments[index]
            .operations
            .push(CirqOperation { gate, qubits });
    }

    /// Moments in order.
    pub fn moments(&self) -> &[Moment] {
        &self.moments
    }

    /// All operations, moment by moment.
    pub fn all_operations(&self) -> impl Iterator<Item = &CirqOperation> {
        self.moments.iter().flat_map(|m| m.operations.iter())
    }

    /// Measured qubits in ascending order.
    pub fn measured_qubits(&self) -> Vec<QubitId> {
        let mut measured: Vec<QubitId> = self
            .all_operations()
            .filter(|op| matches!(op.gate, CirqGate::Measure { .. }))
            .flat_map(|op| op.qubits.iter().copied())
            .collect();
        measured.sort_unstable();
        measured.dedup();
        measured
    }
}

impl fmt::Display for CirqCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&diagram::render(self))
    }
}

impl NativeCircuit for CirqCircuit {
    fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    fn lower(&self) -> HalResult<LoweredCircuit> {
        let mut out = LoweredCircuit::new(self.num_qubits);
        for op in self.all_operations() {
            lower_operation(&mut out, op)?;
        }
        Ok(out)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn lower_operation(out: &mut LoweredCircuit, op: &CirqOperation) -> HalResult<()> {
    let q = op.qubits.clone();
    let split = |n: usize| {
        let (c, t) = op.qubits.split_at(n.min(op.qubits.len()));
        (c.to_vec(), t.to_vec())
    };

    match &op.gate {
        CirqGate::I => out.gate(matrices::id(), q),
        CirqGate::X => out.gate(matrices::x(), q),
        CirqGate::Y => out.gate(matrices::y(), q),
        CirqGate::Z => out.gate(matrices::z(), q),
        CirqGate::H => out.gate(matrices::h(), q),
        CirqGate::S => out.gate(matrices::s(), q),
        CirqGate::T => out.gate(matrices::t(), q),
        CirqGate::Rx(a) => out.gate(matrices::rx(*a), q),
        CirqGate::Ry(a) => out.gate(matrices::ry(*a), q),
        CirqGate::Rz(a) => out.gate(matrices::rz(*a), q),
        CirqGate::SWAP => out.gate(matrices::swap(), q),
        CirqGate::ISWAP => out.gate(matrices::iswap(), q),
        CirqGate::Matrix(gate) => out.gate(gate.matrix().clone(), q),
        CirqGate::CNOT => {
            let (c, t) = split(1);
            out.controlled(matrices::x(), c, t)
        }
        CirqGate::CZ => {
            let (c, t) = split(1);
            out.controlled(matrices::z(), c, t)
        }
        CirqGate::CCX => {
            let (c, t) = split(2);
            out.controlled(matrices::x(), c, t)
        }
        CirqGate::CSWAP => {
            let (c, t) = split(1);
            out.controlled(matrices::swap(), c, t)
        }
        CirqGate::ControlledX { num_controls } => {
            let (c, t) = split(*num_controls);
            out.controlled(matrices::x(), c, t)
        }
        CirqGate::ControlledMatrix { gate, num_controls } => {
            let (c, t) = split(*num_controls);
            out.controlled(gate.matrix().clone(), c, t)
        }
        CirqGate::Measure { .. } => {
            for qubit in q {
                out.measure(qubit);
            }
            Ok(())
        }
    }
}
