//! Qiskit-native circuit model.
//!
//! Mirrors the instruction list of a Qiskit `QuantumCircuit` built with one
//! classical bit per qubit. Multi-controlled X keeps the exact builder Qiskit
//! would pick (`mcx`, `mcx_gray`, `mcx_recursive`, `mcx_vchain`) together
//! with its ancilla list.

use std::any::Any;
use std::fmt;

use qcat_hal::{HalResult, LoweredCircuit, NativeCircuit};
use qcat_ir::{QubitId, matrices};

use crate::qasm;

/// Decomposition Qiskit uses for a multi-controlled X.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum McxVariant {
    /// `MCXGate` without ancillas.
    NoAncilla,
    /// `MCXGrayCode`.
    GrayCode,
    /// `MCXRecursive`.
    Recursive,
    /// `MCXVChain`, with clean or dirty ancillas.
    VChain {
        /// Whether ancillas may start in an arbitrary state.
        dirty: bool,
    },
}

impl McxVariant {
    /// Instruction name Qiskit assigns to this variant.
    pub fn name(self) -> &'static str {
        match self {
            McxVariant::NoAncilla => "mcx",
            McxVariant::GrayCode => "mcx_gray",
            McxVariant::Recursive => "mcx_recursive",
            McxVariant::VChain { .. } => "mcx_vchain",
        }
    }
}

/// A Qiskit standard-library instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(missing_docs)]
pub enum QiskitGate {
    Id,
    X,
    Y,
    Z,
    H,
    S,
    Sdg,
    T,
    Tdg,
    SX,
    SXdg,
    RX(f64),
    RY(f64),
    RZ(f64),
    Phase(f64),
    U1(f64),
    U2(f64, f64),
    R(f64, f64),
    U(f64, f64, f64),
    U3(f64, f64, f64),
    CX,
    CY,
    CZ,
    CH,
    CSX,
    Swap,
    ISwap,
    DCX,
    RXX(f64),
    RYY(f64),
    RZZ(f64),
    RZX(f64),
    CPhase(f64),
    CU1(f64),
    CRX(f64),
    CRY(f64),
    CRZ(f64),
    CU3(f64, f64, f64),
    CU(f64, f64, f64, f64),
    CCX,
    CSwap,
    RCCX,
    C3X,
    C3SX,
    RC3X,
    C4X,
    /// Multi-controlled X over `num_ctrl_qubits` controls.
    MCX {
        num_ctrl_qubits: usize,
        variant: McxVariant,
    },
    /// Multi-controlled phase.
    MCPhase {
        lambda: f64,
        num_ctrl_qubits: usize,
    },
    Barrier,
    Measure,
}

impl QiskitGate {
    /// Instruction name as Qiskit reports it.
    pub fn name(&self) -> &'static str {
        match self {
            QiskitGate::Id => "id",
            QiskitGate::X => "x",
            QiskitGate::Y => "y",
            QiskitGate::Z => "z",
            QiskitGate::H => "h",
            QiskitGate::S => "s",
            QiskitGate::Sdg => "sdg",
            QiskitGate::T => "t",
            QiskitGate::Tdg => "tdg",
            QiskitGate::SX => "sx",
            QiskitGate::SXdg => "sxdg",
            QiskitGate::RX(_) => "rx",
            QiskitGate::RY(_) => "ry",
            QiskitGate::RZ(_) => "rz",
            QiskitGate::Phase(_) => "p",
            QiskitGate::U1(_) => "u1",
            QiskitGate::U2(..) => "u2",
            QiskitGate::R(..) => "r",
            QiskitGate::U(..) => "u",
            QiskitGate::U3(..) => "u3",
            QiskitGate::CX => "cx",
            QiskitGate::CY => "cy",
            QiskitGate::CZ => "cz",
            QiskitGate::CH => "ch",
            QiskitGate::CSX => "csx",
            QiskitGate::Swap => "swap",
            QiskitGate::ISwap => "iswap",
            QiskitGate::DCX => "dcx",
            QiskitGate::RXX(_) => "rxx",
            QiskitGate::RYY(_) => "ryy",
            QiskitGate::RZZ(_) => "rzz",
            QiskitGate::RZX(_) => "rzx",
            QiskitGate::CPhase(_) => "cp",
            QiskitGate::CU1(_) => "cu1",
            QiskitGate::CRX(_) => "crx",
            QiskitGate::CRY(_) => "cry",
            QiskitGate::CRZ(_) => "crz",
            QiskitGate::CU3(..) => "cu3",
            QiskitGate::CU(..) => "cu",
            QiskitGate::CCX => "ccx",
            QiskitGate::CSwap => "cswap",
            QiskitGate::RCCX => "rccx",
            QiskitGate::C3X => "c3x",
            QiskitGate::C3SX => "c3sx",
            QiskitGate::RC3X => "rc3x",
            QiskitGate::C4X => "c4x",
            QiskitGate::MCX { variant, .. } => variant.name(),
            QiskitGate::MCPhase { .. } => "mcphase",
            QiskitGate::Barrier => "barrier",
            QiskitGate::Measure => "measure",
        }
    }

    /// Numeric parameters in Qiskit's order.
    pub fn params(&self) -> Vec<f64> {
        match *self {
            QiskitGate::RX(a)
            | QiskitGate::RY(a)
            | QiskitGate::RZ(a)
            | QiskitGate::Phase(a)
            | QiskitGate::U1(a)
            | QiskitGate::RXX(a)
            | QiskitGate::RYY(a)
            | QiskitGate::RZZ(a)
            | QiskitGate::RZX(a)
            | QiskitGate::CPhase(a)
            | QiskitGate::CU1(a)
            | QiskitGate::CRX(a)
            | QiskitGate::CRY(a)
            | QiskitGate::CRZ(a) => vec![a],
            QiskitGate::U2(a, b) | QiskitGate::R(a, b) => vec![a, b],
            QiskitGate::U(a, b, c) | QiskitGate::U3(a, b, c) | QiskitGate::CU3(a, b, c) => {
                vec![a, b, c]
            }
            QiskitGate::CU(a, b, c, d) => vec![a, b, c, d],
            QiskitGate::MCPhase { lambda, .. } => vec![lambda],
            _ => Vec::new(),
        }
    }
}

/// One instruction: a gate on qubits, plus ancillas and classical bits.
#[derive(Debug, Clone, PartialEq)]
pub struct QiskitInstruction {
    /// The gate.
    pub gate: QiskitGate,
    /// Qubit arguments, controls first.
    pub qubits: Vec<QubitId>,
    /// Ancilla qubits handed to the `mcx` decomposition.
    pub ancillas: Vec<QubitId>,
    /// Classical bits written by a measurement.
    pub clbits: Vec<u32>,
}

impl QiskitInstruction {
    /// A unitary instruction without ancillas.
    pub fn gate(gate: QiskitGate, qubits: Vec<QubitId>) -> Self {
        Self {
            gate,
            qubits,
            ancillas: Vec::new(),
            clbits: Vec::new(),
        }
    }
}

/// A Qiskit `QuantumCircuit(n, n)`.
#[derive(Debug, Clone, PartialEq)]
pub struct QiskitCircuit {
    num_qubits: u32,
    instructions: Vec<QiskitInstruction>,
}

impl QiskitCircuit {
    /// Empty circuit with `num_qubits` qubits and as many classical bits.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            instructions: Vec::new(),
        }
    }

    /// Append an instruction.
    pub fn push(&mut self, instruction: QiskitInstruction) {
        self.instructions.push(instruction);
    }

    /// Measure `qubit` into the classical bit of the same index.
    pub fn measure(&mut self, qubit: QubitId) {
        self.instructions.push(QiskitInstruction {
            gate: QiskitGate::Measure,
            qubits: vec![qubit],
            ancillas: Vec::new(),
            clbits: vec![qubit.0],
        });
    }

    /// Number of classical bits.
    pub fn num_clbits(&self) -> u32 {
        self.num_qubits
    }

    /// Instructions in order.
    pub fn instructions(&self) -> &[QiskitInstruction] {
        &self.instructions
    }

    /// Measured qubits in ascending order.
    pub fn measured_qubits(&self) -> Vec<QubitId> {
        let mut measured: Vec<QubitId> = self
            .instructions
            .iter()
            .filter(|i| i.gate == QiskitGate::Measure)
            .flat_map(|i| i.qubits.iter().copied())
            .collect();
        measured.sort_unstable();
        measured.dedup();
        measured
    }

    /// OpenQASM 3 source, as submitted to IBM Quantum.
    pub fn to_qasm3(&self) -> String {
        qasm::emit_qasm3(self)
    }
}

impl fmt::Display for QiskitCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        qasm::write_qasm2(self, f)
    }
}

impl NativeCircuit for QiskitCircuit {
    fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    fn lower(&self) -> HalResult<LoweredCircuit> {
        let mut lowered = LoweredCircuit::new(self.num_qubits);
        for inst in &self.instructions {
            lower_instruction(&mut lowered, inst)?;
        }
        Ok(lowered)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn lower_instruction(out: &mut LoweredCircuit, inst: &QiskitInstruction) -> HalResult<()> {
    let q = inst.qubits.clone();
    let split = |n: usize| split_controls(&inst.qubits, n);

    match inst.gate {
        QiskitGate::Barrier => Ok(()),
        QiskitGate::Measure => {
            for &qubit in &q {
                out.measure(qubit);
            }
            Ok(())
        }
        QiskitGate::Id => out.gate(matrices::id(), q),
        QiskitGate::X => out.gate(matrices::x(), q),
        QiskitGate::Y => out.gate(matrices::y(), q),
        QiskitGate::Z => out.gate(matrices::z(), q),
        QiskitGate::H => out.gate(matrices::h(), q),
        QiskitGate::S => out.gate(matrices::s(), q),
        QiskitGate::Sdg => out.gate(matrices::sdg(), q),
        QiskitGate::T => out.gate(matrices::t(), q),
        QiskitGate::Tdg => out.gate(matrices::tdg(), q),
        QiskitGate::SX => out.gate(matrices::sx(), q),
        QiskitGate::SXdg => out.gate(matrices::sxdg(), q),
        QiskitGate::RX(a) => out.gate(matrices::rx(a), q),
        QiskitGate::RY(a) => out.gate(matrices::ry(a), q),
        QiskitGate::RZ(a) => out.gate(matrices::rz(a), q),
        QiskitGate::Phase(a) | QiskitGate::U1(a) => out.gate(matrices::p(a), q),
        QiskitGate::U2(phi, lambda) => out.gate(matrices::u2(phi, lambda), q),
        QiskitGate::R(theta, phi) => out.gate(matrices::r(theta, phi), q),
        QiskitGate::U(a, b, c) | QiskitGate::U3(a, b, c) => out.gate(matrices::u(a, b, c), q),
        QiskitGate::Swap => out.gate(matrices::swap(), q),
        QiskitGate::ISwap => out.gate(matrices::iswap(), q),
        QiskitGate::DCX => out.gate(matrices::dcx(), q),
        QiskitGate::RXX(a) => out.gate(matrices::rxx(a), q),
        QiskitGate::RYY(a) => out.gate(matrices::ryy(a), q),
        QiskitGate::RZZ(a) => out.gate(matrices::rzz(a), q),
        QiskitGate::RZX(a) => out.gate(matrices::rzx(a), q),
        QiskitGate::CU(a, b, c, d) => out.gate(matrices::cu(a, b, c, d), q),
        QiskitGate::RCCX => out.gate(matrices::rccx(), q),
        QiskitGate::RC3X => out.gate(matrices::rc3x(), q),
        QiskitGate::CX => controlled(out, matrices::x(), split(1)),
        QiskitGate::CY => controlled(out, matrices::y(), split(1)),
        QiskitGate::CZ => controlled(out, matrices::z(), split(1)),
        QiskitGate::CH => controlled(out, matrices::h(), split(1)),
        QiskitGate::CSX => controlled(out, matrices::sx(), split(1)),
        QiskitGate::CPhase(a) | QiskitGate::CU1(a) => controlled(out, matrices::p(a), split(1)),
        QiskitGate::CRX(a) => controlled(out, matrices::rx(a), split(1)),
        QiskitGate::CRY(a) => controlled(out, matrices::ry(a), split(1)),
        QiskitGate::CRZ(a) => controlled(out, matrices::rz(a), split(1)),
        QiskitGate::CU3(a, b, c) => controlled(out, matrices::u(a, b, c), split(1)),
        QiskitGate::CCX => controlled(out, matrices::x(), split(2)),
        QiskitGate::CSwap => controlled(out, matrices::swap(), split(1)),
        QiskitGate::C3X => controlled(out, matrices::x(), split(3)),
        QiskitGate::C3SX => controlled(out, matrices::sx(), split(3)),
        QiskitGate::C4X => controlled(out, matrices::x(), split(4)),
        // Every decomposition leaves its ancillas as it found them.
        QiskitGate::MCX {
            num_ctrl_qubits, ..
        } => controlled(out, matrices::x(), split(num_ctrl_qubits)),
        QiskitGate::MCPhase {
            lambda,
            num_ctrl_qubits,
        } => controlled(out, matrices::p(lambda), split(num_ctrl_qubits)),
    }
}

/// Controlled forms list every control before the targets.
fn split_controls(qubits: &[QubitId], num_controls: usize) -> (Vec<QubitId>, Vec<QubitId>) {
    let (controls, targets) = qubits.split_at(num_controls.min(qubits.len()));
    (controls.to_vec(), targets.to_vec())
}

fn controlled(
    out: &mut LoweredCircuit,
    base: qcat_ir::UnitaryMatrix,
    (controls, targets): (Vec<QubitId>, Vec<QubitId>),
) -> HalResult<()> {
    out.controlled(base, controls, targets)
}
