//! Braket OpenQASM 3 programs.
//!
//! Braket measures at the end of a program: measured qubits are collected
//! during translation and emitted after every gate, in ascending order.

use std::any::Any;
use std::fmt::{self, Write};

use qcat_hal::{CustomGate, HalResult, LoweredCircuit, NativeCircuit};
use qcat_ir::{QubitId, UnitaryMatrix, matrices};

/// A Braket gate or modifier form.
#[derive(Debug, Clone, PartialEq)]
pub enum BraketGate {
    I,
    X,
    Y,
    Z,
    H,
    S,
    Si,
    T,
    Ti,
    V,
    Vi,
    Rx(f64),
    Ry(f64),
    Rz(f64),
    PhaseShift(f64),
    CNot,
    CY,
    CZ,
    CPhaseShift(f64),
    Swap,
    ISwap,
    XX(f64),
    YY(f64),
    ZZ(f64),
    CCNot,
    CSwap,
    /// `ctrl(n) @ base`
    Ctrl {
        /// Number of added controls.
        controls: usize,
        /// The controlled gate.
        base: Box<BraketGate>,
    },
    /// `#pragma braket unitary(...)`
    Unitary(CustomGate),
}

impl BraketGate {
    /// `base` with `controls` control qubits in front.
    pub fn ctrl(controls: usize, base: BraketGate) -> Self {
        BraketGate::Ctrl {
            controls,
            base: Box::new(base),
        }
    }

    /// Braket OpenQASM gate name.
    pub fn name(&self) -> &'static str {
        match self {
            BraketGate::I => "i",
            BraketGate::X => "x",
            BraketGate::Y => "y",
            BraketGate::Z => "z",
            BraketGate::H => "h",
            BraketGate::S => "s",
            BraketGate::Si => "si",
            BraketGate::T => "t",
            BraketGate::Ti => "ti",
            BraketGate::V => "v",
            BraketGate::Vi => "vi",
            BraketGate::Rx(_) => "rx",
            BraketGate::Ry(_) => "ry",
            BraketGate::Rz(_) => "rz",
            BraketGate::PhaseShift(_) => "phaseshift",
            BraketGate::CNot => "cnot",
            BraketGate::CY => "cy",
            BraketGate::CZ => "cz",
            BraketGate::CPhaseShift(_) => "cphaseshift",
            BraketGate::Swap => "swap",
            BraketGate::ISwap => "iswap",
            BraketGate::XX(_) => "xx",
            BraketGate::YY(_) => "yy",
            BraketGate::ZZ(_) => "zz",
            BraketGate::CCNot => "ccnot",
            BraketGate::CSwap => "cswap",
            BraketGate::Ctrl { base, .. } => base.name(),
            BraketGate::Unitary(_) => "unitary",
        }
    }

    fn angle(&self) -> Option<f64> {
        match self {
            BraketGate::Rx(a)
            | BraketGate::Ry(a)
            | BraketGate::Rz(a)
            | BraketGate::PhaseShift(a)
            | BraketGate::CPhaseShift(a)
            | BraketGate::XX(a)
            | BraketGate::YY(a)
            | BraketGate::ZZ(a) => Some(*a),
            _ => None,
        }
    }

    /// The target matrix and how many leading qubits are controls.
    fn lowered(&self) -> (UnitaryMatrix, usize) {
        match self {
            BraketGate::I => (matrices::id(), 0),
            BraketGate::X => (matrices::x(), 0),
            BraketGate::Y => (matrices::y(), 0),
            BraketGate::Z => (matrices::z(), 0),
            BraketGate::H => (matrices::h(), 0),
            BraketGate::S => (matrices::s(), 0),
            BraketGate::Si => (matrices::sdg(), 0),
            BraketGate::T => (matrices::t(), 0),
            BraketGate::Ti => (matrices::tdg(), 0),
            BraketGate::V => (matrices::sx(), 0),
            BraketGate::Vi => (matrices::sxdg(), 0),
            BraketGate::Rx(a) => (matrices::rx(*a), 0),
            BraketGate::Ry(a) => (matrices::ry(*a), 0),
            BraketGate::Rz(a) => (matrices::rz(*a), 0),
            BraketGate::PhaseShift(a) => (matrices::p(*a), 0),
            BraketGate::CNot => (matrices::x(), 1),
            BraketGate::CY => (matrices::y(), 1),
            BraketGate::CZ => (matrices::z(), 1),
            BraketGate::CPhaseShift(a) => (matrices::p(*a), 1),
            BraketGate::Swap => (matrices::swap(), 0),
            BraketGate::ISwap => (matrices::iswap(), 0),
            BraketGate::XX(a) => (matrices::rxx(*a), 0),
            BraketGate::YY(a) => (matrices::ryy(*a), 0),
            BraketGate::ZZ(a) => (matrices::rzz(*a), 0),
            BraketGate::CCNot => (matrices::x(), 2),
            BraketGate::CSwap => (matrices::swap(), 1),
            BraketGate::Ctrl { controls, base } => {
                let (matrix, inner) = base.lowered();
                (matrix, inner + controls)
            }
            BraketGate::Unitary(gate) => (gate.matrix().clone(), 0),
        }
    }
}

/// A gate applied to qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct BraketInstruction {
    /// The gate.
    pub gate: BraketGate,
    /// Qubits in gate order.
    pub qubits: Vec<QubitId>,
}

/// An OpenQASM 3 program for Braket.
#[derive(Debug, Clone, PartialEq)]
pub struct BraketProgram {
    num_qubits: u32,
    instructions: Vec<BraketInstruction>,
    measured: Vec<QubitId>,
}

impl BraketProgram {
    /// Empty program.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            instructions: Vec::new(),
            measured: Vec::new(),
        }
    }

    /// Append a gate.
    pub fn push(&mut self, gate: BraketGate, qubits: Vec<QubitId>) {
        self.instructions.push(BraketInstruction { gate, qubits });
    }

    /// Mark a qubit for end-of-program measurement.
    pub fn measure(&mut self, qubit: QubitId) {
        if let Err(pos) = self.measured.binary_search(&qubit) {
            self.measured.insert(pos, qubit);
        }
    }

    /// Gates in order.
    pub fn instructions(&self) -> &[BraketInstruction] {
        &self.instructions
    }

    /// Measured qubits in ascending order; every qubit when none was
    /// measured explicitly.
    pub fn measured_qubits(&self) -> Vec<QubitId> {
        if self.measured.is_empty() {
            (0..self.num_qubits).map(QubitId).collect()
        } else {
            self.measured.clone()
        }
    }

    /// The OpenQASM 3 source.
    pub fn to_qasm(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BraketProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let measured = self.measured_qubits();
        writeln!(f, "OPENQASM 3.0;")?;
        writeln!(f, "bit[{}] b;", measured.len())?;
        writeln!(f, "qubit[{}] q;", self.num_qubits)?;
        for inst in &self.instructions {
            writeln!(f, "{}", instruction_line(inst))?;
        }
        for (bit, q) in measured.iter().enumerate() {
            writeln!(f, "b[{bit}] = measure q[{}];", q.0)?;
        }
        Ok(())
    }
}

fn operands(qubits: &[QubitId]) -> String {
    qubits
        .iter()
        .map(|q| format!("q[{}]", q.0))
        .collect::<Vec<_>>()
        .join(", ")
}

fn instruction_line(inst: &BraketInstruction) -> String {
    let args = operands(&inst.qubits);
    match &inst.gate {
        BraketGate::Unitary(gate) => {
            format!(
                "#pragma braket unitary({}) {args}",
                matrix_literal(gate.matrix())
            )
        }
        BraketGate::Ctrl { controls, base } => {
            let modifier = if *controls == 1 {
                "ctrl @ ".to_string()
            } else {
                format!("ctrl({controls}) @ ")
            };
            format!("{modifier}{} {args};", gate_call(base))
        }
        gate => format!("{} {args};", gate_call(gate)),
    }
}

fn gate_call(gate: &BraketGate) -> String {
    match gate.angle() {
        Some(a) => format!("{}({a})", gate.name()),
        None => gate.name().to_string(),
    }
}

/// `[[a, b], [c, d]]` with complex entries written `re+imim`.
fn matrix_literal(matrix: &UnitaryMatrix) -> String {
    let mut out = String::from("[");
    for (i, row) in matrix.rows().iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('[');
        for (j, c) in row.iter().enumerate() {
            if j > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{}{:+}im", c.re, c.im);
        }
        out.push(']');
    }
    out.push(']');
    out
}

impl NativeCircuit for BraketProgram {
    fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    fn lower(&self) -> HalResult<LoweredCircuit> {
        let mut out = LoweredCircuit::new(self.num_qubits);
        for inst in &self.instructions {
            let (matrix, controls) = inst.gate.lowered();
            if controls == 0 {
                out.gate(matrix, inst.qubits.clone())?;
            } else {
                let (c, t) = inst.qubits.split_at(controls.min(inst.qubits.len()));
                out.controlled(matrix, c.to_vec(), t.to_vec())?;
            }
        }
        for q in self.measured_qubits() {
            out.measure(q);
        }
        Ok(out)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
