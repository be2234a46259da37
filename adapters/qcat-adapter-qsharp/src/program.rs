//! Q# program model.
//!
//! A [`QSharpProgram`] is a list of intrinsic calls with optional
//! `Controlled`/`Adjoint` functors, plus the operation definitions for gates
//! Q# does not ship. Definitions are written once per program, in the order
//! of [`Definition`], and only when a call uses them.

use std::any::Any;
use std::collections::BTreeSet;
use std::fmt::{self, Write as _};

use qcat_hal::{HalResult, LoweredCircuit, NativeCircuit};
use qcat_ir::{QubitId, UnitaryMatrix, matrices};

/// Operations a program defines for gates Q# lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Definition {
    /// Square root of X.
    Sx,
    /// iSWAP.
    Iswap,
    /// Double CNOT.
    Dcx,
    /// Relative-phase Toffoli.
    Rccx,
    /// Relative-phase 3-controlled X.
    Rc3x,
}

impl Definition {
    /// Operation name in the program text.
    pub fn name(self) -> &'static str {
        match self {
            Definition::Sx => "SX",
            Definition::Iswap => "ISWAP",
            Definition::Dcx => "DCX",
            Definition::Rccx => "RCCX",
            Definition::Rc3x => "RC3X",
        }
    }

    /// Number of qubit arguments.
    pub fn arity(self) -> usize {
        match self {
            Definition::Sx => 1,
            Definition::Iswap | Definition::Dcx => 2,
            Definition::Rccx => 3,
            Definition::Rc3x => 4,
        }
    }

    /// Body over the operation's own arguments `QubitId(0..arity)`.
    pub fn body(self) -> Vec<QsCall> {
        let q = QubitId;
        let on = |gate: QsGate, target: u32| QsCall::new(gate, vec![q(target)]);
        let cnot = |c: u32, t: u32| QsCall::new(QsGate::X, vec![q(t)]).controlled(vec![q(c)]);
        match self {
            Definition::Sx => vec![on(QsGate::H, 0), on(QsGate::S, 0), on(QsGate::H, 0)],
            Definition::Iswap => vec![
                on(QsGate::S, 0),
                on(QsGate::S, 1),
                on(QsGate::H, 0),
                cnot(0, 1),
                cnot(1, 0),
                on(QsGate::H, 1),
            ],
            Definition::Dcx => vec![cnot(0, 1), cnot(1, 0)],
            Definition::Rccx => vec![
                on(QsGate::H, 2),
                on(QsGate::T, 2),
                cnot(1, 2),
                on(QsGate::T, 2).adjoint(),
                cnot(0, 2),
                on(QsGate::T, 2),
                cnot(1, 2),
                on(QsGate::T, 2).adjoint(),
                on(QsGate::H, 2),
            ],
            Definition::Rc3x => vec![
                on(QsGate::H, 3),
                on(QsGate::T, 3),
                cnot(2, 3),
                on(QsGate::T, 3).adjoint(),
                on(QsGate::H, 3),
                cnot(0, 3),
                on(QsGate::T, 3),
                cnot(1, 3),
                on(QsGate::T, 3).adjoint(),
                cnot(0, 3),
                on(QsGate::T, 3),
                cnot(1, 3),
                on(QsGate::T, 3).adjoint(),
                on(QsGate::H, 3),
                on(QsGate::T, 3),
                cnot(2, 3),
                on(QsGate::T, 3).adjoint(),
                on(QsGate::H, 3),
            ],
        }
    }
}

/// A Q# gate, before functors.
#[derive(Debug, Clone, PartialEq)]
pub enum QsGate {
    I,
    X,
    Y,
    Z,
    H,
    S,
    T,
    Rx(f64),
    Ry(f64),
    Rz(f64),
    R1(f64),
    Rxx(f64),
    Ryy(f64),
    Rzz(f64),
    Swap,
    /// An operation defined by the program.
    Defined(Definition),
}

impl QsGate {
    fn name(&self) -> &'static str {
        match self {
            QsGate::I => "I",
            QsGate::X => "X",
            QsGate::Y => "Y",
            QsGate::Z => "Z",
            QsGate::H => "H",
            QsGate::S => "S",
            QsGate::T => "T",
            QsGate::Rx(_) => "Rx",
            QsGate::Ry(_) => "Ry",
            QsGate::Rz(_) => "Rz",
            QsGate::R1(_) => "R1",
            QsGate::Rxx(_) => "Rxx",
            QsGate::Ryy(_) => "Ryy",
            QsGate::Rzz(_) => "Rzz",
            QsGate::Swap => "SWAP",
            QsGate::Defined(def) => def.name(),
        }
    }

    fn angle(&self) -> Option<f64> {
        match self {
            QsGate::Rx(a)
            | QsGate::Ry(a)
            | QsGate::Rz(a)
            | QsGate::R1(a)
            | QsGate::Rxx(a)
            | QsGate::Ryy(a)
            | QsGate::Rzz(a) => Some(*a),
            _ => None,
        }
    }

    fn matrix(&self) -> Option<UnitaryMatrix> {
        Some(match self {
            QsGate::I => matrices::id(),
            QsGate::X => matrices::x(),
            QsGate::Y => matrices::y(),
            QsGate::Z => matrices::z(),
            QsGate::H => matrices::h(),
            QsGate::S => matrices::s(),
            QsGate::T => matrices::t(),
            QsGate::Rx(a) => matrices::rx(*a),
            QsGate::Ry(a) => matrices::ry(*a),
            QsGate::Rz(a) => matrices::rz(*a),
            QsGate::R1(a) => matrices::p(*a),
            QsGate::Rxx(a) => matrices::rxx(*a),
            QsGate::Ryy(a) => matrices::ryy(*a),
            QsGate::Rzz(a) => matrices::rzz(*a),
            QsGate::Swap => matrices::swap(),
            QsGate::Defined(_) => return None,
        })
    }
}

/// One call statement: `[Controlled] [Adjoint] Gate(args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct QsCall {
    pub gate: QsGate,
    pub adjoint: bool,
    pub controls: Vec<QubitId>,
    pub targets: Vec<QubitId>,
}

impl QsCall {
    /// Uncontrolled, non-adjoint call.
    pub fn new(gate: QsGate, targets: Vec<QubitId>) -> Self {
        Self {
            gate,
            adjoint: false,
            controls: Vec::new(),
            targets,
        }
    }

    /// Apply the `Adjoint` functor.
    pub fn adjoint(mut self) -> Self {
        self.adjoint = !self.adjoint;
        self
    }

    /// Apply the `Controlled` functor with `controls`.
    pub fn controlled(mut self, controls: Vec<QubitId>) -> Self {
        let mut all = controls;
        all.append(&mut self.controls);
        self.controls = all;
        self
    }

    fn render(&self, name: &dyn Fn(QubitId) -> String) -> String {
        let targets: Vec<String> = self.targets.iter().map(|&q| name(q)).collect();
        let controls: Vec<String> = self.controls.iter().map(|&q| name(q)).collect();

        if !self.adjoint && self.gate == QsGate::X {
            match controls.len() {
                1 => return format!("CNOT({}, {});", controls[0], targets[0]),
                2 => {
                    return format!("CCNOT({}, {}, {});", controls[0], controls[1], targets[0]);
                }
                _ => {}
            }
        }

        let mut args: Vec<String> = self.gate.angle().map(format_angle).into_iter().collect();
        args.extend(targets);

        let mut call = String::new();
        if !self.controls.is_empty() {
            call.push_str("Controlled ");
        }
        if self.adjoint {
            call.push_str("Adjoint ");
        }
        call.push_str(self.gate.name());

        if controls.is_empty() {
            format!("{call}({});", args.join(", "))
        } else {
            let inner = if args.len() == 1 {
                args.remove(0)
            } else {
                format!("({})", args.join(", "))
            };
            format!("{call}([{}], {inner});", controls.join(", "))
        }
    }

    fn lower_into(&self, out: &mut LoweredCircuit) -> HalResult<()> {
        match &self.gate {
            QsGate::Defined(def) => {
                let mut steps = def.body();
                if self.adjoint {
                    steps.reverse();
                }
                for step in steps {
                    let mut step = if self.adjoint { step.adjoint() } else { step };
                    step.targets = step.targets.iter().map(|q| self.targets[q.index()]).collect();
                    step.controls = step.controls.iter().map(|q| self.targets[q.index()]).collect();
                    step.controlled(self.controls.clone()).lower_into(out)?;
                }
                Ok(())
            }
            gate => {
                let Some(mut matrix) = gate.matrix() else {
                    unreachable!("defined operations are expanded above");
                };
                if self.adjoint {
                    matrix = matrix.adjoint();
                }
                out.controlled(matrix, self.controls.clone(), self.targets.clone())
            }
        }
    }
}

/// A statement of the entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Call(QsCall),
    Measure(QubitId),
}

/// A complete Q# program over `num_qubits` qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct QSharpProgram {
    num_qubits: u32,
    statements: Vec<Statement>,
}

/// Namespace the program is written into.
pub const NAMESPACE: &str = "Qcat";

impl QSharpProgram {
    /// Empty program.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            statements: Vec::new(),
        }
    }

    /// Append a call.
    pub fn call(&mut self, call: QsCall) {
        self.statements.push(Statement::Call(call));
    }

    /// Append `M(qs[q])`.
    pub fn measure(&mut self, qubit: QubitId) {
        self.statements.push(Statement::Measure(qubit));
    }

    /// Statements in order.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Definitions the program uses, in emission order.
    pub fn definitions(&self) -> BTreeSet<Definition> {
        self.statements
            .iter()
            .filter_map(|s| match s {
                Statement::Call(QsCall {
                    gate: QsGate::Defined(def),
                    ..
                }) => Some(*def),
                _ => None,
            })
            .collect()
    }

    /// The program text.
    pub fn to_qsharp(&self) -> String {
        self.to_string()
    }
}

fn format_angle(angle: f64) -> String {
    // Q# Double literals need a decimal point.
    format!("{angle:?}")
}

fn write_definition(f: &mut fmt::Formatter<'_>, def: Definition) -> fmt::Result {
    let params: Vec<String> = (0..def.arity()).map(|i| format!("q{i} : Qubit")).collect();
    writeln!(
        f,
        "    operation {}({}) : Unit is Adj + Ctl {{",
        def.name(),
        params.join(", ")
    )?;
    let name = |q: QubitId| format!("q{}", q.0);
    for step in def.body() {
        writeln!(f, "        {}", step.render(&name))?;
    }
    writeln!(f, "    }}")?;
    writeln!(f)
}

impl fmt::Display for QSharpProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "namespace {NAMESPACE} {{")?;
        writeln!(f, "    open Microsoft.Quantum.Intrinsic;")?;
        writeln!(f, "    open Microsoft.Quantum.Canon;")?;
        writeln!(f)?;
        for def in self.definitions() {
            write_definition(f, def)?;
        }

        writeln!(f, "    @EntryPoint()")?;
        writeln!(f, "    operation Main() : Result[] {{")?;
        writeln!(f, "        use qs = Qubit[{}];", self.num_qubits)?;
        writeln!(f, "        mutable results = [];")?;
        let name = |q: QubitId| format!("qs[{}]", q.0);
        for statement in &self.statements {
            let mut line = String::new();
            match statement {
                Statement::Call(call) => line.push_str(&call.render(&name)),
                Statement::Measure(q) => {
                    write!(line, "set results += [M({})];", name(*q))?;
                }
            }
            writeln!(f, "        {line}")?;
        }
        writeln!(f, "        ResetAll(qs);")?;
        writeln!(f, "        return results;")?;
        writeln!(f, "    }}")?;
        writeln!(f, "}}")
    }
}

impl NativeCircuit for QSharpProgram {
    fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    fn lower(&self) -> HalResult<LoweredCircuit> {
        let mut out = LoweredCircuit::new(self.num_qubits);
        for statement in &self.statements {
            match statement {
                Statement::Call(call) => call.lower_into(&mut out)?,
                Statement::Measure(q) => out.measure(*q),
            }
        }
        Ok(out)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcat_hal::LoweredOp;

    fn q(i: u32) -> QubitId {
        QubitId(i)
    }

    /// Matrix of a definition, big-endian over its arguments.
    fn definition_matrix(def: Definition) -> UnitaryMatrix {
        let n = def.arity();
        let mut program = QSharpProgram::new(n as u32);
        program.call(QsCall::new(
            QsGate::Defined(def),
            (0..n as u32).map(QubitId).collect(),
        ));
        let lowered = program.lower().unwrap();
        let mut total = UnitaryMatrix::identity(n);
        for op in lowered.ops() {
            let LoweredOp::Gate {
                matrix,
                targets,
                controls,
            } = op
            else {
                continue;
            };
            total = embed(matrix, targets, controls, n).mul(&total);
        }
        total
    }

    /// Full-register matrix of a (controlled) gate.
    fn embed(
        matrix: &UnitaryMatrix,
        targets: &[QubitId],
        controls: &[QubitId],
        n: usize,
    ) -> UnitaryMatrix {
        let dim = 1 << n;
        let bit = |state: usize, q: QubitId| (state >> (n - 1 - q.index())) & 1;
        let mut data = vec![num_complex::Complex64::new(0.0, 0.0); dim * dim];
        for col in 0..dim {
            if controls.iter().any(|&c| bit(col, c) == 0) {
                data[col * dim + col] = num_complex::Complex64::new(1.0, 0.0);
                continue;
            }
            let sub_col = targets.iter().fold(0, |acc, &t| (acc << 1) | bit(col, t));
            for sub_row in 0..matrix.dim() {
                let mut row = col;
                for (k, &t) in targets.iter().enumerate() {
                    let shift = n - 1 - t.index();
                    let value = (sub_row >> (targets.len() - 1 - k)) & 1;
                    row = (row & !(1 << shift)) | (value << shift);
                }
                data[row * dim + col] = matrix.get(sub_row, sub_col);
            }
        }
        UnitaryMatrix::new("embedded", dim, data).unwrap()
    }

    #[test]
    fn test_definitions_match_library_matrices() {
        assert!(definition_matrix(Definition::Sx).approx_eq(&matrices::sx(), 1e-9));
        assert!(definition_matrix(Definition::Iswap).approx_eq(&matrices::iswap(), 1e-9));
        assert!(definition_matrix(Definition::Dcx).approx_eq(&matrices::dcx(), 1e-9));
        assert!(definition_matrix(Definition::Rccx).approx_eq(&matrices::rccx(), 1e-9));
        assert!(definition_matrix(Definition::Rc3x).approx_eq(&matrices::rc3x(), 1e-9));
    }

    #[test]
    fn test_functor_rendering() {
        let name = |q: QubitId| format!("qs[{}]", q.0);
        let cases = [
            (QsCall::new(QsGate::X, vec![q(1)]).controlled(vec![q(0)]), "CNOT(qs[0], qs[1]);"),
            (QsCall::new(QsGate::S, vec![q(0)]).adjoint(), "Adjoint S(qs[0]);"),
            (
                QsCall::new(QsGate::Rx(0.5), vec![q(1)]).controlled(vec![q(0)]),
                "Controlled Rx([qs[0]], (0.5, qs[1]));",
            ),
            (
                QsCall::new(QsGate::X, vec![q(3)]).controlled(vec![q(0), q(1), q(2)]),
                "Controlled X([qs[0], qs[1], qs[2]], qs[3]);",
            ),
            (
                QsCall::new(QsGate::Defined(Definition::Sx), vec![q(2)])
                    .adjoint()
                    .controlled(vec![q(0)]),
                "Controlled Adjoint SX([qs[0]], qs[2]);",
            ),
            (QsCall::new(QsGate::R1(1.0), vec![q(0)]), "R1(1.0, qs[0]);"),
        ];
        for (call, expected) in cases {
            assert_eq!(call.render(&name), expected);
        }
    }

    #[test]
    fn test_definitions_written_once_when_used() {
        let mut program = QSharpProgram::new(2);
        program.call(QsCall::new(QsGate::Defined(Definition::Sx), vec![q(0)]));
        program.call(QsCall::new(QsGate::Defined(Definition::Sx), vec![q(1)]).adjoint());
        program.measure(q(0));
        let text = program.to_qsharp();
        assert_eq!(text.matches("operation SX(q0 : Qubit) : Unit is Adj + Ctl").count(), 1);
        assert!(!text.contains("operation ISWAP"));
        assert!(text.contains("Adjoint SX(qs[1]);"));
        assert!(text.contains("set results += [M(qs[0])];"));
        assert!(text.contains("use qs = Qubit[2];"));
    }

    #[test]
    fn test_adjoint_definition_lowers_to_inverse() {
        let mut program = QSharpProgram::new(1);
        program.call(QsCall::new(QsGate::Defined(Definition::Sx), vec![q(0)]));
        program.call(QsCall::new(QsGate::Defined(Definition::Sx), vec![q(0)]).adjoint());
        let lowered = program.lower().unwrap();
        let total = lowered.ops().iter().fold(UnitaryMatrix::identity(1), |acc, op| match op {
            LoweredOp::Gate { matrix, .. } => matrix.mul(&acc),
            LoweredOp::Measure { .. } => acc,
        });
        assert!(total.approx_eq(&UnitaryMatrix::identity(1), 1e-9));
    }
}
