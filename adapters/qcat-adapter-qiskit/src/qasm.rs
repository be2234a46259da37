//! OpenQASM rendering of Qiskit circuits.
//!
//! OpenQASM 2 is the drawing format and names every instruction exactly as
//! Qiskit does. OpenQASM 3 is the IBM submission format: it only relies on
//! `stdgates.inc`, gate modifiers and a few local gate definitions.

use std::f64::consts::FRAC_PI_2;
use std::fmt::{self, Write};

use qcat_ir::QubitId;

use crate::circuit::{QiskitCircuit, QiskitGate, QiskitInstruction};

fn args(qubits: &[QubitId]) -> String {
    qubits
        .iter()
        .map(|q| format!("q[{}]", q.0))
        .collect::<Vec<_>>()
        .join(", ")
}

fn params(values: &[f64]) -> String {
    if values.is_empty() {
        return String::new();
    }
    let joined = values
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("({joined})")
}

pub(crate) fn write_qasm2(circuit: &QiskitCircuit, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "OPENQASM 2.0;")?;
    writeln!(f, "include \"qelib1.inc\";")?;
    writeln!(f, "qreg q[{}];", circuit.num_clbits())?;
    writeln!(f, "creg c[{}];", circuit.num_clbits())?;

    for inst in circuit.instructions() {
        match inst.gate {
            QiskitGate::Measure => {
                for (q, c) in inst.qubits.iter().zip(&inst.clbits) {
                    writeln!(f, "measure q[{}] -> c[{c}];", q.0)?;
                }
            }
            gate => {
                let mut qubits = inst.qubits.clone();
                qubits.extend(&inst.ancillas);
                writeln!(
                    f,
                    "{}{} {};",
                    gate.name(),
                    params(&gate.params()),
                    args(&qubits).replace(", ", ",")
                )?;
            }
        }
    }
    Ok(())
}

/// Gate definitions for everything `stdgates.inc` lacks.
fn definition(gate: &QiskitGate) -> Option<(&'static str, &'static str)> {
    let def = match gate {
        QiskitGate::ISwap => (
            "iswap",
            "gate iswap a, b { s a; s b; h a; cx a, b; cx b, a; h b; }",
        ),
        QiskitGate::DCX => ("dcx", "gate dcx a, b { cx a, b; cx b, a; }"),
        QiskitGate::RXX(_) => (
            "rxx",
            "gate rxx(theta) a, b { h a; h b; cx a, b; rz(theta) b; cx a, b; h b; h a; }",
        ),
        QiskitGate::RYY(_) => (
            "ryy",
            "gate ryy(theta) a, b { rx(pi/2) a; rx(pi/2) b; cx a, b; rz(theta) b; cx a, b; rx(-pi/2) a; rx(-pi/2) b; }",
        ),
        QiskitGate::RZZ(_) => (
            "rzz",
            "gate rzz(theta) a, b { cx a, b; rz(theta) b; cx a, b; }",
        ),
        QiskitGate::RZX(_) => (
            "rzx",
            "gate rzx(theta) a, b { h b; cx a, b; rz(theta) b; cx a, b; h b; }",
        ),
        QiskitGate::RCCX => (
            "rccx",
            "gate rccx a, b, c { h c; t c; cx b, c; tdg c; cx a, c; t c; cx b, c; tdg c; h c; }",
        ),
        QiskitGate::RC3X => (
            "rc3x",
            "gate rc3x a, b, c, d { h d; t d; cx c, d; tdg d; h d; cx a, d; t d; cx b, d; tdg d; cx a, d; t d; cx b, d; tdg d; h d; t d; cx c, d; tdg d; h d; }",
        ),
        _ => return None,
    };
    Some(def)
}

/// One OpenQASM 3 statement for a unitary instruction.
fn statement(inst: &QiskitInstruction) -> String {
    let q = args(&inst.qubits);
    match inst.gate {
        QiskitGate::U(theta, phi, lambda) => format!("U({theta}, {phi}, {lambda}) {q};"),
        QiskitGate::R(theta, phi) => {
            format!("U({theta}, {}, {}) {q};", phi - FRAC_PI_2, FRAC_PI_2 - phi)
        }
        QiskitGate::SXdg => format!("inv @ sx {q};"),
        QiskitGate::CSX => format!("ctrl @ sx {q};"),
        QiskitGate::CU1(lambda) => format!("cp({lambda}) {q};"),
        QiskitGate::CU3(theta, phi, lambda) => format!("cu({theta}, {phi}, {lambda}, 0) {q};"),
        QiskitGate::C3X => format!("ctrl(3) @ x {q};"),
        QiskitGate::C3SX => format!("ctrl(3) @ sx {q};"),
        QiskitGate::C4X => format!("ctrl(4) @ x {q};"),
        QiskitGate::MCX {
            num_ctrl_qubits, ..
        } => format!("ctrl({num_ctrl_qubits}) @ x {q};"),
        QiskitGate::MCPhase {
            lambda,
            num_ctrl_qubits,
        } => format!("ctrl({num_ctrl_qubits}) @ p({lambda}) {q};"),
        QiskitGate::Barrier => format!("barrier {q};"),
        gate => format!("{}{} {q};", gate.name(), params(&gate.params())),
    }
}

pub(crate) fn emit_qasm3(circuit: &QiskitCircuit) -> String {
    let mut out = String::from("OPENQASM 3.0;\ninclude \"stdgates.inc\";\n");

    let mut defined: Vec<&'static str> = Vec::new();
    for inst in circuit.instructions() {
        if let Some((name, body)) = definition(&inst.gate) {
            if !defined.contains(&name) {
                defined.push(name);
                out.push_str(body);
                out.push('\n');
            }
        }
    }

    let _ = writeln!(out, "qubit[{}] q;", circuit.num_clbits());
    let _ = writeln!(out, "bit[{}] c;", circuit.num_clbits());

    for inst in circuit.instructions() {
        if inst.gate == QiskitGate::Measure {
            for (q, c) in inst.qubits.iter().zip(&inst.clbits) {
                let _ = writeln!(out, "c[{c}] = measure q[{}];", q.0);
            }
        } else {
            out.push_str(&statement(inst));
            out.push('\n');
        }
    }
    out
}
