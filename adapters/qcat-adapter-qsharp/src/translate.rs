//! Operation log to Q# program.
//!
//! Gates with a Q# intrinsic map directly, using the `Controlled` and
//! `Adjoint` functors for their variants. Gates Q# lacks either become a
//! call to a program-level [`Definition`] or expand inline:
//!
//! | Kind | Q# |
//! |------|----|
//! | `u`, `u3` | `R1(λ)`, `Ry(θ)`, `R1(φ)` |
//! | `u2` | as `u` with θ = π/2 |
//! | `r` | as `u` with φ' = φ − π/2, λ' = π/2 − φ |
//! | `rzx` | `H`, `CNOT`, `Rz(θ)`, `CNOT`, `H` on the target |
//! | `cu3` | controlled `u` sequence |
//! | `cu` | `R1(γ)` on the control, then controlled `u` sequence |

use std::f64::consts::FRAC_PI_2;

use qcat_hal::{BackendKind, HalError, HalResult};
use qcat_ir::{Circuit, GateKind, Operation, QubitId};
use tracing::{debug, instrument};

use crate::program::{Definition, QSharpProgram, QsCall, QsGate};

/// Translate a circuit into a Q# program.
#[instrument(skip_all, fields(qubits = circuit.num_qubits(), ops = circuit.len()))]
pub fn translate(circuit: &Circuit) -> HalResult<QSharpProgram> {
    let mut out = QSharpProgram::new(circuit.num_qubits());
    for op in circuit.operations() {
        translate_op(&mut out, op, circuit.num_qubits())?;
    }
    debug!(
        statements = out.statements().len(),
        definitions = out.definitions().len(),
        "Translated to Q#"
    );
    Ok(out)
}

fn translate_op(out: &mut QSharpProgram, op: &Operation, num_qubits: u32) -> HalResult<()> {
    let a = op.angles();
    let qs = op.qubits();
    let call = |gate: QsGate| QsCall::new(gate, qs.clone());
    let controlled = |gate: QsGate, n: usize| {
        QsCall::new(gate, qs[n..].to_vec()).controlled(qs[..n].to_vec())
    };
    let defined = |def: Definition| call(QsGate::Defined(def));

    let statement = match op.kind() {
        GateKind::Measure => {
            qs.iter().for_each(|&q| out.measure(q));
            return Ok(());
        }
        GateKind::MeasureAll => {
            (0..num_qubits).for_each(|q| out.measure(QubitId(q)));
            return Ok(());
        }

        GateKind::IGate => call(QsGate::I),
        GateKind::XGate => call(QsGate::X),
        GateKind::YGate => call(QsGate::Y),
        GateKind::ZGate => call(QsGate::Z),
        GateKind::HGate => call(QsGate::H),
        GateKind::SGate => call(QsGate::S),
        GateKind::SdgGate => call(QsGate::S).adjoint(),
        GateKind::TGate => call(QsGate::T),
        GateKind::TdGate => call(QsGate::T).adjoint(),
        GateKind::SxGate => defined(Definition::Sx),
        GateKind::SxdGate => defined(Definition::Sx).adjoint(),
        GateKind::RxGate => call(QsGate::Rx(a[0])),
        GateKind::RyGate => call(QsGate::Ry(a[0])),
        GateKind::RzGate => call(QsGate::Rz(a[0])),
        GateKind::PGate | GateKind::U1Gate => call(QsGate::R1(a[0])),
        GateKind::U2Gate => {
            push_u(out, FRAC_PI_2, a[0], a[1], qs[0], &[]);
            return Ok(());
        }
        GateKind::UGate | GateKind::U3Gate => {
            push_u(out, a[0], a[1], a[2], qs[0], &[]);
            return Ok(());
        }
        GateKind::RGate => {
            push_u(out, a[0], a[1] - FRAC_PI_2, FRAC_PI_2 - a[1], qs[0], &[]);
            return Ok(());
        }

        GateKind::CxGate => controlled(QsGate::X, 1),
        GateKind::CyGate => controlled(QsGate::Y, 1),
        GateKind::CzGate => controlled(QsGate::Z, 1),
        GateKind::ChGate => controlled(QsGate::H, 1),
        GateKind::CsxGate => controlled(QsGate::Defined(Definition::Sx), 1),
        GateKind::SwapGate => call(QsGate::Swap),
        GateKind::IswapGate => defined(Definition::Iswap),
        GateKind::DcxGate => defined(Definition::Dcx),
        GateKind::RxxGate => call(QsGate::Rxx(a[0])),
        GateKind::RyyGate => call(QsGate::Ryy(a[0])),
        GateKind::RzzGate => call(QsGate::Rzz(a[0])),
        GateKind::RzxGate => {
            let (c, t) = (qs[0], qs[1]);
            out.call(QsCall::new(QsGate::H, vec![t]));
            out.call(QsCall::new(QsGate::X, vec![t]).controlled(vec![c]));
            out.call(QsCall::new(QsGate::Rz(a[0]), vec![t]));
            out.call(QsCall::new(QsGate::X, vec![t]).controlled(vec![c]));
            out.call(QsCall::new(QsGate::H, vec![t]));
            return Ok(());
        }
        GateKind::CphaseGate | GateKind::Cu1Gate => controlled(QsGate::R1(a[0]), 1),
        GateKind::CrxGate => controlled(QsGate::Rx(a[0]), 1),
        GateKind::CryGate => controlled(QsGate::Ry(a[0]), 1),
        GateKind::CrzGate => controlled(QsGate::Rz(a[0]), 1),
        GateKind::Cu3Gate => {
            push_u(out, a[0], a[1], a[2], qs[1], &[qs[0]]);
            return Ok(());
        }
        GateKind::CuGate => {
            out.call(QsCall::new(QsGate::R1(a[3]), vec![qs[0]]));
            push_u(out, a[0], a[1], a[2], qs[1], &[qs[0]]);
            return Ok(());
        }

        GateKind::CcxGate => controlled(QsGate::X, 2),
        GateKind::CswapGate => controlled(QsGate::Swap, 1),
        GateKind::RccxGate => defined(Definition::Rccx),
        GateKind::C3xGate => controlled(QsGate::X, 3),
        GateKind::C3sxGate => controlled(QsGate::Defined(Definition::Sx), 3),
        GateKind::Rc3xGate => defined(Definition::Rc3x),
        GateKind::C4xGate => controlled(QsGate::X, 4),

        GateKind::McxGate | GateKind::MctGate if op.mode().uses_ancillas() => {
            return Err(HalError::unsupported(
                op.kind(),
                BackendKind::QSharp,
                format!("the {} decomposition needs ancilla qubits", op.mode()),
            ));
        }
        GateKind::McxvchainGate => {
            return Err(HalError::unsupported(
                op.kind(),
                BackendKind::QSharp,
                "the v-chain decomposition needs ancilla qubits",
            ));
        }
        GateKind::McxGate | GateKind::MctGate | GateKind::McxgcGate | GateKind::McxrecGate => {
            multi_controlled(op, QsGate::X)?
        }
        GateKind::McpGate => multi_controlled(op, QsGate::R1(a[0]))?,
    };
    out.call(statement);
    Ok(())
}

/// `U(θ, φ, λ)` as `R1(λ)`, `Ry(θ)`, `R1(φ)`, each under `controls`.
fn push_u(
    out: &mut QSharpProgram,
    theta: f64,
    phi: f64,
    lambda: f64,
    target: QubitId,
    controls: &[QubitId],
) {
    for gate in [QsGate::R1(lambda), QsGate::Ry(theta), QsGate::R1(phi)] {
        out.call(QsCall::new(gate, vec![target]).controlled(controls.to_vec()));
    }
}

fn multi_controlled(op: &Operation, gate: QsGate) -> HalResult<QsCall> {
    let target = op.target().ok_or_else(|| {
        HalError::InvalidCircuit(format!("{} operation has no target qubit", op.kind()))
    })?;
    Ok(QsCall::new(gate, vec![target]).controlled(op.controls().to_vec()))
}
