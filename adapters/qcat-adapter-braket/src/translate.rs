//! Operation log to Braket program.

use qcat_hal::{BackendKind, HalError, HalResult};
use qcat_ir::{Circuit, GateKind, Operation, QubitId};
use tracing::{debug, instrument};

use crate::custom_gates;
use crate::program::{BraketGate, BraketProgram};

/// Translate a circuit into a Braket OpenQASM 3 program.
#[instrument(skip_all, fields(qubits = circuit.num_qubits(), ops = circuit.len()))]
pub fn translate(circuit: &Circuit) -> HalResult<BraketProgram> {
    let mut out = BraketProgram::new(circuit.num_qubits());
    for op in circuit.operations() {
        translate_op(&mut out, op, circuit.num_qubits())?;
    }
    debug!(
        instructions = out.instructions().len(),
        "Translated to Braket"
    );
    Ok(out)
}

fn translate_op(out: &mut BraketProgram, op: &Operation, num_qubits: u32) -> HalResult<()> {
    let a = op.angles();
    let gate = match op.kind() {
        GateKind::Measure => {
            op.qubits().into_iter().for_each(|q| out.measure(q));
            return Ok(());
        }
        GateKind::MeasureAll => {
            (0..num_qubits).for_each(|q| out.measure(QubitId(q)));
            return Ok(());
        }

        GateKind::IGate => BraketGate::I,
        GateKind::XGate => BraketGate::X,
        GateKind::YGate => BraketGate::Y,
        GateKind::ZGate => BraketGate::Z,
        GateKind::HGate => BraketGate::H,
        GateKind::SGate => BraketGate::S,
        GateKind::SdgGate => BraketGate::Si,
        GateKind::TGate => BraketGate::T,
        GateKind::TdGate => BraketGate::Ti,
        GateKind::SxGate => BraketGate::V,
        GateKind::SxdGate => BraketGate::Vi,
        GateKind::RxGate => BraketGate::Rx(a[0]),
        GateKind::RyGate => BraketGate::Ry(a[0]),
        GateKind::RzGate => BraketGate::Rz(a[0]),
        GateKind::PGate | GateKind::U1Gate => BraketGate::PhaseShift(a[0]),

        GateKind::CxGate => BraketGate::CNot,
        GateKind::CyGate => BraketGate::CY,
        GateKind::CzGate => BraketGate::CZ,
        GateKind::ChGate => BraketGate::ctrl(1, BraketGate::H),
        GateKind::CsxGate => BraketGate::ctrl(1, BraketGate::V),
        GateKind::SwapGate => BraketGate::Swap,
        GateKind::IswapGate => BraketGate::ISwap,
        GateKind::RxxGate => BraketGate::XX(a[0]),
        GateKind::RyyGate => BraketGate::YY(a[0]),
        GateKind::RzzGate => BraketGate::ZZ(a[0]),
        GateKind::CphaseGate | GateKind::Cu1Gate => BraketGate::CPhaseShift(a[0]),
        GateKind::CrxGate => BraketGate::ctrl(1, BraketGate::Rx(a[0])),
        GateKind::CryGate => BraketGate::ctrl(1, BraketGate::Ry(a[0])),
        GateKind::CrzGate => BraketGate::ctrl(1, BraketGate::Rz(a[0])),

        GateKind::CcxGate => BraketGate::CCNot,
        GateKind::CswapGate => BraketGate::CSwap,
        GateKind::C3xGate => BraketGate::ctrl(3, BraketGate::X),
        GateKind::C3sxGate => BraketGate::ctrl(3, BraketGate::V),
        GateKind::C4xGate => BraketGate::ctrl(4, BraketGate::X),

        GateKind::McxGate | GateKind::MctGate if op.mode().uses_ancillas() => {
            return Err(HalError::unsupported(
                op.kind(),
                BackendKind::Braket,
                format!("the {} decomposition needs ancilla qubits", op.mode()),
            ));
        }
        GateKind::McxvchainGate => {
            return Err(HalError::unsupported(
                op.kind(),
                BackendKind::Braket,
                "the v-chain decomposition needs ancilla qubits",
            ));
        }
        GateKind::McxGate | GateKind::MctGate | GateKind::McxgcGate | GateKind::McxrecGate => {
            out.push(
                BraketGate::ctrl(op.controls().len(), BraketGate::X),
                controls_and_target(op),
            );
            return Ok(());
        }
        GateKind::McpGate => {
            out.push(
                BraketGate::ctrl(op.controls().len(), BraketGate::PhaseShift(a[0])),
                controls_and_target(op),
            );
            return Ok(());
        }

        kind => {
            let gate = custom_gates::lookup(kind, &a)?.ok_or_else(|| {
                HalError::unsupported(
                    kind,
                    BackendKind::Braket,
                    "no native gate and no custom gate library entry",
                )
            })?;
            BraketGate::Unitary(gate)
        }
    };
    out.push(gate, op.qubits());
    Ok(())
}

fn controls_and_target(op: &Operation) -> Vec<QubitId> {
    let mut qubits = op.controls().to_vec();
    qubits.extend(op.target());
    qubits
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcat_ir::{McxMode, Param};

    fn q(i: u32) -> QubitId {
        QubitId(i)
    }

    #[test]
    fn test_rccx_uses_unitary_pragma() {
        let mut c = Circuit::new(3).unwrap();
        c.append(
            GateKind::RccxGate,
            vec![vec![q(0)], vec![q(1)], vec![q(2)]],
            vec![],
        )
        .unwrap();
        let qasm = translate(&c).unwrap().to_qasm();
        assert!(qasm.contains("#pragma braket unitary("));
        assert!(qasm.ends_with("q[0], q[1], q[2]\nb[0] = measure q[0];\nb[1] = measure q[1];\nb[2] = measure q[2];\n"));
    }

    #[test]
    fn test_mcp_generalizes_over_controls() {
        let mut c = Circuit::new(6).unwrap();
        c.append(
            GateKind::McpGate,
            vec![vec![q(0), q(1), q(2), q(3), q(4)], vec![q(5)]],
            vec![Param::Angle(0.5), Param::Count(5)],
        )
        .unwrap();
        let qasm = translate(&c).unwrap().to_qasm();
        assert!(qasm.contains("ctrl(5) @ phaseshift(0.5) q[0], q[1], q[2], q[3], q[4], q[5];"));
    }

    #[test]
    fn test_ancilla_modes_are_unsupported() {
        let mut c = Circuit::new(5).unwrap();
        c.append(
            GateKind::MctGate,
            vec![vec![q(0), q(1), q(2)], vec![q(3)], vec![q(4)]],
            vec![Param::Count(3), Param::Mode(McxMode::Recursion)],
        )
        .unwrap();
        assert!(matches!(
            translate(&c),
            Err(HalError::UnsupportedTranslation {
                kind: GateKind::MctGate,
                backend: BackendKind::Braket,
                ..
            })
        ));
    }

    #[test]
    fn test_measure_all_is_deduplicated() {
        let mut c = Circuit::new(2).unwrap();
        c.append(GateKind::Measure, vec![vec![q(1)]], vec![])
            .unwrap()
            .append(GateKind::MeasureAll, vec![], vec![])
            .unwrap();
        assert_eq!(translate(&c).unwrap().measured_qubits(), vec![q(0), q(1)]);
    }
}
