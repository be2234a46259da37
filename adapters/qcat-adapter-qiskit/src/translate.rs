//! Operation log to Qiskit circuit.

use qcat_hal::HalResult;
use qcat_ir::{Circuit, GateKind, McxMode, Operation, QubitId};
use tracing::{debug, instrument};

use crate::circuit::{McxVariant, QiskitCircuit, QiskitGate, QiskitInstruction};

/// Translate a circuit into Qiskit instructions.
///
/// Every registry kind has a Qiskit builder, so this never reports an
/// unsupported translation.
#[instrument(skip_all, fields(qubits = circuit.num_qubits(), ops = circuit.len()))]
pub fn translate(circuit: &Circuit) -> HalResult<QiskitCircuit> {
    let mut out = QiskitCircuit::new(circuit.num_qubits());
    for op in circuit.operations() {
        translate_op(&mut out, op, circuit.num_qubits());
    }
    debug!(instructions = out.instructions().len(), "Translated to Qiskit");
    Ok(out)
}

fn translate_op(out: &mut QiskitCircuit, op: &Operation, num_qubits: u32) {
    let a = op.angles();
    let gate = match op.kind() {
        GateKind::Measure => {
            for q in op.qubits() {
                out.measure(q);
            }
            return;
        }
        GateKind::MeasureAll => {
            let all: Vec<QubitId> = (0..num_qubits).map(QubitId).collect();
            out.push(QiskitInstruction::gate(QiskitGate::Barrier, all.clone()));
            for q in all {
                out.measure(q);
            }
            return;
        }
        GateKind::McxGate | GateKind::MctGate => {
            let variant = match op.mode() {
                McxMode::NoAncilla => McxVariant::NoAncilla,
                McxMode::Recursion => McxVariant::Recursive,
                McxMode::VChain => McxVariant::VChain { dirty: false },
                McxMode::VChainDirty => McxVariant::VChain { dirty: true },
            };
            push_mcx(out, op, variant);
            return;
        }
        GateKind::McxgcGate => return push_mcx(out, op, McxVariant::GrayCode),
        GateKind::McxrecGate => return push_mcx(out, op, McxVariant::Recursive),
        GateKind::McxvchainGate => {
            return push_mcx(out, op, McxVariant::VChain { dirty: op.flag() });
        }
        GateKind::McpGate => QiskitGate::MCPhase {
            lambda: a[0],
            num_ctrl_qubits: op.controls().len(),
        },

        GateKind::IGate => QiskitGate::Id,
        GateKind::XGate => QiskitGate::X,
        GateKind::YGate => QiskitGate::Y,
        GateKind::ZGate => QiskitGate::Z,
        GateKind::HGate => QiskitGate::H,
        GateKind::SGate => QiskitGate::S,
        GateKind::SdgGate => QiskitGate::Sdg,
        GateKind::TGate => QiskitGate::T,
        GateKind::TdGate => QiskitGate::Tdg,
        GateKind::SxGate => QiskitGate::SX,
        GateKind::SxdGate => QiskitGate::SXdg,
        GateKind::RxGate => QiskitGate::RX(a[0]),
        GateKind::RyGate => QiskitGate::RY(a[0]),
        GateKind::RzGate => QiskitGate::RZ(a[0]),
        GateKind::PGate => QiskitGate::Phase(a[0]),
        GateKind::U1Gate => QiskitGate::U1(a[0]),
        GateKind::U2Gate => QiskitGate::U2(a[0], a[1]),
        GateKind::RGate => QiskitGate::R(a[0], a[1]),
        GateKind::UGate => QiskitGate::U(a[0], a[1], a[2]),
        GateKind::U3Gate => QiskitGate::U3(a[0], a[1], a[2]),
        GateKind::CxGate => QiskitGate::CX,
        GateKind::CyGate => QiskitGate::CY,
        GateKind::CzGate => QiskitGate::CZ,
        GateKind::ChGate => QiskitGate::CH,
        GateKind::CsxGate => QiskitGate::CSX,
        GateKind::SwapGate => QiskitGate::Swap,
        GateKind::IswapGate => QiskitGate::ISwap,
        GateKind::DcxGate => QiskitGate::DCX,
        GateKind::RxxGate => QiskitGate::RXX(a[0]),
        GateKind::RyyGate => QiskitGate::RYY(a[0]),
        GateKind::RzzGate => QiskitGate::RZZ(a[0]),
        GateKind::RzxGate => QiskitGate::RZX(a[0]),
        GateKind::CphaseGate => QiskitGate::CPhase(a[0]),
        GateKind::Cu1Gate => QiskitGate::CU1(a[0]),
        GateKind::CrxGate => QiskitGate::CRX(a[0]),
        GateKind::CryGate => QiskitGate::CRY(a[0]),
        GateKind::CrzGate => QiskitGate::CRZ(a[0]),
        GateKind::Cu3Gate => QiskitGate::CU3(a[0], a[1], a[2]),
        GateKind::CuGate => QiskitGate::CU(a[0], a[1], a[2], a[3]),
        GateKind::CcxGate => QiskitGate::CCX,
        GateKind::CswapGate => QiskitGate::CSwap,
        GateKind::RccxGate => QiskitGate::RCCX,
        GateKind::C3xGate => QiskitGate::C3X,
        GateKind::C3sxGate => QiskitGate::C3SX,
        GateKind::Rc3xGate => QiskitGate::RC3X,
        GateKind::C4xGate => QiskitGate::C4X,
    };

    let qubits = if op.kind().is_multi_controlled() {
        op.qubit_groups().iter().take(2).flatten().copied().collect()
    } else {
        op.qubits()
    };
    out.push(QiskitInstruction::gate(gate, qubits));
}

fn push_mcx(out: &mut QiskitCircuit, op: &Operation, variant: McxVariant) {
    let mut qubits = op.controls().to_vec();
    qubits.extend(op.target());
    out.push(QiskitInstruction {
        gate: QiskitGate::MCX {
            num_ctrl_qubits: op.controls().len(),
            variant,
        },
        qubits,
        ancillas: op.ancillas().to_vec(),
        clbits: Vec::new(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcat_ir::Param;

    fn q(i: u32) -> QubitId {
        QubitId(i)
    }

    #[test]
    fn test_measure_all_is_barrier_then_measures() {
        let mut c = Circuit::new(2).unwrap();
        c.append(GateKind::HGate, vec![vec![q(0)]], vec![]).unwrap();
        c.append(GateKind::MeasureAll, vec![], vec![]).unwrap();

        let qc = translate(&c).unwrap();
        let names: Vec<_> = qc.instructions().iter().map(|i| i.gate.name()).collect();
        assert_eq!(names, vec!["h", "barrier", "measure", "measure"]);
        assert_eq!(qc.instructions()[3].clbits, vec![1]);
    }

    #[test]
    fn test_mcx_mode_and_ancillas_propagate() {
        let mut c = Circuit::new(6).unwrap();
        c.append(
            GateKind::McxGate,
            vec![vec![q(0), q(1), q(2)], vec![q(3)], vec![q(4), q(5)]],
            vec![Param::Count(3), Param::Mode(McxMode::VChainDirty)],
        )
        .unwrap();

        let qc = translate(&c).unwrap();
        let inst = &qc.instructions()[0];
        assert_eq!(
            inst.gate,
            QiskitGate::MCX {
                num_ctrl_qubits: 3,
                variant: McxVariant::VChain { dirty: true },
            }
        );
        assert_eq!(inst.qubits, vec![q(0), q(1), q(2), q(3)]);
        assert_eq!(inst.ancillas, vec![q(4), q(5)]);
    }

    #[test]
    fn test_gray_code_variant() {
        let mut c = Circuit::new(3).unwrap();
        c.append(
            GateKind::McxgcGate,
            vec![vec![q(0), q(1)], vec![q(2)]],
            vec![Param::Count(2)],
        )
        .unwrap();
        let qc = translate(&c).unwrap();
        assert_eq!(qc.instructions()[0].gate.name(), "mcx_gray");
    }

    #[test]
    fn test_parameters_keep_declared_order() {
        let mut c = Circuit::new(2).unwrap();
        c.append(
            GateKind::CuGate,
            vec![vec![q(1)], vec![q(0)]],
            vec![
                Param::Angle(0.1),
                Param::Angle(0.2),
                Param::Angle(0.3),
                Param::Angle(0.4),
            ],
        )
        .unwrap();
        let qc = translate(&c).unwrap();
        assert_eq!(qc.instructions()[0].gate, QiskitGate::CU(0.1, 0.2, 0.3, 0.4));
        assert_eq!(qc.instructions()[0].qubits, vec![q(1), q(0)]);
    }
}
