//! Operation log to Cirq circuit.

use qcat_hal::{BackendKind, HalError, HalResult};
use qcat_ir::{Circuit, GateKind, Operation, QubitId};
use tracing::{debug, instrument};

use crate::circuit::{CirqCircuit, CirqGate};
use crate::custom_gates;

/// Translate a circuit into Cirq moments.
///
/// Kinds without a native Cirq gate go through the custom gate library.
/// Multi-controlled X that needs ancilla qubits has no Cirq equivalent and
/// is reported as an unsupported translation.
#[instrument(skip_all, fields(qubits = circuit.num_qubits(), ops = circuit.len()))]
pub fn translate(circuit: &Circuit) -> HalResult<CirqCircuit> {
    let mut out = CirqCircuit::new(circuit.num_qubits());
    for op in circuit.operations() {
        translate_op(&mut out, op, circuit.num_qubits())?;
    }
    debug!(moments = out.moments().len(), "Translated to Cirq");
    Ok(out)
}

fn translate_op(out: &mut CirqCircuit, op: &Operation, num_qubits: u32) -> HalResult<()> {
    let a = op.angles();
    let gate = match op.kind() {
        GateKind::Measure => {
            for q in op.qubits() {
                out.append(
                    CirqGate::Measure {
                        key: format!("q({})", q.0),
                    },
                    vec![q],
                );
            }
            return Ok(());
        }
        GateKind::MeasureAll => {
            let all = (0..num_qubits).map(QubitId).collect();
            out.append(
                CirqGate::Measure {
                    key: "result".into(),
                },
                all,
            );
            return Ok(());
        }

        GateKind::IGate => CirqGate::I,
        GateKind::XGate => CirqGate::X,
        GateKind::YGate => CirqGate::Y,
        GateKind::ZGate => CirqGate::Z,
        GateKind::HGate => CirqGate::H,
        GateKind::SGate => CirqGate::S,
        GateKind::TGate => CirqGate::T,
        GateKind::RxGate => CirqGate::Rx(a[0]),
        GateKind::RyGate => CirqGate::Ry(a[0]),
        GateKind::RzGate => CirqGate::Rz(a[0]),
        GateKind::CxGate => CirqGate::CNOT,
        GateKind::CzGate => CirqGate::CZ,
        GateKind::SwapGate => CirqGate::SWAP,
        GateKind::IswapGate => CirqGate::ISWAP,
        GateKind::CcxGate => CirqGate::CCX,
        GateKind::CswapGate => CirqGate::CSWAP,
        GateKind::C3xGate => CirqGate::ControlledX { num_controls: 3 },
        GateKind::C4xGate => CirqGate::ControlledX { num_controls: 4 },

        GateKind::McxGate | GateKind::MctGate if op.mode().uses_ancillas() => {
            return Err(HalError::unsupported(
                op.kind(),
                BackendKind::Cirq,
                format!("the {} decomposition needs ancilla qubits", op.mode()),
            ));
        }
        GateKind::McxvchainGate => {
            return Err(HalError::unsupported(
                op.kind(),
                BackendKind::Cirq,
                "the v-chain decomposition needs ancilla qubits",
            ));
        }
        GateKind::McxGate | GateKind::MctGate | GateKind::McxgcGate | GateKind::McxrecGate => {
            out.append(
                CirqGate::ControlledX {
                    num_controls: op.controls().len(),
                },
                controls_and_target(op),
            );
            return Ok(());
        }
        GateKind::McpGate => {
            let base = custom_gates::lookup(op.kind(), &a)?
                .ok_or_else(|| missing_entry(op.kind()))?;
            out.append(
                CirqGate::ControlledMatrix {
                    gate: base,
                    num_controls: op.controls().len(),
                },
                controls_and_target(op),
            );
            return Ok(());
        }

        kind => {
            let gate = custom_gates::lookup(kind, &a)?.ok_or_else(|| missing_entry(kind))?;
            CirqGate::Matrix(gate)
        }
    };
    out.append(gate, op.qubits());
    Ok(())
}

fn controls_and_target(op: &Operation) -> Vec<QubitId> {
    let mut qubits = op.controls().to_vec();
    qubits.extend(op.target());
    qubits
}

fn missing_entry(kind: GateKind) -> HalError {
    HalError::unsupported(
        kind,
        BackendKind::Cirq,
        "no native gate and no custom gate library entry",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcat_ir::{McxMode, Param};

    fn q(i: u32) -> QubitId {
        QubitId(i)
    }

    #[test]
    fn test_every_kind_translates_or_reports_unsupported() {
        for &kind in GateKind::ALL {
            let mut c = Circuit::new(6).unwrap();
            let groups: Vec<Vec<QubitId>> = match kind.spec().qubits {
                qcat_ir::QubitLayout::Fixed(n) => (0..n as u32).map(|i| vec![q(i)]).collect(),
                qcat_ir::QubitLayout::MultiControlled { .. } => {
                    vec![vec![q(0), q(1), q(2)], vec![q(3)]]
                }
            };
            let params: Vec<Param> = kind
                .spec()
                .params
                .iter()
                .map(|p| match p {
                    qcat_ir::ParamKind::Angle => Param::Angle(0.25),
                    qcat_ir::ParamKind::Count => Param::Count(3),
                    qcat_ir::ParamKind::Flag => Param::Flag(false),
                    qcat_ir::ParamKind::Mode => Param::Mode(McxMode::NoAncilla),
                })
                .collect();
            c.append(kind, groups, params).unwrap();

            match translate(&c) {
                Ok(cirq) => assert!(cirq.all_operations().count() >= 1, "{kind}"),
                Err(HalError::UnsupportedTranslation { kind: k, backend, .. }) => {
                    assert_eq!(k, GateKind::McxvchainGate);
                    assert_eq!(backend, BackendKind::Cirq);
                }
                Err(other) => panic!("{kind}: {other}"),
            }
        }
    }

    #[test]
    fn test_mcx_with_ancilla_mode_is_unsupported() {
        let mut c = Circuit::new(5).unwrap();
        c.append(
            GateKind::McxGate,
            vec![vec![q(0), q(1), q(2)], vec![q(3)], vec![q(4)]],
            vec![Param::Count(3), Param::Mode(McxMode::VChain)],
        )
        .unwrap();
        let err = translate(&c).unwrap_err();
        assert!(err.to_string().contains("mcx_gate"));
        assert!(err.to_string().contains("cirq"));
    }

    #[test]
    fn test_mcx_generalizes_over_control_count() {
        let mut c = Circuit::new(7).unwrap();
        c.append(
            GateKind::McxGate,
            vec![vec![q(0), q(1), q(2), q(3), q(4), q(5)], vec![q(6)]],
            vec![Param::Count(6), Param::Mode(McxMode::NoAncilla)],
        )
        .unwrap();
        let cirq = translate(&c).unwrap();
        let op = cirq.all_operations().next().unwrap();
        assert_eq!(op.gate, CirqGate::ControlledX { num_controls: 6 });
        assert_eq!(op.qubits.len(), 7);
    }

    #[test]
    fn test_measure_keys() {
        let mut c = Circuit::new(2).unwrap();
        c.append(GateKind::Measure, vec![vec![q(1)]], vec![]).unwrap();
        let cirq = translate(&c).unwrap();
        let op = cirq.all_operations().next().unwrap();
        assert_eq!(op.gate, CirqGate::Measure { key: "q(1)".into() });
    }
}
