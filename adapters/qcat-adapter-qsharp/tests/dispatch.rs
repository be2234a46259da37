//! Local execution of translated Q# programs.

use std::sync::Arc;

use qcat_adapter_qsharp::QSharpBackend;
use qcat_adapter_sim::StatevectorSimulator;
use qcat_hal::{Backend, BackendKind, Dispatcher, ExecutionRequest, ExecutionResult, HalError};
use qcat_ir::{Circuit, GateKind, Param, QubitId};

fn q(i: u32) -> QubitId {
    QubitId(i)
}

async fn run(circuit: &Circuit, shots: u32) -> Result<ExecutionResult, HalError> {
    let backend = QSharpBackend::new();
    let native = backend.translate(circuit)?;
    let request = ExecutionRequest::new(BackendKind::QSharp).with_repetitions(shots);
    Dispatcher::new(Arc::new(StatevectorSimulator::with_seed(11)))
        .execute(&backend, native.as_ref(), &request)
        .await
}

#[tokio::test]
async fn test_bell_pair_is_correlated() {
    let mut c = Circuit::new(2).unwrap();
    c.append(GateKind::HGate, vec![vec![q(0)]], vec![])
        .unwrap()
        .append(GateKind::CxGate, vec![vec![q(0)], vec![q(1)]], vec![])
        .unwrap()
        .append(GateKind::MeasureAll, vec![], vec![])
        .unwrap();

    let result = run(&c, 300).await.unwrap();
    assert_eq!(result.counts.get("00") + result.counts.get("11"), 300);
    assert_eq!(result.backend, Some(BackendKind::QSharp));
}

#[tokio::test]
async fn test_rccx_definition_flips_target() {
    let mut c = Circuit::new(3).unwrap();
    c.append(GateKind::XGate, vec![vec![q(0)]], vec![])
        .unwrap()
        .append(GateKind::XGate, vec![vec![q(1)]], vec![])
        .unwrap()
        .append(
            GateKind::RccxGate,
            vec![vec![q(0)], vec![q(1)], vec![q(2)]],
            vec![],
        )
        .unwrap()
        .append(GateKind::MeasureAll, vec![], vec![])
        .unwrap();

    let result = run(&c, 40).await.unwrap();
    assert_eq!(result.counts.get("111"), 40);
}

#[tokio::test]
async fn test_rc3x_definition_flips_target() {
    let mut c = Circuit::new(4).unwrap();
    for i in 0..3 {
        c.append(GateKind::XGate, vec![vec![q(i)]], vec![]).unwrap();
    }
    c.append(
        GateKind::Rc3xGate,
        vec![vec![q(0)], vec![q(1)], vec![q(2)], vec![q(3)]],
        vec![],
    )
    .unwrap()
    .append(GateKind::MeasureAll, vec![], vec![])
    .unwrap();

    let result = run(&c, 40).await.unwrap();
    assert_eq!(result.counts.get("1111"), 40);
}

#[tokio::test]
async fn test_u_decomposition_matches_x() {
    // U(π, 0, π) is X.
    let mut c = Circuit::new(1).unwrap();
    c.append(
        GateKind::UGate,
        vec![vec![q(0)]],
        vec![
            Param::Angle(std::f64::consts::PI),
            Param::Angle(0.0),
            Param::Angle(std::f64::consts::PI),
        ],
    )
    .unwrap()
    .append(GateKind::Measure, vec![vec![q(0)]], vec![])
    .unwrap();

    let result = run(&c, 25).await.unwrap();
    assert_eq!(result.counts.get("1"), 25);
}

#[tokio::test]
async fn test_iswap_and_dcx_move_excitation() {
    // DCX takes |10⟩ to |01⟩ and ISWAP takes it back to i|10⟩.
    let mut c = Circuit::new(2).unwrap();
    c.append(GateKind::XGate, vec![vec![q(0)]], vec![])
        .unwrap()
        .append(GateKind::DcxGate, vec![vec![q(0)], vec![q(1)]], vec![])
        .unwrap()
        .append(GateKind::IswapGate, vec![vec![q(0)], vec![q(1)]], vec![])
        .unwrap()
        .append(GateKind::MeasureAll, vec![], vec![])
        .unwrap();

    let result = run(&c, 20).await.unwrap();
    assert_eq!(result.counts.get("10"), 20);
}

#[tokio::test]
async fn test_unmeasured_program_is_invalid() {
    let mut c = Circuit::new(1).unwrap();
    c.append(GateKind::HGate, vec![vec![q(0)]], vec![]).unwrap();
    assert!(matches!(
        run(&c, 10).await,
        Err(HalError::InvalidCircuit(_))
    ));
}
