//! Property tests for local execution through the façade.

use std::sync::Arc;

use proptest::prelude::*;
use qcat::{BackendKind, ExecutionRequest, ExecutionResult, QCircuit};
use qcat_adapter_sim::StatevectorSimulator;

#[derive(Debug, Clone)]
enum Step {
    H(u32),
    X(u32),
    Ry(f64, u32),
    Cx(u32, u32),
    Rzz(f64, u32, u32),
}

fn step(num_qubits: u32) -> impl Strategy<Value = Step> {
    let q = 0..num_qubits;
    let pair = (0..num_qubits, 0..num_qubits).prop_filter("distinct qubits", |(a, b)| a != b);
    prop_oneof![
        q.clone().prop_map(Step::H),
        q.clone().prop_map(Step::X),
        (-3.0..3.0f64, q).prop_map(|(t, q)| Step::Ry(t, q)),
        pair.clone().prop_map(|(a, b)| Step::Cx(a, b)),
        (-3.0..3.0f64, pair).prop_map(|(t, (a, b))| Step::Rzz(t, a, b)),
    ]
}

fn program() -> impl Strategy<Value = (u32, Vec<Step>)> {
    (2u32..5).prop_flat_map(|n| (Just(n), prop::collection::vec(step(n), 0..12)))
}

fn build(num_qubits: u32, steps: &[Step], seed: u64) -> QCircuit {
    let mut qc = QCircuit::new(num_qubits)
        .unwrap()
        .with_simulator(Arc::new(StatevectorSimulator::with_seed(seed)));
    for s in steps {
        match *s {
            Step::H(q) => qc.h_gate(q),
            Step::X(q) => qc.x_gate(q),
            Step::Ry(t, q) => qc.ry_gate(t, q),
            Step::Cx(a, b) => qc.cx_gate(a, b),
            Step::Rzz(t, a, b) => qc.rzz_gate(t, a, b),
        }
        .unwrap();
    }
    qc.measure_all().unwrap();
    qc
}

fn run(qc: &mut QCircuit, backend: BackendKind, shots: u32) -> ExecutionResult {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let request = ExecutionRequest::new(backend).with_repetitions(shots);
    runtime.block_on(qc.execute(&request)).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn counts_sum_to_repetitions((n, steps) in program(), shots in 1u32..300) {
        let mut qc = build(n, &steps, 1);
        let result = run(&mut qc, BackendKind::Qiskit, shots);

        prop_assert_eq!(result.counts.total_shots(), u64::from(shots));
        for (bitstring, _) in result.counts.iter() {
            prop_assert_eq!(bitstring.len(), n as usize);
        }
    }

    #[test]
    fn seeded_execution_is_reproducible((n, steps) in program(), seed in any::<u64>()) {
        let first = run(&mut build(n, &steps, seed), BackendKind::Cirq, 200);
        let second = run(&mut build(n, &steps, seed), BackendKind::Cirq, 200);
        prop_assert_eq!(first.counts, second.counts);
    }

    #[test]
    fn draw_never_translates_twice((n, steps) in program()) {
        let mut qc = build(n, &steps, 0);
        let first = qc.draw_for(BackendKind::Braket).unwrap();
        let second = qc.draw_for(BackendKind::Braket).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(qc.translation_count(), 1);
    }
}
