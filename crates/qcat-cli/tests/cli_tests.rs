//! CLI workflow tests.
//!
//! The CLI is a binary crate, so these exercise the same library calls the
//! commands make: load a JSON circuit file, configure a façade from YAML,
//! then draw, run and compare.

use std::fs;
use std::path::{Path, PathBuf};

use qcat::{BackendKind, Circuit, ExecutionRequest, QCircuit, QcatConfig};

const GHZ: &str = r#"{
    "num_qubits": 3,
    "operations": [
        {"kind": "x_gate", "qubit_groups": [[0]]},
        {"kind": "cx_gate", "qubit_groups": [[0], [1]]},
        {"kind": "mcx_gate", "qubit_groups": [[0, 1], [2]], "params": [{"count": 2}, {"mode": "noancilla"}]},
        {"kind": "measure_all", "qubit_groups": []}
    ]
}"#;

fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn load(path: &Path, config: &QcatConfig) -> QCircuit {
    let circuit: Circuit = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    QCircuit::from_circuit(circuit).configured(config)
}

#[test]
fn test_circuit_file_round_trips_through_serde() {
    let circuit: Circuit = serde_json::from_str(GHZ).unwrap();
    let encoded = serde_json::to_string(&circuit).unwrap();
    let decoded: Circuit = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded.operations(), circuit.operations());
}

#[test]
fn test_count_mismatch_rejected_on_load() {
    let bad = GHZ.replace(r#"{"count": 2}"#, r#"{"count": 3}"#);
    assert!(serde_json::from_str::<Circuit>(&bad).is_err());
}

#[tokio::test]
async fn test_run_with_configured_backend() {
    let dir = tempfile::tempdir().unwrap();
    let circuit_path = write(&dir, "ghz.json", GHZ);
    let config_path = write(&dir, "config.yaml", "backend: qsharp\nsimulator:\n  seed: 1\n");

    let config = QcatConfig::load(Some(config_path.as_path())).unwrap();
    let mut qc = load(&circuit_path, &config);
    assert_eq!(qc.backend(), BackendKind::QSharp);

    let request = config.execution(qc.backend()).to_request();
    let result = qc.execute(&request).await.unwrap();
    assert_eq!(result.counts.get("111"), 1024);
}

#[test]
fn test_draw_every_local_backend() {
    let dir = tempfile::tempdir().unwrap();
    let circuit_path = write(&dir, "ghz.json", GHZ);
    let mut qc = load(&circuit_path, &QcatConfig::default());

    for kind in [
        BackendKind::Qiskit,
        BackendKind::Cirq,
        BackendKind::IonQ,
        BackendKind::Braket,
        BackendKind::QSharp,
    ] {
        let drawing = qc.draw_for(kind).unwrap();
        assert!(!drawing.is_empty(), "{kind}");
    }
}

#[tokio::test]
async fn test_compare_configured_executions() {
    let dir = tempfile::tempdir().unwrap();
    let circuit_path = write(&dir, "ghz.json", GHZ);
    let config = QcatConfig::from_yaml(
        "executions:\n  - backend: cirq\n    repetitions: 64\n  - backend: ionq\n",
    )
    .unwrap();
    let mut qc = load(&circuit_path, &config);

    let comparison = qc.compare_results(Some(&config.executions)).await;
    assert_eq!(comparison.len(), 2);
    assert_eq!(
        comparison.get("cirq").unwrap().as_ref().unwrap().counts.get("111"),
        64
    );
    assert!(comparison.get("ionq").unwrap().is_err());
}

#[test]
fn test_request_defaults_match_config_defaults() {
    let request = QcatConfig::default().execution(BackendKind::Cirq).to_request();
    let defaults = ExecutionRequest::new(BackendKind::Cirq);
    assert_eq!(request.target, defaults.target);
    assert_eq!(request.repetitions, defaults.repetitions);
    assert_eq!(request.poll_timeout, defaults.poll_timeout);
    assert_eq!(request.poll_interval, defaults.poll_interval);
}
