//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use qcat::{BackendKind, Circuit, ExecutionResult, QCircuit, QcatConfig};

/// Load a circuit from a JSON operation log.
pub fn load_circuit(path: &str) -> Result<Circuit> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        anyhow::bail!("File not found: {path}");
    }

    let ext = path_obj.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !ext.eq_ignore_ascii_case("json") {
        anyhow::bail!("Unsupported input format '{ext}': circuits are read from .json files");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;
    serde_json::from_str(&source).with_context(|| format!("Invalid circuit in {path}"))
}

/// Load `path` into a façade configured from `config`.
pub fn load_qcircuit(config: &QcatConfig, path: &str) -> Result<QCircuit> {
    Ok(QCircuit::from_circuit(load_circuit(path)?).configured(config))
}

/// Parse a backend name, falling back to the configured default.
pub fn resolve_backend(config: &QcatConfig, name: Option<&str>) -> Result<BackendKind> {
    match name {
        Some(name) => name
            .parse()
            .with_context(|| format!("Unknown backend '{name}'")),
        None => Ok(config.backend),
    }
}

/// Print counts as a histogram, most frequent first.
pub fn print_results(result: &ExecutionResult) {
    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        result.shots
    );

    let sorted = result.counts.sorted();
    let total = result.counts.total_shots().max(1) as f64;

    for (bitstring, count) in sorted.iter().take(16) {
        let prob = *count as f64 / total * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }

    if let Some(job) = &result.job {
        println!("\n  Task: {} ({} polls)", style(&job.id).yellow(), job.polls);
    }
    if let Some(time_ms) = result.execution_time_ms {
        println!("  Execution time: {} ms", style(time_ms).yellow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> String {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_load_bell_circuit() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "bell.json",
            r#"{"num_qubits": 2, "operations": [
                {"kind": "h_gate", "qubit_groups": [[0]]},
                {"kind": "cx_gate", "qubit_groups": [[0], [1]]},
                {"kind": "measure_all", "qubit_groups": []}
            ]}"#,
        );
        let circuit = load_circuit(&path).unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.len(), 3);
    }

    #[test]
    fn test_load_rejects_out_of_bounds_operation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "bad.json",
            r#"{"num_qubits": 3, "operations": [{"kind": "h_gate", "qubit_groups": [[5]]}]}"#,
        );
        let err = load_circuit(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid circuit"));
    }

    #[test]
    fn test_load_rejects_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "bell.qasm", "OPENQASM 3.0;");
        assert!(load_circuit(&path).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_circuit("/nonexistent/qcat/circuit.json").unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_resolve_backend() {
        let config = QcatConfig::default();
        assert_eq!(resolve_backend(&config, None).unwrap(), config.backend);
        assert_eq!(
            resolve_backend(&config, Some("aws")).unwrap(),
            BackendKind::Braket
        );
        assert!(resolve_backend(&config, Some("dwave")).is_err());
    }
}
