//! Run command implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use qcat::{BackendKind, ExecutionConfig, QcatConfig};

use super::common::{load_qcircuit, print_results, resolve_backend};

/// Command-line settings that take precedence over the configuration file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub shots: Option<u32>,
    pub device: Option<String>,
    pub simulator: Option<String>,
    pub api: Option<String>,
    pub bucket: Option<String>,
    pub directory: Option<String>,
    pub timeout: Option<u64>,
}

impl Overrides {
    /// Configured settings for `backend` with these overrides applied.
    pub fn apply(self, config: &QcatConfig, backend: BackendKind) -> ExecutionConfig {
        let mut exec = config.execution(backend);
        if let Some(shots) = self.shots {
            exec.repetitions = shots;
        }
        if let Some(simulator) = self.simulator {
            exec.simulator = simulator;
            exec.device = None;
        }
        if self.device.is_some() {
            exec.device = self.device;
        }
        if self.api.is_some() {
            exec.api = self.api;
        }
        if self.bucket.is_some() {
            exec.bucket = self.bucket;
        }
        if self.directory.is_some() {
            exec.directory = self.directory;
        }
        if let Some(timeout) = self.timeout {
            exec.poll_timeout_seconds = timeout;
        }
        exec
    }
}

/// Execute the run command.
pub async fn execute(
    config: &QcatConfig,
    input: &str,
    backend: Option<&str>,
    overrides: Overrides,
    json: bool,
) -> Result<()> {
    let backend = resolve_backend(config, backend)?;
    let exec = overrides.apply(config, backend);
    let request = exec.to_request();

    let mut circuit = load_qcircuit(config, input)?;
    if !json {
        println!(
            "{} Running {} on {} ({} shots)",
            style("→").cyan().bold(),
            style(input).green(),
            style(exec.key()).yellow(),
            request.repetitions
        );
        println!(
            "  Loaded: {} qubits, {} operations",
            circuit.num_qubits(),
            circuit.operations().len()
        );
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(format!("Executing on {}...", request.target));
    if !json {
        spinner.enable_steady_tick(Duration::from_millis(100));
    }

    let result = circuit.execute(&request).await;
    spinner.finish_and_clear();
    let result = result.with_context(|| format!("Execution on {} failed", exec.key()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_results(&result);
    }

    Ok(())
}
