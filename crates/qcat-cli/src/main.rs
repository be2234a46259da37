//! qcat command-line interface.
//!
//! Reads circuits from JSON files in the operation-log format:
//!
//! ```text
//! {"num_qubits": 2, "operations": [
//!     {"kind": "h_gate", "qubit_groups": [[0]]},
//!     {"kind": "cx_gate", "qubit_groups": [[0], [1]]},
//!     {"kind": "measure_all", "qubit_groups": []}
//! ]}
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;
use qcat::QcatConfig;

mod commands;

use commands::{compare, draw, gates, run};

/// qcat - build a quantum circuit once, run it on any backend
#[derive(Parser)]
#[command(name = "qcat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to <config dir>/qcat/config.yaml)
    #[arg(long, env = "QCAT_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a circuit on one backend
    Run {
        /// Circuit file (JSON)
        input: String,

        /// Backend family (qiskit, cirq, ionq, braket, qsharp)
        #[arg(short, long)]
        backend: Option<String>,

        /// Number of repetitions
        #[arg(short, long)]
        shots: Option<u32>,

        /// Remote device name or identifier
        #[arg(short, long)]
        device: Option<String>,

        /// Simulator name
        #[arg(long)]
        simulator: Option<String>,

        /// API credential for the backend
        #[arg(long, env = "QCAT_API", hide_env_values = true)]
        api: Option<String>,

        /// Result bucket (Braket)
        #[arg(long)]
        bucket: Option<String>,

        /// Key prefix inside the bucket
        #[arg(long)]
        directory: Option<String>,

        /// Poll timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the native form of a circuit
    Draw {
        /// Circuit file (JSON)
        input: String,

        /// Backend family
        #[arg(short, long)]
        backend: Option<String>,
    },

    /// Execute a circuit on several backends and compare counts
    Compare {
        /// Circuit file (JSON)
        input: String,

        /// Backend to include; repeat for more. Defaults to the configured
        /// executions, or cirq, qiskit and braket.
        #[arg(short, long = "backend")]
        backends: Vec<String>,

        /// Print the comparison as JSON
        #[arg(long)]
        json: bool,
    },

    /// List gate kinds and their arity
    Gates {
        /// Also report whether each kind translates for this backend
        #[arg(short, long)]
        backend: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = QcatConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    qcat::logging::init(&config.logging, cli.verbose)
        .context("Failed to initialize logging")?;

    let result = match cli.command {
        Commands::Run {
            input,
            backend,
            shots,
            device,
            simulator,
            api,
            bucket,
            directory,
            timeout,
            json,
        } => {
            let overrides = run::Overrides {
                shots,
                device,
                simulator,
                api,
                bucket,
                directory,
                timeout,
            };
            run::execute(&config, &input, backend.as_deref(), overrides, json).await
        }

        Commands::Draw { input, backend } => draw::execute(&config, &input, backend.as_deref()),

        Commands::Compare {
            input,
            backends,
            json,
        } => compare::execute(&config, &input, &backends, json).await,

        Commands::Gates { backend } => gates::execute(backend.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_overrides() {
        let cli = Cli::try_parse_from([
            "qcat", "-vv", "run", "bell.json", "-b", "braket", "-d", "sv1", "--bucket", "out",
            "--shots", "10",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Run {
                input,
                backend,
                shots,
                device,
                bucket,
                ..
            } => {
                assert_eq!(input, "bell.json");
                assert_eq!(backend.as_deref(), Some("braket"));
                assert_eq!(shots, Some(10));
                assert_eq!(device.as_deref(), Some("sv1"));
                assert_eq!(bucket.as_deref(), Some("out"));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_compare_repeated_backends() {
        let cli =
            Cli::try_parse_from(["qcat", "compare", "c.json", "-b", "cirq", "-b", "qsharp"])
                .unwrap();
        match cli.command {
            Commands::Compare { backends, json, .. } => {
                assert_eq!(backends, vec!["cirq", "qsharp"]);
                assert!(!json);
            }
            _ => panic!("expected compare"),
        }
    }

    #[test]
    fn test_run_requires_input() {
        assert!(Cli::try_parse_from(["qcat", "run"]).is_err());
    }
}
