//! Backend family selector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HalError;

/// The backend families a circuit can be translated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Qiskit circuits; IBM Quantum for remote execution.
    #[serde(alias = "ibm")]
    Qiskit,
    /// Cirq circuits, local simulation.
    #[serde(alias = "google")]
    Cirq,
    /// Cirq circuits submitted to IonQ.
    IonQ,
    /// Braket OpenQASM 3 programs; AWS Braket for remote execution.
    #[serde(alias = "amazon", alias = "aws")]
    Braket,
    /// Q# programs, local simulation.
    #[serde(alias = "microsoft")]
    QSharp,
}

impl BackendKind {
    /// All backend families.
    pub const ALL: &'static [BackendKind] = &[
        BackendKind::Qiskit,
        BackendKind::Cirq,
        BackendKind::IonQ,
        BackendKind::Braket,
        BackendKind::QSharp,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Qiskit => "qiskit",
            BackendKind::Cirq => "cirq",
            BackendKind::IonQ => "ionq",
            BackendKind::Braket => "braket",
            BackendKind::QSharp => "qsharp",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = HalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qiskit" | "ibm" => Ok(BackendKind::Qiskit),
            "cirq" | "google" => Ok(BackendKind::Cirq),
            "ionq" => Ok(BackendKind::IonQ),
            "braket" | "amazon" | "aws" => Ok(BackendKind::Braket),
            "qsharp" | "q#" | "microsoft" => Ok(BackendKind::QSharp),
            other => Err(HalError::BackendUnavailable(format!(
                "unknown backend '{other}'"
            ))),
        }
    }
}
