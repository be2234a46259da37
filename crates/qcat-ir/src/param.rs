//! Operation parameters.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::gate::ParamKind;

/// Decomposition mode for multi-controlled X.
///
/// Names follow the modes accepted by the Qiskit `mcx` builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum McxMode {
    /// No ancillas.
    #[default]
    #[serde(rename = "noancilla")]
    NoAncilla,
    /// Recursive decomposition, one ancilla.
    #[serde(rename = "recursion")]
    Recursion,
    /// V-chain with clean ancillas.
    #[serde(rename = "v-chain")]
    VChain,
    /// V-chain with dirty ancillas.
    #[serde(rename = "v-chain-dirty")]
    VChainDirty,
}

impl McxMode {
    /// Mode name as the Qiskit builder spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            McxMode::NoAncilla => "noancilla",
            McxMode::Recursion => "recursion",
            McxMode::VChain => "v-chain",
            McxMode::VChainDirty => "v-chain-dirty",
        }
    }

    /// Whether this mode consumes ancilla qubits.
    pub fn uses_ancillas(self) -> bool {
        !matches!(self, McxMode::NoAncilla)
    }
}

impl fmt::Display for McxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One positional parameter of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Param {
    /// Angle in radians.
    Angle(f64),
    /// Control count.
    Count(usize),
    /// Boolean flag (e.g. dirty ancillas).
    Flag(bool),
    /// Multi-controlled X mode.
    Mode(McxMode),
}

impl Param {
    /// The kind this value satisfies.
    pub fn kind(&self) -> ParamKind {
        match self {
            Param::Angle(_) => ParamKind::Angle,
            Param::Count(_) => ParamKind::Count,
            Param::Flag(_) => ParamKind::Flag,
            Param::Mode(_) => ParamKind::Mode,
        }
    }

    /// The angle, if this is an angle.
    pub fn as_angle(&self) -> Option<f64> {
        match self {
            Param::Angle(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Angle(v) => write!(f, "{v}"),
            Param::Count(n) => write!(f, "{n}"),
            Param::Flag(b) => write!(f, "{b}"),
            Param::Mode(m) => write!(f, "{m}"),
        }
    }
}
