//! The tagged operation record.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::gate::{GateKind, QubitLayout};
use crate::param::{McxMode, Param};
use crate::qubit::QubitId;

/// One recorded gate or measurement.
///
/// `qubit_groups` keeps semantic roles apart: fixed-arity kinds hold one
/// qubit per group in declaration order (controls first, then targets),
/// multi-controlled kinds hold `[controls, [target], ancillas]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    kind: GateKind,
    qubit_groups: Vec<Vec<QubitId>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    params: Vec<Param>,
}

impl Operation {
    /// Create an operation without validating it.
    ///
    /// Operations only enter a circuit through
    /// [`Circuit::append`](crate::Circuit::append), which validates.
    pub fn new(kind: GateKind, qubit_groups: Vec<Vec<QubitId>>, params: Vec<Param>) -> Self {
        Self {
            kind,
            qubit_groups,
            params,
        }
    }

    /// The operation kind.
    #[inline]
    pub fn kind(&self) -> GateKind {
        self.kind
    }

    /// Qubit groups in declared order.
    #[inline]
    pub fn qubit_groups(&self) -> &[Vec<QubitId>] {
        &self.qubit_groups
    }

    /// Positional parameters.
    #[inline]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// All qubits, flattened in group order.
    pub fn qubits(&self) -> Vec<QubitId> {
        self.qubit_groups.iter().flatten().copied().collect()
    }

    /// All qubits as `usize` indices, flattened in group order.
    pub fn indices(&self) -> Vec<usize> {
        self.qubit_groups
            .iter()
            .flatten()
            .map(|q| q.index())
            .collect()
    }

    /// Angle parameters in order.
    pub fn angles(&self) -> Vec<f64> {
        self.params.iter().filter_map(Param::as_angle).collect()
    }

    /// Control group of a multi-controlled kind.
    pub fn controls(&self) -> &[QubitId] {
        self.qubit_groups.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Target of a multi-controlled kind.
    pub fn target(&self) -> Option<QubitId> {
        self.qubit_groups.get(1).and_then(|g| g.first()).copied()
    }

    /// Ancilla group of a multi-controlled kind (empty when absent).
    pub fn ancillas(&self) -> &[QubitId] {
        self.qubit_groups.get(2).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Decomposition mode, `noancilla` when the kind carries none.
    pub fn mode(&self) -> McxMode {
        self.params
            .iter()
            .find_map(|p| match p {
                Param::Mode(m) => Some(*m),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Boolean flag parameter (v-chain dirty ancillas).
    pub fn flag(&self) -> bool {
        self.params
            .iter()
            .any(|p| matches!(p, Param::Flag(true)))
    }

    /// Check this operation against a circuit of `qubit_count` qubits.
    pub fn validate(&self, qubit_count: u32) -> IrResult<()> {
        let kind = self.kind;

        let mut seen: Vec<QubitId> = Vec::with_capacity(self.qubit_groups.len());
        for &qubit in self.qubit_groups.iter().flatten() {
            if qubit.0 >= qubit_count {
                return Err(IrError::QubitOutOfBounds {
                    qubit,
                    qubit_count,
                    kind,
                });
            }
            if seen.contains(&qubit) {
                return Err(IrError::DuplicateQubit { qubit, kind });
            }
            seen.push(qubit);
        }

        let spec = kind.spec();
        match spec.qubits {
            QubitLayout::Fixed(n) => {
                if self.qubit_groups.len() != n || self.qubit_groups.iter().any(|g| g.len() != 1) {
                    return Err(IrError::QubitCountMismatch {
                        kind,
                        expected: format!("{n} single-qubit group(s)"),
                        got: describe_groups(&self.qubit_groups),
                    });
                }
            }
            QubitLayout::MultiControlled { ancillas } => {
                let max_groups = if ancillas { 3 } else { 2 };
                let groups = &self.qubit_groups;
                if groups.len() < 2
                    || groups.len() > max_groups
                    || groups[0].is_empty()
                    || groups[1].len() != 1
                {
                    let expected = if ancillas {
                        "[controls (>= 1)], [target], optional [ancillas]"
                    } else {
                        "[controls (>= 1)], [target]"
                    };
                    return Err(IrError::QubitCountMismatch {
                        kind,
                        expected: expected.to_string(),
                        got: describe_groups(groups),
                    });
                }
            }
        }

        if self.params.len() != spec.params.len() {
            return Err(IrError::ParameterMismatch {
                kind,
                reason: format!(
                    "expected {} parameter(s), got {}",
                    spec.params.len(),
                    self.params.len()
                ),
            });
        }

        for (i, (param, expected)) in self.params.iter().zip(spec.params).enumerate() {
            if param.kind() != *expected {
                return Err(IrError::ParameterMismatch {
                    kind,
                    reason: format!("parameter {i} must be {expected:?}, got {param:?}"),
                });
            }
            match param {
                Param::Angle(v) if !v.is_finite() => {
                    return Err(IrError::ParameterMismatch {
                        kind,
                        reason: format!("parameter {i} is not finite"),
                    });
                }
                Param::Count(n) => {
                    let controls = self.controls().len();
                    if *n != controls {
                        return Err(IrError::ParameterMismatch {
                            kind,
                            reason: format!(
                                "control count {n} does not match {controls} control qubit(s)"
                            ),
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }
}

fn describe_groups(groups: &[Vec<QubitId>]) -> String {
    let sizes: Vec<String> = groups.iter().map(|g| g.len().to_string()).collect();
    format!("{} group(s) of sizes [{}]", groups.len(), sizes.join(", "))
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.params.is_empty() {
            let params: Vec<String> = self.params.iter().map(ToString::to_string).collect();
            write!(f, "({})", params.join(", "))?;
        }
        for group in &self.qubit_groups {
            let qubits: Vec<String> = group.iter().map(ToString::to_string).collect();
            write!(f, " [{}]", qubits.join(", "))?;
        }
        Ok(())
    }
}
