//! IonQ circuits: a Cirq circuit restricted to IonQ's native gates.

use std::any::Any;
use std::fmt;

use qcat_hal::{BackendKind, HalError, HalResult, LoweredCircuit, NativeCircuit};
use qcat_ir::{Circuit, GateKind, QubitId};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::circuit::{CirqCircuit, CirqGate, CirqOperation};

/// Input format accepted by the IonQ jobs API.
pub const IONQ_FORMAT: &str = "ionq.circuit.v0";

/// A Cirq circuit that IonQ can run.
#[derive(Debug, Clone, PartialEq)]
pub struct IonqCircuit {
    inner: CirqCircuit,
}

impl IonqCircuit {
    /// The underlying Cirq circuit.
    pub fn cirq(&self) -> &CirqCircuit {
        &self.inner
    }

    /// Measured qubits; IonQ measures every qubit when none is named.
    pub fn measured_qubits(&self) -> Vec<QubitId> {
        let measured = self.inner.measured_qubits();
        if measured.is_empty() {
            (0..self.inner.num_qubits()).map(QubitId).collect()
        } else {
            measured
        }
    }

    /// The `input` document of a job submission.
    pub fn to_json(&self) -> HalResult<Value> {
        let circuit = self
            .inner
            .all_operations()
            .filter_map(|op| ionq_gate(op).transpose())
            .collect::<HalResult<Vec<_>>>()?;
        Ok(serde_json::to_value(IonqInput {
            format: IONQ_FORMAT,
            qubits: self.inner.num_qubits(),
            circuit,
        })?)
    }
}

impl fmt::Display for IonqCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl NativeCircuit for IonqCircuit {
    fn num_qubits(&self) -> u32 {
        self.inner.num_qubits()
    }

    fn lower(&self) -> HalResult<LoweredCircuit> {
        self.inner.lower()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Translate for IonQ.
///
/// Only kinds that land on IonQ-native Cirq gates are accepted. Library
/// matrix gates cannot be serialized into IonQ's format.
#[instrument(skip_all, fields(qubits = circuit.num_qubits(), ops = circuit.len()))]
pub fn translate(circuit: &Circuit) -> HalResult<IonqCircuit> {
    if let Some(op) = circuit.operations().iter().find(|op| !is_native(op.kind())) {
        return Err(HalError::unsupported(
            op.kind(),
            BackendKind::IonQ,
            "not in the IonQ native gate set",
        ));
    }

    let inner = crate::translate::translate(circuit).map_err(|e| match e {
        HalError::UnsupportedTranslation { kind, reason, .. } => HalError::UnsupportedTranslation {
            kind,
            backend: BackendKind::IonQ,
            reason,
        },
        other => other,
    })?;
    Ok(IonqCircuit { inner })
}

fn is_native(kind: GateKind) -> bool {
    use GateKind::*;
    matches!(
        kind,
        IGate
            | XGate
            | YGate
            | ZGate
            | HGate
            | SGate
            | TGate
            | RxGate
            | RyGate
            | RzGate
            | CxGate
            | CzGate
            | SwapGate
            | CcxGate
            | C3xGate
            | C4xGate
            | McxGate
            | MctGate
            | McxgcGate
            | McxrecGate
            | McxvchainGate
            | Measure
            | MeasureAll
    )
}

#[derive(Debug, Serialize)]
struct IonqInput {
    format: &'static str,
    qubits: u32,
    circuit: Vec<IonqGate>,
}

#[derive(Debug, Default, Serialize)]
struct IonqGate {
    gate: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    targets: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    control: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    controls: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rotation: Option<f64>,
}

fn ionq_gate(op: &CirqOperation) -> HalResult<Option<IonqGate>> {
    let q: Vec<u32> = op.qubits.iter().map(|q| q.0).collect();
    let single = |gate: &'static str| IonqGate {
        gate,
        target: q.first().copied(),
        ..IonqGate::default()
    };
    let rotation = |gate: &'static str, angle: f64| IonqGate {
        rotation: Some(angle),
        ..single(gate)
    };
    let controlled = |gate: &'static str, n: usize| {
        let (controls, target) = q.split_at(n.min(q.len()));
        IonqGate {
            gate,
            target: target.first().copied(),
            controls: Some(controls.to_vec()),
            ..IonqGate::default()
        }
    };

    let gate = match &op.gate {
        CirqGate::I | CirqGate::Measure { .. } => return Ok(None),
        CirqGate::X => single("x"),
        CirqGate::Y => single("y"),
        CirqGate::Z => single("z"),
        CirqGate::H => single("h"),
        CirqGate::S => single("s"),
        CirqGate::T => single("t"),
        CirqGate::Rx(a) => rotation("rx", *a),
        CirqGate::Ry(a) => rotation("ry", *a),
        CirqGate::Rz(a) => rotation("rz", *a),
        CirqGate::CNOT => IonqGate {
            gate: "cnot",
            control: q.first().copied(),
            target: q.get(1).copied(),
            ..IonqGate::default()
        },
        CirqGate::CZ => controlled("z", 1),
        CirqGate::CCX => controlled("x", 2),
        CirqGate::ControlledX { num_controls } => controlled("x", *num_controls),
        CirqGate::SWAP => IonqGate {
            gate: "swap",
            targets: Some(q.clone()),
            ..IonqGate::default()
        },
        other => {
            return Err(HalError::InvalidCircuit(format!(
                "{other:?} has no IonQ serialization"
            )));
        }
    };
    Ok(Some(gate))
}
