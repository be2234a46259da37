//! Cirq translator, Cirq custom gate library and IonQ backend for qcat.
//!
//! Cirq has native gates for the Paulis, Clifford and rotation gates and
//! their common controlled forms. Everything else is built from an explicit
//! unitary in [`custom_gates`] and applied as a `MatrixGate`.
//!
//! Multi-controlled X without ancillas becomes `X.controlled(n)` for any
//! control count. Ancilla-based decompositions have no Cirq counterpart and
//! fail translation.
//!
//! The [`ionq`] module reuses the Cirq translation for IonQ, restricted to
//! IonQ's native gates, and submits jobs to the IonQ API.
//!
//! # Example
//!
//! ```rust
//! use qcat_adapter_cirq::translate;
//! use qcat_ir::{Circuit, GateKind, QubitId};
//!
//! let mut circuit = Circuit::new(2).unwrap();
//! circuit
//!     .append(GateKind::HGate, vec![vec![QubitId(0)]], vec![])
//!     .unwrap()
//!     .append(GateKind::CxGate, vec![vec![QubitId(0)], vec![QubitId(1)]], vec![])
//!     .unwrap();
//!
//! let cirq = translate(&circuit).unwrap();
//! assert!(cirq.to_string().starts_with("0: ───H───@───"));
//! ```

mod backend;
mod circuit;
pub mod custom_gates;
mod diagram;
pub mod ionq;
mod translate;

pub use backend::CirqBackend;
pub use circuit::{CirqCircuit, CirqGate, CirqOperation, Moment};
pub use translate::translate;
