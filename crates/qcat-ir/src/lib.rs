//! qcat Circuit Intermediate Representation
//!
//! This crate records quantum circuits independently of any backend. It is
//! the leaf of the qcat stack: translators in the adapter crates consume
//! what is built here and nothing in this crate knows about them.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`], a zero-based index scoped to one circuit
//! - **Gate Kind Registry**: [`GateKind`] and its [`GateSpec`] arity and
//!   parameter contract
//! - **Parameters**: [`Param`] values, including [`McxMode`] for
//!   multi-controlled X decompositions
//! - **Operations**: [`Operation`], the `{kind, qubit_groups, params}` record
//! - **Circuit**: [`Circuit`], the validated append-only operation log
//! - **Matrices**: [`UnitaryMatrix`] and the reference gate matrices in
//!   [`matrices`]
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qcat_ir::{Circuit, GateKind, QubitId};
//!
//! let mut circuit = Circuit::new(2).unwrap();
//! circuit
//!     .append(GateKind::HGate, vec![vec![QubitId(0)]], vec![])
//!     .unwrap()
//!     .append(GateKind::CxGate, vec![vec![QubitId(0)], vec![QubitId(1)]], vec![])
//!     .unwrap()
//!     .append(GateKind::MeasureAll, vec![], vec![])
//!     .unwrap();
//!
//! assert_eq!(circuit.len(), 3);
//! assert_eq!(circuit.measured_qubits().len(), 2);
//! ```
//!
//! # Qubit ordering
//!
//! Every [`UnitaryMatrix`] is big-endian over the qubit list it is applied
//! to. Bitstrings produced from measurements list the measured qubits in
//! ascending index order, leftmost character first.

pub mod circuit;
pub mod error;
pub mod gate;
pub mod matrices;
pub mod operation;
pub mod param;
pub mod qubit;
pub mod unitary;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{GateKind, GateSpec, ParamKind, QubitLayout};
pub use operation::Operation;
pub use param::{McxMode, Param};
pub use qubit::QubitId;
pub use unitary::{UNITARY_TOLERANCE, UnitaryMatrix};
