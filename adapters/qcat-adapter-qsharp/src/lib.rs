//! Q# translator for qcat.
//!
//! Circuits become a Q# program: a `Main` entry point over `Qubit[n]`
//! returning every measurement result, plus `is Adj + Ctl` operation
//! definitions for the gates Q# lacks (SX, ISWAP, DCX, RCCX, RC3X).
//! Parametrized gates without an intrinsic expand inline into exact
//! decompositions, so no custom matrices are involved.
//!
//! Execution is local only: the program lowers to matrices statement by
//! statement, definitions included, and runs on the local simulator.
//!
//! # Example
//!
//! ```rust
//! use qcat_adapter_qsharp::translate;
//! use qcat_ir::{Circuit, GateKind, QubitId};
//!
//! let mut circuit = Circuit::new(2).unwrap();
//! circuit
//!     .append(GateKind::HGate, vec![vec![QubitId(0)]], vec![])
//!     .unwrap()
//!     .append(GateKind::CxGate, vec![vec![QubitId(0)], vec![QubitId(1)]], vec![])
//!     .unwrap();
//!
//! let program = translate(&circuit).unwrap();
//! assert!(program.to_qsharp().contains("CNOT(qs[0], qs[1]);"));
//! ```

mod backend;
mod program;
mod translate;

pub use backend::QSharpBackend;
pub use program::{Definition, NAMESPACE, QSharpProgram, QsCall, QsGate, Statement};
pub use translate::translate;
