//! Braket translator, Braket custom gate library and AWS Braket backend for
//! qcat.
//!
//! Circuits become OpenQASM 3 programs using Braket's gate names. Controlled
//! forms without a dedicated Braket gate use `ctrl @` modifiers, which also
//! cover multi-controlled X and phase over any number of controls. Gates
//! Braket cannot name are emitted as `#pragma braket unitary` with a matrix
//! from [`custom_gates`].
//!
//! Simulator targets run locally. Device targets (names such as `sv1` or
//! full ARNs) are submitted to AWS Braket and need an S3 bucket for results;
//! AWS credentials come from the default provider chain.
//!
//! # Example
//!
//! ```rust
//! use qcat_adapter_braket::translate;
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
//! assert!(program.to_qasm().contains("cnot q[0], q[1];"));
//! ```

mod api;
mod backend;
pub mod custom_gates;
pub mod device;
mod error;
mod program;
mod translate;

pub use api::{BraketClient, TaskResult, decode_result, result_key, task_id_from_arn};
pub use backend::BraketBackend;
pub use error::{BraketError, BraketResult};
pub use program::{BraketGate, BraketInstruction, BraketProgram};
pub use translate::translate;
