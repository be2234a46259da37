//! Qiskit translator and IBM Quantum backend for qcat.
//!
//! Every gate kind in the registry has a Qiskit builder, so translation
//! here is total. Multi-controlled X keeps its decomposition mode and
//! ancilla list.
//!
//! Simulator targets run locally. Device targets are submitted to IBM
//! Quantum as OpenQASM 3 Sampler jobs and need an API token.
//!
//! # Bit order
//!
//! Qiskit prints counts little-endian (classical bit 0 rightmost). Results
//! produced here follow the qcat convention instead: character `k` is the
//! `k`-th measured qubit in ascending order.
//!
//! # Example
//!
//! ```rust
//! use qcat_adapter_qiskit::translate;
//! use qcat_ir::{Circuit, GateKind, QubitId};
//!
//! let mut circuit = Circuit::new(2).unwrap();
//! circuit
//!     .append(GateKind::HGate, vec![vec![QubitId(0)]], vec![])
//!     .unwrap()
//!     .append(GateKind::CxGate, vec![vec![QubitId(0)], vec![QubitId(1)]], vec![])
//!     .unwrap();
//!
//! let qiskit = translate(&circuit).unwrap();
//! assert!(qiskit.to_string().contains("cx q[0],q[1];"));
//! ```

mod api;
mod backend;
mod circuit;
mod error;
mod qasm;
mod translate;

pub use api::{DEFAULT_ENDPOINT, IbmClient, decode_samples};
pub use backend::{QiskitBackend, TOKEN_CREDENTIAL};
pub use circuit::{McxVariant, QiskitCircuit, QiskitGate, QiskitInstruction};
pub use error::{IbmError, IbmResult};
pub use translate::translate;
