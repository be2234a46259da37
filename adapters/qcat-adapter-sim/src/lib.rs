//! qcat Local Statevector Simulator
//!
//! Stands in for each backend's local simulator. It runs the
//! [`LoweredCircuit`](qcat_hal::LoweredCircuit) a native circuit lowers to,
//! so what gets simulated is exactly what the translator emitted.
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//! | 24 | ~256 MB | Slow |
//!
//! # Example
//!
//! ```rust
//! use qcat_adapter_sim::StatevectorSimulator;
//! use qcat_hal::{LoweredCircuit, Simulator};
//! use qcat_ir::{QubitId, matrices};
//!
//! let mut circuit = LoweredCircuit::new(2);
//! circuit.gate(matrices::x(), vec![QubitId(0)]).unwrap();
//! circuit
//!     .controlled(matrices::x(), vec![QubitId(0)], vec![QubitId(1)])
//!     .unwrap();
//! circuit.measure(QubitId(0));
//! circuit.measure(QubitId(1));
//!
//! let counts = StatevectorSimulator::new().run(&circuit, 50).unwrap();
//! assert_eq!(counts.get("11"), 50);
//! ```

mod simulator;
mod statevector;

pub use simulator::{DEFAULT_MAX_QUBITS, StatevectorSimulator};
pub use statevector::Statevector;
