//! Shot-based simulator over lowered circuits.

use std::time::Instant;

use qcat_hal::{Counts, HalError, HalResult, LoweredCircuit, LoweredOp, Simulator};
use qcat_ir::QubitId;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, instrument};

use crate::statevector::{Statevector, sample_index};

/// Default qubit limit.
pub const DEFAULT_MAX_QUBITS: u32 = 24;

/// Local statevector simulator.
///
/// The unitary prefix before the first measurement is simulated once. When
/// nothing but measurements follow, every shot samples the final state
/// directly; otherwise each shot replays the remainder with collapsing
/// measurements.
#[derive(Debug, Clone)]
pub struct StatevectorSimulator {
    max_qubits: u32,
    seed: Option<u64>,
}

impl StatevectorSimulator {
    /// Simulator seeded from system entropy.
    pub fn new() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            seed: None,
        }
    }

    /// Simulator that produces the same counts on every run.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            seed: Some(seed),
        }
    }

    /// Change the qubit limit.
    pub fn with_max_qubits(mut self, max_qubits: u32) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for StatevectorSimulator {
    fn default() -> Self {
        Self::new()
    }
}

fn apply(state: &mut Statevector, op: &LoweredOp) {
    if let LoweredOp::Gate {
        matrix,
        targets,
        controls,
    } = op
    {
        state.apply_matrix(matrix, targets, controls);
    }
}

fn bitstring(measured: &[QubitId], outcome: impl Fn(QubitId) -> bool) -> String {
    measured
        .iter()
        .map(|&q| if outcome(q) { '1' } else { '0' })
        .collect()
}

impl Simulator for StatevectorSimulator {
    fn name(&self) -> &str {
        "statevector"
    }

    #[instrument(skip(self, circuit), fields(qubits = circuit.num_qubits()))]
    fn run(&self, circuit: &LoweredCircuit, shots: u32) -> HalResult<Counts> {
        if circuit.num_qubits() > self.max_qubits {
            return Err(HalError::InvalidCircuit(format!(
                "Circuit has {} qubits but the simulator supports at most {}",
                circuit.num_qubits(),
                self.max_qubits
            )));
        }
        let measured = circuit.measured_qubits();
        if measured.is_empty() {
            return Err(HalError::InvalidCircuit(
                "circuit has no measurements, so there are no counts to report".into(),
            ));
        }

        let start = Instant::now();
        let ops = circuit.ops();
        let first_measure = ops
            .iter()
            .position(|op| matches!(op, LoweredOp::Measure { .. }))
            .unwrap_or(ops.len());
        let (prefix, rest) = ops.split_at(first_measure);

        let mut prefix_state = Statevector::new(circuit.num_qubits() as usize);
        for op in prefix {
            apply(&mut prefix_state, op);
        }

        let mut rng = self.rng();
        let mut counts = Counts::new();
        let terminal = rest
            .iter()
            .all(|op| matches!(op, LoweredOp::Measure { .. }));

        if terminal {
            debug!("Sampling final state for {} shots", shots);
            let cumulative = prefix_state.cumulative();
            for _ in 0..shots {
                let index = sample_index(&cumulative, &mut rng);
                counts.insert(bitstring(&measured, |q| index >> q.index() & 1 == 1), 1);
            }
        } else {
            debug!("Replaying mid-circuit measurements for {} shots", shots);
            let width = circuit.num_qubits() as usize;
            for _ in 0..shots {
                let mut state = prefix_state.clone();
                let mut register = vec![false; width];
                for op in rest {
                    match op {
                        LoweredOp::Measure { qubit } => {
                            register[qubit.index()] = state.measure(*qubit, &mut rng);
                        }
                        gate => apply(&mut state, gate),
                    }
                }
                counts.insert(bitstring(&measured, |q| register[q.index()]), 1);
            }
        }

        debug!("Simulation completed in {:?}", start.elapsed());
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcat_ir::matrices;

    fn q(i: u32) -> QubitId {
        QubitId(i)
    }

    fn bell() -> LoweredCircuit {
        let mut c = LoweredCircuit::new(2);
        c.gate(matrices::h(), vec![q(0)]).unwrap();
        c.controlled(matrices::x(), vec![q(0)], vec![q(1)]).unwrap();
        c.measure(q(0));
        c.measure(q(1));
        c
    }

    #[test]
    fn test_bell_state() {
        let counts = StatevectorSimulator::with_seed(3).run(&bell(), 1000).unwrap();
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert_eq!(counts.get("01") + counts.get("10"), 0);
        assert!(counts.get("00") > 0 && counts.get("11") > 0);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let sim = StatevectorSimulator::with_seed(42);
        assert_eq!(sim.run(&bell(), 200).unwrap(), sim.run(&bell(), 200).unwrap());
    }

    #[test]
    fn test_bitstring_order_follows_qubit_index() {
        // Only q0 flipped: leftmost character is q0.
        let mut c = LoweredCircuit::new(3);
        c.gate(matrices::x(), vec![q(0)]).unwrap();
        c.measure(q(2));
        c.measure(q(0));
        c.measure(q(1));
        let counts = StatevectorSimulator::new().run(&c, 10).unwrap();
        assert_eq!(counts.get("100"), 10);
    }

    #[test]
    fn test_partial_measurement() {
        let mut c = LoweredCircuit::new(3);
        c.gate(matrices::x(), vec![q(2)]).unwrap();
        c.measure(q(2));
        let counts = StatevectorSimulator::new().run(&c, 25).unwrap();
        assert_eq!(counts.get("1"), 25);
        assert_eq!(counts.len(), 1);
    }

    #[test]
    fn test_mid_circuit_measurement() {
        let mut c = LoweredCircuit::new(2);
        c.gate(matrices::h(), vec![q(0)]).unwrap();
        c.measure(q(0));
        c.controlled(matrices::x(), vec![q(0)], vec![q(1)]).unwrap();
        c.measure(q(1));
        let counts = StatevectorSimulator::with_seed(9).run(&c, 500).unwrap();
        assert_eq!(counts.get("00") + counts.get("11"), 500);
        assert_eq!(counts.total_shots(), 500);
    }

    #[test]
    fn test_no_measurement_rejected() {
        let mut c = LoweredCircuit::new(1);
        c.gate(matrices::h(), vec![q(0)]).unwrap();
        assert!(matches!(
            StatevectorSimulator::new().run(&c, 10),
            Err(HalError::InvalidCircuit(_))
        ));
    }

    #[test]
    fn test_too_many_qubits() {
        let mut c = LoweredCircuit::new(10);
        c.measure(q(0));
        let sim = StatevectorSimulator::new().with_max_qubits(5);
        assert!(matches!(sim.run(&c, 1), Err(HalError::InvalidCircuit(_))));
    }
}
