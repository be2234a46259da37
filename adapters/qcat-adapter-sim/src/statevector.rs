//! Statevector simulation engine.
//!
//! Amplitude index bit `i` holds qubit `i` (little-endian). Gate matrices
//! arrive big-endian over their target list and are mapped onto the index
//! bits in [`Statevector::apply_matrix`].

use num_complex::Complex64;
use qcat_ir::{QubitId, UnitaryMatrix};
use rand::Rng;

/// A pure state over `num_qubits` qubits.
#[derive(Debug, Clone)]
pub struct Statevector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// `|0...0⟩`.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Raw amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Apply `matrix` to `targets` on the subspace where all `controls` are 1.
    pub fn apply_matrix(&mut self, matrix: &UnitaryMatrix, targets: &[QubitId], controls: &[QubitId]) {
        let k = targets.len();
        let block = 1usize << k;
        debug_assert_eq!(matrix.dim(), block);

        // Local bit (k - 1 - j) of the block index is targets[j].
        let target_masks: Vec<usize> = targets.iter().map(|q| 1usize << q.index()).collect();
        let target_mask: usize = target_masks.iter().sum();
        let control_mask: usize = controls.iter().map(|q| 1usize << q.index()).sum();

        let offsets: Vec<usize> = (0..block)
            .map(|local| {
                target_masks
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| local >> (k - 1 - j) & 1 == 1)
                    .map(|(_, m)| m)
                    .sum::<usize>()
            })
            .collect();

        let mut gathered = vec![Complex64::new(0.0, 0.0); block];
        for base in 0..self.amplitudes.len() {
            if base & target_mask != 0 || base & control_mask != control_mask {
                continue;
            }
            for (slot, offset) in gathered.iter_mut().zip(&offsets) {
                *slot = self.amplitudes[base | offset];
            }
            for (row, offset) in offsets.iter().enumerate() {
                let mut acc = Complex64::new(0.0, 0.0);
                for (col, amp) in gathered.iter().enumerate() {
                    acc += matrix.get(row, col) * amp;
                }
                self.amplitudes[base | offset] = acc;
            }
        }
    }

    /// Probability that measuring `qubit` yields 1.
    pub fn probability_one(&self, qubit: QubitId) -> f64 {
        let mask = 1usize << qubit.index();
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// Measure `qubit`, collapsing the state.
    pub fn measure<R: Rng>(&mut self, qubit: QubitId, rng: &mut R) -> bool {
        let p1 = self.probability_one(qubit);
        let outcome = rng.r#gen::<f64>() < p1;
        let norm = (if outcome { p1 } else { 1.0 - p1 }).sqrt();
        let mask = 1usize << qubit.index();
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if (i & mask != 0) == outcome {
                if norm > 0.0 {
                    *amp /= norm;
                }
            } else {
                *amp = Complex64::new(0.0, 0.0);
            }
        }
        outcome
    }

    /// Cumulative distribution over basis states.
    pub fn cumulative(&self) -> Vec<f64> {
        let mut acc = 0.0;
        self.amplitudes
            .iter()
            .map(|a| {
                acc += a.norm_sqr();
                acc
            })
            .collect()
    }
}

/// Draw one basis index from a cumulative distribution.
pub fn sample_index<R: Rng>(cumulative: &[f64], rng: &mut R) -> usize {
    let total = cumulative.last().copied().unwrap_or(0.0);
    let r = rng.r#gen::<f64>() * total;
    cumulative
        .partition_point(|&c| c <= r)
        .min(cumulative.len().saturating_sub(1))
}
