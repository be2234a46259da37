//! Dense unitary matrices.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};

/// Default element-wise tolerance for unitarity checks.
pub const UNITARY_TOLERANCE: f64 = 1e-9;

/// Square complex matrix of dimension `2^k`, stored row-major.
///
/// Basis ordering is big-endian over the qubit list the matrix is applied
/// to: the first listed qubit is the most significant bit of the row and
/// column index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitaryMatrix {
    dim: usize,
    data: Vec<Complex64>,
}

impl UnitaryMatrix {
    /// Build from rows, checking shape only.
    pub fn from_rows(name: &str, rows: Vec<Vec<Complex64>>) -> IrResult<Self> {
        let dim = rows.len();
        if rows.iter().any(|row| row.len() != dim) {
            return Err(IrError::InvalidDimension {
                name: name.to_string(),
                reason: "matrix is not square".to_string(),
            });
        }
        Self::new(name, dim, rows.into_iter().flatten().collect())
    }

    /// Build from row-major data, checking shape only.
    pub fn new(name: &str, dim: usize, data: Vec<Complex64>) -> IrResult<Self> {
        if dim == 0 || !dim.is_power_of_two() {
            return Err(IrError::InvalidDimension {
                name: name.to_string(),
                reason: format!("dimension {dim} is not a positive power of two"),
            });
        }
        if data.len() != dim * dim {
            return Err(IrError::InvalidDimension {
                name: name.to_string(),
                reason: format!("expected {} entries, got {}", dim * dim, data.len()),
            });
        }
        Ok(Self { dim, data })
    }

    pub(crate) fn from_raw(dim: usize, data: Vec<Complex64>) -> Self {
        debug_assert_eq!(data.len(), dim * dim);
        Self { dim, data }
    }

    /// Identity on `num_qubits` qubits.
    pub fn identity(num_qubits: usize) -> Self {
        let dim = 1 << num_qubits;
        let mut data = vec![Complex64::new(0.0, 0.0); dim * dim];
        for i in 0..dim {
            data[i * dim + i] = Complex64::new(1.0, 0.0);
        }
        Self { dim, data }
    }

    /// Diagonal matrix; `entries.len()` must be a power of two.
    pub fn diagonal(entries: &[Complex64]) -> Self {
        let dim = entries.len();
        let mut data = vec![Complex64::new(0.0, 0.0); dim * dim];
        for (i, e) in entries.iter().enumerate() {
            data[i * dim + i] = *e;
        }
        Self::from_raw(dim, data)
    }

    /// Matrix dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of qubits the matrix acts on.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.dim.trailing_zeros() as usize
    }

    /// Entry at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.dim + col]
    }

    /// Row-major entries.
    #[inline]
    pub fn data(&self) -> &[Complex64] {
        &self.data
    }

    /// Rows as nested vectors.
    pub fn rows(&self) -> Vec<Vec<Complex64>> {
        self.data.chunks(self.dim).map(<[Complex64]>::to_vec).collect()
    }

    /// Matrix product `self · other`.
    pub fn mul(&self, other: &UnitaryMatrix) -> UnitaryMatrix {
        debug_assert_eq!(self.dim, other.dim);
        let n = self.dim;
        let mut data = vec![Complex64::new(0.0, 0.0); n * n];
        for i in 0..n {
            for k in 0..n {
                let a = self.data[i * n + k];
                if a == Complex64::new(0.0, 0.0) {
                    continue;
                }
                for j in 0..n {
                    data[i * n + j] += a * other.data[k * n + j];
                }
            }
        }
        Self::from_raw(n, data)
    }

    /// Conjugate transpose.
    pub fn adjoint(&self) -> UnitaryMatrix {
        let n = self.dim;
        let mut data = vec![Complex64::new(0.0, 0.0); n * n];
        for i in 0..n {
            for j in 0..n {
                data[j * n + i] = self.data[i * n + j].conj();
            }
        }
        Self::from_raw(n, data)
    }

    /// Kronecker product; `self` occupies the more significant qubits.
    pub fn kron(&self, other: &UnitaryMatrix) -> UnitaryMatrix {
        let (a, b) = (self.dim, other.dim);
        let n = a * b;
        let mut data = vec![Complex64::new(0.0, 0.0); n * n];
        for i in 0..a {
            for j in 0..a {
                let s = self.data[i * a + j];
                for k in 0..b {
                    for l in 0..b {
                        data[(i * b + k) * n + (j * b + l)] = s * other.data[k * b + l];
                    }
                }
            }
        }
        Self::from_raw(n, data)
    }

    /// Multiply every entry by `factor`.
    pub fn scaled(&self, factor: Complex64) -> UnitaryMatrix {
        Self::from_raw(self.dim, self.data.iter().map(|v| v * factor).collect())
    }

    /// Element-wise sum.
    pub fn add(&self, other: &UnitaryMatrix) -> UnitaryMatrix {
        debug_assert_eq!(self.dim, other.dim);
        Self::from_raw(
            self.dim,
            self.data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| a + b)
                .collect(),
        )
    }

    /// Largest element-wise deviation of `U†U` from the identity.
    pub fn unitarity_deviation(&self) -> f64 {
        let product = self.adjoint().mul(self);
        let n = self.dim;
        let mut worst = 0.0_f64;
        for i in 0..n {
            for j in 0..n {
                let expected = if i == j { 1.0 } else { 0.0 };
                let d = (product.data[i * n + j] - Complex64::new(expected, 0.0)).norm();
                worst = worst.max(d);
            }
        }
        worst
    }

    /// Whether `U†U = I` within `tolerance`.
    pub fn is_unitary(&self, tolerance: f64) -> bool {
        self.unitarity_deviation() <= tolerance
    }

    /// Fail with [`IrError::NonUnitary`] unless unitary within tolerance.
    pub fn ensure_unitary(&self, name: &str) -> IrResult<()> {
        let deviation = self.unitarity_deviation();
        if deviation > UNITARY_TOLERANCE {
            return Err(IrError::NonUnitary {
                name: name.to_string(),
                deviation,
            });
        }
        Ok(())
    }

    /// Element-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &UnitaryMatrix, tolerance: f64) -> bool {
        self.dim == other.dim
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a - b).norm() <= tolerance)
    }

    /// Apply to a column vector.
    pub fn apply(&self, vector: &[Complex64]) -> Vec<Complex64> {
        let n = self.dim;
        (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| self.data[i * n + j] * vector[j])
                    .sum::<Complex64>()
            })
            .collect()
    }
}

impl fmt::Display for UnitaryMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.data.chunks(self.dim) {
            let cells: Vec<String> = row
                .iter()
                .map(|c| format!("{:+.3}{:+.3}i", c.re, c.im))
                .collect();
            writeln!(f, "[{}]", cells.join(", "))?;
        }
        Ok(())
    }
}
