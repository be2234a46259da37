//! Reference matrices for every unitary gate kind.
//!
//! All matrices are big-endian over the operation's qubit list in
//! declaration order: for `cx(c, t)` the control is the high bit. Backends
//! with a different tensor convention must permute before use.

use num_complex::Complex64;
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};

use crate::unitary::UnitaryMatrix;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

fn m2(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> UnitaryMatrix {
    UnitaryMatrix::from_raw(2, vec![a, b, c, d])
}

fn real(v: f64) -> Complex64 {
    Complex64::new(v, 0.0)
}

fn phase(angle: f64) -> Complex64 {
    Complex64::from_polar(1.0, angle)
}

/// Permutation matrix sending basis column `j` to row `image[j]`.
fn permutation(image: &[usize]) -> UnitaryMatrix {
    let n = image.len();
    let mut data = vec![ZERO; n * n];
    for (col, &row) in image.iter().enumerate() {
        data[row * n + col] = ONE;
    }
    UnitaryMatrix::from_raw(n, data)
}

/// `cos(θ/2) I - i sin(θ/2) (a ⊗ b)`.
fn pauli_interaction(a: &UnitaryMatrix, b: &UnitaryMatrix, theta: f64) -> UnitaryMatrix {
    let (s, c) = (theta / 2.0).sin_cos();
    UnitaryMatrix::identity(2)
        .scaled(real(c))
        .add(&a.kron(b).scaled(Complex64::new(0.0, -s)))
}

// =============================================================================
// Single-qubit
// =============================================================================

/// Identity.
pub fn id() -> UnitaryMatrix {
    UnitaryMatrix::identity(1)
}

/// Pauli-X.
pub fn x() -> UnitaryMatrix {
    m2(ZERO, ONE, ONE, ZERO)
}

/// Pauli-Y.
pub fn y() -> UnitaryMatrix {
    m2(ZERO, -I, I, ZERO)
}

/// Pauli-Z.
pub fn z() -> UnitaryMatrix {
    m2(ONE, ZERO, ZERO, -ONE)
}

/// Hadamard.
pub fn h() -> UnitaryMatrix {
    let v = real(FRAC_1_SQRT_2);
    m2(v, v, v, -v)
}

/// S.
pub fn s() -> UnitaryMatrix {
    p(FRAC_PI_2)
}

/// S-dagger.
pub fn sdg() -> UnitaryMatrix {
    p(-FRAC_PI_2)
}

/// T.
pub fn t() -> UnitaryMatrix {
    p(FRAC_PI_4)
}

/// T-dagger.
pub fn tdg() -> UnitaryMatrix {
    p(-FRAC_PI_4)
}

/// sqrt(X).
pub fn sx() -> UnitaryMatrix {
    let a = Complex64::new(0.5, 0.5);
    let b = Complex64::new(0.5, -0.5);
    m2(a, b, b, a)
}

/// sqrt(X)-dagger.
pub fn sxdg() -> UnitaryMatrix {
    sx().adjoint()
}

/// Rx(θ) = exp(-iθX/2).
pub fn rx(theta: f64) -> UnitaryMatrix {
    let (s, c) = (theta / 2.0).sin_cos();
    m2(real(c), Complex64::new(0.0, -s), Complex64::new(0.0, -s), real(c))
}

/// Ry(θ) = exp(-iθY/2).
pub fn ry(theta: f64) -> UnitaryMatrix {
    let (s, c) = (theta / 2.0).sin_cos();
    m2(real(c), real(-s), real(s), real(c))
}

/// Rz(θ) = exp(-iθZ/2).
pub fn rz(theta: f64) -> UnitaryMatrix {
    UnitaryMatrix::diagonal(&[phase(-theta / 2.0), phase(theta / 2.0)])
}

/// Phase P(λ) = diag(1, e^{iλ}).
pub fn p(lambda: f64) -> UnitaryMatrix {
    UnitaryMatrix::diagonal(&[ONE, phase(lambda)])
}

/// U(θ, φ, λ).
pub fn u(theta: f64, phi: f64, lambda: f64) -> UnitaryMatrix {
    let (s, c) = (theta / 2.0).sin_cos();
    m2(
        real(c),
        -phase(lambda) * s,
        phase(phi) * s,
        phase(phi + lambda) * c,
    )
}

/// U2(φ, λ) = U(π/2, φ, λ).
pub fn u2(phi: f64, lambda: f64) -> UnitaryMatrix {
    u(FRAC_PI_2, phi, lambda)
}

/// R(θ, φ) = exp(-iθ(cos φ X + sin φ Y)/2).
pub fn r(theta: f64, phi: f64) -> UnitaryMatrix {
    u(theta, phi - FRAC_PI_2, FRAC_PI_2 - phi)
}

// =============================================================================
// Multi-qubit
// =============================================================================

/// Block-diagonal controlled version of `base` with `num_controls` leading controls.
pub fn controlled(base: &UnitaryMatrix, num_controls: usize) -> UnitaryMatrix {
    let b = base.dim();
    let n = b << num_controls;
    let offset = n - b;
    let mut data = vec![ZERO; n * n];
    for i in 0..offset {
        data[i * n + i] = ONE;
    }
    for i in 0..b {
        for j in 0..b {
            data[(offset + i) * n + (offset + j)] = base.get(i, j);
        }
    }
    UnitaryMatrix::from_raw(n, data)
}

/// SWAP.
pub fn swap() -> UnitaryMatrix {
    permutation(&[0, 2, 1, 3])
}

/// iSWAP.
pub fn iswap() -> UnitaryMatrix {
    UnitaryMatrix::from_raw(
        4,
        vec![
            ONE, ZERO, ZERO, ZERO, //
            ZERO, ZERO, I, ZERO, //
            ZERO, I, ZERO, ZERO, //
            ZERO, ZERO, ZERO, ONE,
        ],
    )
}

/// DCX: CX(a, b) followed by CX(b, a); maps |a b⟩ to |b, a⊕b⟩.
pub fn dcx() -> UnitaryMatrix {
    permutation(&[0, 3, 1, 2])
}

/// RXX(θ).
pub fn rxx(theta: f64) -> UnitaryMatrix {
    pauli_interaction(&x(), &x(), theta)
}

/// RYY(θ).
pub fn ryy(theta: f64) -> UnitaryMatrix {
    pauli_interaction(&y(), &y(), theta)
}

/// RZZ(θ).
pub fn rzz(theta: f64) -> UnitaryMatrix {
    pauli_interaction(&z(), &z(), theta)
}

/// RZX(θ) with Z on the first qubit and X on the second.
pub fn rzx(theta: f64) -> UnitaryMatrix {
    pauli_interaction(&z(), &x(), theta)
}

/// CU(θ, φ, λ, γ): controlled `e^{iγ} U(θ, φ, λ)`.
pub fn cu(theta: f64, phi: f64, lambda: f64, gamma: f64) -> UnitaryMatrix {
    controlled(&u(theta, phi, lambda).scaled(phase(gamma)), 1)
}

/// Relative-phase Toffoli over `(c1, c2, t)`.
pub fn rccx() -> UnitaryMatrix {
    let mut data = UnitaryMatrix::identity(3).data().to_vec();
    let n = 8;
    data[5 * n + 5] = -ONE;
    data[6 * n + 6] = ZERO;
    data[7 * n + 7] = ZERO;
    data[6 * n + 7] = -I;
    data[7 * n + 6] = I;
    UnitaryMatrix::from_raw(n, data)
}

/// Relative-phase three-controlled Toffoli over `(c1, c2, c3, t)`.
pub fn rc3x() -> UnitaryMatrix {
    let mut data = UnitaryMatrix::identity(4).data().to_vec();
    let n = 16;
    data[12 * n + 12] = I;
    data[13 * n + 13] = -I;
    data[14 * n + 14] = ZERO;
    data[15 * n + 15] = ZERO;
    data[14 * n + 15] = ONE;
    data[15 * n + 14] = -ONE;
    UnitaryMatrix::from_raw(n, data)
}
