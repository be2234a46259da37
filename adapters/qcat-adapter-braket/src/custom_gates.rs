//! Braket custom gate library.
//!
//! Gates with no Braket OpenQASM equivalent are emitted as
//! `#pragma braket unitary(...)`. Braket reads that matrix big-endian over
//! the listed qubits (first qubit most significant), the same order as
//! [`qcat_ir::matrices`], so entries are used unchanged.

use qcat_hal::{CustomGate, HalResult};
use qcat_ir::{GateKind, matrices};

/// The library entry for `kind`, or `None` when Braket has a native gate
/// or modifier form.
pub fn lookup(kind: GateKind, angles: &[f64]) -> HalResult<Option<CustomGate>> {
    let a = |i: usize| angles.get(i).copied().unwrap_or(0.0);
    let (name, arity, matrix) = match kind {
        GateKind::U2Gate => ("u2", 1, matrices::u2(a(0), a(1))),
        GateKind::RGate => ("r", 1, matrices::r(a(0), a(1))),
        GateKind::UGate => ("u", 1, matrices::u(a(0), a(1), a(2))),
        GateKind::U3Gate => ("u3", 1, matrices::u(a(0), a(1), a(2))),
        GateKind::DcxGate => ("dcx", 2, matrices::dcx()),
        GateKind::RzxGate => ("rzx", 2, matrices::rzx(a(0))),
        GateKind::Cu3Gate => (
            "cu3",
            2,
            matrices::controlled(&matrices::u(a(0), a(1), a(2)), 1),
        ),
        GateKind::CuGate => ("cu", 2, matrices::cu(a(0), a(1), a(2), a(3))),
        GateKind::RccxGate => ("rccx", 3, matrices::rccx()),
        GateKind::Rc3xGate => ("rc3x", 4, matrices::rc3x()),
        _ => return Ok(None),
    };
    Ok(Some(CustomGate::with_indexed_labels(name, arity, matrix)?))
}
