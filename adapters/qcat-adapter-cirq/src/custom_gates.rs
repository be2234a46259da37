//! Cirq custom gate library.
//!
//! Cirq orders a `MatrixGate`'s basis big-endian over the qubits it is
//! applied to: the first qubit is the most significant bit. The matrices in
//! [`qcat_ir::matrices`] use the same convention and are taken as-is; no
//! permutation is applied.

use std::f64::consts::PI;

use qcat_hal::{CustomGate, HalResult};
use qcat_ir::{GateKind, UnitaryMatrix, matrices};

/// Render an angle as a multiple of π, the way Cirq diagrams do.
pub fn format_angle(radians: f64) -> String {
    let turns = radians / PI;
    let rounded = (turns * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}π")
}

fn entry(name: &str, matrix: UnitaryMatrix, labels: &[&str]) -> HalResult<CustomGate> {
    CustomGate::new(
        name,
        labels.len(),
        matrix,
        labels.iter().map(|l| l.to_string()).collect(),
    )
}

fn controlled(name: &str, base: UnitaryMatrix, label: String) -> HalResult<CustomGate> {
    CustomGate::new(
        name,
        2,
        matrices::controlled(&base, 1),
        vec!["@".to_string(), label],
    )
}

/// The library entry for `kind`, or `None` when Cirq has a native gate or
/// no matrix form applies.
///
/// `angles` are the operation's angle parameters in declared order.
pub fn lookup(kind: GateKind, angles: &[f64]) -> HalResult<Option<CustomGate>> {
    let a = |i: usize| angles.get(i).copied().unwrap_or(0.0);
    let gate = match kind {
        GateKind::SdgGate => entry("SDG", matrices::sdg(), &["S^-1"])?,
        GateKind::TdGate => entry("TDG", matrices::tdg(), &["T^-1"])?,
        GateKind::SxGate => entry("SX", matrices::sx(), &["SX"])?,
        GateKind::SxdGate => entry("SXDG", matrices::sxdg(), &["SX^-1"])?,
        GateKind::PGate => entry(
            "P",
            matrices::p(a(0)),
            &[format!("P({})", format_angle(a(0))).as_str()],
        )?,
        GateKind::U1Gate => entry(
            "U1",
            matrices::p(a(0)),
            &[format!("U1({})", format_angle(a(0))).as_str()],
        )?,
        GateKind::U2Gate => entry("U2", matrices::u2(a(0), a(1)), &["U2"])?,
        GateKind::RGate => entry("R", matrices::r(a(0), a(1)), &["R"])?,
        GateKind::UGate => entry("U", matrices::u(a(0), a(1), a(2)), &["U"])?,
        GateKind::U3Gate => entry("U3", matrices::u(a(0), a(1), a(2)), &["U3"])?,

        GateKind::CyGate => controlled("CY", matrices::y(), "Y".into())?,
        GateKind::ChGate => controlled("CH", matrices::h(), "H".into())?,
        GateKind::CsxGate => controlled("CSX", matrices::sx(), "SX".into())?,
        GateKind::CphaseGate => controlled(
            "CPHASE",
            matrices::p(a(0)),
            format!("P({})", format_angle(a(0))),
        )?,
        GateKind::Cu1Gate => controlled(
            "CU1",
            matrices::p(a(0)),
            format!("U1({})", format_angle(a(0))),
        )?,
        GateKind::CrxGate => controlled(
            "CRX",
            matrices::rx(a(0)),
            format!("Rx({})", format_angle(a(0))),
        )?,
        GateKind::CryGate => controlled(
            "CRY",
            matrices::ry(a(0)),
            format!("Ry({})", format_angle(a(0))),
        )?,
        GateKind::CrzGate => controlled(
            "CRZ",
            matrices::rz(a(0)),
            format!("Rz({})", format_angle(a(0))),
        )?,
        GateKind::Cu3Gate => controlled("CU3", matrices::u(a(0), a(1), a(2)), "U3".into())?,
        GateKind::CuGate => entry("CU", matrices::cu(a(0), a(1), a(2), a(3)), &["@", "U"])?,

        GateKind::DcxGate => entry("DCX", matrices::dcx(), &["DCX_0", "DCX_1"])?,
        GateKind::RxxGate => entry("RXX", matrices::rxx(a(0)), &["RXX", "RXX"])?,
        GateKind::RyyGate => entry("RYY", matrices::ryy(a(0)), &["RYY", "RYY"])?,
        GateKind::RzzGate => entry("RZZ", matrices::rzz(a(0)), &["RZZ", "RZZ"])?,
        GateKind::RzxGate => entry("RZX", matrices::rzx(a(0)), &["RZX_z", "RZX_x"])?,

        GateKind::RccxGate => entry(
            "RCCX",
            matrices::rccx(),
            &["RCCX_c1", "RCCX_c2", "RCCX_t"],
        )?,
        GateKind::C3sxGate => entry(
            "C3SX",
            matrices::controlled(&matrices::sx(), 3),
            &["@", "@", "@", "SX"],
        )?,
        GateKind::Rc3xGate => entry(
            "RC3X",
            matrices::rc3x(),
            &["RC3X_c1", "RC3X_c2", "RC3X_c3", "RC3X_t"],
        )?,

        // Base gate for a controlled matrix over any number of controls.
        GateKind::McpGate => entry(
            "P",
            matrices::p(a(0)),
            &[format!("P({})", format_angle(a(0))).as_str()],
        )?,

        _ => return Ok(None),
    };
    Ok(Some(gate))
}
