//! Gates command implementation.

use anyhow::{Context, Result};
use console::style;

use qcat::{Backend, BackendKind, Circuit, GateKind, HalError, McxMode, Param, QubitId};
use qcat_ir::{ParamKind, QubitLayout};

/// Smallest valid operation of `kind`: two controls for multi-controlled
/// kinds, ancillas only when the kind accepts them.
fn sample(kind: GateKind) -> (u32, Vec<Vec<QubitId>>, Vec<Param>) {
    let spec = kind.spec();
    let (num_qubits, groups) = match spec.qubits {
        QubitLayout::Fixed(0) => (1, vec![]),
        QubitLayout::Fixed(n) => (n as u32, (0..n as u32).map(|q| vec![QubitId(q)]).collect()),
        QubitLayout::MultiControlled { ancillas: false } => (
            3,
            vec![vec![QubitId(0), QubitId(1)], vec![QubitId(2)]],
        ),
        QubitLayout::MultiControlled { ancillas: true } => (
            4,
            vec![
                vec![QubitId(0), QubitId(1)],
                vec![QubitId(2)],
                vec![QubitId(3)],
            ],
        ),
    };
    let params = spec
        .params
        .iter()
        .map(|p| match p {
            ParamKind::Angle => Param::Angle(0.5),
            ParamKind::Count => Param::Count(2),
            ParamKind::Flag => Param::Flag(false),
            ParamKind::Mode => Param::Mode(McxMode::VChain),
        })
        .collect();
    (num_qubits, groups, params)
}

/// Whether `backend` can translate `kind`.
fn supports(backend: &dyn Backend, kind: GateKind) -> Result<bool> {
    let (num_qubits, groups, params) = sample(kind);
    let mut circuit = Circuit::new(num_qubits)?;
    circuit.append(kind, groups, params)?;
    match backend.translate(&circuit) {
        Ok(_) => Ok(true),
        Err(HalError::UnsupportedTranslation { .. }) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn describe(kind: GateKind) -> String {
    let spec = kind.spec();
    let qubits = match spec.qubits {
        QubitLayout::Fixed(n) => format!("{n} qubit{}", if n == 1 { "" } else { "s" }),
        QubitLayout::MultiControlled { ancillas: false } => "controls, target".to_string(),
        QubitLayout::MultiControlled { ancillas: true } => "controls, target, ancillas".to_string(),
    };
    let params: Vec<&str> = spec
        .params
        .iter()
        .map(|p| match p {
            ParamKind::Angle => "angle",
            ParamKind::Count => "count",
            ParamKind::Flag => "flag",
            ParamKind::Mode => "mode",
        })
        .collect();
    if params.is_empty() {
        qubits
    } else {
        format!("{qubits}; {}", params.join(", "))
    }
}

/// Execute the gates command.
pub fn execute(backend: Option<&str>) -> Result<()> {
    let backend: Option<BackendKind> = backend
        .map(|name| name.parse().with_context(|| format!("Unknown backend '{name}'")))
        .transpose()?;
    let registry = qcat::default_registry();
    let backend_impl = backend.map(|kind| registry.get(kind)).transpose()?;

    match backend {
        Some(kind) => println!(
            "{} Gate kinds on {}:\n",
            style("qcat").cyan().bold(),
            style(kind).yellow()
        ),
        None => println!("{} Gate kinds:\n", style("qcat").cyan().bold()),
    }

    for &kind in GateKind::ALL {
        let marker = match &backend_impl {
            Some(b) => {
                if supports(b.as_ref(), kind)? {
                    style("●").green()
                } else {
                    style("○").red()
                }
            }
            None => style("•").dim(),
        };
        println!(
            "  {} {:<16} {}",
            marker,
            kind.name(),
            style(describe(kind)).dim()
        );
    }

    Ok(())
}
