//! Draw command implementation.

use anyhow::{Context, Result};
use console::style;

use qcat::QcatConfig;

use super::common::{load_qcircuit, resolve_backend};

/// Execute the draw command.
pub fn execute(config: &QcatConfig, input: &str, backend: Option<&str>) -> Result<()> {
    let backend = resolve_backend(config, backend)?;
    let mut circuit = load_qcircuit(config, input)?;

    let drawing = circuit
        .draw_for(backend)
        .with_context(|| format!("Cannot translate {input} for {backend}"))?;

    println!(
        "{} {} for {}\n",
        style("→").cyan().bold(),
        style(input).green(),
        style(backend).yellow()
    );
    println!("{drawing}");
    Ok(())
}
