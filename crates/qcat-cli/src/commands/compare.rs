//! Compare command implementation.

use std::collections::BTreeMap;

use anyhow::Result;
use console::style;
use serde::Serialize;

use qcat::{Comparison, ExecutionConfig, ExecutionResult, QcatConfig};

use super::common::{load_qcircuit, resolve_backend};

/// Configurations to compare: the named backends, else the configured
/// executions, else `None` for the built-in default list.
pub fn select_configs(
    config: &QcatConfig,
    backends: &[String],
) -> Result<Option<Vec<ExecutionConfig>>> {
    if !backends.is_empty() {
        let configs = backends
            .iter()
            .map(|name| Ok(config.execution(resolve_backend(config, Some(name))?)))
            .collect::<Result<Vec<_>>>()?;
        return Ok(Some(configs));
    }
    if config.executions.is_empty() {
        Ok(None)
    } else {
        Ok(Some(config.executions.clone()))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum Entry<'a> {
    Ok(&'a ExecutionResult),
    Error(String),
}

fn to_json(comparison: &Comparison) -> Result<String> {
    let entries: BTreeMap<&str, Entry<'_>> = comparison
        .iter()
        .map(|(key, outcome)| {
            let entry = match outcome {
                Ok(result) => Entry::Ok(result),
                Err(e) => Entry::Error(e.to_string()),
            };
            (key, entry)
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

/// Execute the compare command.
pub async fn execute(
    config: &QcatConfig,
    input: &str,
    backends: &[String],
    json: bool,
) -> Result<()> {
    let configs = select_configs(config, backends)?;
    let mut circuit = load_qcircuit(config, input)?;

    let comparison = circuit.compare_results(configs.as_deref()).await;

    if json {
        println!("{}", to_json(&comparison)?);
    } else {
        println!(
            "{} Comparing {} on {} backends\n",
            style("→").cyan().bold(),
            style(input).green(),
            comparison.len()
        );
        for (key, outcome) in comparison.iter() {
            match outcome {
                Ok(result) => {
                    let top: Vec<String> = result
                        .counts
                        .sorted()
                        .iter()
                        .take(4)
                        .map(|(bits, count)| format!("{bits}: {count}"))
                        .collect();
                    println!(
                        "  {} {:<16} {}",
                        style("●").green(),
                        style(key).bold(),
                        top.join(", ")
                    );
                }
                Err(e) => {
                    println!(
                        "  {} {:<16} {}",
                        style("○").red(),
                        style(key).bold(),
                        style(e).red()
                    );
                }
            }
        }
    }

    if !comparison.is_empty() && comparison.failure_count() == comparison.len() {
        anyhow::bail!("Every backend failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcat::BackendKind;

    #[test]
    fn test_named_backends_win() {
        let config =
            QcatConfig::from_yaml("executions:\n  - backend: braket\n    device: sv1\n").unwrap();
        let configs = select_configs(&config, &["qsharp".into(), "braket".into()])
            .unwrap()
            .unwrap();
        let keys: Vec<String> = configs.iter().map(ExecutionConfig::key).collect();
        assert_eq!(keys, vec!["qsharp", "braket@sv1"]);
    }

    #[test]
    fn test_configured_then_default() {
        let config = QcatConfig::from_yaml("executions:\n  - backend: cirq\n").unwrap();
        let configs = select_configs(&config, &[]).unwrap().unwrap();
        assert_eq!(configs[0].backend, BackendKind::Cirq);

        assert!(select_configs(&QcatConfig::default(), &[]).unwrap().is_none());
        assert!(select_configs(&QcatConfig::default(), &["nope".into()]).is_err());
    }
}
