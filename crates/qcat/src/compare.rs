//! Running one circuit on several backends.
//!
//! Every configuration is translated and executed independently: a failing
//! backend becomes an `Err` entry in the [`Comparison`] and never stops the
//! others. Executions run concurrently once all translations are done.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

use futures::future::join_all;
use qcat_hal::{Backend, BackendKind, ExecutionRequest, ExecutionResult, HalResult, NativeCircuit};
use tracing::{info, instrument, warn};

use crate::circuit::QCircuit;
use crate::config::ExecutionConfig;

/// Backends compared when no configurations are given.
pub fn default_comparison() -> Vec<ExecutionConfig> {
    [BackendKind::Cirq, BackendKind::Qiskit, BackendKind::Braket]
        .into_iter()
        .map(ExecutionConfig::new)
        .collect()
}

/// Per-backend outcomes of a comparison, keyed by `backend` or
/// `backend@device`.
#[derive(Debug, Default)]
pub struct Comparison {
    outcomes: BTreeMap<String, HalResult<ExecutionResult>>,
}

impl Comparison {
    /// Outcome for `key`.
    pub fn get(&self, key: &str) -> Option<&HalResult<ExecutionResult>> {
        self.outcomes.get(key)
    }

    /// All outcomes, sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HalResult<ExecutionResult>)> {
        self.outcomes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Successful results only.
    pub fn successes(&self) -> impl Iterator<Item = (&str, &ExecutionResult)> {
        self.iter()
            .filter_map(|(k, v)| v.as_ref().ok().map(|result| (k, result)))
    }

    /// Number of failed entries.
    pub fn failure_count(&self) -> usize {
        self.outcomes.values().filter(|v| v.is_err()).count()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether nothing was compared.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// The outcomes map.
    pub fn into_inner(self) -> BTreeMap<String, HalResult<ExecutionResult>> {
        self.outcomes
    }

    /// Insert under `key`, adding `#2`, `#3`, ... when it is taken.
    fn insert(&mut self, key: String, outcome: HalResult<ExecutionResult>) {
        let mut candidate = key.clone();
        let mut n = 1;
        loop {
            match self.outcomes.entry(candidate) {
                Entry::Vacant(slot) => {
                    slot.insert(outcome);
                    return;
                }
                Entry::Occupied(_) => {
                    n += 1;
                    candidate = format!("{key}#{n}");
                }
            }
        }
    }
}

struct Prepared {
    backend: Arc<dyn Backend>,
    native: Arc<dyn NativeCircuit>,
    request: ExecutionRequest,
}

impl QCircuit {
    /// Execute on every configuration and collect the outcomes.
    ///
    /// `None` compares [`default_comparison`] with default settings. The
    /// selected backend afterwards is the last one translated.
    #[instrument(skip_all, fields(configs = configs.map_or(3, |c| c.len())))]
    pub async fn compare_results(&mut self, configs: Option<&[ExecutionConfig]>) -> Comparison {
        let defaults;
        let configs = match configs {
            Some(configs) => configs,
            None => {
                defaults = default_comparison();
                &defaults
            }
        };

        let mut comparison = Comparison::default();
        let mut pending = Vec::with_capacity(configs.len());
        for config in configs {
            match self.prepare(config) {
                Ok(prepared) => pending.push((config.key(), prepared)),
                Err(err) => {
                    warn!(key = %config.key(), error = %err, "Backend failed before execution");
                    comparison.insert(config.key(), Err(err));
                }
            }
        }

        let dispatcher = &self.dispatcher;
        let runs = pending.iter().map(|(_, p)| {
            dispatcher.execute(p.backend.as_ref(), p.native.as_ref(), &p.request)
        });
        let outcomes = join_all(runs).await;

        for ((key, _), outcome) in pending.iter().zip(outcomes) {
            if let Err(err) = &outcome {
                warn!(%key, error = %err, "Backend execution failed");
            }
            comparison.insert(key.clone(), outcome);
        }

        info!(
            entries = comparison.len(),
            failures = comparison.failure_count(),
            "Comparison finished"
        );
        comparison
    }

    fn prepare(&mut self, config: &ExecutionConfig) -> HalResult<Prepared> {
        let request = config.to_request();
        let native = self.check_and_convert(request.backend)?;
        let backend = self.registry().get(request.backend)?;
        Ok(Prepared {
            backend,
            native,
            request,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcat_hal::HalError;

    #[test]
    fn test_default_comparison_backends() {
        let keys: Vec<String> = default_comparison().iter().map(ExecutionConfig::key).collect();
        assert_eq!(keys, vec!["cirq", "qiskit", "braket"]);
    }

    #[test]
    fn test_duplicate_keys_are_numbered() {
        let mut comparison = Comparison::default();
        comparison.insert("cirq".into(), Err(HalError::Backend("a".into())));
        comparison.insert("cirq".into(), Err(HalError::Backend("b".into())));
        comparison.insert("cirq".into(), Err(HalError::Backend("c".into())));
        let keys: Vec<&str> = comparison.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["cirq", "cirq#2", "cirq#3"]);
        assert_eq!(comparison.failure_count(), 3);
    }

    #[tokio::test]
    async fn test_default_comparison_runs_locally() {
        let mut qc = QCircuit::new(2).unwrap();
        qc.x_gate(0).unwrap().cx_gate(0, 1).unwrap().measure_all().unwrap();

        let comparison = qc.compare_results(None).await;
        assert_eq!(comparison.len(), 3);
        for (key, result) in comparison.successes() {
            assert_eq!(result.counts.get("11"), 1024, "{key}");
        }
        assert_eq!(comparison.failure_count(), 0);
    }
}
