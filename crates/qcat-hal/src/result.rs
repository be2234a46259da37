//! Uniform execution results.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::job::Job;
use crate::kind::BackendKind;

/// Measurement histogram: bitstring to occurrence count.
///
/// Bitstrings hold one character per measured qubit, in ascending qubit
/// index order, leftmost character first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(bitstring, count)` pairs, accumulating duplicates.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut counts = Self::new();
        for (bitstring, count) in pairs {
            counts.insert(bitstring, count);
        }
        counts
    }

    /// Scale a probability distribution to exactly `shots` counts.
    ///
    /// Uses largest-remainder rounding so the counts always sum to `shots`
    /// (ties broken by bitstring order). Zero-count entries are dropped.
    /// Returns `None` when the distribution has no positive, finite mass.
    pub fn from_probabilities<I, S>(probabilities: I, shots: u32) -> Option<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let entries: Vec<(String, f64)> = probabilities
            .into_iter()
            .map(|(k, p)| (k.into(), p.max(0.0)))
            .collect();
        let total: f64 = entries.iter().map(|(_, p)| p).sum();
        if !total.is_finite() || total <= 0.0 {
            return None;
        }

        let mut scaled: Vec<(String, u64, f64)> = entries
            .into_iter()
            .map(|(k, p)| {
                let exact = p / total * f64::from(shots);
                let floor = exact.floor();
                (k, floor as u64, exact - floor)
            })
            .collect();

        let assigned: u64 = scaled.iter().map(|(_, n, _)| n).sum();
        let leftover = u64::from(shots).saturating_sub(assigned) as usize;
        scaled.sort_by(|a, b| b.2.total_cmp(&a.2).then_with(|| a.0.cmp(&b.0)));
        for entry in scaled.iter_mut().take(leftover) {
            entry.1 += 1;
        }

        Some(Self::from_pairs(
            scaled
                .into_iter()
                .filter(|(_, n, _)| *n > 0)
                .map(|(k, n, _)| (k, n)),
        ))
    }

    /// Add `count` occurrences of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Count for `bitstring` (zero when absent).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Iterate over entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.counts.iter()
    }

    /// Entries sorted by bitstring.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> =
            self.counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Number of distinct bitstrings.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no outcome was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Most frequent outcome; ties resolve to the smallest bitstring.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.counts
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
    }
}

/// Result of one execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Measurement histogram.
    pub counts: Counts,
    /// Repetitions requested.
    pub shots: u32,
    /// Backend that produced the counts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<BackendKind>,
    /// Wall-clock time spent executing, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
    /// Task record for remote executions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<Job>,
}

impl ExecutionResult {
    /// Create a result.
    pub fn new(counts: Counts, shots: u32) -> Self {
        Self {
            counts,
            shots,
            backend: None,
            execution_time_ms: None,
            job: None,
        }
    }

    /// Set the producing backend.
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set the execution time.
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }

    /// Attach the remote task record.
    pub fn with_job(mut self, job: Job) -> Self {
        self.job = Some(job);
        self
    }

    /// Fraction of repetitions that produced `bitstring`.
    pub fn probability(&self, bitstring: &str) -> f64 {
        if self.shots == 0 {
            return 0.0;
        }
        self.counts.get(bitstring) as f64 / f64::from(self.shots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_accumulates() {
        let mut counts = Counts::new();
        counts.insert("01", 3);
        counts.insert("01", 2);
        counts.insert("10", 1);
        assert_eq!(counts.get("01"), 5);
        assert_eq!(counts.get("11"), 0);
        assert_eq!(counts.total_shots(), 6);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_most_frequent_tie_break() {
        let counts = Counts::from_pairs([("11", 10), ("00", 10), ("01", 2)]);
        assert_eq!(counts.most_frequent(), Some(("00", 10)));
        assert_eq!(Counts::new().most_frequent(), None);
    }

    #[test]
    fn test_sorted() {
        let counts = Counts::from_pairs([("10", 1), ("00", 2), ("01", 3)]);
        let keys: Vec<&str> = counts.sorted().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["00", "01", "10"]);
    }

    #[test]
    fn test_from_probabilities_sums_to_shots() {
        let counts =
            Counts::from_probabilities([("0", 1.0 / 3.0), ("1", 2.0 / 3.0)], 100).unwrap();
        assert_eq!(counts.total_shots(), 100);
        assert_eq!(counts.get("0"), 33);
        assert_eq!(counts.get("1"), 67);

        let counts =
            Counts::from_probabilities([("00", 0.25), ("01", 0.25), ("10", 0.25), ("11", 0.25)], 7)
                .unwrap();
        assert_eq!(counts.total_shots(), 7);
    }

    #[test]
    fn test_from_probabilities_drops_zero() {
        let counts = Counts::from_probabilities([("00", 1.0), ("11", 0.0)], 10).unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get("00"), 10);
    }

    #[test]
    fn test_from_probabilities_rejects_massless() {
        assert!(Counts::from_probabilities(Vec::<(String, f64)>::new(), 10).is_none());
        assert!(Counts::from_probabilities([("0", 0.0), ("1", 0.0)], 10).is_none());
        assert!(Counts::from_probabilities([("0", -1.0)], 10).is_none());
        assert!(Counts::from_probabilities([("0", f64::NAN)], 10).is_none());
        assert!(Counts::from_probabilities([("0", f64::INFINITY)], 10).is_none());
    }

    #[test]
    fn test_counts_serde_transparent() {
        let counts = Counts::from_pairs([("11", 50)]);
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"11":50}"#);
    }

    #[test]
    fn test_execution_result_probability() {
        let result = ExecutionResult::new(Counts::from_pairs([("0", 25), ("1", 75)]), 100)
            .with_backend(BackendKind::Cirq)
            .with_execution_time(4);
        assert!((result.probability("1") - 0.75).abs() < 1e-12);
        assert_eq!(result.backend, Some(BackendKind::Cirq));
        assert_eq!(result.execution_time_ms, Some(4));
    }
}
