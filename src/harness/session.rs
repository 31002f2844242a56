//! Per-session speedup and efficiency bookkeeping.

use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDateTime;

use super::algorithm::{run_algorithm, Algorithm, RunOutcome};
use crate::local_search::LsParams;
use crate::model::JobSet;

/// One row of benchmark output.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunRecord {
    /// Local time the run was recorded.
    pub run_at: NaiveDateTime,
    /// Instance identifier, typically the dataset path.
    pub instance: String,
    /// Algorithm that produced the result.
    pub algorithm: Algorithm,
    /// Job count.
    pub n: usize,
    /// Thread count used.
    pub threads: usize,
    /// Elapsed wall-clock time in milliseconds.
    pub time_ms: u64,
    /// ΣC_j achieved.
    pub objective: i64,
    /// Single-thread time divided by this run's time.
    pub speedup: f64,
    /// `speedup / threads`.
    pub efficiency: f64,
}

/// Benchmark context holding single-thread baselines per algorithm.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkSession {
    baselines: HashMap<Algorithm, u64>,
}

impl BenchmarkSession {
    /// Creates a session with no baselines.
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded single-thread time of `algorithm`, in milliseconds.
    pub fn baseline_ms(&self, algorithm: Algorithm) -> Option<u64> {
        self.baselines.get(&algorithm).copied()
    }

    /// Records a run and derives its speedup and efficiency.
    ///
    /// A single-thread run (`threads <= 1`) replaces the baseline of its
    /// algorithm and scores 1.0/1.0. A multi-thread run is compared with
    /// the baseline, `speedup = baseline_ms / max(1, time_ms)`; without a
    /// positive baseline both values are 1.0.
    pub fn record(
        &mut self,
        instance: &str,
        algorithm: Algorithm,
        n: usize,
        threads: usize,
        elapsed: Duration,
        objective: i64,
    ) -> RunRecord {
        let time_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

        let (speedup, efficiency) = if threads <= 1 {
            self.baselines.insert(algorithm, time_ms);
            (1.0, 1.0)
        } else {
            match self.baseline_ms(algorithm) {
                Some(base) if base > 0 => {
                    let speedup = base as f64 / time_ms.max(1) as f64;
                    (speedup, speedup / threads as f64)
                }
                _ => (1.0, 1.0),
            }
        };

        RunRecord {
            run_at: chrono::Local::now().naive_local(),
            instance: instance.to_string(),
            algorithm,
            n,
            threads,
            time_ms,
            objective,
            speedup,
            efficiency,
        }
    }

    /// Records the outcome of [`run_algorithm`].
    pub fn record_outcome(
        &mut self,
        instance: &str,
        algorithm: Algorithm,
        n: usize,
        threads: usize,
        outcome: &RunOutcome,
    ) -> RunRecord {
        self.record(
            instance,
            algorithm,
            n,
            threads,
            outcome.elapsed,
            outcome.objective,
        )
    }

    /// Runs SPT, cheapest insertion and local search on `jobs` and records
    /// each run.
    pub fn run_all(
        &mut self,
        instance: &str,
        jobs: &JobSet,
        threads: usize,
        params: &LsParams,
    ) -> Vec<RunRecord> {
        Algorithm::ALL
            .iter()
            .map(|&algorithm| {
                let outcome = run_algorithm(algorithm, jobs, threads, params);
                self.record_outcome(instance, algorithm, jobs.len(), threads, &outcome)
            })
            .collect()
    }
}
