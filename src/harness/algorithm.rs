//! Uniform, timed invocation of the three ordering algorithms.

use std::fmt;
use std::time::{Duration, Instant};

use crate::insertion::cheapest_insertion_order;
use crate::local_search::{local_search, LsParams};
use crate::model::JobSet;
use crate::objective::total_completion_time;
use crate::spt::spt_order;

/// The ordering algorithms available to the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    /// Shortest processing time first.
    Spt,
    /// Cheapest-insertion construction.
    CheapestInsertion,
    /// 2-swap local search.
    LocalSearch,
}

impl Algorithm {
    /// All algorithms, in benchmark order.
    pub const ALL: [Algorithm; 3] = [
        Algorithm::Spt,
        Algorithm::CheapestInsertion,
        Algorithm::LocalSearch,
    ];

    /// Name used in logs and CSV rows.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Spt => "SPT",
            Algorithm::CheapestInsertion => "CheapestInsertion",
            Algorithm::LocalSearch => "LocalSearch",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Output of one timed run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Ordering returned by the algorithm.
    pub order: Vec<usize>,
    /// ΣC_j of `order`.
    pub objective: i64,
    /// Time spent, including the objective evaluation.
    pub elapsed: Duration,
}

/// Runs `algorithm` on `jobs` and measures it.
///
/// `params` is only read by [`Algorithm::LocalSearch`].
pub fn run_algorithm(
    algorithm: Algorithm,
    jobs: &JobSet,
    threads: usize,
    params: &LsParams,
) -> RunOutcome {
    let start = Instant::now();
    let (order, objective) = match algorithm {
        Algorithm::Spt => {
            let order = spt_order(jobs, threads);
            let objective = total_completion_time(jobs, &order);
            (order, objective)
        }
        Algorithm::CheapestInsertion => {
            let order = cheapest_insertion_order(jobs, threads);
            let objective = total_completion_time(jobs, &order);
            (order, objective)
        }
        Algorithm::LocalSearch => {
            let result = local_search(jobs, params, threads);
            (result.order, result.objective)
        }
    };
    let elapsed = start.elapsed();

    tracing::info!(
        algorithm = algorithm.name(),
        n = jobs.len(),
        threads,
        objective,
        elapsed_ms = elapsed.as_millis() as u64,
        "run finished"
    );

    RunOutcome {
        order,
        objective,
        elapsed,
    }
}
