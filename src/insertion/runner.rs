//! Cheapest-insertion execution.
//!
//! # Algorithm
//!
//! 1. Sort job indices by `(processing_time, index)`
//! 2. Seed the partial ordering with the two shortest jobs
//! 3. For each remaining job, in sorted order:
//!    a. Evaluate ΣC_j for every insertion position `0..=m`
//!    b. Commit the position with the smallest objective
//!
//! Each evaluation is O(1) thanks to the prefix sums of the partial
//! ordering, rebuilt once per inserted job.

use std::ops::Range;
use std::sync::{Mutex, PoisonError};
use std::thread;

use super::config::InsertionConfig;
use crate::model::JobSet;
use crate::objective::{insertion_objective, prefix_sums, total_completion_time};
use crate::spt::spt_order;

/// Result of a cheapest-insertion run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InsertionResult {
    /// The constructed ordering.
    pub order: Vec<usize>,

    /// ΣC_j of `order`.
    pub objective: i64,

    /// `history[k]` is the objective once the partial ordering holds
    /// `k + 1` jobs.
    pub history: Vec<i64>,
}

/// Executes cheapest insertion.
pub struct InsertionRunner;

impl InsertionRunner {
    /// Builds an ordering for `jobs` by cheapest insertion.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_flowtime::insertion::{InsertionConfig, InsertionRunner};
    /// use u_flowtime::model::JobSet;
    ///
    /// let jobs = JobSet::from_processing_times([5, 3, 8]);
    /// let result = InsertionRunner::run(&jobs, &InsertionConfig::default());
    /// assert_eq!(result.objective, 27);
    /// ```
    pub fn run(jobs: &JobSet, config: &InsertionConfig) -> InsertionResult {
        let n = jobs.len();
        if n == 0 {
            return InsertionResult {
                order: Vec::new(),
                objective: 0,
                history: Vec::new(),
            };
        }

        let sorted = spt_order(jobs, 1);
        let seed_len = n.min(2);

        let mut order = Vec::with_capacity(n);
        let mut history = Vec::with_capacity(n);
        for &job in &sorted[..seed_len] {
            order.push(job);
            history.push(total_completion_time(jobs, &order));
        }
        let mut objective = history[seed_len - 1];

        for &job in &sorted[seed_len..] {
            let p = jobs.processing_time(job);
            let prefix = prefix_sums(jobs, &order);

            let (value, position) = if config.is_parallel_for(order.len()) {
                best_position_parallel(objective, &prefix, p, config.threads)
            } else {
                best_position_in(objective, &prefix, p, 0..prefix.len())
            };

            order.insert(position, job);
            objective = value;
            history.push(objective);
        }

        tracing::debug!(
            n,
            threads = config.threads,
            objective,
            "cheapest insertion finished"
        );

        InsertionResult {
            order,
            objective,
            history,
        }
    }
}

/// Builds a cheapest-insertion ordering with the default threshold.
pub fn cheapest_insertion_order(jobs: &JobSet, threads: usize) -> Vec<usize> {
    InsertionRunner::run(jobs, &InsertionConfig::default().with_threads(threads)).order
}

/// Best `(objective, position)` among `positions`; ties go to the smallest
/// position.
fn best_position_in(
    current: i64,
    prefix: &[i64],
    processing_time: u32,
    positions: Range<usize>,
) -> (i64, usize) {
    let mut best = (i64::MAX, positions.start);
    for pos in positions {
        let value = insertion_objective(current, prefix, processing_time, pos);
        if value < best.0 {
            best = (value, pos);
        }
    }
    best
}

/// Splits positions `0..=m` into contiguous half-open ranges, one per
/// worker, and reconciles the local winners under a single lock.
///
/// Among equal objectives the first worker to take the lock wins, so the
/// committed position (not the objective) may vary between runs.
fn best_position_parallel(
    current: i64,
    prefix: &[i64],
    processing_time: u32,
    threads: usize,
) -> (i64, usize) {
    let positions = prefix.len();
    let chunk = positions.div_ceil(threads).max(1);
    let best = Mutex::new((i64::MAX, 0usize));

    thread::scope(|scope| {
        for start in (0..positions).step_by(chunk) {
            let end = (start + chunk).min(positions);
            let best = &best;
            scope.spawn(move || {
                let local = best_position_in(current, prefix, processing_time, start..end);
                let mut shared = best.lock().unwrap_or_else(PoisonError::into_inner);
                if local.0 < shared.0 {
                    *shared = local;
                }
            });
        }
    });

    best.into_inner().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::evaluate;
    use crate::spt::spt_order;

    fn pseudo_random_times(n: usize, modulus: u32) -> JobSet {
        JobSet::from_processing_times(
            (0..n as u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 7) % modulus + 1),
        )
    }

    #[test]
    fn test_insertion_empty() {
        let result = InsertionRunner::run(&JobSet::default(), &InsertionConfig::default());
        assert!(result.order.is_empty());
        assert_eq!(result.objective, 0);
        assert!(result.history.is_empty());
    }

    #[test]
    fn test_insertion_single_job() {
        let jobs = JobSet::from_processing_times([42]);
        for threads in [1, 2, 4, 8] {
            let config = InsertionConfig::default().with_threads(threads);
            let result = InsertionRunner::run(&jobs, &config);
            assert_eq!(result.order, vec![0]);
            assert_eq!(result.objective, 42);
            assert_eq!(result.history, vec![42]);
        }
    }

    #[test]
    fn test_insertion_three_jobs() {
        let jobs = JobSet::from_processing_times([5, 3, 8]);
        let order = cheapest_insertion_order(&jobs, 1);
        assert_eq!(order, vec![1, 0, 2]);
        assert_eq!(evaluate(&jobs, &order).unwrap(), 27);
    }

    #[test]
    fn test_insertion_equal_times() {
        let jobs = JobSet::from_processing_times([10, 10, 10]);
        let result = InsertionRunner::run(&jobs, &InsertionConfig::default());
        assert_eq!(result.objective, 60);
    }

    #[test]
    fn test_insertion_objective_matches_evaluator() {
        let jobs = pseudo_random_times(150, 100);
        let result = InsertionRunner::run(&jobs, &InsertionConfig::default());
        assert_eq!(evaluate(&jobs, &result.order).unwrap(), result.objective);
    }

    #[test]
    fn test_insertion_history_non_decreasing() {
        let jobs = pseudo_random_times(120, 50);
        let result = InsertionRunner::run(&jobs, &InsertionConfig::default());
        assert_eq!(result.history.len(), jobs.len());
        for w in result.history.windows(2) {
            assert!(w[1] >= w[0], "objective decreased: {} -> {}", w[0], w[1]);
        }
        assert_eq!(*result.history.last().unwrap(), result.objective);
    }

    #[test]
    fn test_insertion_reaches_spt_optimum() {
        // Jobs arrive shortest first, so appending is always cheapest.
        let jobs = pseudo_random_times(80, 30);
        let spt = total_completion_time(&jobs, &spt_order(&jobs, 1));
        let result = InsertionRunner::run(&jobs, &InsertionConfig::default());
        assert_eq!(result.objective, spt);
    }

    #[test]
    fn test_parallel_matches_sequential_objective() {
        let jobs = pseudo_random_times(400, 100);
        let sequential = InsertionRunner::run(&jobs, &InsertionConfig::default());
        for threads in [2, 3, 4, 8] {
            let config = InsertionConfig::default().with_threads(threads);
            let parallel = InsertionRunner::run(&jobs, &config);
            assert_eq!(parallel.objective, sequential.objective, "threads={threads}");
            assert_eq!(evaluate(&jobs, &parallel.order).unwrap(), parallel.objective);
        }
    }

    #[test]
    fn test_parallel_low_threshold_forces_worker_path() {
        let jobs = pseudo_random_times(60, 20);
        let config = InsertionConfig::default()
            .with_threads(4)
            .with_parallel_threshold(0);
        let parallel = InsertionRunner::run(&jobs, &config);
        let sequential = InsertionRunner::run(&jobs, &InsertionConfig::default());
        assert_eq!(parallel.objective, sequential.objective);
        assert_eq!(parallel.history, sequential.history);
    }

    #[test]
    fn test_position_ranges_cover_boundaries_once() {
        // Only the last position is optimal; it must be reachable from the
        // final range regardless of how positions are split.
        let prefix = vec![0, 1, 2, 3, 4, 5, 6];
        let current = 1 + 2 + 3 + 4 + 5 + 6;
        for threads in 1..=8 {
            let (value, pos) = best_position_parallel(current, &prefix, 100, threads);
            assert_eq!(pos, 6, "threads={threads}");
            assert_eq!(value, current + 106);
        }
    }

    #[test]
    fn test_sequential_tie_prefers_first_position() {
        // Zero-length job: every position costs the same.
        let prefix = vec![0, 0, 0];
        assert_eq!(best_position_in(0, &prefix, 0, 0..3), (0, 0));
    }
}
