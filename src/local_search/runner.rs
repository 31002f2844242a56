//! Local search execution loop.
//!
//! # Algorithm
//!
//! 1. Shuffle `0..n` with a generator seeded once from `params.seed`
//! 2. Repeat passes over all position pairs `(i, j)`, `i < j`:
//!    - sequential: commit the first swap with negative delta, keep scanning
//!    - parallel: workers claim rows `i` and report the best swap of each
//!      row; after all workers join, the best overall is committed, then
//!      every other reported swap on positions not yet touched this pass
//! 3. Stop on a pass without improvement (converged), on time budget expiry,
//!    or after `max_no_improve_tries` consecutive non-improving evaluations
//!
//! In the parallel path "consecutive" is counted across workers: an
//! improving evaluation seen by any worker restarts the count, and the
//! count carries over between passes.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::config::LsParams;
use crate::model::JobSet;
use crate::objective::{swap_delta, total_completion_time};

/// Evaluations between two reads of the monotonic clock.
const CLOCK_CHECK_INTERVAL: usize = 64;

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// A full pass found no improving swap.
    Converged,
    /// The time budget elapsed.
    TimedOut,
    /// `max_no_improve_tries` consecutive evaluations did not improve.
    NoImproveLimit,
}

/// Result of a local search run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LsResult {
    /// Best ordering found.
    pub order: Vec<usize>,

    /// ΣC_j of `order`.
    pub objective: i64,

    /// ΣC_j of the random starting ordering.
    pub initial_objective: i64,

    /// Stopping condition that fired.
    pub termination: Termination,

    /// Neighborhood passes started.
    pub passes: usize,

    /// Swap evaluations performed.
    pub evaluations: usize,

    /// Committed improving swaps.
    pub improvements: usize,

    /// Wall-clock time spent.
    pub elapsed: Duration,
}

/// A candidate exchange of positions `i < j`.
#[derive(Debug, Clone, Copy)]
struct SwapMove {
    i: usize,
    j: usize,
    delta: i64,
}

enum PassOutcome {
    Improved,
    Exhausted,
    Stopped(Termination),
}

/// Executes the 2-swap local search.
pub struct LocalSearchRunner;

impl LocalSearchRunner {
    /// Runs the search on `jobs` with `threads` workers (`<= 1` is
    /// sequential).
    ///
    /// # Examples
    ///
    /// ```
    /// use u_flowtime::local_search::{LocalSearchRunner, LsParams};
    /// use u_flowtime::model::JobSet;
    ///
    /// let jobs = JobSet::from_processing_times([5, 3, 8]);
    /// let params = LsParams::default().with_time_budget_ms(10_000);
    /// let result = LocalSearchRunner::run(&jobs, &params, 1);
    /// assert_eq!(result.objective, 27);
    /// ```
    pub fn run(jobs: &JobSet, params: &LsParams, threads: usize) -> LsResult {
        let start = Instant::now();
        let n = jobs.len();

        let mut order: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(params.seed);
        order.shuffle(&mut rng);
        let initial_objective = total_completion_time(jobs, &order);

        let mut search = Search {
            jobs,
            max_no_improve: params.max_no_improve_tries,
            deadline: start.checked_add(params.time_budget),
            objective: initial_objective,
            order,
            evaluations: 0,
            improvements: 0,
            since_improvement: 0,
        };

        let mut passes = 0usize;
        let termination = loop {
            passes += 1;
            let outcome = if threads > 1 {
                search.parallel_pass(threads)
            } else {
                search.sequential_pass()
            };
            tracing::trace!(pass = passes, objective = search.objective, "local search pass");
            match outcome {
                PassOutcome::Improved => continue,
                PassOutcome::Exhausted => break Termination::Converged,
                PassOutcome::Stopped(reason) => break reason,
            }
        };

        let elapsed = start.elapsed();
        tracing::debug!(
            n,
            threads,
            seed = params.seed,
            initial_objective,
            objective = search.objective,
            ?termination,
            passes,
            evaluations = search.evaluations,
            elapsed_ms = elapsed.as_millis() as u64,
            "local search finished"
        );

        LsResult {
            order: search.order,
            objective: search.objective,
            initial_objective,
            termination,
            passes,
            evaluations: search.evaluations,
            improvements: search.improvements,
            elapsed,
        }
    }
}

/// Runs the 2-swap local search.
pub fn local_search(jobs: &JobSet, params: &LsParams, threads: usize) -> LsResult {
    LocalSearchRunner::run(jobs, params, threads)
}

/// Mutable search state, owned by the calling thread.
struct Search<'a> {
    jobs: &'a JobSet,
    max_no_improve: usize,
    deadline: Option<Instant>,
    order: Vec<usize>,
    objective: i64,
    evaluations: usize,
    improvements: usize,
    since_improvement: usize,
}

impl Search<'_> {
    fn sequential_pass(&mut self) -> PassOutcome {
        let n = self.order.len();
        let mut improved = false;

        for i in 0..n.saturating_sub(1) {
            for j in (i + 1)..n {
                if self.evaluations.is_multiple_of(CLOCK_CHECK_INTERVAL) && expired(self.deadline) {
                    return PassOutcome::Stopped(Termination::TimedOut);
                }
                let delta = swap_delta(self.jobs, &self.order, i, j);
                self.evaluations += 1;

                if delta < 0 {
                    self.commit(SwapMove { i, j, delta });
                    improved = true;
                } else {
                    self.since_improvement += 1;
                    if self.limit_reached() {
                        return PassOutcome::Stopped(Termination::NoImproveLimit);
                    }
                }
            }
        }

        if improved {
            PassOutcome::Improved
        } else {
            PassOutcome::Exhausted
        }
    }

    fn parallel_pass(&mut self, threads: usize) -> PassOutcome {
        let n = self.order.len();
        let jobs = self.jobs;
        let order = self.order.as_slice();
        let deadline = self.deadline;

        let next_row = AtomicUsize::new(0);
        let evaluations = AtomicUsize::new(0);
        let timed_out = AtomicBool::new(false);
        let stale = StaleCounter::new(self.since_improvement, self.max_no_improve);
        let moves: Mutex<PassMoves> = Mutex::new(PassMoves::default());

        thread::scope(|scope| {
            for _ in 0..threads {
                scope.spawn(|| {
                    let mut local: Option<SwapMove> = None;
                    let mut row_bests = Vec::new();
                    let mut count = 0usize;
                    let mut run = 0usize;
                    let mut chunk_improved = false;

                    'rows: while !timed_out.load(Ordering::Relaxed) && !stale.stalled() {
                        let i = next_row.fetch_add(1, Ordering::Relaxed);
                        if i + 1 >= n {
                            break;
                        }
                        let mut row_best: Option<SwapMove> = None;
                        let mut stop = false;
                        for j in (i + 1)..n {
                            if count.is_multiple_of(CLOCK_CHECK_INTERVAL) {
                                if expired(deadline) {
                                    timed_out.store(true, Ordering::Relaxed);
                                    stop = true;
                                    break;
                                }
                                if stale.flush(&mut run, &mut chunk_improved) {
                                    stop = true;
                                    break;
                                }
                            }
                            count += 1;
                            let delta = swap_delta(jobs, order, i, j);
                            if delta >= 0 {
                                run += 1;
                            } else {
                                run = 0;
                                chunk_improved = true;
                                if delta < row_best.map_or(0, |m| m.delta) {
                                    row_best = Some(SwapMove { i, j, delta });
                                }
                            }
                        }
                        if let Some(mv) = row_best {
                            if local.is_none_or(|b| mv.delta < b.delta) {
                                local = Some(mv);
                            }
                            row_bests.push(mv);
                        }
                        if stop {
                            break 'rows;
                        }
                    }
                    stale.flush(&mut run, &mut chunk_improved);

                    evaluations.fetch_add(count, Ordering::Relaxed);
                    if let Some(candidate) = local {
                        let mut shared = moves.lock().unwrap_or_else(PoisonError::into_inner);
                        if shared.best.is_none_or(|b| candidate.delta < b.delta) {
                            shared.best = Some(candidate);
                        }
                        shared.candidates.append(&mut row_bests);
                    }
                });
            }
        });

        self.evaluations += evaluations.into_inner();

        let PassMoves { best, candidates } =
            moves.into_inner().unwrap_or_else(PoisonError::into_inner);
        let improved = match best {
            Some(winner) => {
                self.commit_disjoint(winner, candidates);
                true
            }
            None => false,
        };
        let stalled = stale.stalled();
        self.since_improvement = stale.into_count();

        if timed_out.into_inner() {
            PassOutcome::Stopped(Termination::TimedOut)
        } else if stalled {
            PassOutcome::Stopped(Termination::NoImproveLimit)
        } else if improved {
            PassOutcome::Improved
        } else {
            PassOutcome::Exhausted
        }
    }

    /// Commits `winner`, then every other candidate whose positions are
    /// untouched so far, most improving first.
    ///
    /// Swaps on disjoint position pairs do not change each other's delta,
    /// so the candidates' deltas, computed against the pass snapshot, stay
    /// exact.
    fn commit_disjoint(&mut self, winner: SwapMove, mut candidates: Vec<SwapMove>) {
        let mut touched = vec![false; self.order.len()];
        touched[winner.i] = true;
        touched[winner.j] = true;
        self.commit(winner);

        candidates.sort_unstable_by_key(|m| (m.delta, m.i, m.j));
        for mv in candidates {
            if touched[mv.i] || touched[mv.j] {
                continue;
            }
            touched[mv.i] = true;
            touched[mv.j] = true;
            self.commit(mv);
        }
    }

    fn commit(&mut self, mv: SwapMove) {
        self.order.swap(mv.i, mv.j);
        self.objective += mv.delta;
        self.improvements += 1;
        self.since_improvement = 0;
    }

    fn limit_reached(&self) -> bool {
        self.max_no_improve > 0 && self.since_improvement >= self.max_no_improve
    }
}

fn expired(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}

/// Improving moves reported by the workers of one parallel pass.
#[derive(Default)]
struct PassMoves {
    best: Option<SwapMove>,
    candidates: Vec<SwapMove>,
}

/// Non-improving evaluations since the last improving one, shared by the
/// workers of a parallel pass.
///
/// Workers flush their local run once per clock check, so the limit may be
/// overshot by up to one check interval per worker.
struct StaleCounter {
    count: AtomicUsize,
    limit: usize,
    stalled: AtomicBool,
}

impl StaleCounter {
    fn new(start: usize, limit: usize) -> Self {
        Self {
            count: AtomicUsize::new(start),
            limit,
            stalled: AtomicBool::new(false),
        }
    }

    /// Publishes a worker's local run and returns whether the limit is
    /// reached. When the worker saw an improving swap since its last flush
    /// the shared count restarts from the run that followed it.
    fn flush(&self, run: &mut usize, improved: &mut bool) -> bool {
        let count = if std::mem::take(improved) {
            self.count.store(*run, Ordering::Relaxed);
            *run
        } else {
            self.count.fetch_add(*run, Ordering::Relaxed) + *run
        };
        *run = 0;
        if self.limit > 0 && count >= self.limit {
            self.stalled.store(true, Ordering::Relaxed);
        }
        self.stalled()
    }

    fn stalled(&self) -> bool {
        self.stalled.load(Ordering::Relaxed)
    }

    fn into_count(self) -> usize {
        self.count.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::evaluate;
    use crate::spt::spt_order;

    fn generous() -> LsParams {
        LsParams::default()
            .with_max_no_improve_tries(0)
            .with_time_budget(Duration::from_secs(60))
    }

    fn pseudo_random_times(n: usize, modulus: u32) -> JobSet {
        JobSet::from_processing_times(
            (0..n as u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 9) % modulus + 1),
        )
    }

    fn optimum(jobs: &JobSet) -> i64 {
        total_completion_time(jobs, &spt_order(jobs, 1))
    }

    #[test]
    fn test_empty_input() {
        for threads in [1, 4] {
            let result = LocalSearchRunner::run(&JobSet::default(), &generous(), threads);
            assert!(result.order.is_empty());
            assert_eq!(result.objective, 0);
            assert_eq!(result.termination, Termination::Converged);
        }
    }

    #[test]
    fn test_single_job() {
        let jobs = JobSet::from_processing_times([42]);
        for threads in [1, 2, 4, 8] {
            let result = LocalSearchRunner::run(&jobs, &generous(), threads);
            assert_eq!(result.order, vec![0]);
            assert_eq!(result.objective, 42);
        }
    }

    #[test]
    fn test_equal_times() {
        let jobs = JobSet::from_processing_times([10, 10, 10]);
        for threads in [1, 4] {
            let result = LocalSearchRunner::run(&jobs, &generous(), threads);
            assert_eq!(result.objective, 60);
            assert_eq!(result.improvements, 0);
            assert_eq!(result.termination, Termination::Converged);
        }
    }

    #[test]
    fn test_sequential_converges_to_optimum() {
        // Any 2-swap local optimum has no inverted adjacent pair, hence is
        // sorted by processing time.
        let jobs = pseudo_random_times(60, 100);
        let result = LocalSearchRunner::run(&jobs, &generous(), 1);
        assert_eq!(result.termination, Termination::Converged);
        assert_eq!(result.objective, optimum(&jobs));
        assert_eq!(evaluate(&jobs, &result.order).unwrap(), result.objective);
    }

    #[test]
    fn test_parallel_converges_to_optimum() {
        let jobs = pseudo_random_times(60, 100);
        for threads in [2, 4, 8] {
            let result = LocalSearchRunner::run(&jobs, &generous(), threads);
            assert_eq!(result.termination, Termination::Converged);
            assert_eq!(result.objective, optimum(&jobs), "threads={threads}");
            assert_eq!(evaluate(&jobs, &result.order).unwrap(), result.objective);
        }
    }

    #[test]
    fn test_never_worse_than_start() {
        let jobs = pseudo_random_times(40, 20);
        for seed in 0..10 {
            let params = LsParams::default().with_seed(seed).with_max_no_improve_tries(50);
            for threads in [1, 4] {
                let result = LocalSearchRunner::run(&jobs, &params, threads);
                assert!(result.objective <= result.initial_objective);
                assert_eq!(evaluate(&jobs, &result.order).unwrap(), result.objective);
            }
        }
    }

    #[test]
    fn test_sequential_reproducible() {
        let jobs = pseudo_random_times(80, 50);
        let params = generous().with_seed(7);
        let a = LocalSearchRunner::run(&jobs, &params, 1);
        let b = LocalSearchRunner::run(&jobs, &params, 1);
        assert_eq!(a.order, b.order);
        assert_eq!(a.objective, b.objective);
        assert_eq!(a.initial_objective, b.initial_objective);
        assert_eq!(a.evaluations, b.evaluations);
    }

    #[test]
    fn test_same_seed_same_start_across_modes() {
        let jobs = pseudo_random_times(30, 40);
        let params = generous().with_seed(11);
        let sequential = LocalSearchRunner::run(&jobs, &params, 1);
        let parallel = LocalSearchRunner::run(&jobs, &params, 4);
        assert_eq!(sequential.initial_objective, parallel.initial_objective);
        assert!(sequential.objective <= sequential.initial_objective);
        assert!(parallel.objective <= parallel.initial_objective);
    }

    #[test]
    fn test_different_seeds_different_starts() {
        let jobs = pseudo_random_times(50, 1000);
        let a = LocalSearchRunner::run(&jobs, &generous().with_seed(1), 1);
        let b = LocalSearchRunner::run(&jobs, &generous().with_seed(2), 1);
        assert_ne!(a.initial_objective, b.initial_objective);
    }

    #[test]
    fn test_zero_budget_times_out_immediately() {
        let jobs = pseudo_random_times(100, 100);
        let params = generous().with_time_budget(Duration::ZERO);
        for threads in [1, 4] {
            let result = LocalSearchRunner::run(&jobs, &params, threads);
            assert_eq!(result.termination, Termination::TimedOut);
            assert_eq!(result.objective, result.initial_objective);
            assert_eq!(result.improvements, 0);
        }
    }

    #[test]
    fn test_no_improve_limit_stops_sequential() {
        let jobs = pseudo_random_times(200, 100);
        let params = generous().with_max_no_improve_tries(5);
        let result = LocalSearchRunner::run(&jobs, &params, 1);
        assert_eq!(result.termination, Termination::NoImproveLimit);
        assert!(result.objective <= result.initial_objective);
    }

    #[test]
    fn test_no_improve_limit_stops_parallel() {
        let jobs = pseudo_random_times(300, 100);
        let params = generous().with_max_no_improve_tries(5);
        let full_pass = 300 * 299 / 2;
        for threads in [2, 4] {
            let result = LocalSearchRunner::run(&jobs, &params, threads);
            assert_eq!(result.termination, Termination::NoImproveLimit, "threads={threads}");
            assert!(result.evaluations < full_pass, "threads={threads}");
            assert!(result.objective <= result.initial_objective);
            assert_eq!(evaluate(&jobs, &result.order).unwrap(), result.objective);
        }
    }

    #[test]
    fn test_parallel_scaled_limit_still_converges() {
        let jobs = pseudo_random_times(60, 100);
        let params = LsParams::for_job_count(jobs.len(), 1000)
            .with_time_budget(Duration::from_secs(60));
        let result = LocalSearchRunner::run(&jobs, &params, 4);
        assert_eq!(result.termination, Termination::Converged);
        assert_eq!(result.objective, optimum(&jobs));
    }

    #[test]
    fn test_parallel_pass_commits_disjoint_swaps() {
        let jobs = pseudo_random_times(200, 1000);
        let result = LocalSearchRunner::run(&jobs, &generous(), 4);
        assert_eq!(result.termination, Termination::Converged);
        assert!(
            result.improvements > result.passes,
            "{} improvements over {} passes",
            result.improvements,
            result.passes
        );
        assert_eq!(evaluate(&jobs, &result.order).unwrap(), result.objective);
        assert_eq!(result.objective, optimum(&jobs));
    }

    #[test]
    fn test_budget_expires_after_progress() {
        // One pass over this many pairs takes far longer than the budget.
        let jobs = pseudo_random_times(50_000, 1000);
        let params = generous().with_time_budget(Duration::from_millis(50));
        for threads in [1, 4] {
            let result = LocalSearchRunner::run(&jobs, &params, threads);
            assert_eq!(result.termination, Termination::TimedOut, "threads={threads}");
            assert!(result.improvements > 0, "threads={threads}");
            assert!(result.objective < result.initial_objective);
            assert_eq!(evaluate(&jobs, &result.order).unwrap(), result.objective);
        }
    }

    #[test]
    fn test_stale_counter_restarts_after_improvement() {
        let counter = StaleCounter::new(0, 10);
        let (mut run, mut improved) = (6, false);
        assert!(!counter.flush(&mut run, &mut improved));
        let (mut run, mut improved) = (3, true);
        assert!(!counter.flush(&mut run, &mut improved));
        assert_eq!(run, 0);
        assert!(!improved);
        let (mut run, mut improved) = (7, false);
        assert!(counter.flush(&mut run, &mut improved));
        assert_eq!(counter.into_count(), 10);
    }

    #[test]
    fn test_huge_budget_does_not_overflow_deadline() {
        let jobs = JobSet::from_processing_times([3, 1, 2]);
        let params = LsParams::default().with_time_budget(Duration::MAX);
        let result = LocalSearchRunner::run(&jobs, &params, 2);
        assert_eq!(result.objective, optimum(&jobs));
    }
}
