//! Shortest Processing Time (SPT) ordering.
//!
//! Sorting jobs by ascending processing time gives the largest position
//! weights to the shortest jobs, which is the exact optimum of 1||ΣC_j.
//!
//! Ties are broken by ascending job index, so the sort key
//! `(processing_time, index)` is a strict total order and the sequential
//! and parallel paths return the same ordering.
//!
//! # References
//!
//! Smith, W. E. (1956), "Various optimizers for single-stage production".
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", §3.1.

use crate::model::JobSet;

/// Returns the SPT ordering of `jobs`.
///
/// With `threads > 1` (and the `parallel` feature) the sort runs on a
/// dedicated rayon pool of `threads` workers.
///
/// # Examples
///
/// ```
/// use u_flowtime::model::JobSet;
/// use u_flowtime::spt::spt_order;
///
/// let jobs = JobSet::from_processing_times([5, 3, 8]);
/// assert_eq!(spt_order(&jobs, 1), vec![1, 0, 2]);
/// ```
pub fn spt_order(jobs: &JobSet, threads: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..jobs.len()).collect();
    if threads > 1 {
        sort_parallel(jobs, &mut order, threads);
    } else {
        order.sort_unstable_by_key(|&i| (jobs.processing_time(i), i));
    }
    tracing::trace!(n = jobs.len(), threads, "spt ordering computed");
    order
}

#[cfg(feature = "parallel")]
fn sort_parallel(jobs: &JobSet, order: &mut [usize], threads: usize) {
    use rayon::prelude::*;

    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(|| {
            order.par_sort_unstable_by_key(|&i| (jobs.processing_time(i), i));
        }),
        Err(e) => {
            tracing::warn!(error = %e, threads, "rayon pool unavailable, sorting sequentially");
            order.sort_unstable_by_key(|&i| (jobs.processing_time(i), i));
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn sort_parallel(jobs: &JobSet, order: &mut [usize], _threads: usize) {
    order.sort_unstable_by_key(|&i| (jobs.processing_time(i), i));
}
