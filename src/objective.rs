//! Total completion time (ΣC_j) evaluation.
//!
//! For an ordering `π` of `n` jobs scheduled back-to-back from time 0,
//!
//! ```text
//! ΣC_j = Σ_{k=1..n} C_{π(k)} = Σ_{k=1..n} (n - k + 1) · p_{π(k)}
//! ```
//!
//! i.e. the job in position `k` carries weight `n - k + 1`. Besides the
//! linear-time full evaluation this module provides O(1) incremental forms
//! for the two moves used by the constructive and improvement algorithms:
//! exchanging two positions and inserting a job into a partial ordering.
//!
//! # References
//!
//! Smith, W. E. (1956). "Various optimizers for single-stage production",
//! *Naval Research Logistics Quarterly* 3(1-2), 59-66.

use crate::error::{Result, ScheduleError};
use crate::model::JobSet;

/// Computes ΣC_j of `order` in O(n).
///
/// `order` must be a permutation of `0..jobs.len()` (or, for partial
/// orderings, a sequence of distinct valid indices). Out-of-range indices
/// panic; use [`evaluate`] for untrusted input.
///
/// # Examples
///
/// ```
/// use u_flowtime::model::JobSet;
/// use u_flowtime::objective::total_completion_time;
///
/// let jobs = JobSet::from_processing_times([5, 3, 8]);
/// assert_eq!(total_completion_time(&jobs, &[1, 0, 2]), 27);
/// ```
pub fn total_completion_time(jobs: &JobSet, order: &[usize]) -> i64 {
    let mut sum = 0i64;
    let mut current = 0i64;
    for &idx in order {
        current += i64::from(jobs.processing_time(idx));
        sum += current;
    }
    sum
}

/// Validates `order` as a permutation of the job indices and evaluates it.
///
/// # Errors
///
/// [`ScheduleError::InvalidOrdering`] on length mismatch, out-of-range or
/// duplicate indices.
pub fn evaluate(jobs: &JobSet, order: &[usize]) -> Result<i64> {
    let n = jobs.len();
    if order.len() != n {
        return Err(ScheduleError::InvalidOrdering(format!(
            "expected {n} positions, got {}",
            order.len()
        )));
    }
    let mut seen = vec![false; n];
    for (pos, &idx) in order.iter().enumerate() {
        if idx >= n {
            return Err(ScheduleError::InvalidOrdering(format!(
                "index {idx} at position {pos} is out of range 0..{n}"
            )));
        }
        if seen[idx] {
            return Err(ScheduleError::InvalidOrdering(format!(
                "index {idx} appears more than once (again at position {pos})"
            )));
        }
        seen[idx] = true;
    }
    Ok(total_completion_time(jobs, order))
}

/// Change in ΣC_j caused by exchanging positions `i` and `j` of `order`.
///
/// With position weights `n - k`, the swap moves `p_a` from weight `n - i`
/// to `n - j` and `p_b` the other way, giving `(p_b - p_a) · (j - i)`.
/// Negative means the swap improves the objective. `order` is only read.
#[inline]
pub fn swap_delta(jobs: &JobSet, order: &[usize], i: usize, j: usize) -> i64 {
    let a = i64::from(jobs.processing_time(order[i]));
    let b = i64::from(jobs.processing_time(order[j]));
    (b - a) * (j as i64 - i as i64)
}

/// Completion-time prefix sums of a partial ordering.
///
/// `prefix[k]` is the completion time of the first `k` jobs, so the result
/// has `order.len() + 1` entries and starts with 0.
pub fn prefix_sums(jobs: &JobSet, order: &[usize]) -> Vec<i64> {
    let mut prefix = Vec::with_capacity(order.len() + 1);
    let mut acc = 0i64;
    prefix.push(acc);
    for &idx in order {
        acc += i64::from(jobs.processing_time(idx));
        prefix.push(acc);
    }
    prefix
}

/// ΣC_j of a partial ordering after inserting a job of length
/// `processing_time` at `position`.
///
/// `current` is the objective of the partial ordering and `prefix` its
/// [`prefix_sums`]. The inserted job completes at `prefix[position] + p`
/// and delays each of the `m - position` jobs behind it by `p`.
#[inline]
pub fn insertion_objective(
    current: i64,
    prefix: &[i64],
    processing_time: u32,
    position: usize,
) -> i64 {
    let m = prefix.len() - 1;
    let p = i64::from(processing_time);
    current + prefix[position] + p + p * (m - position) as i64
}
