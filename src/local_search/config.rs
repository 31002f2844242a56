//! Local search parameters.

use std::time::Duration;

/// Parameters for one local search invocation.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_flowtime::local_search::LsParams;
///
/// let params = LsParams::for_job_count(200, 1000)
///     .with_time_budget_ms(500)
///     .with_seed(7);
/// assert_eq!(params.max_no_improve_tries, 200_000);
/// assert_eq!(params.time_budget, Duration::from_millis(500));
/// assert_eq!(params.seed, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LsParams {
    /// Maximum consecutive non-improving swap evaluations before giving up.
    /// 0 = no limit.
    pub max_no_improve_tries: usize,

    /// Wall-clock budget for the whole search, measured on a monotonic
    /// clock.
    pub time_budget: Duration,

    /// Seed of the random starting permutation.
    pub seed: u64,
}

impl Default for LsParams {
    fn default() -> Self {
        Self {
            max_no_improve_tries: 1000,
            time_budget: Duration::from_millis(2000),
            seed: 42,
        }
    }
}

impl LsParams {
    /// Default parameters with `max_no_improve_tries = job_count * factor`.
    pub fn for_job_count(job_count: usize, factor: usize) -> Self {
        Self::default().with_max_no_improve_tries(job_count.saturating_mul(factor))
    }

    /// Sets the non-improving evaluation limit.
    pub fn with_max_no_improve_tries(mut self, n: usize) -> Self {
        self.max_no_improve_tries = n;
        self
    }

    /// Sets the time budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    /// Sets the time budget in milliseconds.
    pub fn with_time_budget_ms(self, ms: u64) -> Self {
        self.with_time_budget(Duration::from_millis(ms))
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = LsParams::default();
        assert_eq!(params.max_no_improve_tries, 1000);
        assert_eq!(params.time_budget, Duration::from_secs(2));
        assert_eq!(params.seed, 42);
    }

    #[test]
    fn test_for_job_count_saturates() {
        let params = LsParams::for_job_count(usize::MAX, 1000);
        assert_eq!(params.max_no_improve_tries, usize::MAX);
    }

    #[test]
    fn test_builder() {
        let params = LsParams::default()
            .with_max_no_improve_tries(0)
            .with_time_budget(Duration::from_secs(5))
            .with_seed(123);
        assert_eq!(params.max_no_improve_tries, 0);
        assert_eq!(params.time_budget, Duration::from_secs(5));
        assert_eq!(params.seed, 123);
    }
}
