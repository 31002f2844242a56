//! Cheapest-insertion configuration.

/// Partial-ordering length above which the position search is parallelized.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 100;

/// Configuration for [`InsertionRunner`](super::InsertionRunner).
///
/// # Examples
///
/// ```
/// use u_flowtime::insertion::InsertionConfig;
///
/// let config = InsertionConfig::default()
///     .with_threads(4)
///     .with_parallel_threshold(250);
/// assert_eq!(config.threads, 4);
/// assert_eq!(config.parallel_threshold, 250);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InsertionConfig {
    /// Number of worker threads for the position search. `0` and `1` both
    /// mean sequential.
    pub threads: usize,

    /// The position search runs in parallel only while the partial
    /// ordering holds more than this many jobs.
    pub parallel_threshold: usize,
}

impl Default for InsertionConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl InsertionConfig {
    /// Sets the worker thread count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Sets the parallelization threshold.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Whether a partial ordering of length `len` is searched in parallel.
    pub(crate) fn is_parallel_for(&self, len: usize) -> bool {
        self.threads > 1 && len > self.parallel_threshold
    }
}
