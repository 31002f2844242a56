//! Job and JobSet definitions.

use std::ops::Index;

/// A single non-preemptive job on one machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Job {
    /// Display identifier (1-based when loaded from a dataset).
    pub id: usize,
    /// Processing time.
    pub processing_time: u32,
}

impl Job {
    /// Creates a job.
    pub fn new(id: usize, processing_time: u32) -> Self {
        Self {
            id,
            processing_time,
        }
    }
}

/// An ordered, immutable collection of jobs.
///
/// # Examples
///
/// ```
/// use u_flowtime::model::JobSet;
///
/// let jobs = JobSet::from_processing_times([5, 3, 8]);
/// assert_eq!(jobs.len(), 3);
/// assert_eq!(jobs[1].id, 2);
/// assert_eq!(jobs.total_processing_time(), 16);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JobSet {
    jobs: Vec<Job>,
}

impl JobSet {
    /// Wraps an explicit list of jobs.
    pub fn new(jobs: Vec<Job>) -> Self {
        Self { jobs }
    }

    /// Builds a job set from processing times, assigning 1-based ids in
    /// input order.
    pub fn from_processing_times<I>(times: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let jobs = times
            .into_iter()
            .enumerate()
            .map(|(i, p)| Job::new(i + 1, p))
            .collect();
        Self { jobs }
    }

    /// Number of jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Returns `true` if the set holds no jobs.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// The jobs in index order.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Iterates over the jobs in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Job> {
        self.jobs.iter()
    }

    /// Processing time of the job at `index`.
    #[inline]
    pub fn processing_time(&self, index: usize) -> u32 {
        self.jobs[index].processing_time
    }

    /// Sum of all processing times.
    pub fn total_processing_time(&self) -> i64 {
        self.jobs.iter().map(|j| i64::from(j.processing_time)).sum()
    }

    /// Maps an ordering of indices to the display ids of the jobs.
    pub fn ids_of(&self, order: &[usize]) -> Vec<usize> {
        order.iter().map(|&i| self.jobs[i].id).collect()
    }
}

impl Index<usize> for JobSet {
    type Output = Job;

    fn index(&self, index: usize) -> &Job {
        &self.jobs[index]
    }
}

impl From<Vec<Job>> for JobSet {
    fn from(jobs: Vec<Job>) -> Self {
        Self::new(jobs)
    }
}

impl<'a> IntoIterator for &'a JobSet {
    type Item = &'a Job;
    type IntoIter = std::slice::Iter<'a, Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs.iter()
    }
}
