//! Synthetic instance generation.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::model::JobSet;

/// Share of short jobs in a [`Distribution::Bimodal`] instance.
const BIMODAL_SHORT_SHARE: f64 = 0.8;

/// Processing-time distribution of a generated instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Distribution {
    /// Uniform on `[1, 100]`.
    #[default]
    Uniform,

    /// 80% uniform on `[1, 100]`, 20% uniform on `[300, 800]`.
    Bimodal,
}

impl Distribution {
    fn sample<R: Rng>(self, rng: &mut R) -> u32 {
        match self {
            Distribution::Uniform => rng.random_range(1..=100),
            Distribution::Bimodal => {
                if rng.random_bool(BIMODAL_SHORT_SHARE) {
                    rng.random_range(1..=100)
                } else {
                    rng.random_range(300..=800)
                }
            }
        }
    }
}

/// Generates `n` jobs drawn from `distribution`.
///
/// With `seed = None` the generator is seeded from the operating system.
///
/// # Examples
///
/// ```
/// use u_flowtime::dataset::{generate, Distribution};
///
/// let jobs = generate(200, Distribution::Uniform, Some(1));
/// assert_eq!(jobs.len(), 200);
/// assert!(jobs.iter().all(|j| (1..=100).contains(&j.processing_time)));
/// ```
pub fn generate(n: usize, distribution: Distribution, seed: Option<u64>) -> JobSet {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };
    JobSet::from_processing_times((0..n).map(|_| distribution.sample(&mut rng)))
}

/// Generates an instance and writes it to `path` in the dataset format.
pub fn generate_file(
    path: impl AsRef<Path>,
    n: usize,
    distribution: Distribution,
    seed: Option<u64>,
) -> Result<JobSet> {
    let jobs = generate(n, distribution, seed);
    jobs.save(path.as_ref())?;
    tracing::info!(
        path = %path.as_ref().display(),
        n,
        ?distribution,
        "instance generated"
    );
    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_range() {
        let jobs = generate(2000, Distribution::Uniform, Some(3));
        assert!(jobs.iter().all(|j| (1..=100).contains(&j.processing_time)));
    }

    #[test]
    fn test_bimodal_ranges_and_share() {
        let jobs = generate(5000, Distribution::Bimodal, Some(5));
        let long = jobs.iter().filter(|j| j.processing_time >= 300).count();
        assert!(jobs
            .iter()
            .all(|j| (1..=100).contains(&j.processing_time)
                || (300..=800).contains(&j.processing_time)));
        // Expected 1000 long jobs; allow a wide margin.
        assert!((700..=1300).contains(&long), "long jobs: {long}");
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate(100, Distribution::Bimodal, Some(9));
        let b = generate(100, Distribution::Bimodal, Some(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_zero() {
        assert!(generate(0, Distribution::Uniform, None).is_empty());
    }

    #[test]
    fn test_generate_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("input_50.txt");
        let jobs = generate_file(&path, 50, Distribution::Uniform, Some(1)).unwrap();
        assert_eq!(JobSet::load(&path).unwrap(), jobs);
    }
}
