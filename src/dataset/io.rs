//! Parsing, loading and saving job sets.

use std::fs;
use std::path::Path;

use crate::error::{Result, ScheduleError};
use crate::model::JobSet;

impl JobSet {
    /// Parses a job set from the dataset text format.
    ///
    /// # Errors
    ///
    /// - [`ScheduleError::EmptyInput`] if the declared count is 0
    /// - [`ScheduleError::Malformed`] if the count is missing or not a
    ///   positive integer, or if fewer than `n` valid positive times follow
    ///
    /// # Examples
    ///
    /// ```
    /// use u_flowtime::model::JobSet;
    ///
    /// let jobs = JobSet::parse("3\n5 3 8\n").unwrap();
    /// assert_eq!(jobs.len(), 3);
    /// assert_eq!(jobs[2].processing_time, 8);
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = text.split_whitespace();

        let header = tokens.next().ok_or_else(|| ScheduleError::Malformed {
            position: 1,
            message: "missing job count".into(),
        })?;
        let n: i64 = header.parse().map_err(|_| ScheduleError::Malformed {
            position: 1,
            message: format!("job count '{header}' is not an integer"),
        })?;
        if n == 0 {
            return Err(ScheduleError::EmptyInput);
        }
        if n < 0 {
            return Err(ScheduleError::Malformed {
                position: 1,
                message: format!("job count must be positive, got {n}"),
            });
        }
        let n = usize::try_from(n).map_err(|_| ScheduleError::Malformed {
            position: 1,
            message: format!("job count {n} is too large"),
        })?;

        let mut times = Vec::with_capacity(n.min(1 << 20));
        for k in 0..n {
            let position = k + 2;
            let token = tokens.next().ok_or_else(|| ScheduleError::Malformed {
                position,
                message: format!("expected {n} processing times, found {k}"),
            })?;
            let p: u32 = token.parse().map_err(|_| ScheduleError::Malformed {
                position,
                message: format!("processing time '{token}' is not a non-negative integer"),
            })?;
            if p == 0 {
                return Err(ScheduleError::Malformed {
                    position,
                    message: "processing time must be positive".into(),
                });
            }
            times.push(p);
        }

        Ok(Self::from_processing_times(times))
    }

    /// Reads and parses a dataset file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let jobs = Self::parse(&text)?;
        tracing::debug!(path = %path.display(), n = jobs.len(), "dataset loaded");
        Ok(jobs)
    }

    /// Renders the job set in the dataset text format.
    pub fn to_text(&self) -> String {
        let times: Vec<String> = self.iter().map(|job| job.processing_time.to_string()).collect();
        format!("{}\n{}\n", self.len(), times.join(" "))
    }

    /// Writes the job set to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_text())?;
        tracing::debug!(path = %path.display(), n = self.len(), "dataset saved");
        Ok(())
    }
}
