//! Benchmark harness: timed algorithm runs, speedup bookkeeping and the
//! CSV result log.
//!
//! A [`BenchmarkSession`] remembers the single-thread time of each
//! algorithm and derives speedup and efficiency for later multi-thread
//! runs of the same algorithm. Sessions are explicit values, so separate
//! benchmarks never share baselines.
//!
//! ```no_run
//! use u_flowtime::dataset::{generate, Distribution};
//! use u_flowtime::harness::{BenchmarkSession, CsvLog};
//! use u_flowtime::local_search::LsParams;
//!
//! let jobs = generate(200, Distribution::Bimodal, Some(1));
//! let params = LsParams::for_job_count(jobs.len(), 1000);
//! let log = CsvLog::new("results.csv");
//! let mut session = BenchmarkSession::new();
//! for threads in [1, 2, 4, 8] {
//!     for record in session.run_all("input_200", &jobs, threads, &params) {
//!         log.append(&record).unwrap();
//!     }
//! }
//! ```

mod algorithm;
mod csv;
mod session;

pub use algorithm::{run_algorithm, Algorithm, RunOutcome};
pub use csv::{CsvLog, CSV_HEADER};
pub use session::{BenchmarkSession, RunRecord};
