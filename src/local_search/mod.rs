//! 2-swap local search.
//!
//! An iterative-improvement method over the neighborhood of all orderings
//! reachable by exchanging two positions. The search starts from a seeded
//! random permutation and stops when a full pass finds no improving swap,
//! when the time budget runs out, or when too many consecutive evaluations
//! fail to improve.
//!
//! - **Sequential**: first-improvement, each improving swap is committed
//!   as soon as it is found.
//! - **Parallel**: rows of the pair space are distributed over worker
//!   threads; every worker reports the best swap of each row it scanned.
//!   At the end of the pass the overall best is committed, followed by the
//!   other reported swaps whose positions do not overlap a committed one.
//!
//! Workers never write to the ordering. Swap effects are computed with
//! [`swap_delta`](crate::objective::swap_delta), which only reads it.
//!
//! # Determinism
//!
//! Sequential runs are reproducible bit for bit for a given seed. In the
//! parallel path, equally good swaps found by different workers are
//! resolved by whichever reaches the lock first, so the returned
//! permutation may differ between runs.

mod config;
mod runner;

pub use config::LsParams;
pub use runner::{local_search, LocalSearchRunner, LsResult, Termination};
