//! Single-machine scheduling for total completion time (1||ΣC_j).
//!
//! Given jobs with processing times, find the order that minimizes the sum
//! of their completion times on one machine:
//!
//! - **Objective**: linear-time ΣC_j evaluation plus O(1) swap and
//!   insertion deltas.
//! - **SPT**: shortest processing time first, the exact optimum, with an
//!   optional parallel sort.
//! - **Cheapest insertion**: greedy construction with a thread-partitioned
//!   position search.
//! - **Local search**: seeded random start improved by pairwise swaps,
//!   sequential first-improvement or parallel best-improvement, bounded by
//!   a time budget.
//! - **Dataset** and **harness**: instance files, synthetic generation,
//!   timed runs with speedup/efficiency and a CSV result log.
//!
//! # Examples
//!
//! ```
//! use u_flowtime::local_search::{local_search, LsParams};
//! use u_flowtime::model::JobSet;
//! use u_flowtime::objective::total_completion_time;
//! use u_flowtime::spt::spt_order;
//!
//! let jobs = JobSet::from_processing_times([5, 3, 8]);
//! let order = spt_order(&jobs, 1);
//! assert_eq!(total_completion_time(&jobs, &order), 27);
//!
//! let result = local_search(&jobs, &LsParams::default(), 2);
//! assert!(result.objective <= result.initial_objective);
//! ```
//!
//! # Logging
//!
//! Runs emit `tracing` events (`debug` for summaries, `trace` per pass).
//! The crate installs no subscriber.

pub mod dataset;
pub mod error;
pub mod harness;
pub mod insertion;
pub mod local_search;
pub mod model;
pub mod objective;
pub mod spt;

pub use error::{Result, ScheduleError};
