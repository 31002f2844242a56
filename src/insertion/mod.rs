//! Cheapest-insertion construction.
//!
//! A greedy constructive heuristic: jobs are taken in ascending processing
//! time and each one is inserted at the position of the partial ordering
//! that yields the smallest total completion time.
//!
//! The position search can be split across worker threads once the partial
//! ordering is long enough for the parallel overhead to pay off.
//!
//! # References
//!
//! Rosenkrantz, Stearns & Lewis (1977), "An Analysis of Several Heuristics
//! for the Traveling Salesman Problem" (insertion heuristics).

mod config;
mod runner;

pub use config::{InsertionConfig, DEFAULT_PARALLEL_THRESHOLD};
pub use runner::{cheapest_insertion_order, InsertionResult, InsertionRunner};
