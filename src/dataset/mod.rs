//! Dataset text format and synthetic instance generation.
//!
//! # Format
//!
//! ```text
//! 5
//! 12 7 88 3 41
//! ```
//!
//! The first token is the job count `n`, followed by `n` whitespace
//! separated positive processing times. Tokens may wrap across lines;
//! anything after the `n`-th time is ignored. Jobs receive 1-based ids in
//! file order.

mod generate;
mod io;

pub use generate::{generate, generate_file, Distribution};
