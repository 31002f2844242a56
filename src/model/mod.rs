//! Problem data: jobs and job sets.
//!
//! A [`JobSet`] is an ordered sequence of [`Job`]s. Algorithms refer to a
//! job by its position in the set (`0..n`); the `id` field is carried only
//! for display and reporting.

mod job;

pub use job::{Job, JobSet};
