// src/exec/mod.rs

//! Execution layer.
//!
//! - [`limiter`] caps the number of jobs running at once.
//! - [`runner`] runs a single job's command or callable and records the
//!   outcome on the job.
//! - [`flat`] runs a whole job list without looking at dependencies.
//! - [`completion`] guarantees every launched job reports back, even if an
//!   observer panics.
//!
//! The dependency-ordered scheduler lives in [`crate::dag::scheduler`] and
//! reuses the same building blocks.

pub(crate) mod completion;
pub(crate) mod flat;
pub mod limiter;
pub(crate) mod runner;

pub use limiter::{host_parallelism, ConcurrencyLimiter, Slot};
