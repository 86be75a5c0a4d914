// src/engine/mod.rs

//! Public face of the scheduler.
//!
//! - [`executor`] holds [`JobExecutor`]: job registration, configuration,
//!   hook subscription and the run entry points.
//! - [`hooks`] holds the lifecycle observer lists.
//! - [`aggregate`] holds [`JobsError`], the per-run error map.

pub mod aggregate;
pub mod executor;
pub mod hooks;

pub use aggregate::JobsError;
pub use executor::JobExecutor;
pub use hooks::{Hooks, JobHook, JobsHook};
