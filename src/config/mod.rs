// src/config/mod.rs

//! Job file loading and validation.
//!
//! - `model.rs`: the TOML-backed data model.
//! - `loader.rs`: reading a job file from disk or memory.
//! - `validate.rs`: names, commands, dependencies and acyclicity.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, parse_and_validate};
pub use model::{ConfigSection, JobConfig, JobsFile, RawJobsFile};
