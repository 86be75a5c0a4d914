// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{JobsFile, RawJobsFile};
use crate::errors::Result;

/// Read and deserialize a job file, without semantic validation.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawJobsFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let raw: RawJobsFile = toml::from_str(&contents)?;
    Ok(raw)
}

/// Read, deserialize and validate a job file.
///
/// Checks for:
/// - an empty job list,
/// - duplicate or empty names, empty commands,
/// - unknown or self-referencing `after` entries,
/// - dependency cycles.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<JobsFile> {
    let raw = load_from_path(path)?;
    JobsFile::try_from(raw)
}

/// Parse and validate a job file held in memory.
pub fn parse_and_validate(contents: &str) -> Result<JobsFile> {
    let raw: RawJobsFile = toml::from_str(contents)?;
    JobsFile::try_from(raw)
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("Jobs.toml")
}
