// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::job::CommandSpec;
use crate::types::{ExecutionMode, OutputMode};

/// Job file exactly as read from TOML, before validation.
///
/// ```toml
/// [config]
/// max_concurrent_jobs = 4
/// mode = "dag"
///
/// [[job]]
/// name = "fetch"
/// cmd = ["git", "fetch"]
///
/// [[job]]
/// name = "build"
/// cmd = ["cargo", "build"]
/// after = ["fetch"]
/// ```
///
/// Jobs keep file order; a job's position is its id.
#[derive(Debug, Clone, Deserialize)]
pub struct RawJobsFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub job: Vec<JobConfig>,
}

/// Validated job file. Build one with `JobsFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct JobsFile {
    pub config: ConfigSection,
    pub job: Vec<JobConfig>,
}

impl JobsFile {
    pub(crate) fn new_unchecked(config: ConfigSection, job: Vec<JobConfig>) -> Self {
        Self { config, job }
    }

    /// Position (and therefore job id) of the job called `name`.
    pub fn job_index(&self, name: &str) -> Option<usize> {
        self.job.iter().position(|job| job.name == name)
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigSection {
    /// Concurrency cap; `0` (the default) means host parallelism.
    #[serde(default)]
    pub max_concurrent_jobs: usize,

    /// `"dag"` (default) or `"flat"`.
    #[serde(default)]
    pub mode: ExecutionMode,
}

/// One `[[job]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    /// Unique name; used in `after` lists and as display name.
    pub name: String,

    /// Program followed by its arguments.
    pub cmd: Vec<String>,

    /// Names of the jobs this one depends on.
    #[serde(default)]
    pub after: Vec<String>,

    #[serde(default)]
    pub output: OutputMode,

    #[serde(default)]
    pub cwd: Option<PathBuf>,

    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl JobConfig {
    pub fn to_command_spec(&self) -> CommandSpec {
        let mut spec = CommandSpec::from_argv(self.cmd.iter().cloned()).output(self.output);
        if let Some(dir) = &self.cwd {
            spec = spec.current_dir(dir.clone());
        }
        for (key, value) in &self.env {
            spec = spec.env(key.clone(), value.clone());
        }
        spec
    }
}
