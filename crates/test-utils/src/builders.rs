#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use jobexec::config::{ConfigSection, JobConfig, JobsFile, RawJobsFile};
use jobexec::engine::JobExecutor;
use jobexec::types::{ExecutionMode, JobId, OutputMode};

use crate::fixtures::{fail_fn, success_fn};

/// Builder for `JobsFile` to simplify test setup.
pub struct JobsFileBuilder {
    file: RawJobsFile,
}

impl JobsFileBuilder {
    pub fn new() -> Self {
        Self {
            file: RawJobsFile {
                config: ConfigSection::default(),
                job: Vec::new(),
            },
        }
    }

    pub fn with_job(mut self, job: JobConfig) -> Self {
        self.file.job.push(job);
        self
    }

    pub fn max_concurrent_jobs(mut self, n: usize) -> Self {
        self.file.config.max_concurrent_jobs = n;
        self
    }

    pub fn mode(mut self, mode: ExecutionMode) -> Self {
        self.file.config.mode = mode;
        self
    }

    /// Raw (unvalidated) file, for exercising validation errors.
    pub fn build_raw(self) -> RawJobsFile {
        self.file
    }

    pub fn build(self) -> JobsFile {
        JobsFile::try_from(self.file).expect("Failed to build valid job file from builder")
    }
}

impl Default for JobsFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `JobConfig`.
pub struct JobConfigBuilder {
    job: JobConfig,
}

impl JobConfigBuilder {
    /// `cmd` is split on whitespace into program + arguments.
    pub fn new(name: &str, cmd: &str) -> Self {
        Self {
            job: JobConfig {
                name: name.to_string(),
                cmd: cmd.split_whitespace().map(str::to_string).collect(),
                after: vec![],
                output: OutputMode::Capture,
                cwd: None,
                env: BTreeMap::new(),
            },
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.job.after.push(dep.to_string());
        self
    }

    pub fn output(mut self, mode: OutputMode) -> Self {
        self.job.output = mode;
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.job.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.job.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn build(self) -> JobConfig {
        self.job
    }
}

/// Dependency edges (`from` depends on `to`) of the nine-job reference graph.
pub const REFERENCE_EDGES: [(usize, usize); 7] =
    [(0, 1), (0, 5), (2, 3), (4, 7), (6, 2), (7, 8), (7, 0)];

/// Executor with nine callable jobs wired as [`REFERENCE_EDGES`]. Jobs whose
/// index is in `failing` return an error; the rest succeed.
pub fn reference_graph(failing: &[usize]) -> (JobExecutor, Vec<JobId>) {
    let mut executor = JobExecutor::new();
    let ids: Vec<JobId> = (0..9)
        .map(|idx| {
            let name = format!("job{idx}");
            if failing.contains(&idx) {
                executor.add_named(name, jobexec::job::Callable::new(fail_fn(idx)))
            } else {
                executor.add_named(name, jobexec::job::Callable::new(success_fn(idx)))
            }
        })
        .collect();

    for (from, to) in REFERENCE_EDGES {
        executor
            .add_dependency(ids[from], ids[to])
            .expect("reference edges only use registered ids");
    }

    (executor, ids)
}
