// src/errors.rs

//! Crate-wide error types.
//!
//! - [`JobexecError`] covers setup problems: loading a job file, wiring
//!   dependencies between jobs that don't exist, etc. These are returned
//!   straight to the caller and never end up in a [`crate::engine::JobsError`].
//! - [`JobError`] is the terminal error recorded on a single job.

use std::sync::Arc;

use thiserror::Error;

use crate::types::JobId;

#[derive(Error, Debug)]
pub enum JobexecError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unknown job: {0}")]
    UnknownJob(JobId),

    #[error("Cycle detected in job graph: {0}")]
    DagCycle(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, JobexecError>;

/// Terminal error of a single job.
///
/// Cheap to clone: the job keeps its copy while the aggregated
/// [`crate::engine::JobsError`] holds another.
#[derive(Error, Debug, Clone)]
pub enum JobError {
    /// The command ran and exited unsuccessfully. `code` is `None` when the
    /// process was terminated by a signal.
    #[error("command `{command}` failed with {}", exit_label(.code))]
    CommandFailed { command: String, code: Option<i32> },

    /// The command could not be started at all.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The callable returned an error.
    #[error("{0:#}")]
    Callable(Arc<anyhow::Error>),

    /// The callable panicked.
    #[error("job panicked: {0}")]
    Panicked(String),

    /// At least one dependency did not succeed, so the job never ran.
    #[error("required dependency failed")]
    RequiredJobFailed,

    /// A dependency-ordered run was requested on a cyclic graph.
    #[error("cyclic dependency detected")]
    CyclicDependency,

    /// The job's task ended without recording an outcome.
    #[error("job aborted before completion")]
    Aborted,
}

impl JobError {
    pub fn callable(err: anyhow::Error) -> Self {
        JobError::Callable(Arc::new(err))
    }

    pub fn spawn(command: impl Into<String>, err: std::io::Error) -> Self {
        JobError::Spawn {
            command: command.into(),
            source: Arc::new(err),
        }
    }

    /// Whether the job was failed by the scheduler without its own work
    /// being the cause.
    pub fn is_scheduling_failure(&self) -> bool {
        matches!(self, JobError::RequiredJobFailed | JobError::CyclicDependency)
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
