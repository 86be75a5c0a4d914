// src/job/mod.rs

//! Jobs and job lists.
//!
//! - [`state`] holds the lifecycle state machine.
//! - [`kind`] describes what a job runs (command or callable).
//! - [`list`] is the ordered, owning collection handed to the schedulers.

pub mod kind;
pub mod list;
pub mod state;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::errors::JobError;
use crate::types::JobId;

pub use kind::{Callable, CallableFn, CommandSpec, JobKind, JobSpec, NamedJob};
pub use list::JobList;
pub use state::{JobOutcome, JobState, StateFlag};

/// Name reported for a command job without a program.
pub const EMPTY_JOB_NAME: &str = "EmptyJob";

/// Mutable part of a job, guarded by the job's lock.
#[derive(Debug, Default)]
struct JobRecord {
    state: JobState,
    result: String,
    error: Option<JobError>,
    start_time: Option<Instant>,
    duration: Option<Duration>,
}

/// A single schedulable unit of work plus its execution state.
///
/// Identity, kind and display name are fixed at registration. Everything
/// else sits behind a read/write lock: observers take the read side, the
/// scheduler and the running unit of work take the write side only to
/// commit a transition.
#[derive(Debug)]
pub struct Job {
    id: JobId,
    kind: JobKind,
    display_name: Option<String>,
    record: RwLock<JobRecord>,
}

impl Job {
    pub(crate) fn new(id: JobId, spec: JobSpec) -> Self {
        Self {
            id,
            kind: spec.kind,
            display_name: spec.display_name.filter(|name| !name.is_empty()),
            record: RwLock::new(JobRecord::default()),
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn kind(&self) -> &JobKind {
        &self.kind
    }

    pub fn is_command(&self) -> bool {
        matches!(self.kind, JobKind::Command(_))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.kind, JobKind::Callable(_))
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Human readable name: the display name if one was given, otherwise the
    /// command line or the callable's type name.
    pub fn name(&self) -> String {
        if let Some(name) = &self.display_name {
            return name.clone();
        }
        match &self.kind {
            JobKind::Command(spec) if spec.program().is_empty() => EMPTY_JOB_NAME.to_string(),
            JobKind::Command(spec) => spec.command_line(),
            JobKind::Callable(callable) => callable.identity().to_string(),
        }
    }

    pub fn state(&self) -> JobState {
        self.read().state
    }

    pub fn is_state(&self, flag: StateFlag) -> bool {
        self.read().state.matches(flag)
    }

    /// Captured output (empty until the job is done, and for inherited
    /// command output).
    pub fn result(&self) -> String {
        self.read().result.clone()
    }

    pub fn error(&self) -> Option<JobError> {
        self.read().error.clone()
    }

    pub fn start_time(&self) -> Option<Instant> {
        self.read().start_time
    }

    pub fn duration(&self) -> Option<Duration> {
        self.read().duration
    }

    /// Instant at which the job reached its terminal state.
    pub fn end_time(&self) -> Option<Instant> {
        let record = self.read();
        Some(record.start_time? + record.duration?)
    }

    /// `Pending -> Running`, stamping the start time.
    pub(crate) fn mark_running(&self) {
        let mut record = self.write();
        if record.state != JobState::Pending {
            warn!(job = %self.id, state = %record.state, "refusing to restart a job that already left Pending");
            return;
        }
        record.start_time = Some(Instant::now());
        record.state = JobState::Running;
    }

    /// `Running -> Done(..)`: commit result, error and duration in one step.
    pub(crate) fn finish(&self, result: String, outcome: Result<(), JobError>) {
        let mut record = self.write();
        if record.state.is_terminal() {
            warn!(job = %self.id, "job already terminal; ignoring second completion");
            return;
        }

        let now = Instant::now();
        let start = *record.start_time.get_or_insert(now);
        record.duration = Some(now.saturating_duration_since(start));
        record.result = result;
        record.state = match outcome {
            Ok(()) => JobState::Done(JobOutcome::Succeeded),
            Err(err) => {
                record.error = Some(err);
                JobState::Done(JobOutcome::Failed)
            }
        };

        debug!(
            job = %self.id,
            state = %record.state,
            duration_ms = record.duration.map(|d| d.as_millis()).unwrap_or_default(),
            "job reached terminal state"
        );
    }

    pub(crate) fn fail(&self, err: JobError) {
        self.finish(String::new(), Err(err));
    }

    fn read(&self) -> RwLockReadGuard<'_, JobRecord> {
        self.record.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, JobRecord> {
        self.record.write().unwrap_or_else(PoisonError::into_inner)
    }
}
