// src/job/state.rs

//! Job lifecycle states.

use std::fmt;

/// Outcome of a job that reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Succeeded,
    Failed,
}

/// Lifecycle of a job. Transitions only move forward:
/// `Pending -> Running -> Done(outcome)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Registered, not launched yet.
    Pending,
    /// The unit of work has been launched.
    Running,
    /// The unit of work returned (or was skipped because a dependency failed).
    Done(JobOutcome),
}

/// Query used by [`crate::job::Job::is_state`].
///
/// `Done` matches both outcomes, so observers can ask for the coarse phase
/// or the fine outcome with the same call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFlag {
    Pending,
    Running,
    Done,
    Succeeded,
    Failed,
}

impl JobState {
    pub fn matches(self, flag: StateFlag) -> bool {
        match (flag, self) {
            (StateFlag::Pending, JobState::Pending) => true,
            (StateFlag::Running, JobState::Running) => true,
            (StateFlag::Done, JobState::Done(_)) => true,
            (StateFlag::Succeeded, JobState::Done(JobOutcome::Succeeded)) => true,
            (StateFlag::Failed, JobState::Done(JobOutcome::Failed)) => true,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Done(_))
    }

    pub fn outcome(self) -> Option<JobOutcome> {
        match self {
            JobState::Done(outcome) => Some(outcome),
            JobState::Pending | JobState::Running => None,
        }
    }
}

impl Default for JobState {
    fn default() -> Self {
        JobState::Pending
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JobState::Pending => "pending",
            JobState::Running => "running",
            JobState::Done(JobOutcome::Succeeded) => "succeeded",
            JobState::Done(JobOutcome::Failed) => "failed",
        };
        f.write_str(label)
    }
}
