use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Index of a job inside its [`crate::job::JobList`].
///
/// Assigned at registration time (equal to the insertion position) and
/// never reused. All cross references (dependency edges, error map keys)
/// use this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(pub(crate) usize);

impl JobId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<JobId> for usize {
    fn from(id: JobId) -> Self {
        id.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a command job does with its stdout / stderr.
///
/// - `Capture`: both streams are collected and stored, combined, as the job
///   result (default).
/// - `Inherit`: the streams stay attached to the parent process so another
///   collaborator can stream them; only the exit status is recorded and the
///   job result stays empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Capture,
    Inherit,
}

impl Default for OutputMode {
    fn default() -> Self {
        OutputMode::Capture
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "capture" => Ok(OutputMode::Capture),
            "inherit" => Ok(OutputMode::Inherit),
            other => Err(format!(
                "invalid output mode: {other} (expected \"capture\" or \"inherit\")"
            )),
        }
    }
}

/// How a job file should be run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Respect `after = [...]` dependencies.
    Dag,
    /// Ignore dependencies; everything is only bounded by the limiter.
    Flat,
}

impl Default for ExecutionMode {
    fn default() -> Self {
        ExecutionMode::Dag
    }
}

impl FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dag" => Ok(ExecutionMode::Dag),
            "flat" => Ok(ExecutionMode::Flat),
            other => Err(format!(
                "invalid mode: {other} (expected \"dag\" or \"flat\")"
            )),
        }
    }
}
