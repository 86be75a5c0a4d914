// src/engine/aggregate.rs

//! Per-run error collection.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::errors::JobError;
use crate::job::JobList;
use crate::types::JobId;

/// Terminal errors of a run, keyed by job id.
///
/// Jobs that succeeded have no entry. A non-empty map is itself an error
/// whose message lists every job error, one per line, in job order.
#[derive(Debug, Clone, Default)]
pub struct JobsError {
    errors: BTreeMap<JobId, JobError>,
}

impl JobsError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every job of `jobs` failed with the same error.
    pub(crate) fn for_all(jobs: &JobList, err: JobError) -> Self {
        Self {
            errors: jobs.iter().map(|job| (job.id(), err.clone())).collect(),
        }
    }

    /// Errors currently recorded on the jobs themselves.
    pub(crate) fn from_jobs(jobs: &JobList) -> Self {
        Self {
            errors: jobs
                .iter()
                .filter_map(|job| job.error().map(|err| (job.id(), err)))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, id: JobId) -> Option<&JobError> {
        self.errors.get(&id)
    }

    pub fn contains(&self, id: JobId) -> bool {
        self.errors.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (JobId, &JobError)> {
        self.errors.iter().map(|(id, err)| (*id, err))
    }

    /// `Ok(())` when no job failed, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), JobsError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    fn insert(&mut self, id: JobId, err: JobError) {
        self.errors.insert(id, err);
    }
}

impl fmt::Display for JobsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.errors.values().map(ToString::to_string).collect();
        f.write_str(&lines.join("\n"))
    }
}

impl std::error::Error for JobsError {}

impl IntoIterator for JobsError {
    type Item = (JobId, JobError);
    type IntoIter = std::collections::btree_map::IntoIter<JobId, JobError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// Shared sink filled by a "job done" observer during a run.
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorCollector {
    inner: Arc<Mutex<JobsError>>,
}

impl ErrorCollector {
    /// Observer copying the finished job's error, if any, into the sink.
    pub(crate) fn observer(&self) -> impl Fn(&JobList, JobId) + Send + Sync + 'static {
        let inner = Arc::clone(&self.inner);
        move |jobs: &JobList, id: JobId| {
            if let Some(err) = jobs[id].error() {
                inner
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(id, err);
            }
        }
    }

    pub(crate) fn collected(&self) -> JobsError {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
