// src/engine/hooks.rs

//! Lifecycle observers.
//!
//! Four hook points, each holding an ordered list of observers:
//!
//! | point            | fired                               | job state seen  |
//! |------------------|-------------------------------------|-----------------|
//! | `on_jobs_start`  | once, before any job is launched    | all `Pending`   |
//! | `on_job_start`   | per job, right after launch         | `Running`       |
//! | `on_job_done`    | per job, when its work returned     | `Done`          |
//! | `on_jobs_done`   | once, after the last completion     | all terminal    |
//!
//! Observers registered on the same point run in registration order.
//! `on_job_done` observers run on the job's own task, concurrently with
//! other jobs, hence the `Send + Sync` bounds.

use std::fmt;
use std::sync::Arc;

use crate::job::JobList;
use crate::types::JobId;

pub type JobHook = Arc<dyn Fn(&JobList, JobId) + Send + Sync>;
pub type JobsHook = Arc<dyn Fn(&JobList) + Send + Sync>;

#[derive(Clone, Default)]
pub struct Hooks {
    jobs_start: Vec<JobsHook>,
    job_start: Vec<JobHook>,
    job_done: Vec<JobHook>,
    jobs_done: Vec<JobsHook>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_jobs_start<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&JobList) + Send + Sync + 'static,
    {
        self.jobs_start.push(Arc::new(f));
        self
    }

    pub fn on_job_start<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&JobList, JobId) + Send + Sync + 'static,
    {
        self.job_start.push(Arc::new(f));
        self
    }

    pub fn on_job_done<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&JobList, JobId) + Send + Sync + 'static,
    {
        self.job_done.push(Arc::new(f));
        self
    }

    pub fn on_jobs_done<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&JobList) + Send + Sync + 'static,
    {
        self.jobs_done.push(Arc::new(f));
        self
    }

    pub(crate) fn fire_jobs_start(&self, jobs: &JobList) {
        for hook in &self.jobs_start {
            hook(jobs);
        }
    }

    pub(crate) fn fire_job_start(&self, jobs: &JobList, id: JobId) {
        for hook in &self.job_start {
            hook(jobs, id);
        }
    }

    pub(crate) fn fire_job_done(&self, jobs: &JobList, id: JobId) {
        for hook in &self.job_done {
            hook(jobs, id);
        }
    }

    pub(crate) fn fire_jobs_done(&self, jobs: &JobList) {
        for hook in &self.jobs_done {
            hook(jobs);
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("jobs_start", &self.jobs_start.len())
            .field("job_start", &self.job_start.len())
            .field("job_done", &self.job_done.len())
            .field("jobs_done", &self.jobs_done.len())
            .finish()
    }
}
