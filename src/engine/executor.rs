// src/engine/executor.rs

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::JobsFile;
use crate::dag::scheduler::dag_execute;
use crate::engine::aggregate::{ErrorCollector, JobsError};
use crate::engine::hooks::Hooks;
use crate::errors::{JobError, Result};
use crate::exec::flat;
use crate::exec::limiter::ConcurrencyLimiter;
use crate::job::{Callable, CommandSpec, JobList, JobSpec, NamedJob, StateFlag};
use crate::types::JobId;

/// Registration, configuration and entry points for running a set of jobs.
///
/// ```no_run
/// # async fn demo() -> jobexec::errors::Result<()> {
/// use jobexec::engine::JobExecutor;
///
/// let mut executor = JobExecutor::new();
/// let fetch = executor.add_command("git", ["fetch"]);
/// let build = executor.add_command("cargo", ["build"]);
/// executor.add_dependency(build, fetch)?;
///
/// let errors = executor.dag_execute().await;
/// assert!(errors.is_empty());
/// # Ok(())
/// # }
/// ```
///
/// An executor runs its jobs once. Once any job left `Pending`, calling an
/// entry point again launches nothing and returns the errors of the first
/// run.
#[derive(Debug, Default)]
pub struct JobExecutor {
    jobs: JobList,
    hooks: Hooks,
    limiter: ConcurrencyLimiter,
    outcome: Mutex<Option<JobsError>>,
}

impl JobExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every job of a validated job file, in file order, with its
    /// dependencies and concurrency cap.
    pub fn from_config(cfg: &JobsFile) -> Result<Self> {
        let mut executor = Self::new();
        executor.set_max_concurrent_jobs(cfg.config.max_concurrent_jobs);

        for job in cfg.job.iter() {
            executor.add_job(NamedJob::new(job.name.clone(), job.to_command_spec()));
        }

        for (idx, job) in cfg.job.iter().enumerate() {
            for dep in job.after.iter() {
                if let Some(dep_idx) = cfg.job_index(dep) {
                    executor.add_dependency(JobId(idx), JobId(dep_idx))?;
                }
            }
        }

        debug!(
            jobs = executor.len(),
            edges = executor.jobs.graph().edge_count(),
            "executor built from job file"
        );
        Ok(executor)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn jobs(&self) -> &JobList {
        &self.jobs
    }

    pub fn add_job(&mut self, spec: impl Into<JobSpec>) -> JobId {
        self.jobs.push(spec.into())
    }

    pub fn add_jobs<I, S>(&mut self, specs: I) -> Vec<JobId>
    where
        I: IntoIterator<Item = S>,
        S: Into<JobSpec>,
    {
        specs.into_iter().map(|spec| self.add_job(spec)).collect()
    }

    pub fn add_command<I, S>(&mut self, program: impl Into<String>, args: I) -> JobId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_job(CommandSpec::new(program).args(args))
    }

    pub fn add_fn<F>(&mut self, f: F) -> JobId
    where
        F: Fn() -> anyhow::Result<String> + Send + Sync + 'static,
    {
        self.add_job(Callable::new(f))
    }

    pub fn add_named(&mut self, name: impl Into<String>, spec: impl Into<JobSpec>) -> JobId {
        self.add_job(NamedJob::new(name, spec))
    }

    /// Declare that `from` depends on `to`.
    ///
    /// Both ids must come from this executor.
    pub fn add_dependency(&mut self, from: JobId, to: JobId) -> Result<&mut Self> {
        self.jobs.add_dependency(from, to)?;
        Ok(self)
    }

    /// Replace the limiter with a fresh pool of `n` slots (`0` means host
    /// parallelism). A run already in progress keeps its pool.
    pub fn set_max_concurrent_jobs(&mut self, n: usize) -> &mut Self {
        self.limiter = ConcurrencyLimiter::new(n);
        self
    }

    /// Use an existing (possibly shared) limiter.
    pub fn with_limiter(&mut self, limiter: ConcurrencyLimiter) -> &mut Self {
        self.limiter = limiter;
        self
    }

    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn on_jobs_start<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&JobList) + Send + Sync + 'static,
    {
        self.hooks.on_jobs_start(f);
        self
    }

    pub fn on_job_start<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&JobList, JobId) + Send + Sync + 'static,
    {
        self.hooks.on_job_start(f);
        self
    }

    pub fn on_job_done<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&JobList, JobId) + Send + Sync + 'static,
    {
        self.hooks.on_job_done(f);
        self
    }

    pub fn on_jobs_done<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&JobList) + Send + Sync + 'static,
    {
        self.hooks.on_jobs_done(f);
        self
    }

    /// Run every job, ignoring dependencies. Returns the errors by job id.
    pub async fn execute(&self) -> JobsError {
        let mut outcome = self.outcome.lock().await;
        if let Some(previous) = self.previous_run(&outcome) {
            return previous;
        }

        let (jobs, hooks, collector) = self.prepare_run();
        flat::execute(jobs, hooks, self.limiter.clone()).await;

        let errors = collector.collected();
        *outcome = Some(errors.clone());
        errors
    }

    /// Whether the dependency graph has no cycle.
    pub fn is_acyclic(&self) -> bool {
        self.jobs.graph().is_acyclic()
    }

    /// Run every job in dependency order.
    ///
    /// When the dependency graph has a cycle nothing runs, no hook fires,
    /// and every job is reported with [`JobError::CyclicDependency`]. Such a
    /// rejected call does not count as the executor's run.
    pub async fn dag_execute(&self) -> JobsError {
        let mut outcome = self.outcome.lock().await;
        if let Some(previous) = self.previous_run(&outcome) {
            return previous;
        }

        // Nothing ran, so the outcome is not stored: every job is still
        // Pending and a flat run may still execute them.
        if !self.is_acyclic() {
            warn!(jobs = self.len(), "cyclic dependency detected; no job will run");
            return JobsError::for_all(&self.jobs, JobError::CyclicDependency);
        }

        let (jobs, hooks, collector) = self.prepare_run();
        dag_execute(jobs, hooks, self.limiter.clone()).await;

        let errors = collector.collected();
        *outcome = Some(errors.clone());
        errors
    }

    /// Graphviz rendering of jobs and their dependencies.
    pub fn to_dot(&self) -> String {
        self.jobs.graph().to_dot(|id| self.jobs[id].name())
    }

    fn previous_run(&self, outcome: &Option<JobsError>) -> Option<JobsError> {
        if let Some(errors) = outcome {
            warn!("jobs already executed; returning previous errors");
            return Some(errors.clone());
        }
        if self.jobs.iter().any(|job| !job.is_state(StateFlag::Pending)) {
            warn!("some jobs already left Pending; not running them again");
            return Some(JobsError::from_jobs(&self.jobs));
        }
        None
    }

    /// Snapshot the job list and build this run's hooks: the user's
    /// observers followed by the error collector.
    fn prepare_run(&self) -> (Arc<JobList>, Arc<Hooks>, ErrorCollector) {
        let collector = ErrorCollector::default();
        let mut hooks = self.hooks.clone();
        hooks.on_job_done(collector.observer());

        info!(jobs = self.len(), "starting run");
        (Arc::new(self.jobs.clone()), Arc::new(hooks), collector)
    }
}
