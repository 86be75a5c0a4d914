// src/exec/flat.rs

//! Dependency-agnostic scheduler: every job runs, bounded only by the
//! concurrency limiter.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::engine::Hooks;
use crate::exec::completion::CompletionGuard;
use crate::exec::limiter::ConcurrencyLimiter;
use crate::exec::runner::run_job;
use crate::job::JobList;

/// Run every job of `jobs`, ignoring dependency edges.
///
/// Slots are acquired in insertion order, so launch order follows
/// insertion order; completion order is whatever the work dictates.
/// Returns once every job is terminal and the "all done" hooks ran.
pub(crate) async fn execute(jobs: Arc<JobList>, hooks: Arc<Hooks>, limiter: ConcurrencyLimiter) {
    info!(jobs = jobs.len(), max_concurrent = limiter.capacity(), "flat run starting");
    hooks.fire_jobs_start(&jobs);

    let mut tasks = JoinSet::new();

    for job in jobs.iter() {
        let id = job.id();
        let slot = limiter.acquire().await;

        job.mark_running();
        debug!(job = %id, name = %job.name(), "job launched");
        hooks.fire_job_start(&jobs, id);

        let jobs = Arc::clone(&jobs);
        let hooks = Arc::clone(&hooks);
        tasks.spawn(async move {
            let guard = CompletionGuard::new(Arc::clone(&jobs), id, None);
            run_job(&jobs[id]).await;
            hooks.fire_job_done(&jobs, id);
            drop(slot);
            drop(guard);
        });
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(err) = joined {
            error!(error = %err, "job task did not finish cleanly");
        }
    }

    hooks.fire_jobs_done(&jobs);
    info!(jobs = jobs.len(), "flat run finished");
}
