// src/dag/scheduler.rs

//! Dependency-ordered scheduler.
//!
//! A level-synchronous Kahn's algorithm fused with the concurrency-gated
//! launcher:
//!
//! 1. seed the ready queue with jobs that have no dependency;
//! 2. launch everything in the ready queue (one limiter slot each);
//! 3. wait for exactly one completion, count down the in-degree of its
//!    dependents and queue the ones reaching zero;
//! 4. repeat until every job completed.
//!
//! A job whose dependencies did not all succeed still goes through the
//! launcher, but is failed with [`JobError::RequiredJobFailed`] instead of
//! running its work. Its completion unblocks its own dependents like any
//! other, so the failure cascades down the graph.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::engine::Hooks;
use crate::errors::JobError;
use crate::exec::completion::CompletionGuard;
use crate::exec::limiter::ConcurrencyLimiter;
use crate::exec::runner::run_job;
use crate::job::{JobList, StateFlag};
use crate::types::JobId;

/// Run `jobs` in dependency order.
///
/// The dependency graph must be acyclic; callers check it first with
/// [`crate::dag::DepGraph::is_acyclic`]. On a cyclic graph the jobs caught
/// in the cycle never become ready; the loop notices it has nothing left to
/// wait for and returns with those jobs still `Pending`.
pub(crate) async fn dag_execute(jobs: Arc<JobList>, hooks: Arc<Hooks>, limiter: ConcurrencyLimiter) {
    let total = jobs.len();
    info!(jobs = total, max_concurrent = limiter.capacity(), "dag run starting");
    hooks.fire_jobs_start(&jobs);

    let graph = jobs.graph();
    let mut in_degree = graph.in_degrees();
    let mut ready: VecDeque<JobId> = graph.roots().collect();

    // Each job posts exactly once, so this capacity means posting never waits.
    let (done_tx, mut done_rx) = mpsc::channel::<JobId>(total.max(1));
    let mut tasks = JoinSet::new();
    let mut completed = 0usize;
    let mut in_flight = 0usize;

    while completed < total {
        while let Some(id) = ready.pop_front() {
            let slot = limiter.acquire().await;
            let job = &jobs[id];

            job.mark_running();
            debug!(job = %id, name = %job.name(), "dependencies resolved; job launched");
            hooks.fire_job_start(&jobs, id);

            let jobs = Arc::clone(&jobs);
            let hooks = Arc::clone(&hooks);
            let done_tx = done_tx.clone();
            in_flight += 1;
            tasks.spawn(async move {
                let guard = CompletionGuard::new(Arc::clone(&jobs), id, Some(done_tx));
                if dependencies_succeeded(&jobs, id) {
                    run_job(&jobs[id]).await;
                } else {
                    debug!(job = %id, "a dependency did not succeed; failing without running");
                    jobs[id].fail(JobError::RequiredJobFailed);
                }
                hooks.fire_job_done(&jobs, id);
                drop(slot);
                drop(guard);
            });
        }

        if in_flight == 0 {
            error!(
                completed,
                total, "no job running and none ready; dependency graph has a cycle"
            );
            break;
        }

        let Some(done) = done_rx.recv().await else {
            break;
        };
        in_flight -= 1;
        completed += 1;

        for &dependent in graph.dependents_of(done) {
            let degree = &mut in_degree[dependent.index()];
            *degree -= 1;
            if *degree == 0 {
                ready.push_back(dependent);
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(err) = joined {
            error!(error = %err, "job task did not finish cleanly");
        }
    }

    hooks.fire_jobs_done(&jobs);
    info!(jobs = total, completed, "dag run finished");
}

fn dependencies_succeeded(jobs: &JobList, id: JobId) -> bool {
    jobs.dependencies_of(id)
        .iter()
        .all(|&dep| jobs[dep].is_state(StateFlag::Succeeded))
}
