// src/exec/completion.rs

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::errors::JobError;
use crate::job::JobList;
use crate::types::JobId;

/// Dropped when a job's task ends, normally or by unwinding.
///
/// - A job that never reached a terminal state is failed with
///   [`JobError::Aborted`], so the run never ends with a job stuck in
///   `Running`.
/// - If a completion queue is attached, the job id is posted on it. The
///   queue is sized to the job count, so the post never has to wait.
pub(crate) struct CompletionGuard {
    jobs: Arc<JobList>,
    id: JobId,
    done_tx: Option<mpsc::Sender<JobId>>,
}

impl CompletionGuard {
    pub(crate) fn new(jobs: Arc<JobList>, id: JobId, done_tx: Option<mpsc::Sender<JobId>>) -> Self {
        Self { jobs, id, done_tx }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        let job = &self.jobs[self.id];
        if !job.state().is_terminal() {
            error!(job = %self.id, name = %job.name(), "job task ended without an outcome; marking failed");
            job.fail(JobError::Aborted);
        }

        if let Some(tx) = self.done_tx.take() {
            if let Err(err) = tx.try_send(self.id) {
                warn!(job = %self.id, error = %err, "could not post job completion");
            }
        }
    }
}
