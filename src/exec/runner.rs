// src/exec/runner.rs

//! Runs the unit of work wrapped by a job and commits its terminal state.

use std::any::Any;
use std::process::ExitStatus;

use tracing::{debug, info};

use crate::errors::JobError;
use crate::job::{Callable, CommandSpec, Job, JobKind};
use crate::types::OutputMode;

/// Execute the job's work exactly once and record result, error, state and
/// duration on the job.
///
/// The job must already be `Running`.
pub(crate) async fn run_job(job: &Job) {
    let (result, outcome) = match job.kind() {
        JobKind::Command(spec) => run_command(spec).await,
        JobKind::Callable(callable) => run_callable(callable).await,
    };
    job.finish(result, outcome);
}

async fn run_command(spec: &CommandSpec) -> (String, Result<(), JobError>) {
    let command_line = spec.command_line();
    let mut cmd = spec.to_command();

    info!(cmd = %command_line, output = ?spec.output_mode(), "starting job process");

    match spec.output_mode() {
        OutputMode::Capture => match cmd.output().await {
            Ok(output) => {
                // stdout first, then stderr
                let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
                combined.push_str(&String::from_utf8_lossy(&output.stderr));
                (combined, exit_outcome(&command_line, output.status))
            }
            Err(err) => (String::new(), Err(JobError::spawn(command_line, err))),
        },
        OutputMode::Inherit => match cmd.status().await {
            Ok(status) => (String::new(), exit_outcome(&command_line, status)),
            Err(err) => (String::new(), Err(JobError::spawn(command_line, err))),
        },
    }
}

fn exit_outcome(command_line: &str, status: ExitStatus) -> Result<(), JobError> {
    debug!(cmd = %command_line, exit_code = ?status.code(), success = status.success(), "job process exited");
    if status.success() {
        Ok(())
    } else {
        Err(JobError::CommandFailed {
            command: command_line.to_string(),
            code: status.code(),
        })
    }
}

/// Callables are plain blocking functions, so they go to the blocking pool.
async fn run_callable(callable: &Callable) -> (String, Result<(), JobError>) {
    let func = callable.func();
    match tokio::task::spawn_blocking(move || func()).await {
        Ok(Ok(output)) => (output, Ok(())),
        Ok(Err(err)) => (String::new(), Err(JobError::callable(err))),
        Err(join_err) if join_err.is_panic() => (
            String::new(),
            Err(JobError::Panicked(panic_message(join_err.into_panic()))),
        ),
        Err(_) => (String::new(), Err(JobError::Aborted)),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
