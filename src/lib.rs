// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod job;
pub mod logging;
pub mod report;
pub mod types;

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::{CliArgs, OutputStyle};
use crate::config::{load_and_validate, JobsFile};
use crate::engine::{JobExecutor, JobsError};
use crate::types::ExecutionMode;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - job file loading + CLI overrides
/// - the executor
/// - stdout reporting, hooked into the executor's lifecycle events
///
/// Returns the errors of the run; setup problems are returned as `Err`.
pub async fn run(args: CliArgs) -> Result<JobsError> {
    let config_path = args.config.clone();
    let cfg = load_and_validate(&config_path)
        .with_context(|| format!("loading job file {}", config_path.display()))?;

    let mut executor = JobExecutor::from_config(&cfg)?;
    if let Some(max_jobs) = args.max_jobs {
        executor.set_max_concurrent_jobs(max_jobs);
    }

    if args.graph {
        print!("{}", executor.to_dot());
        return Ok(JobsError::new());
    }

    if args.dry_run {
        print_dry_run(&cfg, &executor);
        return Ok(JobsError::new());
    }

    attach_reporter(&mut executor, args.output);
    if args.start_output {
        executor.on_job_start(|jobs, id| emit(&report::start_line(&jobs[id])));
    }

    let mode = if args.flat {
        ExecutionMode::Flat
    } else {
        cfg.config.mode
    };
    info!(?mode, max_concurrent = executor.limiter().capacity(), "running jobs");

    let errors = match mode {
        ExecutionMode::Flat => executor.execute().await,
        ExecutionMode::Dag => executor.dag_execute().await,
    };

    println!("{}", report::summary(executor.jobs()));
    Ok(errors)
}

/// Subscribe stdout reporting to the executor's lifecycle events.
fn attach_reporter(executor: &mut JobExecutor, style: OutputStyle) {
    match style {
        OutputStyle::Fifo => {
            executor
                .on_jobs_start(|jobs| emit(&report::start_summary(jobs)))
                .on_job_done(|jobs, id| emit(&report::status_full(&jobs[id])));
        }
        OutputStyle::Ordered => {
            executor
                .on_jobs_start(|jobs| emit(&report::start_summary(jobs)))
                .on_jobs_done(|jobs| emit(&report::done_report(jobs)));
        }
        OutputStyle::Quiet => {}
    }
}

/// Write a whole block to stdout at once so concurrent reports don't
/// interleave.
fn emit(text: &str) {
    let mut stdout = std::io::stdout().lock();
    if let Err(err) = stdout.write_all(text.as_bytes()).and_then(|_| stdout.flush()) {
        debug!(error = %err, "failed to write report to stdout");
    }
}

/// Simple dry-run output: print settings, jobs, deps and commands.
fn print_dry_run(cfg: &JobsFile, executor: &JobExecutor) {
    println!("jobexec dry-run");
    println!("  config.mode = {:?}", cfg.config.mode);
    println!(
        "  max concurrent jobs = {}",
        executor.limiter().capacity()
    );
    println!();

    println!("jobs ({}):", cfg.job.len());
    for job in cfg.job.iter() {
        println!("  - {}", job.name);
        println!("      cmd: {}", job.cmd.join(" "));
        if !job.after.is_empty() {
            println!("      after: {:?}", job.after);
        }
        println!("      output: {:?}", job.output);
        if let Some(ref cwd) = job.cwd {
            println!("      cwd: {}", cwd.display());
        }
        if !job.env.is_empty() {
            println!("      env: {:?}", job.env);
        }
    }

    debug!("dry-run complete (no execution)");
}
