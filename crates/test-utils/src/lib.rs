//! Shared helpers for the `jobexec` integration tests.
//!
//! - [`builders`]: job-file builders and the nine-job reference graph.
//! - [`fixtures`]: canned callables, [`ConcurrencyProbe`], [`EventLog`].

pub mod builders;
pub mod fixtures;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use jobexec::engine::JobExecutor;
use jobexec::logging::{build_filter, LOG_ENV_VAR};
use tracing_subscriber::fmt;

pub use fixtures::{ConcurrencyProbe, EventLog};

/// Upper bound for a whole run in tests. Fixture jobs hold for tens of
/// milliseconds; a run exceeding this is taken as a hung scheduler.
pub const RUN_TIMEOUT: Duration = Duration::from_secs(10);

static TRACING: Once = Once::new();

/// Route the library's tracing events to the test harness, filtered like
/// the binary does (`JOBEXEC_LOG=jobexec::dag=debug cargo test`).
pub fn init_tracing() {
    TRACING.call_once(|| {
        let env_value = std::env::var(LOG_ENV_VAR).ok();
        let _ = fmt()
            .with_env_filter(build_filter(None, env_value.as_deref()))
            .with_test_writer()
            .try_init();
    });
}

/// Await a run, failing the test if it exceeds [`RUN_TIMEOUT`].
pub async fn with_timeout<F, T>(run: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(RUN_TIMEOUT, run).await {
        Ok(output) => output,
        Err(_) => panic!("run did not finish within {RUN_TIMEOUT:?}"),
    }
}

/// Empty executor capped at `max_concurrent` running jobs.
pub fn limited_executor(max_concurrent: usize) -> JobExecutor {
    let mut executor = JobExecutor::new();
    executor.set_max_concurrent_jobs(max_concurrent);
    executor
}

/// Executor running `count` probe jobs, each held for `hold`, at most
/// `max_concurrent` at a time.
pub fn contended_executor(
    probe: &ConcurrencyProbe,
    count: usize,
    hold: Duration,
    max_concurrent: usize,
) -> JobExecutor {
    let mut executor = limited_executor(max_concurrent);
    for _ in 0..count {
        executor.add_fn(probe.job(hold));
    }
    executor
}
