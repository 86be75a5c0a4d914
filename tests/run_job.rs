// tests/run_job.rs

mod common;

use common::init_tracing;
use jobexec::engine::JobExecutor;
use jobexec::errors::JobError;
use jobexec::job::{CommandSpec, StateFlag};
use jobexec::types::OutputMode;
use jobexec_test_utils::fixtures::{fail_fn, success_fn};

#[tokio::test(flavor = "multi_thread")]
async fn captured_command_stores_stdout_then_stderr() {
    init_tracing();

    let mut executor = JobExecutor::new();
    let id = executor.add_command("sh", ["-c", "echo out; echo err >&2"]);

    let errors = executor.execute().await;
    assert!(errors.is_empty(), "unexpected errors: {errors}");

    let job = &executor.jobs()[id];
    assert!(job.is_state(StateFlag::Succeeded));
    assert_eq!(job.result(), "out\nerr\n");
    assert!(job.duration().is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn inherited_command_records_status_only() {
    init_tracing();

    let mut executor = JobExecutor::new();
    let id = executor.add_job(
        CommandSpec::new("sh")
            .args(["-c", "echo streamed"])
            .output(OutputMode::Inherit),
    );

    let errors = executor.execute().await;
    assert!(errors.is_empty());
    assert_eq!(executor.jobs()[id].result(), "");
    assert!(executor.jobs()[id].is_state(StateFlag::Succeeded));
}

#[tokio::test(flavor = "multi_thread")]
async fn failing_command_reports_exit_code() {
    init_tracing();

    let mut executor = JobExecutor::new();
    let id = executor.add_command("sh", ["-c", "exit 3"]);

    let errors = executor.execute().await;
    match errors.get(id) {
        Some(JobError::CommandFailed { code, command }) => {
            assert_eq!(*code, Some(3));
            assert_eq!(command, "sh -c exit 3");
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
    assert!(executor.jobs()[id].is_state(StateFlag::Failed));
}

#[tokio::test(flavor = "multi_thread")]
async fn commands_run_in_their_directory_with_their_env() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();

    let mut executor = JobExecutor::new();
    let id = executor.add_job(
        CommandSpec::new("sh")
            .args(["-c", "pwd; echo $JOBEXEC_TEST_VAR"])
            .current_dir(dir.path())
            .env("JOBEXEC_TEST_VAR", "hello"),
    );

    assert!(executor.execute().await.is_empty());
    let result = executor.jobs()[id].result();
    let canonical = dir.path().canonicalize().unwrap();
    assert!(result.contains(canonical.to_str().unwrap()), "got {result}");
    assert!(result.ends_with("hello\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_command_fails_to_spawn() {
    init_tracing();

    let mut executor = JobExecutor::new();
    let id = executor.add_job(CommandSpec::new(""));

    let errors = executor.execute().await;
    assert!(matches!(errors.get(id), Some(JobError::Spawn { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn callable_output_and_error_are_recorded() {
    init_tracing();

    let mut executor = JobExecutor::new();
    let ok = executor.add_fn(success_fn(0));
    let failed = executor.add_fn(fail_fn(1));

    let errors = executor.execute().await;

    assert_eq!(executor.jobs()[ok].result(), "ok 0");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get(failed).map(ToString::to_string).as_deref(), Some("job 1 failed"));
    assert_eq!(executor.jobs()[failed].result(), "");
}

#[tokio::test(flavor = "multi_thread")]
async fn panicking_callable_fails_only_its_job() {
    init_tracing();

    let mut executor = JobExecutor::new();
    let boom = executor.add_fn(|| -> anyhow::Result<String> { panic!("boom") });
    let fine = executor.add_fn(success_fn(1));

    let errors = executor.execute().await;

    match errors.get(boom) {
        Some(JobError::Panicked(msg)) => assert_eq!(msg, "boom"),
        other => panic!("expected Panicked, got {other:?}"),
    }
    assert!(executor.jobs()[fine].is_state(StateFlag::Succeeded));
}
