// tests/executor_api.rs

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::{init_tracing, names_of, with_timeout};
use jobexec::engine::JobExecutor;
use jobexec::errors::{JobError, JobexecError};
use jobexec::exec::host_parallelism;
use jobexec::job::StateFlag;
use jobexec_test_utils::builders::{reference_graph, JobConfigBuilder, JobsFileBuilder};
use jobexec_test_utils::fixtures::{fail_fn, success_fn};

#[tokio::test(flavor = "multi_thread")]
async fn three_callables_one_failure() {
    init_tracing();

    let mut executor = JobExecutor::new();
    let ids = executor.add_jobs([
        jobexec::job::JobSpec::callable(success_fn(0)),
        jobexec::job::JobSpec::callable(fail_fn(1)),
        jobexec::job::JobSpec::callable(success_fn(2)),
    ]);

    let errors = with_timeout(executor.execute()).await;

    assert_eq!(errors.len(), 1);
    assert!(errors.contains(ids[1]));
    assert_eq!(executor.jobs()[ids[0]].result(), "ok 0");
    assert_eq!(executor.jobs()[ids[2]].result(), "ok 2");
    assert!(executor.jobs()[ids[0]].is_state(StateFlag::Succeeded));
    assert!(executor.jobs()[ids[1]].is_state(StateFlag::Failed));
    assert!(executor.jobs()[ids[2]].is_state(StateFlag::Succeeded));
    assert!(errors.clone().into_result().is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn error_count_matches_failed_jobs() {
    init_tracing();
    let (executor, _) = reference_graph(&[3, 8]);

    let errors = with_timeout(executor.dag_execute()).await;

    let failed = executor.jobs().iter().filter(|job| job.is_state(StateFlag::Failed)).count();
    assert_eq!(errors.len(), failed);
    for (id, err) in errors.iter() {
        assert_eq!(executor.jobs()[id].error().map(|e| e.to_string()), Some(err.to_string()));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn jobs_error_lists_messages_in_job_order() {
    init_tracing();

    let mut executor = JobExecutor::new();
    executor.add_fn(fail_fn(0));
    executor.add_fn(success_fn(1));
    executor.add_fn(fail_fn(2));

    let errors = with_timeout(executor.execute()).await;

    assert_eq!(errors.to_string(), "job 0 failed\njob 2 failed");
    let boxed: Box<dyn std::error::Error> = Box::new(errors);
    assert!(boxed.to_string().starts_with("job 0 failed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn flat_run_still_runs_jobs_after_cyclic_dag_rejection() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));

    let mut executor = JobExecutor::new();
    let ids: Vec<_> = (0..2)
        .map(|_| {
            let counter = Arc::clone(&calls);
            executor.add_fn(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(String::new())
            })
        })
        .collect();
    executor
        .add_dependency(ids[0], ids[1])
        .unwrap()
        .add_dependency(ids[1], ids[0])
        .unwrap();

    let rejected = with_timeout(executor.dag_execute()).await;
    assert_eq!(rejected.len(), 2);
    assert!(executor.jobs().iter().all(|job| job.is_state(StateFlag::Pending)));

    let flat = with_timeout(executor.execute()).await;

    assert!(flat.is_empty(), "unexpected errors: {flat}");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(executor.jobs().iter().all(|job| job.is_state(StateFlag::Succeeded)));

    // The flat run counts as the executor's run from now on.
    let again = with_timeout(executor.execute()).await;
    assert!(again.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn second_run_returns_previous_errors_without_rerunning() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));

    let mut executor = JobExecutor::new();
    let counter = Arc::clone(&calls);
    executor.add_fn(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(String::new())
    });
    let failing = executor.add_fn(fail_fn(1));

    let first = with_timeout(executor.dag_execute()).await;
    let second = with_timeout(executor.execute()).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert!(second.contains(failing));
}

#[test]
fn limiter_can_be_reconfigured() {
    let mut executor = JobExecutor::new();
    assert_eq!(executor.limiter().capacity(), host_parallelism());

    executor.set_max_concurrent_jobs(3);
    assert_eq!(executor.limiter().capacity(), 3);
    assert_eq!(executor.limiter().available(), 3);

    executor.set_max_concurrent_jobs(0);
    assert_eq!(executor.limiter().capacity(), host_parallelism());
}

#[test]
fn limiter_slots_return_on_drop() {
    let limiter = jobexec::exec::ConcurrencyLimiter::new(1);
    let slot = limiter.try_acquire().expect("one slot free");
    assert!(limiter.try_acquire().is_none());
    drop(slot);
    assert_eq!(limiter.available(), 1);
}

#[test]
fn dependency_on_foreign_id_is_rejected() {
    let mut other = JobExecutor::new();
    let foreign: Vec<_> = (0..5).map(|idx| other.add_fn(success_fn(idx))).collect();

    let mut executor = JobExecutor::new();
    let local = executor.add_fn(success_fn(0));

    match executor.add_dependency(local, foreign[4]) {
        Err(JobexecError::UnknownJob(id)) => assert_eq!(id, foreign[4]),
        Err(e) => panic!("expected UnknownJob, got {e:?}"),
        Ok(_) => panic!("expected error, got Ok"),
    }
    assert_eq!(executor.jobs().graph().edge_count(), 0);
}

#[test]
fn duplicate_dependencies_are_ignored() {
    let mut executor = JobExecutor::new();
    let a = executor.add_fn(success_fn(0));
    let b = executor.add_fn(success_fn(1));
    executor.add_dependency(a, b).unwrap().add_dependency(a, b).unwrap();

    assert_eq!(executor.jobs().dependencies_of(a), &[b]);
    assert_eq!(executor.jobs().graph().dependents_of(b), &[a]);
}

#[test]
fn dot_export_lists_nodes_edges_and_roots() {
    let mut executor = JobExecutor::new();
    let fetch = executor.add_named("fetch", jobexec::job::CommandSpec::new("git").arg("fetch"));
    let build = executor.add_command("cargo", ["build"]);
    executor.add_dependency(build, fetch).unwrap();

    let dot = executor.to_dot();

    assert!(dot.starts_with("digraph jobs {"));
    assert!(dot.contains("job0 [label=\"fetch\"];"));
    assert!(dot.contains("job1 [label=\"cargo build\"];"));
    assert!(dot.contains("job1 -> job0;"));
    assert!(!dot.contains("job0 -> job1;"));

    let cluster = dot.split("subgraph cluster_no_deps").nth(1).unwrap();
    let cluster = &cluster[..cluster.find('}').unwrap()];
    assert!(cluster.contains("job0;"));
    assert!(!cluster.contains("job1;"));
}

#[test]
fn executor_built_from_job_file_keeps_order_and_edges() {
    let cfg = JobsFileBuilder::new()
        .max_concurrent_jobs(2)
        .with_job(JobConfigBuilder::new("fetch", "git fetch").build())
        .with_job(JobConfigBuilder::new("build", "cargo build").after("fetch").build())
        .with_job(JobConfigBuilder::new("test", "cargo test").after("build").after("fetch").build())
        .build();

    let executor = JobExecutor::from_config(&cfg).unwrap();

    let jobs = executor.jobs();
    let ids: Vec<_> = jobs.iter().map(|job| job.id()).collect();
    assert_eq!(names_of(jobs, ids.clone()), vec!["fetch", "build", "test"]);
    assert_eq!(jobs.dependencies_of(ids[2]), &[ids[1], ids[0]]);
    assert_eq!(executor.limiter().capacity(), 2);
    assert!(executor.is_acyclic());
}

#[tokio::test(flavor = "multi_thread")]
async fn job_file_commands_run_in_dependency_order() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("marker");

    let cfg = JobsFileBuilder::new()
        .with_job(
            JobConfigBuilder::new("check", "test -f marker")
                .cwd(dir.path())
                .after("touch")
                .build(),
        )
        .with_job(JobConfigBuilder::new("touch", "touch marker").cwd(dir.path()).build())
        .build();

    let executor = JobExecutor::from_config(&cfg).unwrap();
    let errors = with_timeout(executor.dag_execute()).await;

    assert!(errors.is_empty(), "unexpected errors: {errors}");
    assert!(marker.exists());
    assert!(!errors.iter().any(|(_, e)| matches!(e, JobError::RequiredJobFailed)));
}
