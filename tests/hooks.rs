// tests/hooks.rs

mod common;

use common::{init_tracing, with_timeout};
use jobexec::engine::JobExecutor;
use jobexec::job::StateFlag;
use jobexec_test_utils::fixtures::{fail_fn, success_fn, EventLog};

fn executor_with_log(jobs: usize, log: &EventLog) -> JobExecutor {
    let mut executor = JobExecutor::new();
    for idx in 0..jobs {
        executor.add_fn(success_fn(idx));
    }

    let (a, b, c, d) = (log.clone(), log.clone(), log.clone(), log.clone());
    executor
        .on_jobs_start(move |_| a.push("jobs_start"))
        .on_job_start(move |jobs, id| {
            // Observers run on scheduler tasks; record what they saw
            // instead of panicking there.
            let tag = if jobs[id].is_state(StateFlag::Running) { "job_start" } else { "job_start:not running" };
            b.push(tag);
        })
        .on_job_done(move |jobs, id| {
            let tag = if jobs[id].is_state(StateFlag::Done) { "job_done" } else { "job_done:not done" };
            c.push(tag);
        })
        .on_jobs_done(move |jobs| {
            let all_done = jobs.iter().all(|job| job.is_state(StateFlag::Done));
            d.push(if all_done { "jobs_done" } else { "jobs_done:not all done" });
        });
    executor
}

fn assert_lifecycle_order(events: &[String], jobs: usize) {
    assert_eq!(events.first().map(String::as_str), Some("jobs_start"));
    assert_eq!(events.last().map(String::as_str), Some("jobs_done"));
    assert_eq!(events.len(), 2 * jobs + 2);
    assert_eq!(events.iter().filter(|e| *e == "job_start").count(), jobs);
    assert_eq!(events.iter().filter(|e| *e == "job_done").count(), jobs);
}

#[tokio::test(flavor = "multi_thread")]
async fn flat_run_fires_hooks_in_lifecycle_order() {
    init_tracing();
    let log = EventLog::new();
    let executor = executor_with_log(4, &log);

    let errors = with_timeout(executor.execute()).await;

    assert!(errors.is_empty());
    assert_lifecycle_order(&log.events(), 4);
}

#[tokio::test(flavor = "multi_thread")]
async fn dag_run_fires_hooks_in_lifecycle_order() {
    init_tracing();
    let log = EventLog::new();
    let mut executor = executor_with_log(4, &log);
    let ids: Vec<_> = executor.jobs().iter().map(|job| job.id()).collect();
    executor.add_dependency(ids[1], ids[0]).unwrap();
    executor.add_dependency(ids[2], ids[1]).unwrap();

    let errors = with_timeout(executor.dag_execute()).await;

    assert!(errors.is_empty());
    assert_lifecycle_order(&log.events(), 4);
}

#[tokio::test(flavor = "multi_thread")]
async fn observers_compose_and_all_fire() {
    init_tracing();
    let log = EventLog::new();

    let mut executor = JobExecutor::new();
    executor.add_fn(success_fn(0));
    executor.add_fn(success_fn(1));

    for tag in ["first", "second"] {
        let (a, b, c, d) = (log.clone(), log.clone(), log.clone(), log.clone());
        executor
            .on_jobs_start(move |_| a.push(format!("{tag}:jobs_start")))
            .on_job_start(move |_, _| b.push(format!("{tag}:job_start")))
            .on_job_done(move |_, _| c.push(format!("{tag}:job_done")))
            .on_jobs_done(move |_| d.push(format!("{tag}:jobs_done")));
    }
    assert!(format!("{:?}", executor.hooks()).contains("jobs_start: 2"));

    with_timeout(executor.dag_execute()).await;

    for tag in ["first", "second"] {
        assert_eq!(log.count(&format!("{tag}:jobs_start")), 1);
        assert_eq!(log.count(&format!("{tag}:job_start")), 2);
        assert_eq!(log.count(&format!("{tag}:job_done")), 2);
        assert_eq!(log.count(&format!("{tag}:jobs_done")), 1);
    }

    // Observers of one point run in registration order.
    let events = log.events();
    let first = events.iter().position(|e| e == "first:jobs_start").unwrap();
    let second = events.iter().position(|e| e == "second:jobs_start").unwrap();
    assert!(first < second);
}

#[tokio::test(flavor = "multi_thread")]
async fn job_done_sees_result_and_error() {
    init_tracing();
    let log = EventLog::new();

    let mut executor = JobExecutor::new();
    executor.add_fn(success_fn(0));
    executor.add_fn(fail_fn(1));

    let sink = log.clone();
    executor.on_job_done(move |jobs, id| {
        let job = &jobs[id];
        match job.error() {
            Some(err) => sink.push(format!("{}: error {err}", id.index())),
            None => sink.push(format!("{}: result {}", id.index(), job.result())),
        }
    });

    with_timeout(executor.execute()).await;

    let mut events = log.events();
    events.sort();
    assert_eq!(events, vec!["0: result ok 0", "1: error job 1 failed"]);
}
