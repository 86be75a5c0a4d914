// tests/property_dag.rs

use std::collections::BTreeSet;

use proptest::prelude::*;
use jobexec::engine::JobExecutor;
use jobexec::errors::JobError;
use jobexec::job::StateFlag;
use jobexec_test_utils::fixtures::{fail_fn, success_fn};

/// Random acyclic graph: job `i` may only depend on jobs `0..i`.
/// Yields `(deps per job, failing jobs)`.
fn dag_strategy(max_jobs: usize) -> impl Strategy<Value = (Vec<BTreeSet<usize>>, BTreeSet<usize>)> {
    (1..=max_jobs).prop_flat_map(|num_jobs| {
        let deps = proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..3),
            num_jobs,
        )
        .prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, potential)| {
                    if i == 0 {
                        BTreeSet::new()
                    } else {
                        potential.into_iter().map(|d| d % i).collect()
                    }
                })
                .collect::<Vec<BTreeSet<usize>>>()
        });
        let failing = proptest::collection::btree_set(0..num_jobs, 0..=num_jobs.min(3));
        (deps, failing)
    })
}

/// A job fails if it fails on its own or any dependency failed.
fn expected_failures(deps: &[BTreeSet<usize>], failing: &BTreeSet<usize>) -> BTreeSet<usize> {
    let mut failed = BTreeSet::new();
    for (i, job_deps) in deps.iter().enumerate() {
        if failing.contains(&i) || job_deps.iter().any(|d| failed.contains(d)) {
            failed.insert(i);
        }
    }
    failed
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn dag_run_fails_exactly_the_downstream_closure(
        (deps, failing) in dag_strategy(10),
        max_jobs in 1..4usize,
    ) {
        let mut executor = JobExecutor::new();
        executor.set_max_concurrent_jobs(max_jobs);
        let ids: Vec<_> = (0..deps.len())
            .map(|i| {
                if failing.contains(&i) {
                    executor.add_fn(fail_fn(i))
                } else {
                    executor.add_fn(success_fn(i))
                }
            })
            .collect();
        for (i, job_deps) in deps.iter().enumerate() {
            for &d in job_deps {
                executor.add_dependency(ids[i], ids[d]).unwrap();
            }
        }
        prop_assert!(executor.is_acyclic());

        let rt = tokio::runtime::Runtime::new().unwrap();
        let errors = rt.block_on(executor.dag_execute());

        let expected = expected_failures(&deps, &failing);
        let got: BTreeSet<usize> = errors.iter().map(|(id, _)| id.index()).collect();
        prop_assert_eq!(&got, &expected);

        let jobs = executor.jobs();
        for (i, job_deps) in deps.iter().enumerate() {
            let job = &jobs[ids[i]];
            prop_assert!(job.is_state(StateFlag::Done));

            let cascaded = matches!(errors.get(ids[i]), Some(JobError::RequiredJobFailed));
            let dep_failed = job_deps.iter().any(|d| expected.contains(d));
            prop_assert_eq!(cascaded, dep_failed);

            for &d in job_deps {
                let dep_end = jobs[ids[d]].end_time().unwrap();
                let start = job.start_time().unwrap();
                prop_assert!(dep_end <= start, "job {} started before dependency {} ended", i, d);
            }
        }
    }
}
