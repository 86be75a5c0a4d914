#![allow(dead_code)]

pub use jobexec_test_utils::{init_tracing, with_timeout};

use jobexec::job::JobList;
use jobexec::types::JobId;

/// Names of the jobs in `jobs` whose id is in `ids`, in id order.
pub fn names_of(jobs: &JobList, ids: impl IntoIterator<Item = JobId>) -> Vec<String> {
    ids.into_iter().map(|id| jobs[id].name()).collect()
}
