// src/job/list.rs

use std::ops::{Deref, Index};
use std::sync::Arc;

use crate::dag::DepGraph;
use crate::errors::{JobexecError, Result};
use crate::job::{Job, JobSpec};
use crate::types::JobId;

/// Ordered, append-only set of jobs plus the dependency edges between them.
///
/// A job's [`JobId`] is its position in the list. Edges are stored as id
/// pairs in a [`DepGraph`], so jobs never reference each other directly.
///
/// Cloning is cheap (jobs are shared): schedulers take a snapshot at the
/// start of a run, and the snapshot's jobs are the same jobs the owner
/// inspects afterwards.
#[derive(Debug, Clone, Default)]
pub struct JobList {
    jobs: Vec<Arc<Job>>,
    graph: DepGraph,
}

impl JobList {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, spec: JobSpec) -> JobId {
        let id = JobId(self.jobs.len());
        self.jobs.push(Arc::new(Job::new(id, spec)));
        let node = self.graph.add_node();
        debug_assert_eq!(node, id);
        id
    }

    /// Record that `from` depends on `to`. Duplicate edges are ignored.
    pub(crate) fn add_dependency(&mut self, from: JobId, to: JobId) -> Result<()> {
        for id in [from, to] {
            if !self.contains(id) {
                return Err(JobexecError::UnknownJob(id));
            }
        }
        self.graph.add_edge(from, to);
        Ok(())
    }

    pub fn contains(&self, id: JobId) -> bool {
        id.0 < self.jobs.len()
    }

    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.jobs.get(id.0).map(Arc::as_ref)
    }

    pub fn graph(&self) -> &DepGraph {
        &self.graph
    }

    /// Direct dependencies of a job, in declaration order.
    pub fn dependencies_of(&self, id: JobId) -> &[JobId] {
        self.graph.dependencies_of(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter().map(Arc::as_ref)
    }
}

impl Deref for JobList {
    type Target = [Arc<Job>];

    fn deref(&self) -> &Self::Target {
        &self.jobs
    }
}

impl Index<JobId> for JobList {
    type Output = Job;

    fn index(&self, id: JobId) -> &Self::Output {
        &self.jobs[id.0]
    }
}
