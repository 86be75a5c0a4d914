// src/dag/graph.rs

use std::collections::VecDeque;
use std::fmt::Write as _;

use crate::types::JobId;

/// Index-based dependency graph over the jobs of a [`crate::job::JobList`].
///
/// An edge `from -> to` means "`from` depends on `to`": `to` must reach a
/// terminal state before `from` may start.
#[derive(Debug, Clone, Default)]
pub struct DepGraph {
    /// Direct dependencies of each job, in declaration order.
    deps: Vec<Vec<JobId>>,
    /// Direct dependents of each job (jobs that list it as a dependency).
    dependents: Vec<Vec<JobId>>,
}

impl DepGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_node(&mut self) -> JobId {
        self.deps.push(Vec::new());
        self.dependents.push(Vec::new());
        JobId(self.deps.len() - 1)
    }

    /// Returns `false` if the edge was already present.
    pub(crate) fn add_edge(&mut self, from: JobId, to: JobId) -> bool {
        if self.deps[from.0].contains(&to) {
            return false;
        }
        self.deps[from.0].push(to);
        self.dependents[to.0].push(from);
        true
    }

    pub fn len(&self) -> usize {
        self.deps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deps.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.deps.iter().map(Vec::len).sum()
    }

    pub fn dependencies_of(&self, id: JobId) -> &[JobId] {
        self.deps.get(id.0).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn dependents_of(&self, id: JobId) -> &[JobId] {
        self.dependents.get(id.0).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of unfinished dependencies per job, indexed by job id.
    pub fn in_degrees(&self) -> Vec<usize> {
        self.deps.iter().map(Vec::len).collect()
    }

    /// Jobs without dependencies, in id order.
    pub fn roots(&self) -> impl Iterator<Item = JobId> + '_ {
        self.deps
            .iter()
            .enumerate()
            .filter(|(_, deps)| deps.is_empty())
            .map(|(idx, _)| JobId(idx))
    }

    /// Kahn's algorithm: repeatedly consume jobs whose dependencies are all
    /// consumed. The graph is acyclic iff every job gets consumed.
    pub fn is_acyclic(&self) -> bool {
        self.topological_order().len() == self.len()
    }

    /// Jobs in an order where every job comes after all of its
    /// dependencies. Jobs caught in (or behind) a cycle are left out.
    pub fn topological_order(&self) -> Vec<JobId> {
        let mut in_degree = self.in_degrees();
        let mut frontier: VecDeque<JobId> = self.roots().collect();
        let mut order = Vec::with_capacity(self.len());

        while let Some(id) = frontier.pop_front() {
            order.push(id);
            for &dependent in self.dependents_of(id) {
                let degree = &mut in_degree[dependent.0];
                *degree -= 1;
                if *degree == 0 {
                    frontier.push_back(dependent);
                }
            }
        }

        order
    }

    /// Graphviz description of the graph.
    ///
    /// Every job is a node labelled by `label`; each dependency is drawn as
    /// an edge from the job to what it depends on; jobs without dependencies
    /// are grouped in a `cluster_no_deps` subgraph.
    pub fn to_dot(&self, label: impl Fn(JobId) -> String) -> String {
        let mut out = String::from("digraph jobs {\n");
        out.push_str("  rankdir=LR;\n");
        out.push_str("  node [shape=box];\n");

        for idx in 0..self.len() {
            let id = JobId(idx);
            let _ = writeln!(out, "  job{idx} [label=\"{}\"];", escape_label(&label(id)));
        }

        out.push_str("  subgraph cluster_no_deps {\n");
        out.push_str("    label=\"no dependencies\";\n");
        for root in self.roots() {
            let _ = writeln!(out, "    job{};", root.0);
        }
        out.push_str("  }\n");

        for (idx, deps) in self.deps.iter().enumerate() {
            for dep in deps {
                let _ = writeln!(out, "  job{idx} -> job{};", dep.0);
            }
        }

        out.push_str("}\n");
        out
    }
}

fn escape_label(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
