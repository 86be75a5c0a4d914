// src/dag/mod.rs

//! Dependency graph and dependency-ordered scheduling.
//!
//! - [`graph`] holds the index-based dependency graph, the cycle check and
//!   the Graphviz export.
//! - [`scheduler`] runs a job list in dependency order with cascading
//!   failure.

pub mod graph;
pub(crate) mod scheduler;

pub use graph::DepGraph;
