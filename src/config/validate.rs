// src/config/validate.rs

use std::collections::HashSet;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{JobsFile, RawJobsFile};
use crate::errors::{JobexecError, Result};

impl TryFrom<RawJobsFile> for JobsFile {
    type Error = JobexecError;

    fn try_from(raw: RawJobsFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_jobs(&raw)?;
        Ok(JobsFile::new_unchecked(raw.config, raw.job))
    }
}

fn validate_raw_jobs(cfg: &RawJobsFile) -> Result<()> {
    ensure_has_jobs(cfg)?;
    validate_jobs(cfg)?;
    validate_dependencies(cfg)?;
    validate_dag(cfg)?;
    Ok(())
}

fn ensure_has_jobs(cfg: &RawJobsFile) -> Result<()> {
    if cfg.job.is_empty() {
        return Err(JobexecError::ConfigError(
            "job file must contain at least one [[job]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_jobs(cfg: &RawJobsFile) -> Result<()> {
    let mut seen = HashSet::new();
    for (idx, job) in cfg.job.iter().enumerate() {
        if job.name.trim().is_empty() {
            return Err(JobexecError::ConfigError(format!(
                "job #{idx} has an empty `name`"
            )));
        }
        if !seen.insert(job.name.as_str()) {
            return Err(JobexecError::ConfigError(format!(
                "duplicate job name '{}'",
                job.name
            )));
        }
        if job.cmd.first().is_none_or(|program| program.is_empty()) {
            return Err(JobexecError::ConfigError(format!(
                "job '{}' has an empty `cmd`",
                job.name
            )));
        }
    }
    Ok(())
}

fn validate_dependencies(cfg: &RawJobsFile) -> Result<()> {
    for job in cfg.job.iter() {
        for dep in job.after.iter() {
            if dep == &job.name {
                return Err(JobexecError::ConfigError(format!(
                    "job '{}' cannot depend on itself in `after`",
                    job.name
                )));
            }
            if !cfg.job.iter().any(|other| &other.name == dep) {
                return Err(JobexecError::ConfigError(format!(
                    "job '{}' has unknown dependency '{}' in `after`",
                    job.name, dep
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(cfg: &RawJobsFile) -> Result<()> {
    // Edge direction: dep -> job, so a topological order is a valid run order.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for job in cfg.job.iter() {
        graph.add_node(job.name.as_str());
    }
    for job in cfg.job.iter() {
        for dep in job.after.iter() {
            graph.add_edge(dep.as_str(), job.name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(JobexecError::DagCycle(format!(
            "cycle detected in job graph involving job '{}'",
            cycle.node_id()
        ))),
    }
}
