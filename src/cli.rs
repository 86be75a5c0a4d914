// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `jobexec`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "jobexec",
    version,
    about = "Run a set of commands concurrently, optionally in dependency order.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the job file (TOML).
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Maximum number of jobs running at once (0 = host parallelism).
    ///
    /// Overrides `[config].max_concurrent_jobs`.
    #[arg(long, value_name = "N")]
    pub max_jobs: Option<usize>,

    /// Ignore dependencies and run every job at once (bounded by --max-jobs).
    #[arg(long)]
    pub flat: bool,

    /// Parse + validate, print the jobs, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the dependency graph in Graphviz format and exit.
    #[arg(long)]
    pub graph: bool,

    /// How job results are printed.
    #[arg(long, value_enum, default_value_t = OutputStyle::Fifo)]
    pub output: OutputStyle,

    /// Also print a "Starting ..." line as each job is launched.
    #[arg(long)]
    pub start_output: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `JOBEXEC_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// How job results are reported on stdout.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputStyle {
    /// Print each job's status as soon as it finishes.
    Fifo,
    /// Print every job's status in job order once all are done.
    Ordered,
    /// Only print the final summary.
    Quiet,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
