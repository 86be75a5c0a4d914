// src/logging.rs

//! Logging setup for the `jobexec` binary.
//!
//! The filter comes from, in order:
//! 1. `--log-level`, applied to every target;
//! 2. `JOBEXEC_LOG`, parsed as `tracing-subscriber` directives, so both
//!    `debug` and `warn,jobexec::dag=debug` work;
//! 3. `info`.
//!
//! The library itself only emits events; nothing is printed unless a
//! subscriber is installed. The binary's subscriber writes to stderr, so
//! stdout only carries job reports.

use anyhow::{anyhow, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable holding filter directives.
pub const LOG_ENV_VAR: &str = "JOBEXEC_LOG";

/// Install the global stderr subscriber. Fails if one is already set.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let filter = build_filter(cli_level, env_value.as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to install logging subscriber: {err}"))
}

/// Filter for the given CLI level and `JOBEXEC_LOG` value. A CLI level
/// replaces the environment directives entirely.
pub fn build_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> EnvFilter {
    let builder = EnvFilter::builder();
    match cli_level {
        Some(level) => builder
            .with_default_directive(level_filter(level).into())
            .parse_lossy(""),
        None => builder
            .with_default_directive(LevelFilter::INFO.into())
            .parse_lossy(env_value.unwrap_or_default()),
    }
}

fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}
