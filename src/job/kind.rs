// src/job/kind.rs

//! The two kinds of work a job can wrap.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use tokio::process::Command;

use crate::types::OutputMode;

/// Signature of a callable job body.
pub type CallableFn = dyn Fn() -> anyhow::Result<String> + Send + Sync;

/// A user-supplied function run as a job.
///
/// The closure's type name is captured at construction and used as the
/// job's fallback name.
#[derive(Clone)]
pub struct Callable {
    func: Arc<CallableFn>,
    identity: &'static str,
}

impl Callable {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn() -> anyhow::Result<String> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            identity: std::any::type_name::<F>(),
        }
    }

    /// Rust type name of the wrapped function.
    pub fn identity(&self) -> &'static str {
        self.identity
    }

    pub(crate) fn func(&self) -> Arc<CallableFn> {
        Arc::clone(&self.func)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

/// An external process invocation.
///
/// The process is only built when the job runs, so the command can be
/// inspected (for naming, dry runs, graph export) at any time.
#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    envs: Vec<(String, String)>,
    output: OutputMode,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// Build from an argument vector: the first element is the program.
    ///
    /// An empty vector yields a spec with an empty program; such a job is
    /// named `EmptyJob` and fails to spawn.
    pub fn from_argv<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let program = argv.next().unwrap_or_default();
        Self::new(program).args(argv)
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn output(mut self, mode: OutputMode) -> Self {
        self.output = mode;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output
    }

    /// Program and arguments joined with spaces.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Build the process to spawn, with stdio wired according to the
    /// output mode.
    pub(crate) fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).kill_on_drop(true);

        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }

        match self.output {
            OutputMode::Capture => {
                cmd.stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped());
            }
            OutputMode::Inherit => {
                cmd.stdin(Stdio::null())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
        }

        cmd
    }
}

/// What a job runs. Fixed at construction.
#[derive(Debug, Clone)]
pub enum JobKind {
    Command(CommandSpec),
    Callable(Callable),
}

/// Everything needed to register a job: its kind plus an optional
/// display name.
#[derive(Debug, Clone)]
pub struct JobSpec {
    pub(crate) kind: JobKind,
    pub(crate) display_name: Option<String>,
}

impl JobSpec {
    pub fn callable<F>(func: F) -> Self
    where
        F: Fn() -> anyhow::Result<String> + Send + Sync + 'static,
    {
        Callable::new(func).into()
    }

    pub fn command<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::new(program).args(args).into()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn kind(&self) -> &JobKind {
        &self.kind
    }
}

impl From<CommandSpec> for JobSpec {
    fn from(spec: CommandSpec) -> Self {
        Self {
            kind: JobKind::Command(spec),
            display_name: None,
        }
    }
}

impl From<Callable> for JobSpec {
    fn from(callable: Callable) -> Self {
        Self {
            kind: JobKind::Callable(callable),
            display_name: None,
        }
    }
}

/// A job payload paired with an explicit display name.
#[derive(Debug, Clone)]
pub struct NamedJob {
    pub name: String,
    pub spec: JobSpec,
}

impl NamedJob {
    pub fn new(name: impl Into<String>, spec: impl Into<JobSpec>) -> Self {
        Self {
            name: name.into(),
            spec: spec.into(),
        }
    }
}

impl From<NamedJob> for JobSpec {
    fn from(named: NamedJob) -> Self {
        named.spec.named(named.name)
    }
}
