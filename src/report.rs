// src/report.rs

//! Plain-text job status rendering used by the `jobexec` binary.
//!
//! Everything here only reads jobs through their public accessors and is
//! wired in through lifecycle hooks; nothing feeds back into scheduling.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::time::Duration;

use crate::job::{Job, JobList, JobOutcome, JobState};

/// One line: state marker, name and, once done, duration.
pub fn status_line(job: &Job) -> String {
    let marker = match job.state() {
        JobState::Pending => "[ ]",
        JobState::Running => "[~]",
        JobState::Done(JobOutcome::Succeeded) => "[✔]",
        JobState::Done(JobOutcome::Failed) => "[✘]",
    };
    match job.duration() {
        Some(duration) if job.state().is_terminal() => {
            format!("{marker} {} ({})", job.name(), format_duration(duration))
        }
        _ => format!("{marker} {}", job.name()),
    }
}

/// `Starting <status line>`, printed when a job is launched.
pub fn start_line(job: &Job) -> String {
    format!("Starting {}\n", status_line(job))
}

/// Status line followed by the indented captured output and error.
pub fn status_full(job: &Job) -> String {
    let mut out = status_line(job);
    out.push('\n');

    let result = job.result();
    if !result.trim().is_empty() {
        let mut buf = Vec::new();
        let mut writer = PrefixedWriter::new(&mut buf, "    ");
        // Writing into a Vec cannot fail.
        let _ = writer.write_all(result.trim_end_matches('\n').as_bytes());
        out.push_str(&String::from_utf8_lossy(&buf));
    }
    if let Some(err) = job.error() {
        out.push_str(&indent(4, &format!("error: {err}")));
        out.push('\n');
    }
    out
}

/// Header printed before a run: every job with its dependencies.
pub fn start_summary(jobs: &JobList) -> String {
    let mut out = format!("Running {} job(s):\n", jobs.len());
    for job in jobs.iter() {
        let deps = jobs.dependencies_of(job.id());
        if deps.is_empty() {
            let _ = writeln!(out, "  {} {}", job.id(), job.name());
        } else {
            let deps: Vec<String> = deps.iter().map(ToString::to_string).collect();
            let _ = writeln!(out, "  {} {} (after {})", job.id(), job.name(), deps.join(", "));
        }
    }
    out
}

/// Full status of every job, in job order.
pub fn done_report(jobs: &JobList) -> String {
    jobs.iter().map(status_full).collect()
}

/// `N succeeded, M failed, K not run`.
pub fn summary(jobs: &JobList) -> String {
    let (mut succeeded, mut failed, mut other) = (0, 0, 0);
    for job in jobs.iter() {
        match job.state() {
            JobState::Done(JobOutcome::Succeeded) => succeeded += 1,
            JobState::Done(JobOutcome::Failed) => failed += 1,
            JobState::Pending | JobState::Running => other += 1,
        }
    }
    let mut out = format!("{succeeded} succeeded, {failed} failed");
    if other > 0 {
        let _ = write!(out, ", {other} not run");
    }
    out
}

/// Put `spaces` spaces at the start of `text` and after each of its
/// newlines, including a trailing one.
pub fn indent(spaces: usize, text: &str) -> String {
    let pad = " ".repeat(spaces);
    format!("{pad}{}", text.replace('\n', &format!("\n{pad}")))
}

fn format_duration(duration: Duration) -> String {
    if duration.as_secs() >= 1 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// `io::Write` adaptor prefixing every line of each write, and making sure
/// each write ends with a newline.
pub struct PrefixedWriter<W: Write> {
    inner: W,
    prefix: String,
}

impl<W: Write> PrefixedWriter<W> {
    pub fn new(inner: W, prefix: impl Into<String>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn prefixed(&self, text: &str) -> String {
        let body = text.strip_suffix('\n').unwrap_or(text);
        let mut out = String::with_capacity(body.len() + self.prefix.len() + 1);
        for (idx, line) in body.split('\n').enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            out.push_str(&self.prefix);
            out.push_str(line);
        }
        out.push('\n');
        out
    }
}

impl<W: Write> Write for PrefixedWriter<W> {
    /// Reports the whole input as written, prefixes included or not.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let prefixed = self.prefixed(&text);
        self.inner.write_all(prefixed.as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
