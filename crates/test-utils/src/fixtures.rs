#![allow(dead_code)]

//! Callables and probes shared by the integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;

/// Callable returning `"ok <idx>"`.
pub fn success_fn(idx: usize) -> impl Fn() -> anyhow::Result<String> + Send + Sync + 'static {
    move || Ok(format!("ok {idx}"))
}

/// Callable failing with `"job <idx> failed"`.
pub fn fail_fn(idx: usize) -> impl Fn() -> anyhow::Result<String> + Send + Sync + 'static {
    move || Err(anyhow!("job {idx} failed"))
}

/// Callable sleeping for `delay` then returning `"slept"`.
///
/// Callables run on the blocking pool, so a thread sleep is fine here.
pub fn sleeping_fn(delay: Duration) -> impl Fn() -> anyhow::Result<String> + Send + Sync + 'static {
    move || {
        std::thread::sleep(delay);
        Ok("slept".to_string())
    }
}

/// Tracks how many probe jobs run at the same time.
#[derive(Debug, Clone, Default)]
pub struct ConcurrencyProbe {
    current: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    finished: Arc<AtomicUsize>,
}

impl ConcurrencyProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callable that counts itself as running for `hold`.
    pub fn job(&self, hold: Duration) -> impl Fn() -> anyhow::Result<String> + Send + Sync + 'static {
        let probe = self.clone();
        move || {
            let now = probe.current.fetch_add(1, Ordering::SeqCst) + 1;
            probe.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(hold);
            probe.current.fetch_sub(1, Ordering::SeqCst);
            probe.finished.fetch_add(1, Ordering::SeqCst);
            Ok(String::new())
        }
    }

    /// Highest number of probe jobs seen running at once.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

/// Thread-safe event log for hook tests.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.events.lock().expect("event log poisoned").push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("event log poisoned").clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.events().iter().filter(|e| e.as_str() == event).count()
    }
}
