// src/exec/limiter.rs

//! Bounded gate on the number of simultaneously running jobs.

use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Slot pool capping how many jobs run at once.
///
/// Clones share the same pool, which is how several executors can be made
/// to draw from one gate. The underlying semaphore is never closed, so a
/// limiter can be reused across any number of runs.
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// A held slot. Dropping it gives the slot back to the pool.
#[derive(Debug)]
pub struct Slot {
    _permit: OwnedSemaphorePermit,
}

impl ConcurrencyLimiter {
    /// Create a pool with `capacity` slots; `0` means host parallelism.
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            host_parallelism()
        } else {
            capacity
        };
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently free.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Wait for a free slot.
    pub async fn acquire(&self) -> Slot {
        match Arc::clone(&self.semaphore).acquire_owned().await {
            Ok(permit) => Slot { _permit: permit },
            Err(_) => unreachable!("limiter semaphore is never closed"),
        }
    }

    /// Take a slot only if one is free right now.
    pub fn try_acquire(&self) -> Option<Slot> {
        Arc::clone(&self.semaphore)
            .try_acquire_owned()
            .ok()
            .map(|permit| Slot { _permit: permit })
    }
}

impl Default for ConcurrencyLimiter {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Number of jobs the host can run in parallel (at least 1).
pub fn host_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
