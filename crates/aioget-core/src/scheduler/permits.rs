//! Counting permit pool that caps how many transfers run at once.
//!
//! Built on a tokio semaphore, with in-use/peak counters so the cap can be
//! observed. Permits are RAII guards: dropping one (success, error or a
//! dropped future) returns it to the pool.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Semaphore, SemaphorePermit};

use crate::error::SchedulerError;

/// Shared pool of `capacity` transfer permits.
#[derive(Debug)]
pub struct PermitPool {
    semaphore: Semaphore,
    capacity: usize,
    in_use: AtomicUsize,
    peak: AtomicUsize,
}

impl PermitPool {
    /// A capacity of 0 is raised to 1 so that transfers can make progress.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Semaphore::new(capacity),
            capacity,
            in_use: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits currently held.
    pub fn in_use(&self) -> usize {
        self.in_use.load(Ordering::Acquire)
    }

    /// Highest number of permits ever held at once.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::Acquire)
    }

    /// Waits until a permit is free. Fails only if the pool was closed.
    pub async fn acquire(&self) -> Result<Permit<'_>, SchedulerError> {
        let permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| SchedulerError::PermitPoolClosed)?;
        let now = self.in_use.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak.fetch_max(now, Ordering::AcqRel);
        Ok(Permit {
            pool: self,
            _permit: permit,
        })
    }

    /// Rejects all pending and future acquisitions.
    pub fn close(&self) {
        self.semaphore.close();
    }
}

/// A held permit. Released when dropped.
#[derive(Debug)]
pub struct Permit<'a> {
    pool: &'a PermitPool,
    _permit: SemaphorePermit<'a>,
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        // Runs before the semaphore permit field is dropped, so `in_use`
        // never exceeds capacity.
        self.pool.in_use.fetch_sub(1, Ordering::AcqRel);
    }
}
