use std::sync::Arc;

use tokio::sync::SemaphorePermit;

use crate::{PermitError, PermitPool, ScrapeObserver};

/// The name of the concurrency gate permit pool.
pub const CONCURRENCY_GATE_POOL: &str = "concurrency-gate";

/// Caps the number of requests in flight.
pub struct ConcurrencyGate {
    pool: PermitPool,
}

impl ConcurrencyGate {
    /// Creates a new `ConcurrencyGate` admitting at most `max_concurrent_requests` holders.
    pub fn try_new(
        max_concurrent_requests: usize,
        observer: Arc<dyn ScrapeObserver>,
    ) -> Result<Self, PermitError> {
        Ok(Self {
            pool: PermitPool::try_new(CONCURRENCY_GATE_POOL, max_concurrent_requests, observer)?,
        })
    }

    /// Waits for a free slot, held until the returned permit is dropped.
    pub async fn acquire(&self) -> Result<SemaphorePermit<'_>, PermitError> {
        self.pool.acquire().await
    }

    /// Retrieves the number of active holders.
    pub fn active(&self) -> usize {
        self.pool.capacity() - self.pool.available()
    }

    /// Fails every pending and future acquisition.
    pub fn close(&self) {
        self.pool.close();
    }
}
