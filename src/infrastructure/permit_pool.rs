use std::sync::Arc;

use tokio::sync::{Semaphore, SemaphorePermit, TryAcquireError};

use crate::{PermitError, ScrapeObserver};

/// A bounded pool of counted permits.
///
/// Permits are either held for a scope ([PermitPool::acquire]) or consumed for good
/// ([PermitPool::consume]) and given back later with [PermitPool::refill].
pub struct PermitPool {
    /// The name of the pool, used in events and errors.
    name: &'static str,

    /// The maximum number of permits.
    capacity: usize,

    /// The permits.
    semaphore: Semaphore,

    /// The observer notified when a caller has to wait.
    observer: Arc<dyn ScrapeObserver>,
}

impl PermitPool {
    /// Creates a new full `PermitPool` with the given capacity.
    pub fn try_new(
        name: &'static str,
        capacity: usize,
        observer: Arc<dyn ScrapeObserver>,
    ) -> Result<Self, PermitError> {
        if capacity == 0 || capacity > Semaphore::MAX_PERMITS {
            return Err(PermitError::InvalidCapacity {
                name,
                capacity,
                max: Semaphore::MAX_PERMITS,
            });
        }

        Ok(Self {
            name,
            capacity,
            semaphore: Semaphore::new(capacity),
            observer,
        })
    }

    /// Waits for a permit, which is given back to the pool when dropped.
    pub async fn acquire(&self) -> Result<SemaphorePermit<'_>, PermitError> {
        match self.semaphore.try_acquire() {
            Ok(permit) => Ok(permit),
            Err(TryAcquireError::Closed) => Err(PermitError::Closed(self.name)),
            Err(TryAcquireError::NoPermits) => {
                self.observer.on_permit_wait(self.name, self.capacity);
                self.semaphore
                    .acquire()
                    .await
                    .map_err(|_| PermitError::Closed(self.name))
            }
        }
    }

    /// Waits for a permit and consumes it, it only comes back with a refill.
    pub async fn consume(&self) -> Result<(), PermitError> {
        self.acquire().await?.forget();

        Ok(())
    }

    /// Releases the missing permits so that the pool is full again.
    ///
    /// Returns the number of permits released.
    pub fn refill(&self) -> usize {
        let deficit = self.capacity.saturating_sub(self.available());
        if deficit > 0 {
            self.semaphore.add_permits(deficit);
        }

        deficit
    }

    /// Consumes every permit currently available.
    ///
    /// Returns the number of permits drained.
    pub fn drain(&self) -> usize {
        let mut drained = 0;
        while let Ok(permit) = self.semaphore.try_acquire() {
            permit.forget();
            drained += 1;
        }

        drained
    }

    /// Closes the pool: pending and future acquisitions fail with [PermitError::Closed].
    pub fn close(&self) {
        self.semaphore.close();
    }

    /// Whether the pool has been closed.
    pub fn is_closed(&self) -> bool {
        self.semaphore.is_closed()
    }

    /// Retrieves the number of permits currently available.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Retrieves the maximum number of permits.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Retrieves the name of the pool.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use crate::{LogObserver, MockScrapeObserver};

    use super::*;

    fn pool(capacity: usize) -> PermitPool {
        PermitPool::try_new("test", capacity, Arc::new(LogObserver)).unwrap()
    }

    #[test]
    fn try_new_rejects_zero_capacity() {
        let result = PermitPool::try_new("test", 0, Arc::new(LogObserver));

        assert!(matches!(
            result,
            Err(PermitError::InvalidCapacity { capacity: 0, .. })
        ));
    }

    #[tokio::test]
    async fn acquired_permit_returns_on_drop() {
        let pool = pool(2);

        let permit = pool.acquire().await.unwrap();
        assert_eq!(1, pool.available());
        drop(permit);

        assert_eq!(2, pool.available());
    }

    #[tokio::test]
    async fn consumed_permit_only_returns_on_refill() {
        let pool = pool(3);

        pool.consume().await.unwrap();
        pool.consume().await.unwrap();
        assert_eq!(1, pool.available());

        assert_eq!(2, pool.refill());
        assert_eq!(3, pool.available());
    }

    #[tokio::test]
    async fn refill_never_exceeds_capacity() {
        let pool = pool(3);

        assert_eq!(0, pool.refill());
        assert_eq!(0, pool.refill());

        assert_eq!(3, pool.available());
    }

    #[tokio::test]
    async fn drain_empties_pool_until_refill() {
        let pool = pool(3);
        pool.consume().await.unwrap();

        assert_eq!(2, pool.drain());
        assert_eq!(0, pool.available());
        assert_eq!(0, pool.drain());

        assert_eq!(3, pool.refill());
    }

    #[tokio::test]
    async fn acquire_fails_once_closed() {
        let pool = pool(1);

        pool.close();

        assert!(pool.is_closed());
        assert_eq!(Some(PermitError::Closed("test")), pool.acquire().await.err());
    }

    #[tokio::test]
    async fn waiting_for_exhausted_pool_is_observed() {
        let observer = {
            let mut observer = MockScrapeObserver::new();
            observer
                .expect_on_permit_wait()
                .withf(|pool, capacity| pool == "test" && *capacity == 1)
                .return_const(())
                .times(1);

            observer
        };
        let pool = Arc::new(PermitPool::try_new("test", 1, Arc::new(observer)).unwrap());
        pool.consume().await.unwrap();

        let waiter = tokio::spawn({
            let pool = pool.clone();
            async move { pool.consume().await }
        });
        tokio::task::yield_now().await;
        pool.refill();

        waiter.await.unwrap().unwrap();
        assert_eq!(0, pool.available());
    }
}
