use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use anyhow::anyhow;
use log::{debug, info, warn};
use tokio::{
    task::JoinHandle,
    time::{Instant, Interval, MissedTickBehavior, interval_at},
};

use crate::{PermitError, PermitPool, RefillTicker, ScrapeObserver, StdResult};

/// The name of the rate limiter permit pool.
pub const RATE_LIMITER_POOL: &str = "rate-limiter";

/// A ticker firing at a fixed period, starting one period from now.
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    /// Creates a new `IntervalTicker` with the given period.
    pub fn new(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self { interval }
    }

    /// Creates a ticker firing once per second.
    pub fn every_second() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait::async_trait]
impl RefillTicker for IntervalTicker {
    async fn tick(&mut self) -> StdResult<()> {
        self.interval.tick().await;

        Ok(())
    }
}

/// Caps the number of operations to a fixed number per refill window.
///
/// The pool starts full and a background task tops it up to capacity on every tick,
/// so at most `requests_per_second` permits are handed out per window.
pub struct RateLimiter {
    /// The permits.
    pool: Arc<PermitPool>,

    /// Set when the next refill must be skipped.
    hold_next_refill: Arc<AtomicBool>,

    /// The refill task, taken on close.
    refill_task: Mutex<Option<JoinHandle<StdResult<()>>>>,

    /// The observer of the limiter events.
    observer: Arc<dyn ScrapeObserver>,
}

impl RateLimiter {
    /// Creates a new `RateLimiter` refilled once per second.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        requests_per_second: usize,
        observer: Arc<dyn ScrapeObserver>,
    ) -> Result<Self, PermitError> {
        Self::start_with_ticker(
            requests_per_second,
            Box::new(IntervalTicker::every_second()),
            observer,
        )
    }

    /// Creates a new `RateLimiter` refilled on every tick of the given ticker.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start_with_ticker(
        requests_per_second: usize,
        ticker: Box<dyn RefillTicker>,
        observer: Arc<dyn ScrapeObserver>,
    ) -> Result<Self, PermitError> {
        let pool = Arc::new(PermitPool::try_new(
            RATE_LIMITER_POOL,
            requests_per_second,
            observer.clone(),
        )?);
        info!("Starting rate limiter with {requests_per_second} requests per second");
        let hold_next_refill = Arc::new(AtomicBool::new(false));
        let refill_task = tokio::spawn(Self::refill_loop(
            pool.clone(),
            hold_next_refill.clone(),
            ticker,
            observer.clone(),
        ));

        Ok(Self {
            pool,
            hold_next_refill,
            refill_task: Mutex::new(Some(refill_task)),
            observer,
        })
    }

    async fn refill_loop(
        pool: Arc<PermitPool>,
        hold_next_refill: Arc<AtomicBool>,
        mut ticker: Box<dyn RefillTicker>,
        observer: Arc<dyn ScrapeObserver>,
    ) -> StdResult<()> {
        loop {
            if let Err(e) = ticker.tick().await {
                // Without refills every acquirer would starve, fail them instead.
                pool.close();
                observer.on_refill_failure(&e);
                return Err(e);
            }
            if pool.is_closed() {
                debug!("Rate limiter pool closed, stopping refill");
                return Ok(());
            }
            if hold_next_refill.swap(false, Ordering::SeqCst) {
                debug!("Rate limiter backing off, refill skipped");
                observer.on_refill_tick(0, pool.available(), pool.capacity());
                continue;
            }
            let released = pool.refill();
            observer.on_refill_tick(released, pool.available(), pool.capacity());
        }
    }

    /// Waits for a permit and consumes it.
    pub async fn acquire(&self) -> Result<(), PermitError> {
        self.pool.consume().await
    }

    /// Suspends the limiter for at least one full window.
    ///
    /// The permits left in the current window are dropped and the next refill is skipped,
    /// so acquirers wait for the refill after next.
    pub fn back_off(&self) {
        let drained = self.pool.drain();
        self.hold_next_refill.store(true, Ordering::SeqCst);
        warn!("Rate limiter backing off for one window, {drained} permits dropped");
    }

    /// Retrieves the number of permits left in the current window.
    pub fn available(&self) -> usize {
        self.pool.available()
    }

    /// Retrieves the configured number of requests per second.
    pub fn requests_per_second(&self) -> usize {
        self.pool.capacity()
    }

    /// Whether the refill task is still attached to the limiter.
    pub fn is_running(&self) -> bool {
        self.refill_task
            .lock()
            .map(|task| task.is_some())
            .unwrap_or(false)
    }

    /// Stops the refill task and fails every pending and future acquisition.
    ///
    /// Calling it again is a no-op. Returns the error of the refill task if it had failed.
    pub async fn close(&self) -> StdResult<()> {
        self.pool.close();
        let refill_task = self
            .refill_task
            .lock()
            .map_err(|e| anyhow!("Rate limiter refill task lock poisoned: {e}"))?
            .take();
        let Some(refill_task) = refill_task else {
            return Ok(());
        };
        refill_task.abort();
        self.observer.on_shutdown(RATE_LIMITER_POOL);

        match refill_task.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Ok(()),
            Err(e) => {
                let error = anyhow!("Rate limiter refill task panicked: {e}");
                self.observer.on_refill_failure(&error);
                Err(error)
            }
        }
    }
}

impl Drop for RateLimiter {
    fn drop(&mut self) {
        self.pool.close();
        if let Ok(mut refill_task) = self.refill_task.lock() {
            if let Some(refill_task) = refill_task.take() {
                refill_task.abort();
            }
        }
    }
}
