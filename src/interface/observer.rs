/// A trait receiving the notable events of a scrape.
#[cfg_attr(test, mockall::automock)]
pub trait ScrapeObserver: Sync + Send {
    /// A caller found the permit pool empty and is waiting for a permit.
    fn on_permit_wait(&self, pool: &str, capacity: usize);

    /// The commits of a repository could not be fetched and were replaced by an empty list.
    fn on_commits_failure(&self, owner: &str, repository: &str, error: &anyhow::Error);

    /// The rate limiter released `released` permits and now has `available` of `capacity`.
    fn on_refill_tick(&self, released: usize, available: usize, capacity: usize);

    /// The rate limiter refill task stopped unexpectedly.
    fn on_refill_failure(&self, error: &anyhow::Error);

    /// A component has been shut down.
    fn on_shutdown(&self, component: &str);
}
