use log::{debug, error, info, warn};

use crate::{ApiError, ScrapeObserver};

/// An observer writing scrape events to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ScrapeObserver for LogObserver {
    fn on_permit_wait(&self, pool: &str, capacity: usize) {
        debug!("Permit pool {pool} exhausted (capacity={capacity}), waiting for a permit");
    }

    fn on_commits_failure(&self, owner: &str, repository: &str, error: &anyhow::Error) {
        let throttled = error
            .downcast_ref::<ApiError>()
            .is_some_and(ApiError::is_throttled);
        if throttled {
            warn!(
                "GitHub is throttling requests, commits of {owner}/{repository} replaced by an empty list: {error}"
            );
        } else {
            warn!(
                "Failed to fetch commits of {owner}/{repository}, replaced by an empty list: {error:#}"
            );
        }
    }

    fn on_refill_tick(&self, released: usize, available: usize, capacity: usize) {
        debug!("Rate limiter tick: released={released}, available={available}/{capacity}");
    }

    fn on_refill_failure(&self, error: &anyhow::Error) {
        error!("Rate limiter refill stopped: {error:#}");
    }

    fn on_shutdown(&self, component: &str) {
        info!("Shut down {component}");
    }
}
