use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use anyhow::Context;
use chrono::{Duration, Utc};
use futures::future::join_all;
use log::{debug, info};

use crate::{
    ApiError, ApiRequest, ApiRequester, AuthorCommitCount, CommitItem, ConcurrencyGate, RateLimiter,
    RefillTicker, Repository, RepositoryFetcher, RepositoryStats, ScrapeObserver,
    SearchRepositoriesResponse, SearchRepositoryItem, StdResult,
};

/// The width of the commit activity window.
const COMMITS_WINDOW_HOURS: i64 = 24;

/// The limits applied to the requests sent by a fetcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetcherLimits {
    /// The maximum number of requests in flight.
    pub max_concurrent_requests: usize,

    /// The maximum number of requests started per second.
    pub requests_per_second: usize,
}

impl Default for FetcherLimits {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 10,
            requests_per_second: 5,
        }
    }
}

/// Fetches the most starred GitHub repositories and the commits of their authors over the last day.
pub struct GithubRepositoryFetcher {
    requester: Arc<dyn ApiRequester>,
    concurrency_gate: ConcurrencyGate,
    rate_limiter: RateLimiter,
    observer: Arc<dyn ScrapeObserver>,
    closed: AtomicBool,
}

impl GithubRepositoryFetcher {
    /// Creates a new `GithubRepositoryFetcher` rate limited once per second.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn try_new(
        requester: Arc<dyn ApiRequester>,
        limits: FetcherLimits,
        observer: Arc<dyn ScrapeObserver>,
    ) -> StdResult<Self> {
        let rate_limiter = RateLimiter::start(limits.requests_per_second, observer.clone())?;

        Self::with_rate_limiter(requester, limits, rate_limiter, observer)
    }

    /// Creates a new `GithubRepositoryFetcher` whose rate limiter is refilled by the given ticker.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn try_new_with_ticker(
        requester: Arc<dyn ApiRequester>,
        limits: FetcherLimits,
        ticker: Box<dyn RefillTicker>,
        observer: Arc<dyn ScrapeObserver>,
    ) -> StdResult<Self> {
        let rate_limiter =
            RateLimiter::start_with_ticker(limits.requests_per_second, ticker, observer.clone())?;

        Self::with_rate_limiter(requester, limits, rate_limiter, observer)
    }

    fn with_rate_limiter(
        requester: Arc<dyn ApiRequester>,
        limits: FetcherLimits,
        rate_limiter: RateLimiter,
        observer: Arc<dyn ScrapeObserver>,
    ) -> StdResult<Self> {
        let concurrency_gate =
            ConcurrencyGate::try_new(limits.max_concurrent_requests, observer.clone())?;

        Ok(Self {
            requester,
            concurrency_gate,
            rate_limiter,
            observer,
            closed: AtomicBool::new(false),
        })
    }

    /// Sends a request once both a concurrency slot and a rate limit permit are held.
    ///
    /// A forbidden or rate limited response makes the rate limiter back off before the slot is
    /// released.
    async fn limited_request(&self, request: &ApiRequest) -> StdResult<serde_json::Value> {
        let _slot = self.concurrency_gate.acquire().await?;
        self.rate_limiter.acquire().await?;

        let response = self.requester.request(request).await;
        if response.as_ref().is_err_and(ApiError::is_throttled) {
            self.rate_limiter.back_off();
        }

        Ok(response?)
    }

    /// Fetches the most starred repositories, in rank order.
    pub async fn get_top_repositories(&self, limit: u16) -> StdResult<Vec<SearchRepositoryItem>> {
        info!("Fetching top {limit} repositories");
        let payload = self
            .limited_request(&ApiRequest::search_top_repositories(limit))
            .await
            .with_context(|| format!("Failed to fetch top {limit} repositories"))?;
        let mut items = serde_json::from_value::<SearchRepositoriesResponse>(payload)
            .with_context(|| "Failed to decode repository search results")?
            .items;
        items.truncate(limit as usize);

        Ok(items)
    }

    /// Fetches the commits of a repository over the last 24 hours.
    pub async fn get_repository_commits(
        &self,
        owner: &str,
        repository: &str,
    ) -> StdResult<Vec<CommitItem>> {
        let since = Utc::now() - Duration::hours(COMMITS_WINDOW_HOURS);
        debug!("Fetching commits of {owner}/{repository} since {since}");
        let payload = self
            .limited_request(&ApiRequest::repository_commits(owner, repository, since))
            .await?;

        serde_json::from_value(payload)
            .with_context(|| format!("Failed to decode commits of {owner}/{repository}"))
    }

    /// Builds the ranked repository, with an empty author list when its commits are unavailable.
    async fn process_repository(&self, item: &SearchRepositoryItem, position: u32) -> Repository {
        let owner = &item.owner.login;
        let commits = match self.get_repository_commits(owner, &item.name).await {
            Ok(commits) => commits,
            Err(e) => {
                self.observer.on_commits_failure(owner, &item.name, &e);
                vec![]
            }
        };

        Repository::new(
            &item.name,
            owner,
            position,
            RepositoryStats {
                stars: item.stargazers_count,
                watchers: item.watchers_count,
                forks: item.forks_count,
            },
            item.language.as_deref(),
            AuthorCommitCount::aggregate(&commits),
        )
    }
}

#[async_trait::async_trait]
impl RepositoryFetcher for GithubRepositoryFetcher {
    async fn get_repositories(&self, limit: u16) -> StdResult<Vec<Repository>> {
        let items = self.get_top_repositories(limit).await?;
        info!("Fetching commits of {} repositories", items.len());

        let processed = join_all(items.iter().enumerate().map(|(slot, item)| async move {
            let position = slot as u32 + 1;
            (slot, self.process_repository(item, position).await)
        }))
        .await;
        let mut repositories: Vec<Option<Repository>> = vec![None; items.len()];
        for (slot, repository) in processed {
            repositories[slot] = Some(repository);
        }
        info!("Fetched {} repositories", repositories.len());

        Ok(repositories.into_iter().flatten().collect())
    }

    async fn close(&self) -> StdResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.concurrency_gate.close();
        let result = self.rate_limiter.close().await;
        self.observer.on_shutdown("repository fetcher");

        result
    }
}
