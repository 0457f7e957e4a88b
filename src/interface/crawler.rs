use crate::StdResult;

/// A trait for running one scrape of the GitHub API.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RepositoryCrawler {
    /// Scrapes at most `limit` repositories and returns how many were persisted.
    async fn crawl(&self, limit: u16) -> StdResult<u32>;
}
