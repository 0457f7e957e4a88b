use crate::{Repository, StdResult};

/// A trait for retrieving the top repositories and the recent activity of their authors.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RepositoryFetcher: Sync + Send {
    /// Fetches at most `limit` repositories, ordered by rank.
    async fn get_repositories(&self, limit: u16) -> StdResult<Vec<Repository>>;

    /// Releases the resources held by the fetcher.
    async fn close(&self) -> StdResult<()>;
}
