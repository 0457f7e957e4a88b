use std::sync::Arc;

use log::{info, warn};

use crate::{RepositoryCrawler, RepositoryFetcher, RepositoryPersister, StdResult};

/// A crawler running one scrape: fetch the ranked repositories, persist them, shut down.
pub struct ScrapeCrawler {
    fetcher: Arc<dyn RepositoryFetcher>,
    persister: Arc<dyn RepositoryPersister>,
}

impl ScrapeCrawler {
    /// Creates a new `ScrapeCrawler` instance with the given fetcher and persister.
    pub fn new(
        fetcher: Arc<dyn RepositoryFetcher>,
        persister: Arc<dyn RepositoryPersister>,
    ) -> Self {
        Self { fetcher, persister }
    }

    async fn fetch_and_persist(&self, limit: u16) -> StdResult<u32> {
        let repositories = self.fetcher.get_repositories(limit).await?;
        if repositories.is_empty() {
            warn!("No repositories fetched, nothing to persist");
            return Ok(0);
        }
        let total_without_activity = repositories
            .iter()
            .filter(|repository| repository.authors_commits_num_today().is_empty())
            .count();
        info!(
            "Fetched {} repositories, {total_without_activity} without commit activity today",
            repositories.len()
        );

        self.persister.persist(&repositories).await
    }
}

#[async_trait::async_trait]
impl RepositoryCrawler for ScrapeCrawler {
    async fn crawl(&self, limit: u16) -> StdResult<u32> {
        let result = self.fetch_and_persist(limit).await;
        let closed = self.fetcher.close().await;
        let total_persisted = result?;
        closed?;
        info!("Persisted {total_persisted} repositories");

        Ok(total_persisted)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use mockall::predicate::eq;

    use crate::{MockRepositoryFetcher, MockRepositoryPersister, Repository};

    use super::*;

    #[tokio::test]
    async fn crawl_persists_fetched_repositories_and_closes_fetcher() {
        let fetcher = {
            let mut fetcher = MockRepositoryFetcher::new();
            fetcher
                .expect_get_repositories()
                .with(eq(2))
                .returning(|_| {
                    Ok(vec![
                        Repository::dummy("repository-1", 1),
                        Repository::dummy("repository-2", 2),
                    ])
                })
                .times(1);
            fetcher.expect_close().returning(|| Ok(())).times(1);

            fetcher
        };
        let persister = {
            let mut persister = MockRepositoryPersister::new();
            persister
                .expect_persist()
                .with(eq(vec![
                    Repository::dummy("repository-1", 1),
                    Repository::dummy("repository-2", 2),
                ]))
                .returning(|_| Ok(2))
                .times(1);

            persister
        };
        let crawler = ScrapeCrawler::new(Arc::new(fetcher), Arc::new(persister));

        let total_persisted = crawler.crawl(2).await.unwrap();

        assert_eq!(2, total_persisted);
    }

    #[tokio::test]
    async fn crawl_skips_persistence_when_nothing_fetched() {
        let fetcher = {
            let mut fetcher = MockRepositoryFetcher::new();
            fetcher
                .expect_get_repositories()
                .returning(|_| Ok(vec![]))
                .times(1);
            fetcher.expect_close().returning(|| Ok(())).times(1);

            fetcher
        };
        let persister = MockRepositoryPersister::new();
        let crawler = ScrapeCrawler::new(Arc::new(fetcher), Arc::new(persister));

        let total_persisted = crawler.crawl(10).await.unwrap();

        assert_eq!(0, total_persisted);
    }

    #[tokio::test]
    async fn crawl_fails_and_closes_fetcher_if_fetch_fails() {
        let fetcher = {
            let mut fetcher = MockRepositoryFetcher::new();
            fetcher
                .expect_get_repositories()
                .returning(|_| Err(anyhow!("Error fetching data")))
                .times(1);
            fetcher.expect_close().returning(|| Ok(())).times(1);

            fetcher
        };
        let persister = MockRepositoryPersister::new();
        let crawler = ScrapeCrawler::new(Arc::new(fetcher), Arc::new(persister));

        crawler
            .crawl(10)
            .await
            .expect_err("Crawler should fail if fetch fails");
    }

    #[tokio::test]
    async fn crawl_fails_and_closes_fetcher_if_persist_fails() {
        let fetcher = {
            let mut fetcher = MockRepositoryFetcher::new();
            fetcher
                .expect_get_repositories()
                .returning(|_| Ok(vec![Repository::dummy("repository-1", 1)]))
                .times(1);
            fetcher.expect_close().returning(|| Ok(())).times(1);

            fetcher
        };
        let persister = {
            let mut persister = MockRepositoryPersister::new();
            persister
                .expect_persist()
                .returning(|_| Err(anyhow!("Error persisting data")))
                .times(1);

            persister
        };
        let crawler = ScrapeCrawler::new(Arc::new(fetcher), Arc::new(persister));

        crawler
            .crawl(10)
            .await
            .expect_err("Crawler should fail if persist fails");
    }

    #[tokio::test]
    async fn crawl_fails_if_fetcher_close_fails() {
        let fetcher = {
            let mut fetcher = MockRepositoryFetcher::new();
            fetcher
                .expect_get_repositories()
                .returning(|_| Ok(vec![Repository::dummy("repository-1", 1)]))
                .times(1);
            fetcher
                .expect_close()
                .returning(|| Err(anyhow!("Refill task failed")))
                .times(1);

            fetcher
        };
        let persister = {
            let mut persister = MockRepositoryPersister::new();
            persister.expect_persist().returning(|_| Ok(1)).times(1);

            persister
        };
        let crawler = ScrapeCrawler::new(Arc::new(fetcher), Arc::new(persister));

        crawler
            .crawl(10)
            .await
            .expect_err("Crawler should surface a failed shutdown");
    }
}
