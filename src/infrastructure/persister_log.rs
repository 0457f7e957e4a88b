use log::info;

use crate::{Repository, RepositoryPersister, StdResult};

/// A persister that only writes the repositories to the log.
#[derive(Debug, Default)]
pub struct LogPersister;

#[async_trait::async_trait]
impl RepositoryPersister for LogPersister {
    async fn persist(&self, data: &[Repository]) -> StdResult<u32> {
        for repository in data {
            info!("{repository}");
        }

        Ok(data.len() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn persist_counts_every_repository() {
        let persister = LogPersister;

        let total = persister
            .persist(&[
                Repository::dummy("repository-1", 1),
                Repository::dummy("repository-2", 2),
            ])
            .await
            .unwrap();

        assert_eq!(2, total);
    }
}
