use chrono::Utc;
use log::info;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{Repository, RepositoryPersister, StdResult};

const CREATE_SCHEMA_STATEMENTS: [&str; 4] = [
    "CREATE SCHEMA IF NOT EXISTS github",
    r#"
CREATE TABLE IF NOT EXISTS github.repositories (
    name TEXT NOT NULL,
    owner TEXT NOT NULL,
    stars BIGINT NOT NULL,
    watchers BIGINT NOT NULL,
    forks BIGINT NOT NULL,
    language TEXT NOT NULL,
    updated TIMESTAMPTZ NOT NULL,
    PRIMARY KEY (owner, name)
)"#,
    r#"
CREATE TABLE IF NOT EXISTS github.repositories_positions (
    date DATE NOT NULL,
    owner TEXT NOT NULL,
    repo TEXT NOT NULL,
    position INTEGER NOT NULL,
    PRIMARY KEY (date, owner, repo)
)"#,
    r#"
CREATE TABLE IF NOT EXISTS github.repositories_authors_commits (
    date DATE NOT NULL,
    owner TEXT NOT NULL,
    repo TEXT NOT NULL,
    author TEXT NOT NULL,
    commits_num INTEGER NOT NULL,
    PRIMARY KEY (date, owner, repo, author)
)"#,
];

const UPSERT_REPOSITORY: &str = r#"
INSERT INTO github.repositories (name, owner, stars, watchers, forks, language, updated)
VALUES ($1, $2, $3, $4, $5, $6, $7)
ON CONFLICT (owner, name) DO UPDATE
SET stars = EXCLUDED.stars,
    watchers = EXCLUDED.watchers,
    forks = EXCLUDED.forks,
    language = EXCLUDED.language,
    updated = EXCLUDED.updated
"#;

const UPSERT_POSITION: &str = r#"
INSERT INTO github.repositories_positions (date, owner, repo, position)
VALUES ($1, $2, $3, $4)
ON CONFLICT (date, owner, repo) DO UPDATE
SET position = EXCLUDED.position
"#;

const UPSERT_AUTHOR_COMMITS: &str = r#"
INSERT INTO github.repositories_authors_commits (date, owner, repo, author, commits_num)
VALUES ($1, $2, $3, $4, $5)
ON CONFLICT (date, owner, repo, author) DO UPDATE
SET commits_num = EXCLUDED.commits_num
"#;

/// A persister that stores repository metadata in a PostgreSQL database.
pub struct PostgresSqlPersister {
    pool: PgPool,
}

impl PostgresSqlPersister {
    /// Creates a new `PostgresSqlPersister` instance and makes sure its tables exist.
    pub async fn try_new(connection_string: &str) -> StdResult<Self> {
        let persister = Self {
            pool: PgPoolOptions::new()
                .max_connections(1)
                .connect(connection_string)
                .await?,
        };
        persister.ensure_schema().await?;

        Ok(persister)
    }

    /// Creates the schema and tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> StdResult<()> {
        for statement in CREATE_SCHEMA_STATEMENTS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema is ready");

        Ok(())
    }
}

#[async_trait::async_trait]
impl RepositoryPersister for PostgresSqlPersister {
    async fn persist(&self, data: &[Repository]) -> StdResult<u32> {
        let now = Utc::now();
        let today = now.date_naive();
        let mut transaction = self.pool.begin().await?;
        let mut total_authors_rows = 0;
        for repository in data {
            sqlx::query(UPSERT_REPOSITORY)
                .bind(repository.name().as_str())
                .bind(repository.owner().as_str())
                .bind(repository.stars() as i64)
                .bind(repository.watchers() as i64)
                .bind(repository.forks() as i64)
                .bind(repository.language())
                .bind(now)
                .execute(&mut *transaction)
                .await?;

            sqlx::query(UPSERT_POSITION)
                .bind(today)
                .bind(repository.owner().as_str())
                .bind(repository.name().as_str())
                .bind(repository.position() as i32)
                .execute(&mut *transaction)
                .await?;

            for author_commits in repository.authors_commits_num_today() {
                sqlx::query(UPSERT_AUTHOR_COMMITS)
                    .bind(today)
                    .bind(repository.owner().as_str())
                    .bind(repository.name().as_str())
                    .bind(author_commits.author())
                    .bind(author_commits.commits_num() as i32)
                    .execute(&mut *transaction)
                    .await?;
                total_authors_rows += 1;
            }
            info!("Stored {repository}");
        }
        transaction.commit().await?;
        info!(
            "Persisted {} repositories with {total_authors_rows} author commit rows",
            data.len()
        );

        Ok(data.len() as u32)
    }
}
