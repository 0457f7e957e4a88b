use std::{collections::HashMap, fmt::Display, ops::Deref};

use super::CommitItem;

/// The placeholder used when an author or a language is not known.
pub const UNKNOWN: &str = "unknown";

/// The name of a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(pub String);

impl Deref for RepositoryName {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for RepositoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The login of the account owning a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerName(pub String);

impl Deref for OwnerName {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for OwnerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Popularity counters of a repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepositoryStats {
    /// The number of stars.
    pub stars: u64,
    /// The number of watchers.
    pub watchers: u64,
    /// The number of forks.
    pub forks: u64,
}

/// The number of commits an author pushed during the last 24 hours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorCommitCount {
    /// The login of the author.
    author: String,

    /// The number of commits, always strictly positive.
    commits_num: u32,
}

impl AuthorCommitCount {
    /// Creates a new `AuthorCommitCount` instance.
    pub fn new(author: &str, commits_num: u32) -> Self {
        Self {
            author: author.to_string(),
            commits_num,
        }
    }

    /// Counts commits per author, in the order authors first appear.
    ///
    /// Commits without a known author account are attributed to [UNKNOWN].
    pub fn aggregate(commits: &[CommitItem]) -> Vec<Self> {
        let mut counts: Vec<Self> = Vec::new();
        let mut slots: HashMap<&str, usize> = HashMap::new();
        for commit in commits {
            let author = commit.author_login().unwrap_or(UNKNOWN);
            match slots.get(author) {
                Some(&slot) => counts[slot].commits_num += 1,
                None => {
                    slots.insert(author, counts.len());
                    counts.push(Self::new(author, 1));
                }
            }
        }

        counts
    }

    /// Retrieves the login of the author.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Retrieves the number of commits.
    pub fn commits_num(&self) -> u32 {
        self.commits_num
    }
}

impl Display for AuthorCommitCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.author, self.commits_num)
    }
}

/// A ranked GitHub repository with the commit activity of its authors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// The name of the repository.
    name: RepositoryName,

    /// The login of the owner.
    owner: OwnerName,

    /// The 1-based rank of the repository in the scrape.
    position: u32,

    /// The popularity counters.
    stats: RepositoryStats,

    /// The primary language, [UNKNOWN] when GitHub did not detect one.
    language: String,

    /// The commits per author during the last 24 hours.
    authors_commits_num_today: Vec<AuthorCommitCount>,
}

impl Repository {
    /// Creates a new `Repository` instance.
    pub fn new(
        name: &str,
        owner: &str,
        position: u32,
        stats: RepositoryStats,
        language: Option<&str>,
        authors_commits_num_today: Vec<AuthorCommitCount>,
    ) -> Self {
        Self {
            name: RepositoryName(name.to_string()),
            owner: OwnerName(owner.to_string()),
            position,
            stats,
            language: language.unwrap_or(UNKNOWN).to_string(),
            authors_commits_num_today,
        }
    }

    /// Retrieves the repository name.
    pub fn name(&self) -> &RepositoryName {
        &self.name
    }

    /// Retrieves the owner login.
    pub fn owner(&self) -> &OwnerName {
        &self.owner
    }

    /// Retrieves the rank position.
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Retrieves the number of stars.
    pub fn stars(&self) -> u64 {
        self.stats.stars
    }

    /// Retrieves the number of watchers.
    pub fn watchers(&self) -> u64 {
        self.stats.watchers
    }

    /// Retrieves the number of forks.
    pub fn forks(&self) -> u64 {
        self.stats.forks
    }

    /// Retrieves the primary language.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Retrieves the commits per author during the last 24 hours.
    pub fn authors_commits_num_today(&self) -> &[AuthorCommitCount] {
        &self.authors_commits_num_today
    }

    /// Creates a dummy `Repository` for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy(name: &str, position: u32) -> Self {
        Self::new(
            name,
            "org-1",
            position,
            RepositoryStats {
                stars: 100,
                watchers: 100,
                forks: 10,
            },
            Some("Rust"),
            vec![AuthorCommitCount::new("alice", 1)],
        )
    }
}

impl Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let authors = self
            .authors_commits_num_today
            .iter()
            .map(|count| count.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            f,
            "Repository #{}: {}/{}, Stars: {}, Watchers: {}, Forks: {}, Language: {}, Authors: [{}]",
            self.position,
            self.owner,
            self.name,
            self.stats.stars,
            self.stats.watchers,
            self.stats.forks,
            self.language,
            authors
        )
    }
}
