use serde::Deserialize;

/// The response of the repository search endpoint.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchRepositoriesResponse {
    /// The repositories, ordered as requested.
    pub items: Vec<SearchRepositoryItem>,
}

/// A repository as returned by the search endpoint.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchRepositoryItem {
    /// The name of the repository.
    pub name: String,

    /// The owner of the repository.
    pub owner: RepositoryOwner,

    /// The number of stars.
    pub stargazers_count: u64,

    /// The number of watchers.
    pub watchers_count: u64,

    /// The number of forks.
    pub forks_count: u64,

    /// The primary language, if GitHub detected one.
    #[serde(default)]
    pub language: Option<String>,
}

/// The owner of a repository.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner {
    /// The login of the owner.
    pub login: String,
}

/// A commit as returned by the commits endpoint.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitItem {
    /// The GitHub account of the author, absent when the commit email is not linked to an account.
    #[serde(default)]
    pub author: Option<CommitAuthor>,
}

impl CommitItem {
    /// Creates a commit authored by the given login, or by nobody.
    pub fn new(login: Option<&str>) -> Self {
        Self {
            author: login.map(|login| CommitAuthor {
                login: Some(login.to_string()),
            }),
        }
    }

    /// Retrieves the login of the author, if any.
    pub fn author_login(&self) -> Option<&str> {
        self.author
            .as_ref()
            .and_then(|author| author.login.as_deref())
    }
}

/// The GitHub account that authored a commit.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitAuthor {
    /// The login of the author.
    #[serde(default)]
    pub login: Option<String>,
}
