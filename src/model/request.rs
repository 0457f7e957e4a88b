use std::fmt::Display;

use chrono::{DateTime, SecondsFormat, Utc};

/// The maximum page size accepted by the GitHub search API.
pub const MAX_REPOSITORIES_PER_PAGE: u16 = 100;

/// The HTTP method of an API request.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum HttpMethod {
    /// HTTP GET
    Get,
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
        }
    }
}

/// A request to the GitHub REST API
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct ApiRequest {
    /// The HTTP method.
    pub(crate) method: HttpMethod,

    /// The endpoint, relative to the API base URL.
    pub(crate) endpoint: String,

    /// The query parameters.
    pub(crate) params: Vec<(String, String)>,
}

impl ApiRequest {
    /// Creates a new `ApiRequest` with the given method, endpoint and query parameters.
    pub fn new(method: HttpMethod, endpoint: &str, params: &[(&str, &str)]) -> Self {
        Self {
            method,
            endpoint: endpoint.to_string(),
            params: params
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        }
    }

    /// Creates a request for the most starred repositories.
    ///
    /// The page size is capped to [MAX_REPOSITORIES_PER_PAGE].
    pub fn search_top_repositories(limit: u16) -> Self {
        let per_page = limit.min(MAX_REPOSITORIES_PER_PAGE).to_string();

        Self::new(
            HttpMethod::Get,
            "search/repositories",
            &[
                ("q", "stars:>1"),
                ("sort", "stars"),
                ("order", "desc"),
                ("per_page", per_page.as_str()),
            ],
        )
    }

    /// Creates a request for the commits of a repository authored after `since`.
    pub fn repository_commits(owner: &str, repository: &str, since: DateTime<Utc>) -> Self {
        let since = since.to_rfc3339_opts(SecondsFormat::Secs, true);

        Self::new(
            HttpMethod::Get,
            &format!("repos/{owner}/{repository}/commits"),
            &[("since", since.as_str())],
        )
    }

    /// Retrieves the HTTP method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Retrieves the endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Retrieves the query parameters.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Creates a dummy search request for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy() -> Self {
        Self::search_top_repositories(10)
    }
}

impl Display for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ApiRequest: method={}, endpoint={}, params={:?}",
            self.method, self.endpoint, self.params
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn search_top_repositories_caps_page_size() {
        let request = ApiRequest::search_top_repositories(250);

        assert_eq!(HttpMethod::Get, request.method());
        assert_eq!("search/repositories", request.endpoint());
        assert_eq!(
            vec![
                ("q".to_string(), "stars:>1".to_string()),
                ("sort".to_string(), "stars".to_string()),
                ("order".to_string(), "desc".to_string()),
                ("per_page".to_string(), "100".to_string()),
            ],
            request.params()
        );
    }

    #[test]
    fn search_top_repositories_keeps_small_page_size() {
        let request = ApiRequest::search_top_repositories(7);

        assert!(
            request
                .params()
                .contains(&("per_page".to_string(), "7".to_string()))
        );
    }

    #[test]
    fn repository_commits_encodes_since_in_utc() {
        let since = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();

        let request = ApiRequest::repository_commits("rust-lang", "rust", since);

        assert_eq!("repos/rust-lang/rust/commits", request.endpoint());
        assert_eq!(
            vec![("since".to_string(), "2025-03-14T09:26:53Z".to_string())],
            request.params()
        );
    }
}
