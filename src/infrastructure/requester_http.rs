use log::{debug, error};
use reqwest::{
    Client, Method,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};

use crate::{ApiError, ApiRequest, ApiRequester, HttpMethod, StdResult};

/// The production endpoint of the GitHub REST API.
pub const GITHUB_API_ENDPOINT: &str = "https://api.github.com";

/// The media type requested from the GitHub REST API.
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// GitHub rejects requests without a user agent.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
        }
    }
}

/// Issues requests to the GitHub REST API over HTTP.
pub struct HttpApiRequester {
    client: Client,
    base_url: String,
}

impl HttpApiRequester {
    /// Creates a new `HttpApiRequester` authenticated with the given bearer token.
    pub fn try_new(base_url: &str, token: &str) -> StdResult<Self> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {token}"))?;
        authorization.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));
        headers.insert(AUTHORIZATION, authorization);
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

#[async_trait::async_trait]
impl ApiRequester for HttpApiRequester {
    async fn request(&self, request: &ApiRequest) -> Result<serde_json::Value, ApiError> {
        let url = self.url(request.endpoint());
        debug!("Sending {request}");
        let response = self
            .client
            .request(request.method().into(), &url)
            .query(request.params())
            .send()
            .await
            .map_err(|e| {
                error!("Network error on {url}: {e}");
                ApiError::Network(Box::new(e))
            })?;

        let status = response.status().as_u16();
        if status < 400 {
            return response.json().await.map_err(|e| {
                error!("Invalid payload from {url}: {e}");
                ApiError::InvalidPayload(e.to_string())
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(Box::new(e)))?;
        let error = match status {
            500.. => ApiError::Server { status, body },
            403 => ApiError::ForbiddenOrRateLimited { body },
            _ => ApiError::Client { status, body },
        };
        error!("Request to {url} failed: {error}");

        Err(error)
    }
}
