use crate::{ApiError, ApiRequest};

/// A trait for issuing a single call to the GitHub REST API.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ApiRequester: Sync + Send {
    /// Sends the request and decodes the JSON payload, classifying failed outcomes.
    async fn request(&self, request: &ApiRequest) -> Result<serde_json::Value, ApiError>;
}
