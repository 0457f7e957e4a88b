use thiserror::Error;

/// The standard result type used throughout the application.
pub type StdResult<T> = Result<T, anyhow::Error>;

/// The boxed cause of a transport failure.
pub type TransportCause = Box<dyn std::error::Error + Send + Sync>;

/// An error raised by an API requester.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("Network error: {0}")]
    Network(#[source] TransportCause),

    /// The API answered with a 5xx status.
    #[error("Server error {status}: {body}")]
    Server {
        /// The HTTP status code
        status: u16,
        /// The raw response body
        body: String,
    },

    /// The API answered with 403, usually its own rate limit being hit.
    #[error("Forbidden or rate limited: {body}")]
    ForbiddenOrRateLimited {
        /// The raw response body
        body: String,
    },

    /// The API answered with a 4xx status other than 403.
    #[error("Client error {status}: {body}")]
    Client {
        /// The HTTP status code
        status: u16,
        /// The raw response body
        body: String,
    },

    /// The API answered with a success status but the body is not valid JSON.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl ApiError {
    /// Whether the error signals that the platform is throttling the client.
    pub fn is_throttled(&self) -> bool {
        matches!(self, ApiError::ForbiddenOrRateLimited { .. })
    }
}

/// An error raised by a permit pool.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PermitError {
    /// The pool has been closed, no permit will ever be granted again.
    #[error("Permit pool '{0}' is closed")]
    Closed(&'static str),

    /// The pool was configured with an unusable capacity.
    #[error("Permit pool '{name}' capacity must be between 1 and {max}, got {capacity}")]
    InvalidCapacity {
        /// The name of the pool
        name: &'static str,
        /// The requested capacity
        capacity: usize,
        /// The largest supported capacity
        max: usize,
    },
}
