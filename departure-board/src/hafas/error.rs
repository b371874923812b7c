//! transport.rest client error types.

/// Errors from the HAFAS HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    /// HTTP request failed (connection refused, DNS, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request did not complete within its timeout
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u128 },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Rate limited by the API
    #[error("rate limited by transport.rest")]
    RateLimited,

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Concurrency limiter shut down
    #[error("request limiter closed")]
    LimiterClosed,
}

impl TransitError {
    /// Map a reqwest error, separating timeouts from other failures.
    pub(crate) fn from_request(err: reqwest::Error, timeout: std::time::Duration) -> Self {
        if err.is_timeout() {
            TransitError::Timeout {
                timeout_ms: timeout.as_millis(),
            }
        } else {
            TransitError::Http(err)
        }
    }
}
