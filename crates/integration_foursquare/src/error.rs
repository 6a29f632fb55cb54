//! Foursquare error types

use thiserror::Error;

/// Errors that can occur during Foursquare operations
#[derive(Debug, Error)]
pub enum FoursquareError {
    /// Connection to the API failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request was rejected
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body could not be parsed or normalized
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by API)
        retry_after_secs: Option<u64>,
    },

    /// The API answered with an error in its `meta` block
    #[error("API error {code}: {detail}")]
    ApiError {
        /// `meta.code` from the response
        code: u16,
        /// `meta.errorDetail` or `meta.errorType`
        detail: String,
    },

    /// Service is temporarily unavailable (HTTP 5xx)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl FoursquareError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::ServiceUnavailable(_)
                | Self::Timeout { .. }
                | Self::RateLimitExceeded { .. }
        )
    }
}
