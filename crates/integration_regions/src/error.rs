//! Region integration error types

use thiserror::Error;

/// Errors that can occur during reverse geocoding
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// Connection to geocoding service failed
    #[error("Geocoding connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to geocoding service failed
    #[error("Geocoding request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse geocoding response
    #[error("Geocoding parse error: {0}")]
    ParseError(String),

    /// The coordinate has no geocoding result
    #[error("No address found for {0}")]
    NotFound(String),

    /// Quota exhausted (`OVER_QUERY_LIMIT` or HTTP 429)
    #[error("Geocoding rate limit exceeded")]
    RateLimitExceeded,

    /// The API rejected the key or the request
    #[error("Geocoding request denied: {0}")]
    RequestDenied(String),

    /// Temporary server-side failure
    #[error("Geocoding service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Configuration error
    #[error("Geocoding configuration error: {0}")]
    ConfigurationError(String),

    /// Request timeout
    #[error("Geocoding request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl GeocodingError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RateLimitExceeded
                | Self::ServiceUnavailable(_)
                | Self::Timeout { .. }
        )
    }
}

/// Errors that can occur while fetching regional case data
#[derive(Debug, Error)]
pub enum CaseDataError {
    /// Connection to the feature service failed
    #[error("Case data connection failed: {0}")]
    ConnectionFailed(String),

    /// Request was rejected
    #[error("Case data request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse the response
    #[error("Case data parse error: {0}")]
    ParseError(String),

    /// No feature matched the region key
    #[error("No case data for region {0}")]
    RegionNotFound(String),

    /// Temporary server-side failure
    #[error("Case data service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Configuration error
    #[error("Case data configuration error: {0}")]
    ConfigurationError(String),

    /// Request timeout
    #[error("Case data request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl CaseDataError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::ServiceUnavailable(_) | Self::Timeout { .. }
        )
    }
}

/// Errors that can occur while loading the area table
#[derive(Debug, Error)]
pub enum AreaTableError {
    /// The file could not be read or a row could not be parsed
    #[error("Area table error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is missing from the header
    #[error("Area table is missing column {0}")]
    MissingColumn(&'static str),
}
