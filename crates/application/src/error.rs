//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Malformed user input, raised before any external call
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// External service unreachable, timed out, rate limited or returned
    /// a malformed payload
    #[error("Upstream service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The location could not be matched to a known region
    #[error("Region not found: {0}")]
    RegionNotFound(String),

    /// Reading or writing the request store failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Map or chart rendering failed
    #[error("Rendering error: {0}")]
    Rendering(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable(_))
    }

    /// Check if the pipeline may continue after this error
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::RegionNotFound(_))
    }
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        if err.is_invalid_input() {
            Self::InvalidRequest(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_datetime_maps_to_invalid_request() {
        let err: ApplicationError = DomainError::InvalidDateTime("soon".to_string()).into();
        assert!(matches!(err, ApplicationError::InvalidRequest(_)));
        assert!(err.to_string().contains("soon"));
    }

    #[test]
    fn bad_time_of_day_is_internal() {
        let err: ApplicationError = DomainError::InvalidTimeOfDay("2575".to_string()).into();
        assert!(matches!(err, ApplicationError::Internal(_)));
    }

    #[test]
    fn only_upstream_errors_are_retryable() {
        assert!(ApplicationError::UpstreamUnavailable("timeout".into()).is_retryable());
        assert!(!ApplicationError::RegionNotFound("x".into()).is_retryable());
        assert!(!ApplicationError::InvalidRequest("x".into()).is_retryable());
    }

    #[test]
    fn region_not_found_is_recoverable() {
        assert!(ApplicationError::RegionNotFound("Atlantis".into()).is_recoverable());
        assert!(!ApplicationError::UpstreamUnavailable("down".into()).is_recoverable());
    }
}
