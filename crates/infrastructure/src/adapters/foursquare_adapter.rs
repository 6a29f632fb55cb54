//! Foursquare adapter - Implements `VenueSearchPort` and `VenueHoursPort`
//! using `integration_foursquare`

use std::sync::Arc;

use application::ApplicationError;
use application::ports::{VenueHoursPort, VenueSearchPort};
use async_trait::async_trait;
use domain::{VenueId, VenueRecord, VisitRequest, WeeklyHours};
use integration_foursquare::{FoursquareError, FoursquareVenueClient, VenueClient};
use tracing::{debug, instrument};

use crate::config::FoursquareAppConfig;
use crate::retry::{RetryConfig, retry};

/// Adapter for venue search and hours lookups
pub struct FoursquareAdapter {
    client: Arc<dyn VenueClient>,
    retry: RetryConfig,
}

impl std::fmt::Debug for FoursquareAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoursquareAdapter")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl FoursquareAdapter {
    /// Wrap an existing venue client
    #[must_use]
    pub fn new(client: Arc<dyn VenueClient>, retry: RetryConfig) -> Self {
        Self { client, retry }
    }

    /// Build the HTTP client from configuration
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if credentials are missing.
    pub fn from_config(
        config: &FoursquareAppConfig,
        retry: RetryConfig,
    ) -> Result<Self, ApplicationError> {
        let client = FoursquareVenueClient::new(&config.to_client_config()).map_err(map_error)?;
        Ok(Self::new(Arc::new(client), retry))
    }
}

/// Map integration errors to application errors
fn map_error(err: FoursquareError) -> ApplicationError {
    match err {
        FoursquareError::ConfigurationError(e) => ApplicationError::Configuration(e),
        other => ApplicationError::UpstreamUnavailable(format!("Foursquare: {other}")),
    }
}

#[async_trait]
impl VenueSearchPort for FoursquareAdapter {
    #[instrument(skip(self, request), fields(query = %request.query(), radius = request.radius_m()))]
    async fn search_venues(
        &self,
        request: &VisitRequest,
    ) -> Result<Vec<VenueRecord>, ApplicationError> {
        let venues = retry(&self.retry, "foursquare.explore", || {
            self.client.explore(
                request.location(),
                request.query(),
                request.radius_m(),
                request.limit(),
            )
        })
        .await
        .map_err(map_error)?;

        debug!(count = venues.len(), "Venue search completed");
        Ok(venues)
    }
}

#[async_trait]
impl VenueHoursPort for FoursquareAdapter {
    #[instrument(skip(self, venue), fields(venue = %venue))]
    async fn weekly_hours(&self, venue: &VenueId) -> Result<Option<WeeklyHours>, ApplicationError> {
        retry(&self.retry, "foursquare.hours", || self.client.venue_hours(venue))
            .await
            .map_err(map_error)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use domain::GeoLocation;

    use super::*;

    /// Fails with the queued errors first, then returns no venues
    struct FlakyClient {
        failures: Mutex<Vec<FoursquareError>>,
    }

    #[async_trait]
    impl VenueClient for FlakyClient {
        async fn explore(
            &self,
            _: &GeoLocation,
            _: &str,
            _: u32,
            _: u16,
        ) -> Result<Vec<VenueRecord>, FoursquareError> {
            match self.failures.lock().unwrap().pop() {
                Some(err) => Err(err),
                None => Ok(Vec::new()),
            }
        }

        async fn venue_hours(&self, _: &VenueId) -> Result<Option<WeeklyHours>, FoursquareError> {
            match self.failures.lock().unwrap().pop() {
                Some(err) => Err(err),
                None => Ok(None),
            }
        }
    }

    fn adapter(failures: Vec<FoursquareError>) -> FoursquareAdapter {
        FoursquareAdapter::new(
            Arc::new(FlakyClient {
                failures: Mutex::new(failures),
            }),
            RetryConfig::new(1, 2, 2.0, 2).without_jitter(),
        )
    }

    fn request() -> VisitRequest {
        VisitRequest::from_raw(52.52, 13.405, "coffee", 1000, "2021-03-01 12:00:00", 10).unwrap()
    }

    #[tokio::test]
    async fn transient_errors_are_retried() {
        let adapter = adapter(vec![
            FoursquareError::Timeout { timeout_secs: 1 },
            FoursquareError::ServiceUnavailable("503".into()),
        ]);
        assert!(adapter.search_venues(&request()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn exhausted_retries_are_upstream_unavailable() {
        let adapter = adapter(vec![
            FoursquareError::ConnectionFailed("a".into()),
            FoursquareError::ConnectionFailed("b".into()),
            FoursquareError::ConnectionFailed("c".into()),
        ]);
        let err = adapter.search_venues(&request()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn malformed_payload_is_upstream_unavailable() {
        let adapter = adapter(vec![FoursquareError::ParseError("bad json".into())]);
        let err = adapter
            .weekly_hours(&VenueId::new("v").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::UpstreamUnavailable(ref m) if m.contains("bad json")));
    }

    #[test]
    fn missing_credentials_are_a_configuration_error() {
        let err = FoursquareAdapter::from_config(&FoursquareAppConfig::default(), RetryConfig::default())
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }
}
