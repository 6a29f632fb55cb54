//! Region adapters - Implement `RegionResolverPort` and `CaseDataPort`
//! using `integration_regions`

use std::sync::Arc;

use application::ApplicationError;
use application::ports::{CaseDataPort, RegionResolverPort, ResolvedRegion};
use async_trait::async_trait;
use domain::{GeoLocation, RegionCaseData};
use integration_regions::{
    AreaTable, CaseDataClient, CaseDataError, GeocodingError, GoogleGeocodingClient,
    ReverseGeocoder, RkiCaseDataClient,
};
use tracing::{debug, instrument};

use crate::config::{CaseDataAppConfig, GeocodingAppConfig};
use crate::retry::{RetryConfig, retry};

/// Resolves coordinates to region keys via reverse geocoding and the area
/// lookup table
pub struct RegionResolverAdapter {
    geocoder: Arc<dyn ReverseGeocoder>,
    table: Arc<AreaTable>,
    retry: RetryConfig,
}

impl std::fmt::Debug for RegionResolverAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionResolverAdapter")
            .field("table_rows", &self.table.len())
            .finish_non_exhaustive()
    }
}

impl RegionResolverAdapter {
    /// Combine a geocoder with a loaded area table
    #[must_use]
    pub fn new(geocoder: Arc<dyn ReverseGeocoder>, table: Arc<AreaTable>, retry: RetryConfig) -> Self {
        Self {
            geocoder,
            table,
            retry,
        }
    }

    /// Build the Google client from configuration
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if no API key is set.
    pub fn from_config(
        config: &GeocodingAppConfig,
        table: Arc<AreaTable>,
        retry: RetryConfig,
    ) -> Result<Self, ApplicationError> {
        let client =
            GoogleGeocodingClient::new(&config.to_client_config()).map_err(map_geocoding_error)?;
        Ok(Self::new(Arc::new(client), table, retry))
    }
}

fn map_geocoding_error(err: GeocodingError) -> ApplicationError {
    match err {
        GeocodingError::NotFound(location) => {
            ApplicationError::RegionNotFound(format!("no address at {location}"))
        },
        GeocodingError::ConfigurationError(e) => ApplicationError::Configuration(e),
        other => ApplicationError::UpstreamUnavailable(format!("Geocoding: {other}")),
    }
}

#[async_trait]
impl RegionResolverPort for RegionResolverAdapter {
    #[instrument(skip(self, location), fields(location = %location))]
    async fn resolve_region(
        &self,
        location: &GeoLocation,
    ) -> Result<ResolvedRegion, ApplicationError> {
        let names = retry(&self.retry, "geocoding.reverse", || {
            self.geocoder.region_names(location)
        })
        .await
        .map_err(map_geocoding_error)?;

        let row = self.table.lookup(&names).ok_or_else(|| {
            ApplicationError::RegionNotFound(format!(
                "no area table entry for {}",
                names.candidates().collect::<Vec<_>>().join(", ")
            ))
        })?;

        let region = match &row.kind {
            Some(kind) => ResolvedRegion::new(&row.name).with_kind(kind),
            None => ResolvedRegion::new(&row.name),
        };
        debug!(region = %region, "Region resolved");
        Ok(region)
    }
}

/// Fetches regional case data from the RKI feature service
pub struct CaseDataAdapter {
    client: Arc<dyn CaseDataClient>,
    retry: RetryConfig,
}

impl std::fmt::Debug for CaseDataAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaseDataAdapter")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl CaseDataAdapter {
    /// Wrap an existing case data client
    #[must_use]
    pub fn new(client: Arc<dyn CaseDataClient>, retry: RetryConfig) -> Self {
        Self { client, retry }
    }

    /// Build the RKI client from configuration
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the client cannot be
    /// built.
    pub fn from_config(
        config: &CaseDataAppConfig,
        retry: RetryConfig,
    ) -> Result<Self, ApplicationError> {
        let client = RkiCaseDataClient::new(config).map_err(map_case_data_error)?;
        Ok(Self::new(Arc::new(client), retry))
    }
}

fn map_case_data_error(err: CaseDataError) -> ApplicationError {
    match err {
        CaseDataError::RegionNotFound(key) => ApplicationError::RegionNotFound(key),
        CaseDataError::ConfigurationError(e) => ApplicationError::Configuration(e),
        other => ApplicationError::UpstreamUnavailable(format!("Case data: {other}")),
    }
}

#[async_trait]
impl CaseDataPort for CaseDataAdapter {
    #[instrument(skip(self, region), fields(region = %region))]
    async fn fetch_case_data(
        &self,
        region: &ResolvedRegion,
    ) -> Result<RegionCaseData, ApplicationError> {
        retry(&self.retry, "case_data.query", || {
            self.client.case_data(&region.key)
        })
        .await
        .map_err(map_case_data_error)
    }
}

#[cfg(test)]
mod tests {
    use integration_regions::{AreaRow, RegionNames};

    use super::*;

    struct FixedGeocoder(Result<RegionNames, GeocodingError>);

    #[async_trait]
    impl ReverseGeocoder for FixedGeocoder {
        async fn region_names(&self, _: &GeoLocation) -> Result<RegionNames, GeocodingError> {
            match &self.0 {
                Ok(names) => Ok(names.clone()),
                Err(GeocodingError::NotFound(l)) => Err(GeocodingError::NotFound(l.clone())),
                Err(e) => Err(GeocodingError::RequestDenied(e.to_string())),
            }
        }
    }

    fn table() -> Arc<AreaTable> {
        Arc::new(AreaTable::new(vec![AreaRow {
            name: "Berlin Mitte".to_string(),
            googlemaps_key: Some("Mitte".to_string()),
            kind: Some("Bezirk".to_string()),
        }]))
    }

    fn resolver(names: Result<RegionNames, GeocodingError>) -> RegionResolverAdapter {
        RegionResolverAdapter::new(
            Arc::new(FixedGeocoder(names)),
            table(),
            RetryConfig::disabled(),
        )
    }

    #[tokio::test]
    async fn resolves_known_region() {
        let names = RegionNames {
            sublocality: Some("Mitte".to_string()),
            locality: Some("Berlin".to_string()),
            ..RegionNames::default()
        };
        let region = resolver(Ok(names))
            .resolve_region(&GeoLocation::berlin())
            .await
            .unwrap();
        assert_eq!(region.key, "Berlin Mitte");
        assert_eq!(region.kind.as_deref(), Some("Bezirk"));
    }

    #[tokio::test]
    async fn unknown_region_is_recoverable() {
        let names = RegionNames {
            locality: Some("Köln".to_string()),
            ..RegionNames::default()
        };
        let err = resolver(Ok(names))
            .resolve_region(&GeoLocation::berlin())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::RegionNotFound(ref m) if m.contains("Köln")));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn zero_results_is_recoverable() {
        let err = resolver(Err(GeocodingError::NotFound("0,0".to_string())))
            .resolve_region(&GeoLocation::berlin())
            .await
            .unwrap_err();
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn denied_request_is_fatal() {
        let err = resolver(Err(GeocodingError::RequestDenied("bad key".to_string())))
            .resolve_region(&GeoLocation::berlin())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::UpstreamUnavailable(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn case_data_errors_map() {
        assert!(matches!(
            map_case_data_error(CaseDataError::RegionNotFound("x".into())),
            ApplicationError::RegionNotFound(_)
        ));
        assert!(matches!(
            map_case_data_error(CaseDataError::Timeout { timeout_secs: 3 }),
            ApplicationError::UpstreamUnavailable(_)
        ));
    }
}
