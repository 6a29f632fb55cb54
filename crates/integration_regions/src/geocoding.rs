//! Google reverse geocoding client
//!
//! Resolves a coordinate to the place names that the area table is keyed
//! by, using the [Google Geocoding API](https://developers.google.com/maps/documentation/geocoding).

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use domain::GeoLocation;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::GeocodingConfig;
use crate::error::GeocodingError;

/// Place names of a coordinate, by address component type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionNames {
    /// City district (e.g. "Mitte")
    pub sublocality: Option<String>,
    /// City (e.g. "Berlin")
    pub locality: Option<String>,
    /// Municipality
    pub administrative_area_level_3: Option<String>,
}

impl RegionNames {
    /// Names that are present, most specific first
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        [
            &self.sublocality,
            &self.locality,
            &self.administrative_area_level_3,
        ]
        .into_iter()
        .filter_map(|name| name.as_deref())
    }

    /// Whether no name was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates().next().is_none()
    }
}

/// Trait for reverse geocoding clients
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Place names of the region containing `location`
    async fn region_names(&self, location: &GeoLocation) -> Result<RegionNames, GeocodingError>;
}

/// Google Geocoding API client
pub struct GoogleGeocodingClient {
    client: Client,
    config: GeocodingConfig,
    api_key: String,
}

impl fmt::Debug for GoogleGeocodingClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleGeocodingClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl GoogleGeocodingClient {
    /// Create a new geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured or the HTTP client cannot
    /// be initialized.
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeocodingError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                GeocodingError::ConfigurationError("Geocoding api_key is required".to_string())
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("quietspot/1.0")
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
            api_key,
        })
    }

    /// Extract region names from a raw response body
    fn parse_response(body: &str, location: &GeoLocation) -> Result<RegionNames, GeocodingError> {
        let raw: RawGeocodeResponse =
            serde_json::from_str(body).map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        match raw.status.as_str() {
            "OK" => {},
            "ZERO_RESULTS" => return Err(GeocodingError::NotFound(location.to_query_param())),
            "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => {
                return Err(GeocodingError::RateLimitExceeded);
            },
            "UNKNOWN_ERROR" => {
                return Err(GeocodingError::ServiceUnavailable(raw.status.clone()));
            },
            _ => {
                return Err(GeocodingError::RequestDenied(
                    raw.error_message.clone().unwrap_or_else(|| raw.status.clone()),
                ));
            },
        }

        let first = raw
            .results
            .into_iter()
            .next()
            .ok_or_else(|| GeocodingError::NotFound(location.to_query_param()))?;

        let mut names = RegionNames::default();
        for component in first.address_components {
            for kind in &component.types {
                let slot = match kind.as_str() {
                    "sublocality" => &mut names.sublocality,
                    "locality" => &mut names.locality,
                    "administrative_area_level_3" => &mut names.administrative_area_level_3,
                    _ => continue,
                };
                *slot = Some(component.long_name.clone());
            }
        }

        Ok(names)
    }
}

#[async_trait]
impl ReverseGeocoder for GoogleGeocodingClient {
    #[instrument(skip(self, location), fields(location = %location))]
    async fn region_names(&self, location: &GeoLocation) -> Result<RegionNames, GeocodingError> {
        let url = format!("{}/geocode/json", self.config.base_url);
        let params = [
            ("latlng", location.to_query_param()),
            ("key", self.api_key.clone()),
        ];

        debug!("Reverse geocoding");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodingError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    GeocodingError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodingError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(GeocodingError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(GeocodingError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        let names = Self::parse_response(&body, location)?;
        debug!(?names, "Region names resolved");
        Ok(names)
    }
}

/// Raw Geocoding API response
#[derive(Debug, Deserialize)]
struct RawGeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<RawGeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawGeocodeResult {
    #[serde(default)]
    address_components: Vec<RawAddressComponent>,
}

#[derive(Debug, Deserialize)]
struct RawAddressComponent {
    long_name: String,
    #[serde(default)]
    types: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BERLIN_MITTE: &str = r#"{
        "status": "OK",
        "results": [{
            "address_components": [
                {"long_name": "10", "short_name": "10", "types": ["street_number"]},
                {"long_name": "Mitte", "short_name": "Mitte",
                 "types": ["political", "sublocality", "sublocality_level_1"]},
                {"long_name": "Berlin", "short_name": "Berlin", "types": ["locality", "political"]},
                {"long_name": "Deutschland", "short_name": "DE", "types": ["country", "political"]}
            ]
        }, {
            "address_components": [
                {"long_name": "Elsewhere", "short_name": "E", "types": ["locality"]}
            ]
        }]
    }"#;

    #[test]
    fn test_parse_first_result() {
        let names =
            GoogleGeocodingClient::parse_response(BERLIN_MITTE, &GeoLocation::berlin()).unwrap();
        assert_eq!(names.sublocality.as_deref(), Some("Mitte"));
        assert_eq!(names.locality.as_deref(), Some("Berlin"));
        assert!(names.administrative_area_level_3.is_none());
        assert_eq!(names.candidates().collect::<Vec<_>>(), vec!["Mitte", "Berlin"]);
    }

    #[test]
    fn test_zero_results() {
        let err = GoogleGeocodingClient::parse_response(
            r#"{"status": "ZERO_RESULTS", "results": []}"#,
            &GeoLocation::berlin(),
        )
        .unwrap_err();
        assert!(matches!(err, GeocodingError::NotFound(_)));
    }

    #[test]
    fn test_request_denied() {
        let err = GoogleGeocodingClient::parse_response(
            r#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid.", "results": []}"#,
            &GeoLocation::berlin(),
        )
        .unwrap_err();
        assert!(matches!(err, GeocodingError::RequestDenied(ref m) if m.contains("API key")));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_over_query_limit_is_retryable() {
        let err = GoogleGeocodingClient::parse_response(
            r#"{"status": "OVER_QUERY_LIMIT", "results": []}"#,
            &GeoLocation::berlin(),
        )
        .unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_requires_api_key() {
        assert!(matches!(
            GoogleGeocodingClient::new(&GeocodingConfig::default()),
            Err(GeocodingError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_empty_names() {
        assert!(RegionNames::default().is_empty());
        let names = RegionNames {
            locality: Some("Köln".to_string()),
            ..RegionNames::default()
        };
        assert!(!names.is_empty());
    }
}
